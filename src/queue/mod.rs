//! Priority-queue engines driving the IFT propagation loop.
//!
//! - `heap`: general min-heap over float costs with duplicate-push and
//!   stale-entry skipping — works for any cost function.
//! - `bucket`: array-of-FIFO-queues for bounded integer costs, the
//!   `O(m + nK)` engine, plus a discretizing wrapper for real costs.
//! - `hybrid`: bucket for low integral costs, heap for the rest.
//! - `tiebreak`: bucket skeleton with FIFO/LIFO/random selection inside a
//!   cost level.

pub mod bucket;
pub mod heap;
pub mod hybrid;
pub mod tiebreak;

pub use bucket::{BucketQueue, BucketStats, DiscretizedBucketQueue};
pub use heap::CostHeap;
pub use hybrid::{HybridQueue, HybridStats};
pub use tiebreak::{TieBreakPolicy, TieBreakQueue};

//! The IFT propagation loop and its variants.
//!
//! All variants share the same skeleton: initialize the result maps, queue
//! the reachable pixels keyed by cost, then repeatedly remove the cheapest
//! pixel and relax its neighbors (`tmp ← f(π_t·⟨t,u⟩); if tmp < C(u) then
//! P(u) ← t, C(u) ← tmp, L(u) ← L(t)`). They differ in the queue engine and
//! in when the loop stops:
//!
//! - [`IftSolver::run_basic`] — general heap over every pixel (Algorithm 1).
//! - [`IftSolver::run_optimized`] — bucket queue with lazy insertion for
//!   integer costs, `O(m + nK)` (Algorithm 2); falls back to
//!   [`IftSolver::run_discretized`] for real-valued costs.
//! - [`IftSolver::run_hybrid`] — bucket + heap split by a cost threshold.
//! - [`IftSolver::run_to_target`] — stops as soon as the target is finalized.
//! - [`IftSolver::run_in_region`] — propagation masked to a window.
//! - [`IftSolver::run_tiebreak`] — FIFO/LIFO/random selection among
//!   equal-cost pixels (Algorithm 3).
//!
//! Correctness of all variants requires a monotonic-incremental cost
//! function; anything else produces an unspecified (but safe) forest.

pub mod validate;

pub use validate::validate_result;

use crate::cost::PathCost;
use crate::image::{Connectivity, GrayImage, Pixel};
use crate::queue::{
    BucketQueue, CostHeap, DiscretizedBucketQueue, HybridQueue, TieBreakPolicy, TieBreakQueue,
};
use crate::result::IftResult;
use crate::seeds::SeedSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Knobs shared by every solver variant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Grid adjacency used when relaxing neighbors.
    pub connectivity: Connectivity,
    /// Explicit bucket-range bound `K`; overrides the per-function estimate.
    /// Required knowledge for max-cost functions whose arc weights can
    /// exceed 255.
    pub max_cost_hint: Option<i64>,
    /// Bucket granularity used when real-valued costs are discretized.
    pub precision: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Four,
            max_cost_hint: None,
            precision: 0.1,
        }
    }
}

/// Rectangular window for region-of-interest runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn contains(&self, p: Pixel) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Per-run execution summary.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ExecutionStats {
    /// Pixels with a finite final cost.
    pub pixels_processed: usize,
    /// Pop operations performed by the main loop, duplicates included.
    pub iterations: usize,
    pub execution_ms: f64,
    pub average_cost: f64,
    pub is_complete: bool,
    pub is_valid: bool,
}

/// IFT driver holding options and the stats of the most recent run.
#[derive(Debug, Default)]
pub struct IftSolver {
    options: SolverOptions,
    last_stats: ExecutionStats,
}

/// Relax every neighbor of `t`, recording improvements in the result and
/// handing improved pixels to `enqueue`.
fn relax(
    image: &GrayImage,
    cost: &PathCost,
    connectivity: Connectivity,
    result: &mut IftResult,
    t: Pixel,
    mut enqueue: impl FnMut(Pixel, f64),
) {
    let base = result.cost(t);
    let label = result.label(t);
    for u in image.neighbors(t, connectivity) {
        let tmp = cost.extend(base, cost.arc_weight(t, u));
        if tmp < result.cost(u) {
            result.set_predecessor(u, t);
            result.set_cost(u, tmp);
            result.set_label(u, label);
            enqueue(u, tmp);
        }
    }
}

impl IftSolver {
    pub fn new(options: SolverOptions) -> Self {
        Self {
            options,
            last_stats: ExecutionStats::default(),
        }
    }

    pub fn with_connectivity(connectivity: Connectivity) -> Self {
        Self::new(SolverOptions {
            connectivity,
            ..SolverOptions::default()
        })
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Stats of the most recent `run_*` call.
    pub fn last_stats(&self) -> &ExecutionStats {
        &self.last_stats
    }

    fn init_result(&self, image: &GrayImage, seeds: &SeedSet) -> IftResult {
        let mut result = IftResult::new(image.width(), image.height());
        result.initialize_for_processing(image, seeds);
        result
    }

    fn finish(&mut self, result: &IftResult, iterations: usize, start: Instant) {
        self.last_stats = ExecutionStats {
            pixels_processed: result.processed_pixel_count(),
            iterations,
            execution_ms: start.elapsed().as_secs_f64() * 1e3,
            average_cost: result.average_cost(),
            is_complete: result.is_complete(),
            is_valid: result.is_valid_forest(),
        };
        debug!(
            "IFT done: {} pixels in {:.3} ms, complete={}, valid={}",
            self.last_stats.pixels_processed,
            self.last_stats.execution_ms,
            self.last_stats.is_complete,
            self.last_stats.is_valid
        );
    }

    /// Algorithm 1: heap over every pixel, duplicate-push on improvement.
    pub fn run_basic(&mut self, image: &GrayImage, cost: &PathCost, seeds: &SeedSet) -> IftResult {
        let start = Instant::now();
        debug!(
            "basic IFT: {}x{}, {} active seeds, {}",
            image.width(),
            image.height(),
            seeds.active_count(),
            cost.name()
        );
        let mut result = self.init_result(image, seeds);

        // Q ← I: every pixel enters keyed by its current cost (mostly +inf).
        let mut queue = CostHeap::with_capacity(image.width(), image.len());
        for p in image.all_pixels() {
            queue.push(p, result.cost(p));
        }

        let mut iterations = 0usize;
        while let Some(t) = queue.pop_valid(result.costs()) {
            iterations += 1;
            relax(image, cost, self.options.connectivity, &mut result, t, |u, c| {
                queue.push(u, c)
            });
        }

        self.finish(&result, iterations, start);
        result
    }

    /// Algorithm 2: bucket queue, lazy insertion of reachable pixels only.
    ///
    /// `K` comes from `SolverOptions::max_cost_hint` or the cost function's
    /// estimate. Non-integer cost functions are routed through
    /// [`run_discretized`](Self::run_discretized) at the configured precision.
    pub fn run_optimized(
        &mut self,
        image: &GrayImage,
        cost: &PathCost,
        seeds: &SeedSet,
    ) -> IftResult {
        if !cost.is_integer_cost() {
            debug!("{} is not integer-valued, discretizing", cost.name());
            return self.run_discretized(image, cost, seeds, self.options.precision);
        }

        let start = Instant::now();
        let k = self
            .options
            .max_cost_hint
            .unwrap_or_else(|| cost.max_cost_estimate(image));
        debug!(
            "optimized IFT: {}x{}, K={k}, {} active seeds",
            image.width(),
            image.height(),
            seeds.active_count()
        );
        let mut result = self.init_result(image, seeds);

        let mut queue = BucketQueue::new(k.max(0) as usize);
        for &p in result.seed_pixels() {
            let c = result.cost(p);
            if c.is_finite() {
                queue.push(p, c as i64);
            }
        }

        // Duplicate pops (a pixel re-queued after improving) re-relax its
        // neighbors; that is a no-op unless the cost actually changed.
        let mut iterations = 0usize;
        while let Some(t) = queue.pop() {
            iterations += 1;
            relax(image, cost, self.options.connectivity, &mut result, t, |u, c| {
                queue.push(u, c as i64)
            });
        }

        self.finish(&result, iterations, start);
        result
    }

    /// Algorithm 2 over real-valued costs, rounded onto a bucket grid.
    pub fn run_discretized(
        &mut self,
        image: &GrayImage,
        cost: &PathCost,
        seeds: &SeedSet,
        precision: f64,
    ) -> IftResult {
        let start = Instant::now();
        let k = self
            .options
            .max_cost_hint
            .map(|k| k as f64)
            .unwrap_or_else(|| cost.max_cost_estimate(image) as f64);
        debug!(
            "discretized IFT: {}x{}, K={k}, precision={precision}",
            image.width(),
            image.height()
        );
        let mut result = self.init_result(image, seeds);

        let mut queue = DiscretizedBucketQueue::new(k, precision);
        for &p in result.seed_pixels() {
            let c = result.cost(p);
            if c.is_finite() {
                queue.push(p, c);
            }
        }

        // Rounded keys can pop slightly out of true cost order, so a pixel
        // may improve after it was first popped; re-relaxing the duplicate
        // propagates the correction to its children.
        let mut iterations = 0usize;
        while let Some(t) = queue.pop() {
            iterations += 1;
            relax(image, cost, self.options.connectivity, &mut result, t, |u, c| {
                queue.push(u, c)
            });
        }

        self.finish(&result, iterations, start);
        result
    }

    /// Bucket for low integral costs, heap for everything else.
    pub fn run_hybrid(&mut self, image: &GrayImage, cost: &PathCost, seeds: &SeedSet) -> IftResult {
        let start = Instant::now();
        let k = self
            .options
            .max_cost_hint
            .unwrap_or_else(|| cost.max_cost_estimate(image));
        let threshold = (k / 2).max(1);
        debug!(
            "hybrid IFT: {}x{}, bucket threshold {threshold}",
            image.width(),
            image.height()
        );
        let mut result = self.init_result(image, seeds);

        let mut queue = HybridQueue::new(threshold as usize, threshold as f64);
        for &p in result.seed_pixels() {
            let c = result.cost(p);
            if c.is_finite() {
                queue.push(p, c);
            }
        }

        let mut iterations = 0usize;
        while let Some(t) = queue.pop() {
            iterations += 1;
            relax(image, cost, self.options.connectivity, &mut result, t, |u, c| {
                queue.push(u, c)
            });
        }

        self.finish(&result, iterations, start);
        result
    }

    /// Algorithm 1 with early exit: the queue is discarded once `target` pops,
    /// at which point its cost is final under an MI function.
    pub fn run_to_target(
        &mut self,
        image: &GrayImage,
        cost: &PathCost,
        seeds: &SeedSet,
        target: Pixel,
    ) -> IftResult {
        let start = Instant::now();
        debug!("targeted IFT toward ({}, {})", target.x, target.y);
        let mut result = self.init_result(image, seeds);

        let mut queue = CostHeap::with_capacity(image.width(), image.len());
        for p in image.all_pixels() {
            queue.push(p, result.cost(p));
        }

        let mut iterations = 0usize;
        while let Some(t) = queue.pop_valid(result.costs()) {
            iterations += 1;
            if t.x == target.x && t.y == target.y {
                debug!("target reached at cost {}", result.cost(t));
                break;
            }
            relax(image, cost, self.options.connectivity, &mut result, t, |u, c| {
                queue.push(u, c)
            });
        }

        self.finish(&result, iterations, start);
        result
    }

    /// Algorithm 1 with neighbors masked against a window: pixels outside the
    /// region are never relaxed and keep `C = +∞` (seeds excepted).
    pub fn run_in_region(
        &mut self,
        image: &GrayImage,
        cost: &PathCost,
        seeds: &SeedSet,
        roi: Roi,
    ) -> IftResult {
        let start = Instant::now();
        debug!(
            "ROI IFT in {}x{} window at ({}, {})",
            roi.width, roi.height, roi.x, roi.y
        );
        let mut result = self.init_result(image, seeds);

        let mut queue = CostHeap::with_capacity(image.width(), image.len());
        for p in image.all_pixels() {
            queue.push(p, result.cost(p));
        }

        let connectivity = self.options.connectivity;
        let mut iterations = 0usize;
        while let Some(t) = queue.pop_valid(result.costs()) {
            iterations += 1;
            let base = result.cost(t);
            let label = result.label(t);
            for u in image.neighbors(t, connectivity) {
                if !roi.contains(u) {
                    continue;
                }
                let tmp = cost.extend(base, cost.arc_weight(t, u));
                if tmp < result.cost(u) {
                    result.set_predecessor(u, t);
                    result.set_cost(u, tmp);
                    result.set_label(u, label);
                    queue.push(u, tmp);
                }
            }
        }

        self.finish(&result, iterations, start);
        result
    }

    /// Algorithm 3: bucket propagation with a tie-break policy among pixels
    /// of equal cost. Cost maps match the FIFO variants under MI functions;
    /// predecessor choices along equal-cost boundaries differ.
    pub fn run_tiebreak(
        &mut self,
        image: &GrayImage,
        cost: &PathCost,
        seeds: &SeedSet,
        policy: TieBreakPolicy,
    ) -> IftResult {
        let start = Instant::now();
        debug!(
            "tie-break IFT: {}x{}, policy {policy:?}",
            image.width(),
            image.height()
        );
        let mut result = self.init_result(image, seeds);

        let mut queue = TieBreakQueue::new(policy);
        for &p in result.seed_pixels() {
            let c = result.cost(p);
            if c.is_finite() {
                queue.push(p, c as i64);
            }
        }

        let mut iterations = 0usize;
        while let Some(t) = queue.pop() {
            iterations += 1;
            relax(image, cost, self.options.connectivity, &mut result, t, |u, c| {
                queue.push(u, c as i64)
            });
        }

        self.finish(&result, iterations, start);
        result
    }
}

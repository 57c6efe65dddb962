#![doc = include_str!("../README.md")]

pub mod cost;
pub mod image;
pub mod queue;
pub mod result;
pub mod seeds;
pub mod solver;

// --- High-level re-exports -------------------------------------------------

pub use crate::cost::{ArcWeight, Extension, PathCost};
pub use crate::image::{Connectivity, GrayImage, Pixel};
pub use crate::queue::TieBreakPolicy;
pub use crate::result::IftResult;
pub use crate::seeds::{generate_automatic_seeds, Seed, SeedSet};
pub use crate::solver::{validate_result, ExecutionStats, IftSolver, Roi, SolverOptions};

// --- Prelude ---------------------------------------------------------------

/// Everything needed for a typical segmentation run.
///
/// ```no_run
/// use ift_segmenter::prelude::*;
///
/// let image = GrayImage::filled(32, 32, 0).unwrap();
/// let mut seeds = SeedSet::new();
/// seeds.add(image.pixel(16, 16), Some(1), 0.0);
///
/// let mut solver = IftSolver::default();
/// let result = solver.run_optimized(&image, &PathCost::intensity_diff_sum(), &seeds);
/// assert!(result.is_complete());
/// ```
pub mod prelude {
    pub use crate::cost::PathCost;
    pub use crate::image::{Connectivity, GrayImage, Pixel};
    pub use crate::queue::TieBreakPolicy;
    pub use crate::result::IftResult;
    pub use crate::seeds::SeedSet;
    pub use crate::solver::{IftSolver, SolverOptions};
}

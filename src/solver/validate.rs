//! Result validation against the theoretical IFT properties.
//!
//! Intended for tests and assertions, not hot paths: the path recomputation
//! walks predecessor chains and re-applies the cost function from scratch.

use crate::cost::PathCost;
use crate::image::GrayImage;
use crate::result::IftResult;
use crate::seeds::SeedSet;
use log::debug;

const COST_TOLERANCE: f64 = 1e-6;
const SAMPLE_LIMIT: usize = 100;

/// Check a forest against the inputs that produced it.
///
/// Verifies, in order: acyclicity, seed fidelity (`C(s) = h(s)` for every
/// active seed), and path consistency on a sample of up to 100 finite-cost
/// pixels (reconstructed path cost must equal the stored `C`). Logs the first
/// failure at debug level.
pub fn validate_result(
    result: &IftResult,
    image: &GrayImage,
    cost: &PathCost,
    seeds: &SeedSet,
) -> bool {
    if !result.is_valid_forest() {
        debug!("validation failed: predecessor map contains a cycle");
        return false;
    }

    for seed in seeds.active_seeds() {
        let actual = result.cost(seed.pixel);
        let expected = seed.handicap;
        let matches = if expected.is_infinite() || actual.is_infinite() {
            expected == actual
        } else {
            (actual - expected).abs() <= COST_TOLERANCE
        };
        if !matches {
            debug!(
                "validation failed: seed {} has cost {actual}, expected handicap {expected}",
                seed.pixel
            );
            return false;
        }
    }

    let mut checked = 0usize;
    'scan: for y in (0..image.height() as i32).step_by(2) {
        for x in (0..image.width() as i32).step_by(2) {
            if checked >= SAMPLE_LIMIT {
                break 'scan;
            }
            let p = image.pixel(x, y);
            if !result.has_predecessor(p) {
                continue;
            }
            let path = result.optimal_path(p);
            let recomputed = cost.path_cost(&path, seeds);
            let stored = result.cost(p);
            if recomputed.is_infinite() || (recomputed - stored).abs() > COST_TOLERANCE {
                debug!(
                    "validation failed: path cost to {p} recomputes to {recomputed}, stored {stored}"
                );
                return false;
            }
            checked += 1;
        }
    }

    true
}

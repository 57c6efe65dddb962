//! Path-cost functions: `f(π) = h(root) ⊕ w₁ ⊕ w₂ ⊕ …` over pixel paths.
//!
//! A cost function is the pair of a cost *extension* (how an arc weight folds
//! into the running path cost) and an *arc weight* strategy (what an arc
//! costs). Both are small enums so the solver's inner loop stays a plain
//! `match`, with no dynamic dispatch.
//!
//! The IFT guarantees optimality only for monotonic-incremental functions:
//! `extend(c, w) ≥ c` for every valid `(c, w)`. Both extensions here are MI
//! for non-negative arc weights; feeding the solver anything else yields an
//! undefined (but memory-safe) result.

use crate::image::{GrayImage, Pixel};
use crate::seeds::SeedSet;
use serde::{Deserialize, Serialize};

/// How an arc weight extends a path cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extension {
    /// `f(π·⟨s,t⟩) = f(π) + w(s,t)` — additive costs (geodesic distance).
    Sum,
    /// `f(π·⟨s,t⟩) = max{f(π), w(s,t)}` — bottleneck costs (watershed).
    Max,
}

/// Arc-weight strategy `w(s, t)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArcWeight {
    /// `|I(s) − I(t)|`.
    IntensityDiff,
    /// `|I(s) − I(t)| / (1 + sigma)` — smoothed local gradient.
    Gradient { sigma: f64 },
    /// Fixed weight, useful for pure distance transforms and tests.
    Constant { weight: f64 },
    /// `I(t)` — the watershed flooding weight.
    DestinationIntensity,
}

/// A complete path-cost function: extension operator plus arc weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathCost {
    pub extension: Extension,
    pub weight: ArcWeight,
}

impl PathCost {
    pub fn new(extension: Extension, weight: ArcWeight) -> Self {
        Self { extension, weight }
    }

    /// `f_sum` over `|I(s) − I(t)|` — the usual segmentation function.
    pub fn intensity_diff_sum() -> Self {
        Self::new(Extension::Sum, ArcWeight::IntensityDiff)
    }

    /// `f_max` over `|I(s) − I(t)|`.
    pub fn intensity_diff_max() -> Self {
        Self::new(Extension::Max, ArcWeight::IntensityDiff)
    }

    /// `f_sum` over destination intensity.
    pub fn watershed_sum() -> Self {
        Self::new(Extension::Sum, ArcWeight::DestinationIntensity)
    }

    /// `f_max` over destination intensity — the classic watershed transform.
    pub fn watershed_max() -> Self {
        Self::new(Extension::Max, ArcWeight::DestinationIntensity)
    }

    /// `f_sum` with a constant arc weight.
    pub fn constant_sum(weight: f64) -> Self {
        Self::new(Extension::Sum, ArcWeight::Constant { weight })
    }

    /// `f_max` with a constant arc weight.
    pub fn constant_max(weight: f64) -> Self {
        Self::new(Extension::Max, ArcWeight::Constant { weight })
    }

    /// Initial cost `h(t)`: the seed's handicap, `+∞` for non-seeds.
    pub fn handicap(&self, pixel: Pixel, seeds: &SeedSet) -> f64 {
        if seeds.is_seed(pixel) {
            seeds.handicap_of(pixel)
        } else {
            f64::INFINITY
        }
    }

    /// Arc weight `w(s, t)` between adjacent pixels.
    #[inline]
    pub fn arc_weight(&self, from: Pixel, to: Pixel) -> f64 {
        match self.weight {
            ArcWeight::IntensityDiff => {
                (f64::from(from.intensity) - f64::from(to.intensity)).abs()
            }
            ArcWeight::Gradient { sigma } => {
                (f64::from(from.intensity) - f64::from(to.intensity)).abs() / (1.0 + sigma)
            }
            ArcWeight::Constant { weight } => weight,
            ArcWeight::DestinationIntensity => f64::from(to.intensity),
        }
    }

    /// Fold an arc weight into a running path cost. `+∞` absorbs.
    #[inline]
    pub fn extend(&self, current: f64, arc_weight: f64) -> f64 {
        if current.is_infinite() {
            return f64::INFINITY;
        }
        match self.extension {
            Extension::Sum => current + arc_weight,
            Extension::Max => current.max(arc_weight),
        }
    }

    /// Reference whole-path evaluation: handicap of the first pixel, then
    /// repeated extension. Used by validation, never by the solver loop.
    pub fn path_cost(&self, path: &[Pixel], seeds: &SeedSet) -> f64 {
        let Some(&root) = path.first() else {
            return f64::INFINITY;
        };
        let mut cost = self.handicap(root, seeds);
        for window in path.windows(2) {
            if cost.is_infinite() {
                break;
            }
            cost = self.extend(cost, self.arc_weight(window[0], window[1]));
        }
        cost
    }

    /// Both extensions satisfy `extend(c, w) ≥ c` for non-negative weights.
    pub fn is_monotonic_incremental(&self) -> bool {
        true
    }

    /// Does every arc weight land on an integer? Decided from the weight
    /// variant, never by probing.
    pub fn is_integer_cost(&self) -> bool {
        match self.weight {
            ArcWeight::IntensityDiff | ArcWeight::DestinationIntensity => true,
            ArcWeight::Constant { weight } => weight.fract() == 0.0 && weight.is_finite(),
            ArcWeight::Gradient { .. } => false,
        }
    }

    /// Upper bound `K` for bucket-queue sizing.
    ///
    /// Additive costs can accumulate one peak arc weight per step along a
    /// path, bounded by the image diagonal; bottleneck costs never exceed the
    /// peak weight. Non-integer functions get a conservative constant (they
    /// only reach the bucket engine through discretization).
    pub fn max_cost_estimate(&self, image: &GrayImage) -> i64 {
        if !self.is_integer_cost() {
            return 1000;
        }
        let peak = match self.weight {
            ArcWeight::IntensityDiff | ArcWeight::DestinationIntensity => 255,
            ArcWeight::Constant { weight } => weight.abs().ceil() as i64,
            ArcWeight::Gradient { .. } => unreachable!("gradient weights are not integer"),
        };
        match self.extension {
            Extension::Sum => {
                let w = image.width() as f64;
                let h = image.height() as f64;
                let diagonal = (w * w + h * h).sqrt().ceil() as i64;
                peak * diagonal
            }
            Extension::Max => peak,
        }
    }

    pub fn name(&self) -> String {
        let ext = match self.extension {
            Extension::Sum => "f_sum",
            Extension::Max => "f_max",
        };
        let weight = match self.weight {
            ArcWeight::IntensityDiff => "Intensity Difference".to_string(),
            ArcWeight::Gradient { sigma } => format!("Gradient sigma={sigma}"),
            ArcWeight::Constant { weight } => format!("Constant {weight}"),
            ArcWeight::DestinationIntensity => "Destination Intensity".to_string(),
        };
        format!("{ext} ({weight})")
    }
}

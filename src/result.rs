//! The work product of an IFT run: the optimum-path forest `(P, C, L)`.
//!
//! The three maps live in dense parallel arrays indexed `y·W + x`:
//! predecessors as linear indices (`-1` = none, i.e. roots and untouched
//! pixels), costs as `f64` (`+∞` = unreached), labels as `i32` (`-1` = none).
//! A snapshot of the source intensities is kept so reconstructed paths carry
//! full pixel values.
//!
//! Accessors never fail: pixels outside the image report the same sentinels
//! as unreached pixels.

use crate::image::{GrayImage, Pixel};
use crate::seeds::SeedSet;
use log::warn;

const NO_INDEX: i32 = -1;
const NO_LABEL: i32 = -1;

/// Forest of optimum paths: predecessor, cost, and label per pixel.
#[derive(Clone, Debug)]
pub struct IftResult {
    width: usize,
    height: usize,
    pred: Vec<i32>,
    cost: Vec<f64>,
    label: Vec<i32>,
    intensity: Vec<u8>,
    seed_pixels: Vec<Pixel>,
}

impl IftResult {
    /// Empty forest: everything unreached.
    pub fn new(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            pred: vec![NO_INDEX; n],
            cost: vec![f64::INFINITY; n],
            label: vec![NO_LABEL; n],
            intensity: vec![0; n],
            seed_pixels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset the maps and plant the active seeds: `C(s) ← h(s), L(s) ← λ(s)`.
    ///
    /// Seeds outside the image are skipped with a warning.
    pub fn initialize_for_processing(&mut self, image: &GrayImage, seeds: &SeedSet) {
        let n = self.width * self.height;
        self.pred = vec![NO_INDEX; n];
        self.cost = vec![f64::INFINITY; n];
        self.label = vec![NO_LABEL; n];
        self.intensity = image.as_slice().to_vec();
        self.seed_pixels.clear();

        for seed in seeds.active_seeds() {
            let p = seed.pixel;
            let Some(i) = self.index_of(p) else {
                warn!("seed {p} outside {}x{} image, skipping", self.width, self.height);
                continue;
            };
            self.cost[i] = seed.handicap;
            self.label[i] = seed.label;
            let planted = self.pixel_at(i);
            self.seed_pixels.push(planted);
        }
    }

    #[inline]
    fn index_of(&self, p: Pixel) -> Option<usize> {
        (p.x >= 0 && (p.x as usize) < self.width && p.y >= 0 && (p.y as usize) < self.height)
            .then(|| p.linear_index(self.width))
    }

    #[inline]
    fn idx(&self, p: Pixel) -> usize {
        self.index_of(p).unwrap_or_else(|| {
            panic!(
                "pixel {p} out of bounds for {}x{} result",
                self.width, self.height
            )
        })
    }

    #[inline]
    fn pixel_at(&self, index: usize) -> Pixel {
        Pixel::new(
            (index % self.width) as i32,
            (index / self.width) as i32,
            self.intensity[index],
        )
    }

    // --- P(t) ---------------------------------------------------------------

    /// Predecessor of `p` in the forest, `None` for roots and unknown pixels.
    pub fn predecessor(&self, p: Pixel) -> Option<Pixel> {
        let i = self.index_of(p)?;
        let pred = self.pred[i];
        (pred >= 0).then(|| self.pixel_at(pred as usize))
    }

    pub fn has_predecessor(&self, p: Pixel) -> bool {
        self.index_of(p).is_some_and(|i| self.pred[i] >= 0)
    }

    /// `P(p) ← pred`. Panics when either pixel is out of bounds.
    pub fn set_predecessor(&mut self, p: Pixel, pred: Pixel) {
        let pi = self.idx(pred) as i32;
        let i = self.idx(p);
        self.pred[i] = pi;
    }

    // --- C(t) ---------------------------------------------------------------

    /// Optimal path cost to `p`, `+∞` for unreached or unknown pixels.
    pub fn cost(&self, p: Pixel) -> f64 {
        self.index_of(p).map_or(f64::INFINITY, |i| self.cost[i])
    }

    /// `C(p) ← cost`. Panics when out of bounds.
    pub fn set_cost(&mut self, p: Pixel, cost: f64) {
        let i = self.idx(p);
        self.cost[i] = cost;
    }

    /// Raw cost map, for queue engines keyed by current cost.
    pub fn costs(&self) -> &[f64] {
        &self.cost
    }

    // --- L(t) ---------------------------------------------------------------

    /// Label of the root of `p`'s path, `-1` for unlabeled or unknown pixels.
    pub fn label(&self, p: Pixel) -> i32 {
        self.index_of(p).map_or(NO_LABEL, |i| self.label[i])
    }

    pub fn has_label(&self, p: Pixel) -> bool {
        self.index_of(p).is_some_and(|i| self.label[i] != NO_LABEL)
    }

    /// `L(p) ← label`. Panics when out of bounds.
    pub fn set_label(&mut self, p: Pixel, label: i32) {
        let i = self.idx(p);
        self.label[i] = label;
    }

    // --- Path queries -------------------------------------------------------

    /// The optimum path from the root to `p`, root first.
    ///
    /// Returns an empty path for unreached pixels. Walk length is capped at
    /// the pixel count, so a (buggy) cyclic forest cannot hang the caller.
    pub fn optimal_path(&self, p: Pixel) -> Vec<Pixel> {
        let Some(i) = self.index_of(p) else {
            return Vec::new();
        };
        if self.cost[i].is_infinite() {
            return Vec::new();
        }
        let mut path = vec![self.pixel_at(i)];
        let mut current = i;
        while self.pred[current] >= 0 {
            current = self.pred[current] as usize;
            path.push(self.pixel_at(current));
            if path.len() > self.cost.len() {
                warn!("predecessor walk from {p} exceeded pixel count, cycle?");
                break;
            }
        }
        path.reverse();
        path
    }

    /// Terminal of the predecessor walk from `p`.
    pub fn root_of(&self, p: Pixel) -> Pixel {
        let Some(mut current) = self.index_of(p) else {
            return p;
        };
        let mut steps = 0;
        while self.pred[current] >= 0 && steps <= self.cost.len() {
            current = self.pred[current] as usize;
            steps += 1;
        }
        self.pixel_at(current)
    }

    /// A root is a reached pixel with no predecessor.
    pub fn is_root(&self, p: Pixel) -> bool {
        self.index_of(p)
            .is_some_and(|i| self.cost[i].is_finite() && self.pred[i] < 0)
    }

    // --- Forest-level queries -----------------------------------------------

    /// Seeds recorded at initialization, in insertion order.
    pub fn seed_pixels(&self) -> &[Pixel] {
        &self.seed_pixels
    }

    /// Number of trees: seeds that remained roots of their own tree.
    pub fn component_count(&self) -> usize {
        self.seed_pixels
            .iter()
            .filter(|&&p| self.is_root(p))
            .count()
    }

    /// Pixels with a finite cost.
    pub fn processed_pixel_count(&self) -> usize {
        self.cost.iter().filter(|c| c.is_finite()).count()
    }

    pub fn min_cost(&self) -> f64 {
        self.cost
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_cost(&self) -> f64 {
        self.cost
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn average_cost(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &c in &self.cost {
            if c.is_finite() {
                sum += c;
                count += 1;
            }
        }
        if count > 0 {
            sum / count as f64
        } else {
            0.0
        }
    }

    /// All pixels carrying the given label, row-major order.
    pub fn pixels_with_label(&self, label: i32) -> Vec<Pixel> {
        self.label
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(i, _)| self.pixel_at(i))
            .collect()
    }

    /// Sorted distinct labels present in the forest.
    pub fn unique_labels(&self) -> Vec<i32> {
        let mut labels: Vec<i32> = self
            .label
            .iter()
            .copied()
            .filter(|&l| l != NO_LABEL)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Every pixel reached?  Unreachable pixels are legitimate, so this is a
    /// status, not an error.
    pub fn is_complete(&self) -> bool {
        !self.cost.is_empty() && self.cost.iter().all(|c| c.is_finite())
    }

    /// Does every predecessor chain terminate? (No cycles, no dangling edges —
    /// the latter is impossible by construction since predecessors are stored
    /// as in-range indices.)
    pub fn is_valid_forest(&self) -> bool {
        let n = self.pred.len();
        for start in 0..n {
            if self.pred[start] < 0 {
                continue;
            }
            let mut current = start;
            let mut steps = 0usize;
            while self.pred[current] >= 0 {
                current = self.pred[current] as usize;
                steps += 1;
                if steps > n {
                    return false;
                }
            }
        }
        true
    }

    /// Cost maps equal within a tolerance (infinities must match exactly).
    pub fn results_match(&self, other: &IftResult, tolerance: f64) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        self.cost.iter().zip(&other.cost).all(|(&a, &b)| {
            if a.is_infinite() || b.is_infinite() {
                a == b
            } else {
                (a - b).abs() <= tolerance
            }
        })
    }

    // --- Derived images -----------------------------------------------------

    /// Grayscale segmentation: intensity = `min(L(p), 255)`, unlabeled = 0.
    pub fn create_segmentation_image(&self) -> GrayImage {
        let data = self
            .label
            .iter()
            .map(|&l| if l >= 0 { l.min(255) as u8 } else { 0 })
            .collect();
        GrayImage::from_raw(self.width, self.height, data)
            .expect("result dimensions are positive")
    }

    /// Grayscale cost map normalized to `[0, 255]`; `+∞` maps to 0.
    pub fn create_cost_image(&self) -> GrayImage {
        let max = self.max_cost();
        let data = if max <= 0.0 || max.is_infinite() {
            vec![0u8; self.cost.len()]
        } else {
            self.cost
                .iter()
                .map(|&c| {
                    if c.is_finite() {
                        (255.0 * c / max).round() as u8
                    } else {
                        0
                    }
                })
                .collect()
        };
        GrayImage::from_raw(self.width, self.height, data)
            .expect("result dimensions are positive")
    }
}

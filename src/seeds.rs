//! Seed management: the set `S ⊆ I` of labeled start pixels for an IFT run.
//!
//! Seeds are identified by their grid coordinates; adding a second seed at the
//! same coordinates updates the first in place. Lookup accessors never fail:
//! unknown pixels report label `-1` and handicap `+∞`, matching the convention
//! `h(t) = +∞` for `t ∉ S`.

use crate::image::{GrayImage, Pixel};
use std::collections::HashMap;

/// A single seed: location, object label, initial path cost, activity flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Seed {
    pub pixel: Pixel,
    pub label: i32,
    pub handicap: f64,
    pub active: bool,
    pub name: String,
}

impl Seed {
    pub fn new(pixel: Pixel, label: i32, handicap: f64) -> Self {
        Self {
            pixel,
            label,
            handicap,
            active: true,
            name: String::new(),
        }
    }
}

/// Ordered seed collection with O(1) coordinate lookup.
#[derive(Clone, Debug, Default)]
pub struct SeedSet {
    seeds: Vec<Seed>,
    index: HashMap<(i32, i32), usize>,
    next_label: i32,
}

impl SeedSet {
    pub fn new() -> Self {
        Self {
            seeds: Vec::new(),
            index: HashMap::new(),
            next_label: 1,
        }
    }

    /// Add a seed, or update the one already at these coordinates.
    ///
    /// `label: None` draws from the auto-label counter. The (re)added seed is
    /// always active.
    pub fn add(&mut self, pixel: Pixel, label: Option<i32>, handicap: f64) {
        self.add_named(pixel, label, handicap, "");
    }

    /// [`add`](Self::add) with a descriptive name attached.
    pub fn add_named(&mut self, pixel: Pixel, label: Option<i32>, handicap: f64, name: &str) {
        let label = label.unwrap_or_else(|| {
            let l = self.next_label;
            self.next_label += 1;
            l
        });
        match self.index.get(&(pixel.x, pixel.y)).copied() {
            Some(i) => {
                let seed = &mut self.seeds[i];
                seed.pixel = pixel;
                seed.label = label;
                seed.handicap = handicap;
                seed.active = true;
                if !name.is_empty() {
                    seed.name = name.to_string();
                }
            }
            None => {
                let mut seed = Seed::new(pixel, label, handicap);
                seed.name = name.to_string();
                self.index.insert((pixel.x, pixel.y), self.seeds.len());
                self.seeds.push(seed);
            }
        }
    }

    /// Add a bare coordinate seed with an auto-assigned label and handicap 0.
    pub fn add_auto(&mut self, x: i32, y: i32, intensity: u8) {
        self.add(Pixel::new(x, y, intensity), None, 0.0);
    }

    /// Remove the seed at these coordinates. O(1) via swap-with-last.
    pub fn remove(&mut self, pixel: Pixel) -> bool {
        let Some(i) = self.index.remove(&(pixel.x, pixel.y)) else {
            return false;
        };
        let last = self.seeds.len() - 1;
        if i != last {
            self.seeds.swap(i, last);
            let moved = self.seeds[i].pixel;
            self.index.insert((moved.x, moved.y), i);
        }
        self.seeds.pop();
        true
    }

    pub fn clear(&mut self) {
        self.seeds.clear();
        self.index.clear();
        self.next_label = 1;
    }

    /// Toggle a seed without removing it. Returns false for unknown pixels.
    pub fn set_active(&mut self, pixel: Pixel, active: bool) -> bool {
        match self.index.get(&(pixel.x, pixel.y)) {
            Some(&i) => {
                self.seeds[i].active = active;
                true
            }
            None => false,
        }
    }

    /// Is there an *active* seed at these coordinates?
    pub fn is_seed(&self, pixel: Pixel) -> bool {
        self.index
            .get(&(pixel.x, pixel.y))
            .is_some_and(|&i| self.seeds[i].active)
    }

    /// Is there a seed here at all, active or not?
    pub fn has_seed(&self, pixel: Pixel) -> bool {
        self.index.contains_key(&(pixel.x, pixel.y))
    }

    /// Seed label, or `-1` when the pixel carries no seed.
    pub fn label_of(&self, pixel: Pixel) -> i32 {
        self.index
            .get(&(pixel.x, pixel.y))
            .map_or(-1, |&i| self.seeds[i].label)
    }

    /// Seed handicap, or `+∞` when the pixel carries no seed.
    pub fn handicap_of(&self, pixel: Pixel) -> f64 {
        self.index
            .get(&(pixel.x, pixel.y))
            .map_or(f64::INFINITY, |&i| self.seeds[i].handicap)
    }

    pub fn get(&self, pixel: Pixel) -> Option<&Seed> {
        self.index.get(&(pixel.x, pixel.y)).map(|&i| &self.seeds[i])
    }

    pub fn all_seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn active_seeds(&self) -> Vec<Seed> {
        self.seeds.iter().filter(|s| s.active).cloned().collect()
    }

    pub fn active_seed_pixels(&self) -> Vec<Pixel> {
        self.seeds
            .iter()
            .filter(|s| s.active)
            .map(|s| s.pixel)
            .collect()
    }

    /// Active seeds carrying the given label.
    pub fn seeds_with_label(&self, label: i32) -> Vec<Seed> {
        self.seeds
            .iter()
            .filter(|s| s.active && s.label == label)
            .cloned()
            .collect()
    }

    /// Sorted, deduplicated labels of the active seeds.
    pub fn active_labels(&self) -> Vec<i32> {
        let mut labels: Vec<i32> = self
            .seeds
            .iter()
            .filter(|s| s.active)
            .map(|s| s.label)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    pub fn active_count(&self) -> usize {
        self.seeds.iter().filter(|s| s.active).count()
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Are all active seeds inside the image bounds?
    pub fn validate(&self, image: &GrayImage) -> bool {
        self.seeds
            .iter()
            .filter(|s| s.active)
            .all(|s| image.in_bounds(s.pixel.x, s.pixel.y))
    }

    /// Set each active seed's handicap to its pixel intensity.
    pub fn set_handicaps_from_intensity(&mut self) {
        for seed in self.seeds.iter_mut().filter(|s| s.active) {
            seed.handicap = f64::from(seed.pixel.intensity);
        }
    }

    /// Set a uniform handicap on all active seeds.
    pub fn set_uniform_handicaps(&mut self, handicap: f64) {
        for seed in self.seeds.iter_mut().filter(|s| s.active) {
            seed.handicap = handicap;
        }
    }

    /// Seed the whole image border with one label and handicap.
    pub fn add_border_seeds(&mut self, image: &GrayImage, label: i32, handicap: f64) {
        let w = image.width() as i32;
        let h = image.height() as i32;
        for x in 0..w {
            self.add_named(image.pixel(x, 0), Some(label), handicap, "border_top");
            self.add_named(image.pixel(x, h - 1), Some(label), handicap, "border_bottom");
        }
        for y in 1..h - 1 {
            self.add_named(image.pixel(0, y), Some(label), handicap, "border_left");
            self.add_named(image.pixel(w - 1, y), Some(label), handicap, "border_right");
        }
    }
}

/// Deterministic automatic seeding: quarter centroids first, then the center,
/// then mid-edge positions, labels `1..=count`, handicap 0. At most nine
/// positions are available; larger counts are capped.
pub fn generate_automatic_seeds(image: &GrayImage, count: usize) -> SeedSet {
    let w = image.width() as i32;
    let h = image.height() as i32;
    let positions = [
        (w / 4, h / 4),
        (3 * w / 4, h / 4),
        (w / 4, 3 * h / 4),
        (3 * w / 4, 3 * h / 4),
        (w / 2, h / 2),
        (w / 8, h / 2),
        (7 * w / 8, h / 2),
        (w / 2, h / 8),
        (w / 2, 7 * h / 8),
    ];

    let mut seeds = SeedSet::new();
    for (i, &(x, y)) in positions.iter().take(count).enumerate() {
        if image.in_bounds(x, y) {
            seeds.add(image.pixel(x, y), Some(i as i32 + 1), 0.0);
        }
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(x: i32, y: i32) -> Pixel {
        Pixel::new(x, y, 0)
    }

    #[test]
    fn add_assigns_auto_labels_in_order() {
        let mut seeds = SeedSet::new();
        seeds.add(px(0, 0), None, 0.0);
        seeds.add(px(1, 0), None, 0.0);
        assert_eq!(seeds.label_of(px(0, 0)), 1);
        assert_eq!(seeds.label_of(px(1, 0)), 2);
    }

    #[test]
    fn duplicate_add_updates_in_place() {
        let mut seeds = SeedSet::new();
        seeds.add(px(2, 2), Some(1), 0.0);
        seeds.add(px(2, 2), Some(5), 3.0);
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds.label_of(px(2, 2)), 5);
        assert_eq!(seeds.handicap_of(px(2, 2)), 3.0);
    }

    #[test]
    fn remove_swaps_with_last_and_keeps_index_valid() {
        let mut seeds = SeedSet::new();
        seeds.add(px(0, 0), Some(1), 0.0);
        seeds.add(px(1, 0), Some(2), 0.0);
        seeds.add(px(2, 0), Some(3), 0.0);
        assert!(seeds.remove(px(0, 0)));
        assert!(!seeds.remove(px(0, 0)));
        assert_eq!(seeds.len(), 2);
        // The swapped-in seed must still be reachable by coordinates.
        assert_eq!(seeds.label_of(px(2, 0)), 3);
        assert_eq!(seeds.label_of(px(1, 0)), 2);
    }

    #[test]
    fn inactive_seeds_are_invisible_to_is_seed_only() {
        let mut seeds = SeedSet::new();
        seeds.add(px(4, 4), Some(7), 0.0);
        seeds.set_active(px(4, 4), false);
        assert!(!seeds.is_seed(px(4, 4)));
        assert!(seeds.has_seed(px(4, 4)));
        assert_eq!(seeds.active_count(), 0);
    }

    #[test]
    fn unknown_pixel_lookups_return_sentinels() {
        let seeds = SeedSet::new();
        assert_eq!(seeds.label_of(px(9, 9)), -1);
        assert!(seeds.handicap_of(px(9, 9)).is_infinite());
        assert!(seeds.get(px(9, 9)).is_none());
    }

    #[test]
    fn border_seeds_cover_perimeter_once() {
        let image = GrayImage::new(5, 4).unwrap();
        let mut seeds = SeedSet::new();
        seeds.add_border_seeds(&image, 0, 0.0);
        // 2*5 + 2*(4-2) = 14 distinct border pixels.
        assert_eq!(seeds.len(), 14);
        assert!(seeds.has_seed(image.pixel(0, 0)));
        assert!(seeds.has_seed(image.pixel(4, 3)));
        assert!(!seeds.has_seed(image.pixel(2, 2)));
    }

    #[test]
    fn automatic_seeds_are_deterministic() {
        let image = GrayImage::new(40, 40).unwrap();
        let a = generate_automatic_seeds(&image, 4);
        let b = generate_automatic_seeds(&image, 4);
        assert_eq!(a.active_seed_pixels(), b.active_seed_pixels());
        assert_eq!(a.active_count(), 4);
        assert_eq!(a.active_labels(), vec![1, 2, 3, 4]);
        assert!(a.has_seed(image.pixel(10, 10)));
        assert!(a.has_seed(image.pixel(30, 30)));
    }

    #[test]
    fn automatic_seed_count_is_capped_at_pattern_size() {
        let image = GrayImage::new(40, 40).unwrap();
        let seeds = generate_automatic_seeds(&image, 20);
        assert_eq!(seeds.active_count(), 9);
    }
}

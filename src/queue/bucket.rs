//! Bucket queue for bounded integer costs: the `O(m + nK)` engine.
//!
//! Storage is one FIFO sub-queue per cost value in `[0, K]`. `min_bucket`
//! tracks a lower bound on the smallest non-empty bucket; it may lag behind
//! and is advanced lazily on `pop`/`top`, so the total scanning work over a
//! whole run is `O(K)`.

use crate::image::Pixel;
use log::warn;
use serde::Serialize;
use std::collections::VecDeque;

/// Priority queue over integer costs `[0, max_cost]`, FIFO within a cost.
#[derive(Clone, Debug)]
pub struct BucketQueue {
    buckets: Vec<VecDeque<Pixel>>,
    min_bucket: usize,
    max_cost: usize,
    total: usize,
}

impl BucketQueue {
    /// Queue accepting costs in `[0, max_cost]`.
    pub fn new(max_cost: usize) -> Self {
        Self {
            buckets: vec![VecDeque::new(); max_cost + 1],
            min_bucket: max_cost + 1,
            max_cost,
            total: 0,
        }
    }

    pub fn is_valid_cost(&self, cost: i64) -> bool {
        cost >= 0 && cost <= self.max_cost as i64
    }

    /// Enqueue a pixel at an integer cost.
    ///
    /// An out-of-range cost is a solver bug, not user input; the push is
    /// logged and dropped rather than poisoning the run.
    pub fn push(&mut self, pixel: Pixel, cost: i64) {
        if !self.is_valid_cost(cost) {
            warn!(
                "bucket queue: cost {cost} outside [0, {}], dropping {pixel}",
                self.max_cost
            );
            return;
        }
        let cost = cost as usize;
        self.buckets[cost].push_back(pixel);
        self.total += 1;
        if cost < self.min_bucket {
            self.min_bucket = cost;
        }
    }

    /// Dequeue the cheapest pixel, FIFO among equals. `None` when empty.
    pub fn pop(&mut self) -> Option<Pixel> {
        if self.total == 0 {
            return None;
        }
        while self.min_bucket <= self.max_cost && self.buckets[self.min_bucket].is_empty() {
            self.min_bucket += 1;
        }
        let pixel = self.buckets[self.min_bucket].pop_front()?;
        self.total -= 1;
        Some(pixel)
    }

    /// Peek at the cheapest pixel without removing it.
    pub fn top(&self) -> Option<&Pixel> {
        if self.total == 0 {
            return None;
        }
        self.buckets[self.min_bucket..]
            .iter()
            .find_map(|bucket| bucket.front())
    }

    /// Smallest cost currently queued, scanning from `min_bucket`.
    pub fn min_cost(&self) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        (self.min_bucket..=self.max_cost).find(|&c| !self.buckets[c].is_empty())
    }

    pub fn max_cost(&self) -> usize {
        self.max_cost
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Reset for reuse, keeping the allocated buckets.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.min_bucket = self.max_cost + 1;
        self.total = 0;
    }

    /// Occupancy snapshot, for diagnostics and tests.
    pub fn statistics(&self) -> BucketStats {
        let mut stats = BucketStats {
            active_buckets: 0,
            min_cost: None,
            max_cost: None,
            total_elements: self.total,
            average_cost: 0.0,
            bucket_sizes: Vec::new(),
        };
        let mut cost_sum = 0.0;
        for (cost, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            stats.active_buckets += 1;
            stats.bucket_sizes.push(bucket.len());
            stats.min_cost.get_or_insert(cost);
            stats.max_cost = Some(cost);
            cost_sum += (cost * bucket.len()) as f64;
        }
        if self.total > 0 {
            stats.average_cost = cost_sum / self.total as f64;
        }
        stats
    }
}

/// Snapshot of bucket occupancy.
#[derive(Clone, Debug, Serialize)]
pub struct BucketStats {
    pub active_buckets: usize,
    pub min_cost: Option<usize>,
    pub max_cost: Option<usize>,
    pub total_elements: usize,
    pub average_cost: f64,
    pub bucket_sizes: Vec<usize>,
}

/// Bucket queue over real-valued costs, discretized to a fixed precision.
///
/// Costs are scaled by `1 / precision` and rounded to the nearest integer on
/// push; `min_cost` maps back to the continuous domain.
#[derive(Clone, Debug)]
pub struct DiscretizedBucketQueue {
    inner: BucketQueue,
    factor: f64,
    inverse: f64,
}

impl DiscretizedBucketQueue {
    pub fn new(max_cost: f64, precision: f64) -> Self {
        let inner = BucketQueue::new((max_cost / precision) as usize + 1);
        Self {
            inner,
            factor: 1.0 / precision,
            inverse: precision,
        }
    }

    pub fn push(&mut self, pixel: Pixel, cost: f64) {
        let discrete = self.discretize(cost);
        self.inner.push(pixel, discrete);
    }

    pub fn pop(&mut self) -> Option<Pixel> {
        self.inner.pop()
    }

    pub fn discretize(&self, cost: f64) -> i64 {
        (cost * self.factor + 0.5) as i64
    }

    pub fn continuize(&self, discrete: i64) -> f64 {
        discrete as f64 * self.inverse
    }

    pub fn min_cost(&self) -> Option<f64> {
        self.inner.min_cost().map(|c| self.continuize(c as i64))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

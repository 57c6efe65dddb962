//! Hybrid engine: bucket queue for low integral costs, min-heap for the rest.
//!
//! Useful when a cost function produces mostly small integers with an
//! occasional large or fractional value; `pop` compares the two heads and
//! takes the cheaper one.

use super::bucket::BucketQueue;
use super::heap::HeapEntry;
use crate::image::Pixel;
use serde::Serialize;
use std::collections::BinaryHeap;

pub struct HybridQueue {
    bucket: BucketQueue,
    heap: BinaryHeap<HeapEntry>,
    threshold: f64,
}

impl HybridQueue {
    /// Bucket range `[0, max_bucket_cost]`; costs above `threshold` or with a
    /// fractional part go to the heap.
    pub fn new(max_bucket_cost: usize, threshold: f64) -> Self {
        Self {
            bucket: BucketQueue::new(max_bucket_cost),
            heap: BinaryHeap::new(),
            threshold,
        }
    }

    pub fn push(&mut self, pixel: Pixel, cost: f64) {
        if cost >= 0.0 && cost <= self.threshold && cost.fract() == 0.0 {
            self.bucket.push(pixel, cost as i64);
        } else {
            self.heap.push(HeapEntry { cost, pixel });
        }
    }

    /// Dequeue the globally cheapest pixel across both stores.
    pub fn pop(&mut self) -> Option<Pixel> {
        let bucket_min = self.bucket.min_cost();
        let heap_min = self.heap.peek().map(|e| e.cost);
        match (bucket_min, heap_min) {
            (Some(bucket_min), Some(heap_min)) => {
                if (bucket_min as f64) <= heap_min {
                    self.bucket.pop()
                } else {
                    self.heap.pop().map(|e| e.pixel)
                }
            }
            (Some(_), None) => self.bucket.pop(),
            (None, Some(_)) => self.heap.pop().map(|e| e.pixel),
            (None, None) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.bucket.len() + self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty() && self.heap.is_empty()
    }

    pub fn usage_stats(&self) -> HybridStats {
        let bucket_elements = self.bucket.len();
        let heap_elements = self.heap.len();
        let total = bucket_elements + heap_elements;
        HybridStats {
            bucket_elements,
            heap_elements,
            bucket_ratio: if total > 0 {
                bucket_elements as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

/// How the two stores are being used.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct HybridStats {
    pub bucket_elements: usize,
    pub heap_elements: usize,
    pub bucket_ratio: f64,
}

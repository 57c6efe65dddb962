//! Bucket queue with a configurable tie-break policy inside each cost level.
//!
//! Sub-queues are double-ended: FIFO pops the front, LIFO pops the back, and
//! Random swap-removes a uniform index. The policy only reorders pixels of
//! equal cost, so under a monotonic-incremental cost function the final cost
//! map is unaffected; predecessor choices along equal-cost boundaries are.

use crate::image::Pixel;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Selection rule among equal-cost pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreakPolicy {
    #[default]
    Fifo,
    Lifo,
    Random,
}

/// Growable bucket queue honoring a tie-break policy.
pub struct TieBreakQueue {
    buckets: Vec<VecDeque<Pixel>>,
    current: usize,
    total: usize,
    policy: TieBreakPolicy,
    rng: StdRng,
}

impl TieBreakQueue {
    pub fn new(policy: TieBreakPolicy) -> Self {
        Self {
            buckets: Vec::new(),
            current: 0,
            total: 0,
            policy,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed RNG seed for reproducible `Random` runs (tests).
    pub fn with_rng_seed(policy: TieBreakPolicy, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(policy)
        }
    }

    pub fn policy(&self) -> TieBreakPolicy {
        self.policy
    }

    /// Enqueue at an integer cost; buckets grow on demand. Negative costs are
    /// logged and dropped, as in the fixed-range bucket queue.
    pub fn push(&mut self, pixel: Pixel, cost: i64) {
        if cost < 0 {
            warn!("tie-break queue: negative cost {cost}, dropping {pixel}");
            return;
        }
        let cost = cost as usize;
        if cost >= self.buckets.len() {
            self.buckets.resize_with(cost + 1, VecDeque::new);
        }
        self.buckets[cost].push_back(pixel);
        self.total += 1;
        if cost < self.current {
            self.current = cost;
        }
    }

    /// Dequeue one cheapest pixel per the policy. `None` when empty.
    pub fn pop(&mut self) -> Option<Pixel> {
        if self.total == 0 {
            return None;
        }
        while self.current < self.buckets.len() && self.buckets[self.current].is_empty() {
            self.current += 1;
        }
        let bucket = self.buckets.get_mut(self.current)?;
        let pixel = match self.policy {
            TieBreakPolicy::Fifo => bucket.pop_front(),
            TieBreakPolicy::Lifo => bucket.pop_back(),
            TieBreakPolicy::Random => {
                let i = self.rng.gen_range(0..bucket.len());
                bucket.swap_remove_back(i)
            }
        }?;
        self.total -= 1;
        Some(pixel)
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.current = 0;
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(x: i32) -> Pixel {
        Pixel::new(x, 0, 0)
    }

    #[test]
    fn fifo_pops_in_insertion_order() {
        let mut q = TieBreakQueue::new(TieBreakPolicy::Fifo);
        q.push(px(0), 3);
        q.push(px(1), 3);
        q.push(px(2), 3);
        let order: Vec<i32> = std::iter::from_fn(|| q.pop()).map(|p| p.x).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn lifo_inverts_insertion_order_within_a_cost() {
        let mut q = TieBreakQueue::new(TieBreakPolicy::Lifo);
        q.push(px(0), 3);
        q.push(px(1), 3);
        q.push(px(2), 3);
        let order: Vec<i32> = std::iter::from_fn(|| q.pop()).map(|p| p.x).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn cost_order_beats_policy() {
        let mut q = TieBreakQueue::new(TieBreakPolicy::Lifo);
        q.push(px(0), 5);
        q.push(px(1), 1);
        q.push(px(2), 5);
        assert_eq!(q.pop(), Some(px(1)));
        assert_eq!(q.pop(), Some(px(2)));
        assert_eq!(q.pop(), Some(px(0)));
    }

    #[test]
    fn random_drains_every_element_exactly_once() {
        let mut q = TieBreakQueue::with_rng_seed(TieBreakPolicy::Random, 42);
        for x in 0..10 {
            q.push(px(x), 2);
        }
        let mut drained: Vec<i32> = std::iter::from_fn(|| q.pop()).map(|p| p.x).collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..10).collect::<Vec<i32>>());
    }

    #[test]
    fn current_recovers_after_cheaper_push() {
        let mut q = TieBreakQueue::new(TieBreakPolicy::Fifo);
        q.push(px(0), 6);
        assert_eq!(q.pop(), Some(px(0)));
        q.push(px(1), 2);
        assert_eq!(q.pop(), Some(px(1)));
        assert!(q.is_empty());
    }
}

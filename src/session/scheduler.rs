use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::session::algorithm::Algorithm;

#[derive(Clone, Copy, Debug, Default)]
pub struct QueueOptions {
    pub randomize_order: bool,
    pub prioritize_failed: bool,
    pub prioritize_slow: bool,
}

/// Round-robin practice queue. `active` holds this round's remaining
/// algorithms with the drilled one at the front; `deferred` collects
/// completed (and, optionally, failed) algorithms for the next round.
#[derive(Debug, Default)]
pub struct DrillQueue {
    active: Vec<Algorithm>,
    deferred: Vec<Algorithm>,
}

impl DrillQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<&Algorithm> {
        self.active.first()
    }

    pub fn active(&self) -> &[Algorithm] {
        &self.active
    }

    pub fn total(&self) -> usize {
        self.active.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.deferred.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.active.iter().chain(&self.deferred).any(|a| a.stats_key() == key)
    }

    /// Add an algorithm to the round. With "prioritize slow" the active
    /// list stays sorted slowest-first, with untried algorithms (no
    /// recorded best) ahead of everything.
    pub fn select(
        &mut self,
        algorithm: Algorithm,
        options: QueueOptions,
        best_times: &HashMap<String, u64>,
    ) {
        if self.contains(&algorithm.stats_key()) {
            return;
        }
        if options.prioritize_slow {
            let rank = slow_rank(&algorithm, best_times);
            let pos = self
                .active
                .iter()
                .position(|a| slow_rank(a, best_times) < rank)
                .unwrap_or(self.active.len());
            self.active.insert(pos, algorithm);
        } else {
            self.active.push(algorithm);
        }
    }

    /// Remove an algorithm from both lists.
    pub fn deselect(&mut self, key: &str) {
        self.active.retain(|a| a.stats_key() != key);
        self.deferred.retain(|a| a.stats_key() != key);
    }

    /// Rotate after a successful solve of the head algorithm. With a
    /// single selected algorithm the queue is left alone so the same
    /// case repeats.
    pub fn complete(
        &mut self,
        options: QueueOptions,
        best_times: &HashMap<String, u64>,
        rng: &mut SmallRng,
    ) {
        if self.total() <= 1 {
            return;
        }
        let Some(done) = (!self.active.is_empty()).then(|| self.active.remove(0)) else {
            return;
        };
        if self.active.is_empty() {
            self.active = std::mem::take(&mut self.deferred);
            if options.prioritize_slow {
                self.active
                    .sort_by_key(|a| std::cmp::Reverse(slow_rank(a, best_times)));
            }
        }
        if options.randomize_order {
            self.active.shuffle(rng);
        }
        self.deferred.push(done);
    }

    /// A surfaced mistake on the head algorithm queues an extra copy
    /// into the next round, so failed cases come back around sooner.
    pub fn record_failure(&mut self, options: QueueOptions) {
        if !options.prioritize_failed {
            return;
        }
        let Some(head) = self.head().cloned() else {
            return;
        };
        let key = head.stats_key();
        if self.deferred.iter().any(|a| a.stats_key() == key) {
            return;
        }
        self.deferred.push(head);
    }
}

/// Sort rank for "prioritize slow": untried first, then slowest best
/// time first.
fn slow_rank(algorithm: &Algorithm, best_times: &HashMap<String, u64>) -> (bool, u64) {
    match best_times.get(&algorithm.stats_key()) {
        None => (true, 0),
        Some(&ms) => (false, ms),
    }
}

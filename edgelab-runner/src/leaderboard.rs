//! Leaderboard: bounded, deduplicated, sorted by fitness.
//!
//! Deduplication key: the config fingerprint. A duplicate with a better score
//! replaces the existing entry; otherwise it is skipped.

use serde::{Deserialize, Serialize};

use edgelab_core::engine::BacktestConfig;
use edgelab_core::metrics::Metrics;

use crate::fingerprint::ConfigId;
use crate::fitness::FitnessMetric;

/// One accepted, ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub config: BacktestConfig,
    pub fingerprint: ConfigId,
    pub metrics: Metrics,
    pub fitness: f64,
    pub iteration: u64,
    /// Search stage that produced it (`"random"`, `"zoom-0"`, ...).
    pub stage: String,
}

/// Outcome of an insert operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    Inserted,
    /// Replaced an entry with the same fingerprint (better score).
    Replaced,
    /// Duplicate with worse or equal score, non-finite fitness, or not good enough.
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<Candidate>,
    capacity: usize,
    metric: FitnessMetric,
}

impl Leaderboard {
    pub fn new(capacity: usize, metric: FitnessMetric) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            capacity,
            metric,
        }
    }

    pub fn insert(&mut self, candidate: Candidate) -> InsertResult {
        if !candidate.fitness.is_finite() {
            return InsertResult::Skipped;
        }

        if let Some(idx) = self
            .entries
            .iter()
            .position(|e| e.fingerprint == candidate.fingerprint)
        {
            if self
                .metric
                .is_better(candidate.fitness, self.entries[idx].fitness)
            {
                self.entries[idx] = candidate;
                self.sort_entries();
                return InsertResult::Replaced;
            }
            return InsertResult::Skipped;
        }

        if self.entries.len() < self.capacity {
            self.entries.push(candidate);
            self.sort_entries();
            return InsertResult::Inserted;
        }
        match self.entries.last() {
            Some(worst) if self.metric.is_better(candidate.fitness, worst.fitness) => {
                self.entries.pop();
                self.entries.push(candidate);
                self.sort_entries();
                InsertResult::Inserted
            }
            // Full, or capacity 0
            _ => InsertResult::Skipped,
        }
    }

    /// Insert every entry of `other`, in its rank order.
    pub fn merge(&mut self, other: Leaderboard) {
        for candidate in other.entries {
            self.insert(candidate);
        }
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn metric(&self) -> FitnessMetric {
        self.metric
    }

    fn sort_entries(&mut self) {
        // Descending by fitness; stable, so earlier inserts win ties.
        self.entries.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, fitness: f64, iteration: u64) -> Candidate {
        Candidate {
            config: BacktestConfig::default(),
            fingerprint: ConfigId(id.into()),
            metrics: Metrics::empty(),
            fitness,
            iteration,
            stage: "random".into(),
        }
    }

    #[test]
    fn sorted_best_first() {
        let mut lb = Leaderboard::new(10, FitnessMetric::Sharpe);
        lb.insert(candidate("a", 1.0, 0));
        lb.insert(candidate("b", 3.0, 1));
        lb.insert(candidate("c", 2.0, 2));
        let order: Vec<f64> = lb.entries().iter().map(|c| c.fitness).collect();
        assert_eq!(order, vec![3.0, 2.0, 1.0]);
        assert_eq!(lb.best().unwrap().fingerprint.as_str(), "b");
    }

    #[test]
    fn duplicate_better_replaces() {
        let mut lb = Leaderboard::new(10, FitnessMetric::Sharpe);
        assert_eq!(lb.insert(candidate("a", 1.0, 0)), InsertResult::Inserted);
        assert_eq!(lb.insert(candidate("a", 2.0, 5)), InsertResult::Replaced);
        assert_eq!(lb.len(), 1);
        assert_eq!(lb.best().unwrap().iteration, 5);
    }

    #[test]
    fn duplicate_worse_or_equal_skipped() {
        let mut lb = Leaderboard::new(10, FitnessMetric::Sharpe);
        lb.insert(candidate("a", 2.0, 0));
        assert_eq!(lb.insert(candidate("a", 1.0, 1)), InsertResult::Skipped);
        assert_eq!(lb.insert(candidate("a", 2.0, 2)), InsertResult::Skipped);
        assert_eq!(lb.best().unwrap().iteration, 0);
    }

    #[test]
    fn full_board_evicts_worst() {
        let mut lb = Leaderboard::new(2, FitnessMetric::Sharpe);
        lb.insert(candidate("a", 1.0, 0));
        lb.insert(candidate("b", 2.0, 1));
        assert_eq!(lb.insert(candidate("c", 0.5, 2)), InsertResult::Skipped);
        assert_eq!(lb.insert(candidate("d", 3.0, 3)), InsertResult::Inserted);
        let ids: Vec<&str> = lb.entries().iter().map(|c| c.fingerprint.as_str()).collect();
        assert_eq!(ids, vec!["d", "b"]);
    }

    #[test]
    fn rejects_non_finite_fitness() {
        let mut lb = Leaderboard::new(5, FitnessMetric::Sharpe);
        assert_eq!(lb.insert(candidate("a", f64::NAN, 0)), InsertResult::Skipped);
        assert_eq!(
            lb.insert(candidate("b", f64::INFINITY, 0)),
            InsertResult::Skipped
        );
        assert!(lb.is_empty());
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut lb = Leaderboard::new(0, FitnessMetric::Sharpe);
        assert_eq!(lb.insert(candidate("a", 1.0, 0)), InsertResult::Skipped);
    }

    #[test]
    fn merge_dedupes_and_trims() {
        let mut a = Leaderboard::new(3, FitnessMetric::Sharpe);
        a.insert(candidate("x", 1.0, 0));
        a.insert(candidate("y", 2.0, 1));
        let mut b = Leaderboard::new(3, FitnessMetric::Sharpe);
        b.insert(candidate("x", 4.0, 7));
        b.insert(candidate("z", 3.0, 8));
        b.insert(candidate("w", 0.1, 9));
        a.merge(b);
        let ids: Vec<&str> = a.entries().iter().map(|c| c.fingerprint.as_str()).collect();
        assert_eq!(ids, vec!["x", "z", "y"]);
        assert_eq!(a.best().unwrap().iteration, 7);
    }
}

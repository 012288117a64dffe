//! # Mutation Statistics
//!
//! Counters kept per engine instance. Serializable so drivers can dump them
//! as JSON at the end of a run.

use serde::Serialize;

use crate::strategy::Strategy;

/// Applied / skipped counts for one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrategyCounts {
    /// Times the strategy changed the buffer.
    pub applied: u64,
    /// Times its preconditions failed and it left the buffer alone.
    pub skipped: u64,
}

impl StrategyCounts {
    pub fn selected(&self) -> u64 {
        self.applied + self.skipped
    }
}

/// Aggregate engine statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MutationStats {
    /// Total `mutate` calls.
    pub invocations: u64,
    /// Inputs returned untouched because they were not PNG.
    pub passthrough: u64,
    /// PNG inputs copied unchanged because they were too short.
    pub too_short: u64,
    /// Working buffer allocations that failed.
    pub alloc_failures: u64,
    /// Total bytes handed back to the host.
    pub bytes_out: u64,
    /// Per-strategy counters, indexed by [`Strategy::index`].
    pub strategies: [StrategyCounts; Strategy::ALL.len()],
}

impl MutationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(&self, strategy: Strategy) -> &StrategyCounts {
        &self.strategies[strategy.index()]
    }

    pub(crate) fn record(&mut self, strategy: Strategy, applied: bool) {
        let counts = &mut self.strategies[strategy.index()];
        if applied {
            counts.applied += 1;
        } else {
            counts.skipped += 1;
        }
    }

    /// Total calls that reached an operation and changed the buffer.
    pub fn applied(&self) -> u64 {
        self.strategies.iter().map(|c| c.applied).sum()
    }

    /// Fraction of invocations that produced a mutated candidate.
    pub fn applied_ratio(&self) -> f64 {
        if self.invocations == 0 {
            0.0
        } else {
            self.applied() as f64 / self.invocations as f64
        }
    }
}

/// What happened on the most recent `mutate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    /// Strategy drawn, or `None` when the input was passed through.
    pub strategy: Option<Strategy>,
    /// Whether the working buffer was actually modified.
    pub applied: bool,
    pub input_len: usize,
    pub output_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_applied_and_skipped() {
        let mut stats = MutationStats::new();
        stats.record(Strategy::RemoveChunk, true);
        stats.record(Strategy::RemoveChunk, false);
        stats.record(Strategy::CorruptChecksum, true);

        assert_eq!(stats.strategy(Strategy::RemoveChunk).applied, 1);
        assert_eq!(stats.strategy(Strategy::RemoveChunk).skipped, 1);
        assert_eq!(stats.strategy(Strategy::RemoveChunk).selected(), 2);
        assert_eq!(stats.applied(), 2);
    }

    #[test]
    fn applied_ratio_empty() {
        assert_eq!(MutationStats::new().applied_ratio(), 0.0);
    }

    #[test]
    fn applied_ratio() {
        let mut stats = MutationStats::new();
        stats.invocations = 4;
        stats.record(Strategy::FlipRandomByte, true);
        assert!((stats.applied_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_to_json() {
        let mut stats = MutationStats::new();
        stats.invocations = 3;
        stats.record(Strategy::DuplicateChunk, true);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["invocations"], 3);
        assert_eq!(json["strategies"][Strategy::DuplicateChunk.index()]["applied"], 1);
    }
}

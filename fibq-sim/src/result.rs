//! Run result types

use fibq_state::SamplingResult;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::statistics::ExecutionStatistics;

/// Outcome of [`AnyonicCircuit::run`](crate::AnyonicCircuit::run)
///
/// Labels are combined basis indices: in the independent layout the
/// mixed-radix number of per-qudit outcomes (qudit 0 least significant), in
/// the fused layout the index of the fused basis state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunResult {
    /// Map from outcome label to count
    pub counts: BTreeMap<usize, usize>,

    /// Outcome label of every shot, in order
    pub memory: Vec<usize>,

    /// Total number of shots
    pub shots: usize,

    /// Statistics snapshot (if statistics collection was enabled)
    #[cfg_attr(feature = "serde", serde(skip))]
    pub statistics: Option<ExecutionStatistics>,
}

impl RunResult {
    pub fn new(sampling: SamplingResult) -> Self {
        Self {
            counts: sampling.counts,
            memory: sampling.memory,
            shots: sampling.shots,
            statistics: None,
        }
    }

    /// Add execution statistics to the result
    pub fn with_statistics(mut self, stats: ExecutionStatistics) -> Self {
        self.statistics = Some(stats);
        self
    }

    /// Get the count for a specific label
    pub fn get(&self, label: usize) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Observed frequency of a label
    pub fn probability(&self, label: usize) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get(label) as f64 / self.shots as f64
        }
    }

    /// Labels that were observed at least once, ascending
    pub fn labels(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.keys().copied()
    }

    /// Get number of unique outcomes observed
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Get the most common outcome; ties go to the smaller label
    pub fn most_common(&self) -> Option<(usize, usize)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&label, &count)| (label, count))
    }

    /// Counts keyed by the decimal string of each label
    pub fn string_counts(&self) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|(label, &count)| (label.to_string(), count))
            .collect()
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Counts ({} shots):", self.shots)?;
        for (label, count) in &self.counts {
            writeln!(
                f,
                "  {:>6}: {:>6} ({:.2}%)",
                label,
                count,
                100.0 * self.probability(*label)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> RunResult {
        RunResult::new(SamplingResult::from_memory(vec![0, 2, 2, 0, 2, 5]))
    }

    #[test]
    fn test_counts() {
        let r = result();
        assert_eq!(r.shots, 6);
        assert_eq!(r.get(2), 3);
        assert_eq!(r.get(1), 0);
        assert_eq!(r.probability(0), 2.0 / 6.0);
        assert_eq!(r.labels().collect::<Vec<_>>(), vec![0, 2, 5]);
        assert_eq!(r.num_outcomes(), 3);
    }

    #[test]
    fn test_most_common() {
        assert_eq!(result().most_common(), Some((2, 3)));
        let tie = RunResult::new(SamplingResult::from_memory(vec![4, 1]));
        assert_eq!(tie.most_common(), Some((1, 1)));
    }

    #[test]
    fn test_string_counts() {
        let counts = result().string_counts();
        assert_eq!(counts.get("2"), Some(&3));
        assert_eq!(counts.get("5"), Some(&1));
    }

    #[test]
    fn test_display() {
        let shown = result().to_string();
        assert!(shown.starts_with("Counts (6 shots):"));
        assert!(shown.contains("50.00%"));
    }
}

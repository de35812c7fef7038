//! Measurement sampling
//!
//! Measuring a register reads off every qudit's fusion-tree label at once,
//! so an outcome is a combined basis index and its probability is the
//! squared magnitude of that amplitude. The outcome label is the combined
//! index itself: the mixed-radix digits are the per-qudit outcomes.
//!
//! Shots are drawn in fixed-size chunks. Each chunk gets a seed drawn, in
//! chunk order, from the caller's random source and samples with its own
//! ChaCha stream, so the result depends only on the caller's RNG state and
//! not on how chunks are scheduled across threads.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed categorical distribution over combined basis indices
#[derive(Debug, Clone)]
pub struct ProbabilityTable {
    probabilities: Vec<f64>,
    distribution: WeightedIndex<f64>,
}

impl ProbabilityTable {
    /// Squared magnitudes of the amplitudes
    ///
    /// Zero-probability outcomes are never drawn.
    pub fn from_amplitudes(amplitudes: &[Complex64]) -> Result<Self> {
        let probabilities: Vec<f64> = amplitudes.iter().map(|a| a.norm_sqr()).collect();
        let distribution = WeightedIndex::new(&probabilities).map_err(|_| {
            StateError::NotNormalized {
                norm: probabilities.iter().sum::<f64>().sqrt(),
            }
        })?;
        Ok(Self {
            probabilities,
            distribution,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability(&self, label: usize) -> f64 {
        self.probabilities.get(label).copied().unwrap_or(0.0)
    }

    /// Draw one outcome label
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.distribution.sample(rng)
    }
}

/// Result of sampling a register
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingResult {
    /// Map from outcome label to count
    pub counts: BTreeMap<usize, usize>,

    /// Outcome label of every shot, in order
    pub memory: Vec<usize>,

    /// Total number of shots
    pub shots: usize,
}

impl SamplingResult {
    /// Build counts from per-shot memory
    pub fn from_memory(memory: Vec<usize>) -> Self {
        let mut counts = BTreeMap::new();
        for &label in &memory {
            *counts.entry(label).or_insert(0) += 1;
        }
        Self {
            shots: memory.len(),
            counts,
            memory,
        }
    }

    pub fn get_count(&self, label: usize) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Observed frequency of an outcome (count / shots)
    pub fn frequency(&self, label: usize) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get_count(label) as f64 / self.shots as f64
        }
    }

    /// All outcomes sorted by count (descending), ties by label
    pub fn sorted_outcomes(&self) -> Vec<(usize, usize)> {
        let mut outcomes: Vec<_> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        outcomes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        outcomes
    }

    pub fn most_common(&self) -> Option<(usize, usize)> {
        self.sorted_outcomes().into_iter().next()
    }
}

/// Draws shots from a [`ProbabilityTable`]
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    chunk_size: usize,
}

impl Sampler {
    /// Shots per independently seeded chunk
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    pub fn new() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Draw `shots` outcomes
    ///
    /// # Errors
    /// [`StateError::InvalidShots`] when `shots == 0`; nothing is drawn.
    pub fn run<R: Rng + ?Sized>(
        &self,
        table: &ProbabilityTable,
        shots: usize,
        rng: &mut R,
    ) -> Result<SamplingResult> {
        if shots == 0 {
            return Err(StateError::InvalidShots { shots });
        }

        let chunks: Vec<(u64, usize)> = (0..shots)
            .step_by(self.chunk_size)
            .map(|start| (rng.gen::<u64>(), self.chunk_size.min(shots - start)))
            .collect();

        let draw = |(seed, len): &(u64, usize)| -> Vec<usize> {
            trace!(seed, len, "sampling chunk");
            let mut chunk_rng = ChaCha8Rng::seed_from_u64(*seed);
            (0..*len).map(|_| table.sample(&mut chunk_rng)).collect()
        };

        #[cfg(feature = "parallel")]
        let parts: Vec<Vec<usize>> = chunks.par_iter().map(draw).collect();
        #[cfg(not(feature = "parallel"))]
        let parts: Vec<Vec<usize>> = chunks.iter().map(draw).collect();

        Ok(SamplingResult::from_memory(parts.concat()))
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(probs: &[f64]) -> ProbabilityTable {
        let amps: Vec<Complex64> = probs.iter().map(|p| Complex64::new(p.sqrt(), 0.0)).collect();
        ProbabilityTable::from_amplitudes(&amps).unwrap()
    }

    #[test]
    fn test_zero_shots_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = Sampler::new().run(&table(&[1.0]), 0, &mut rng);
        assert_eq!(result, Err(StateError::InvalidShots { shots: 0 }));
    }

    #[test]
    fn test_deterministic_outcome() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = Sampler::new().run(&table(&[0.0, 0.0, 1.0]), 100, &mut rng).unwrap();
        assert_eq!(result.get_count(2), 100);
        assert_eq!(result.counts.len(), 1);
        assert_eq!(result.memory, vec![2; 100]);
    }

    #[test]
    fn test_counts_match_memory() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let result = Sampler::new()
            .with_chunk_size(7)
            .run(&table(&[0.25, 0.5, 0.25]), 1000, &mut rng)
            .unwrap();
        assert_eq!(result.shots, 1000);
        assert_eq!(result.memory.len(), 1000);
        assert_eq!(result.counts.values().sum::<usize>(), 1000);
        assert_eq!(result, SamplingResult::from_memory(result.memory.clone()));
    }

    #[test]
    fn test_convergence() {
        let probs = [0.1, 0.2, 0.3, 0.4];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = Sampler::new().run(&table(&probs), 100_000, &mut rng).unwrap();
        for (label, &p) in probs.iter().enumerate() {
            assert_relative_eq!(result.frequency(label), p, epsilon = 0.01);
        }
        assert_eq!(result.most_common().map(|(label, _)| label), Some(3));
    }

    #[test]
    fn test_same_seed_same_memory() {
        let t = table(&[0.5, 0.5]);
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            Sampler::new().with_chunk_size(16).run(&t, 200, &mut rng).unwrap()
        };
        assert_eq!(run(3), run(3));
        assert_ne!(run(3).memory, run(4).memory);
    }

    #[test]
    fn test_zero_state_rejected() {
        let amps = vec![Complex64::new(0.0, 0.0); 3];
        assert!(matches!(
            ProbabilityTable::from_amplitudes(&amps),
            Err(StateError::NotNormalized { .. })
        ));
    }
}

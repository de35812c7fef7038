//! Dense state vector of an anyon register

use crate::error::{Result, StateError};
use crate::validation::{check_norm_preserved, require_normalized, DEFAULT_NORM_TOLERANCE};
use fibq_braid::BraidMatrix;
use num_complex::Complex64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default state size from which operator application runs in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 12;

/// Flat amplitude vector with checked unitary updates
#[derive(Debug, Clone)]
pub struct QuditState {
    amplitudes: Vec<Complex64>,
    norm_tolerance: f64,
    parallel_threshold: usize,
}

impl QuditState {
    /// State of dimension `dim` in basis state 0
    pub fn new(dim: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        if let Some(first) = amplitudes.first_mut() {
            *first = Complex64::new(1.0, 0.0);
        }
        Self {
            amplitudes,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn norm_tolerance(&self) -> f64 {
        self.norm_tolerance
    }

    /// Set a computational basis state
    pub fn set_basis_state(&mut self, index: usize) -> Result<()> {
        if index >= self.dim() {
            return Err(StateError::IndexOutOfRange {
                index,
                dimension: self.dim(),
            });
        }
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(())
    }

    /// Replace the amplitudes with a normalized vector of the same dimension
    pub fn set_amplitudes(&mut self, amplitudes: &[Complex64]) -> Result<()> {
        if amplitudes.len() != self.dim() {
            return Err(StateError::DimensionMismatch {
                expected: self.dim(),
                actual: amplitudes.len(),
            });
        }
        require_normalized(amplitudes, self.norm_tolerance)?;
        self.amplitudes.copy_from_slice(amplitudes);
        Ok(())
    }

    /// Squared magnitude of each amplitude
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply a qudit-local operator, treating all other qudits as a batch
    ///
    /// The qudit has dimension `op.dim()` and stride `stride`: its basis
    /// index `k` sits at offset `k * stride` inside blocks of
    /// `op.dim() * stride` amplitudes. Each block holds `stride` independent
    /// fibres of length `op.dim()`; each fibre is gathered into a scratch
    /// buffer, multiplied and scattered back.
    pub fn apply_local(&mut self, op: &BraidMatrix, stride: usize) -> Result<()> {
        let d = op.dim();
        let block = d * stride;
        if block == 0 || self.dim() % block != 0 {
            return Err(StateError::DimensionMismatch {
                expected: self.dim(),
                actual: block,
            });
        }

        let apply_block = |chunk: &mut [Complex64]| {
            let mut fibre = vec![Complex64::new(0.0, 0.0); d];
            let mut image = vec![Complex64::new(0.0, 0.0); d];
            for r in 0..stride {
                for (k, slot) in fibre.iter_mut().enumerate() {
                    *slot = chunk[r + k * stride];
                }
                op.apply_into(&fibre, &mut image);
                for (k, value) in image.iter().enumerate() {
                    chunk[r + k * stride] = *value;
                }
            }
        };

        #[cfg(feature = "parallel")]
        if self.dim() >= self.parallel_threshold && self.dim() > block {
            self.amplitudes.par_chunks_mut(block).for_each(apply_block);
            return check_norm_preserved(&self.amplitudes, self.norm_tolerance);
        }

        self.amplitudes.chunks_mut(block).for_each(apply_block);
        check_norm_preserved(&self.amplitudes, self.norm_tolerance)
    }

    /// Apply an operator on the whole space
    pub fn apply_global(&mut self, op: &BraidMatrix) -> Result<()> {
        if op.dim() != self.dim() {
            return Err(StateError::DimensionMismatch {
                expected: self.dim(),
                actual: op.dim(),
            });
        }
        let input = self.amplitudes.clone();

        #[cfg(feature = "parallel")]
        if self.dim() >= self.parallel_threshold {
            self.amplitudes
                .par_iter_mut()
                .enumerate()
                .for_each(|(r, slot)| {
                    *slot = op.row(r).iter().zip(&input).map(|(a, x)| a * x).sum();
                });
            return check_norm_preserved(&self.amplitudes, self.norm_tolerance);
        }

        op.apply_into(&input, &mut self.amplitudes);
        check_norm_preserved(&self.amplitudes, self.norm_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn swap() -> BraidMatrix {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        BraidMatrix::from_row_major(2, vec![zero, one, one, zero]).unwrap()
    }

    #[test]
    fn test_default_state() {
        let state = QuditState::new(5);
        assert_eq!(state.amplitudes()[0], Complex64::new(1.0, 0.0));
        assert_relative_eq!(state.norm_squared(), 1.0);
    }

    #[test]
    fn test_set_basis_state() {
        let mut state = QuditState::new(3);
        state.set_basis_state(2).unwrap();
        assert_eq!(state.probabilities(), vec![0.0, 0.0, 1.0]);
        assert!(matches!(
            state.set_basis_state(3),
            Err(StateError::IndexOutOfRange { index: 3, dimension: 3 })
        ));
        // failed call leaves the state alone
        assert_eq!(state.probabilities(), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_set_amplitudes_validates() {
        let mut state = QuditState::new(2);
        let h = 1.0 / 2.0_f64.sqrt();
        state
            .set_amplitudes(&[Complex64::new(h, 0.0), Complex64::new(0.0, h)])
            .unwrap();
        assert!(state.set_amplitudes(&[Complex64::new(1.0, 0.0)]).is_err());
        assert!(matches!(
            state.set_amplitudes(&[Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]),
            Err(StateError::NotNormalized { .. })
        ));
    }

    #[test]
    fn test_apply_local_acts_on_one_digit() {
        // two qudits of dimension 2 and 3; swap acts on qudit 0 (stride 1)
        let mut state = QuditState::new(6);
        state.set_basis_state(2).unwrap(); // locals (0, 1)
        state.apply_local(&swap(), 1).unwrap();
        assert_relative_eq!(state.probabilities()[3], 1.0); // locals (1, 1)
    }

    #[test]
    fn test_apply_local_with_stride() {
        // three qudits of dimension 2; swap acts on the middle one
        let mut state = QuditState::new(8);
        state.set_basis_state(5).unwrap(); // bits 1,0,1
        state.apply_local(&swap(), 2).unwrap();
        assert_relative_eq!(state.probabilities()[7], 1.0);
    }

    #[test]
    fn test_apply_local_rejects_bad_stride() {
        let mut state = QuditState::new(6);
        assert!(state.apply_local(&swap(), 2).is_err());
    }

    #[test]
    fn test_apply_global() {
        let mut state = QuditState::new(2);
        state.apply_global(&swap()).unwrap();
        assert_relative_eq!(state.probabilities()[1], 1.0);
        assert!(state.apply_global(&BraidMatrix::identity(3)).is_err());
    }

    #[test]
    fn test_norm_drift_is_reported() {
        let mut state = QuditState::new(2);
        let mut scale = BraidMatrix::identity(2);
        scale.set(0, 0, Complex64::new(2.0, 0.0));
        let err = state.apply_global(&scale).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        let op = swap();
        let mut small = QuditState::new(64).with_parallel_threshold(usize::MAX);
        let mut large = QuditState::new(64).with_parallel_threshold(1);
        small.set_basis_state(37).unwrap();
        large.set_basis_state(37).unwrap();
        small.apply_local(&op, 4).unwrap();
        large.apply_local(&op, 4).unwrap();
        assert_eq!(small.amplitudes(), large.amplitudes());
    }
}

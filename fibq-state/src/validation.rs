//! Normalization checks

use crate::error::{Result, StateError};
use num_complex::Complex64;
use tracing::warn;

/// Default tolerance for normalization checks
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Norm of an amplitude vector compared against 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormCheck {
    pub norm: f64,
    /// `|norm - 1|`, or infinity if any amplitude is not finite
    pub deviation: f64,
}

impl NormCheck {
    /// Measure the norm of `amplitudes`
    ///
    /// ```
    /// use fibq_state::validation::{NormCheck, DEFAULT_NORM_TOLERANCE};
    /// use num_complex::Complex64;
    ///
    /// let h = 1.0 / 2.0_f64.sqrt();
    /// let check = NormCheck::of(&[Complex64::new(h, 0.0), Complex64::new(0.0, h)]);
    /// assert!(check.within(DEFAULT_NORM_TOLERANCE));
    /// ```
    pub fn of(amplitudes: &[Complex64]) -> Self {
        let norm = amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        let deviation = if norm.is_finite() {
            (norm - 1.0).abs()
        } else {
            f64::INFINITY
        };
        Self { norm, deviation }
    }

    #[inline]
    pub fn within(&self, tolerance: f64) -> bool {
        self.deviation <= tolerance
    }
}

/// Reject a caller-supplied state that is not normalized
pub fn require_normalized(amplitudes: &[Complex64], tolerance: f64) -> Result<()> {
    let check = NormCheck::of(amplitudes);
    if check.within(tolerance) {
        Ok(())
    } else {
        Err(StateError::NotNormalized { norm: check.norm })
    }
}

/// Check the norm after a braid; drift is an internal defect
pub fn check_norm_preserved(amplitudes: &[Complex64], tolerance: f64) -> Result<()> {
    let check = NormCheck::of(amplitudes);
    if check.within(tolerance) {
        return Ok(());
    }
    warn!(norm = check.norm, tolerance, "state norm drifted after braid");
    Err(StateError::NormDrift {
        norm: check.norm,
        tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_state() {
        let amps = vec![Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        let check = NormCheck::of(&amps);
        assert!(check.within(DEFAULT_NORM_TOLERANCE));
        assert_relative_eq!(check.norm, 1.0, epsilon = 1e-12);
        assert!(require_normalized(&amps, DEFAULT_NORM_TOLERANCE).is_ok());
    }

    #[test]
    fn test_unnormalized_state() {
        let amps = vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)];
        assert!(matches!(
            require_normalized(&amps, DEFAULT_NORM_TOLERANCE),
            Err(StateError::NotNormalized { .. })
        ));
        let err = check_norm_preserved(&amps, DEFAULT_NORM_TOLERANCE).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_non_finite_rejected() {
        let amps = vec![Complex64::new(f64::NAN, 0.0)];
        assert!(!NormCheck::of(&amps).within(DEFAULT_NORM_TOLERANCE));
        assert!(!NormCheck::of(&amps).within(f64::MAX));
    }
}

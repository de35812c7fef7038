//! Error types for state vector operations

use fibq_core::AnyonError;
use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Basis index outside a qudit's (or the register's) dimension
    #[error("Basis index {index} out of range for dimension {dimension}")]
    IndexOutOfRange { index: usize, dimension: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// State not normalized
    #[error("State vector not normalized, norm = {norm}")]
    NotNormalized { norm: f64 },

    /// Shot count must be positive
    #[error("Number of shots must be positive, got {shots}")]
    InvalidShots { shots: usize },

    /// Norm drifted after unitary evolution
    #[error("Norm drifted to {norm} after applying an operator (tolerance {tolerance:e})")]
    NormDrift { norm: f64, tolerance: f64 },

    /// Errors from anyon bookkeeping and operator construction
    #[error(transparent)]
    Anyon(#[from] AnyonError),
}

impl StateError {
    /// True when the error reports a defect rather than a bad request
    pub fn is_internal(&self) -> bool {
        match self {
            Self::NormDrift { .. } => true,
            Self::Anyon(err) => err.is_internal(),
            _ => false,
        }
    }
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;

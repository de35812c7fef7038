//! Braid operators on Fibonacci anyon fusion spaces
//!
//! The [`BraidOperatorBuilder`] turns the recoupling data of `fibq-core` into
//! dense unitary matrices:
//! - elementary generators `σ_i`, assembled column by column from the
//!   exchange amplitudes of every basis label
//! - integer powers, with negative powers taken from the adjoint
//! - exchanges of distant anyons through band generators
//! - operators on the fused multi-qudit basis, conjugated from the chain
//!   basis by an orthogonal [`FusionTransform`]
//!
//! Built operators are memoized in a [`BraidCache`], process-wide by default.

pub mod builder;
pub mod cache;
pub mod fused;
pub mod matrix;

pub use builder::{reduce_power, BraidOperatorBuilder, DEFAULT_UNITARITY_TOLERANCE, EXCHANGE_ORDER};
pub use cache::{BraidCache, OperatorKey};
pub use fused::FusionTransform;
pub use matrix::BraidMatrix;

use fibq_core::Boundary;
use smallvec::SmallVec;
use std::fmt;

/// The space a braid operator acts on
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum BraidSpace {
    /// One qudit's own fusion chain
    Qudit { anyons: usize, boundary: Boundary },
    /// The fused basis of a whole register
    Fused { anyons_per_qudit: SmallVec<[usize; 4]> },
}

impl BraidSpace {
    pub fn qudit(anyons: usize, boundary: Boundary) -> Self {
        Self::Qudit { anyons, boundary }
    }

    pub fn fused(anyons_per_qudit: &[usize]) -> Self {
        Self::Fused {
            anyons_per_qudit: anyons_per_qudit.iter().copied().collect(),
        }
    }

    /// Number of anyons, i.e. the range of valid positions `1..=anyons`
    pub fn anyons(&self) -> usize {
        match self {
            Self::Qudit { anyons, .. } => *anyons,
            Self::Fused { anyons_per_qudit } => anyons_per_qudit.iter().sum(),
        }
    }
}

impl fmt::Display for BraidSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qudit { anyons, boundary } => write!(f, "qudit({anyons}, {boundary})"),
            Self::Fused { anyons_per_qudit } => write!(f, "fused{:?}", anyons_per_qudit.as_slice()),
        }
    }
}

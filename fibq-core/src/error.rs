//! Error types for anyon bookkeeping

use crate::{Boundary, Charge, QuditId};
use thiserror::Error;

/// Errors raised while building bases, resolving anyons or checking operators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnyonError {
    /// A qudit was requested with zero anyons
    #[error("A qudit must hold at least one anyon")]
    NoAnyons,

    /// The requested total charge cannot be produced by that many anyons
    #[error("Total charge {charge} is unreachable with {anyons} anyon(s)")]
    UnreachableCharge { charge: Charge, anyons: usize },

    /// The fused layout only exists for qudits with a free total charge
    #[error("Fused layout requires a free boundary, got {0}")]
    UnsupportedBoundary(Boundary),

    /// Global anyon index outside `1..=total`
    #[error("Invalid anyon index {anyon}: circuit has {total} anyons")]
    AnyonOutOfRange { anyon: usize, total: usize },

    /// Both ends of a braid name the same anyon
    #[error("Cannot braid anyon {0} with itself")]
    SameAnyon(usize),

    /// The two anyons live in different qudits
    #[error("Anyons {first} and {second} belong to different qudits ({first_qudit} and {second_qudit})")]
    CrossQuditBraid {
        first: usize,
        second: usize,
        first_qudit: QuditId,
        second_qudit: QuditId,
    },

    /// Braid position does not name a pair of anyons in the qudit
    #[error("Braid position {position} is invalid for {anyons} anyon(s)")]
    InvalidPair { position: usize, anyons: usize },

    /// Lookup of a label that the basis does not contain
    #[error("Label {0} is not part of the basis")]
    LabelNotInBasis(String),

    /// A built operator failed the unitarity check
    #[error("Operator {context} is not unitary (deviation {deviation:e})")]
    NotUnitary { context: String, deviation: f64 },
}

impl AnyonError {
    /// Create an out-of-range anyon error
    pub fn anyon_out_of_range(anyon: usize, total: usize) -> Self {
        Self::AnyonOutOfRange { anyon, total }
    }

    /// Create an invalid pair error
    pub fn invalid_pair(position: usize, anyons: usize) -> Self {
        Self::InvalidPair { position, anyons }
    }

    /// True for failures of basis construction
    pub fn is_basis_error(&self) -> bool {
        matches!(
            self,
            Self::NoAnyons | Self::UnreachableCharge { .. } | Self::UnsupportedBoundary(_)
        )
    }

    /// True for braids that name invalid anyons
    pub fn is_braid_error(&self) -> bool {
        matches!(
            self,
            Self::AnyonOutOfRange { .. }
                | Self::SameAnyon(_)
                | Self::CrossQuditBraid { .. }
                | Self::InvalidPair { .. }
        )
    }

    /// True for internal consistency failures
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::LabelNotInBasis(_) | Self::NotUnitary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_charge_message() {
        let err = AnyonError::UnreachableCharge {
            charge: Charge::Vacuum,
            anyons: 1,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("unreachable"));
        assert!(msg.contains('1'));
        assert!(err.is_basis_error());
    }

    #[test]
    fn test_cross_qudit_message() {
        let err = AnyonError::CrossQuditBraid {
            first: 3,
            second: 4,
            first_qudit: QuditId::new(0),
            second_qudit: QuditId::new(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("Q0"));
        assert!(msg.contains("Q1"));
        assert!(err.is_braid_error());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_classification() {
        assert!(AnyonError::invalid_pair(5, 3).is_braid_error());
        assert!(AnyonError::anyon_out_of_range(0, 6).is_braid_error());
        assert!(AnyonError::NotUnitary {
            context: "σ1".into(),
            deviation: 1e-3
        }
        .is_internal());
    }
}

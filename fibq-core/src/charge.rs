//! Topological charges of the Fibonacci anyon model

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Fibonacci topological charge
///
/// The model has exactly two: the vacuum (trivial charge, written `1`) and
/// the non-abelian `τ`. Charges order as `Vacuum < Tau`, which is also the
/// order in which fusion outcomes are listed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Charge {
    Vacuum,
    Tau,
}

const VACUUM_ONLY: [Charge; 1] = [Charge::Vacuum];
const TAU_ONLY: [Charge; 1] = [Charge::Tau];
const BOTH: [Charge; 2] = [Charge::Vacuum, Charge::Tau];

impl Charge {
    /// Both charges, vacuum first
    pub const ALL: [Charge; 2] = BOTH;

    /// Row/column index of this charge in 2×2 recoupling matrices
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Charge::Vacuum => 0,
            Charge::Tau => 1,
        }
    }

    /// Possible outcomes of fusing `self` with `other`, vacuum first
    ///
    /// ```
    /// use fibq_core::Charge;
    /// assert_eq!(Charge::Tau.fuse(Charge::Tau), &[Charge::Vacuum, Charge::Tau]);
    /// assert_eq!(Charge::Vacuum.fuse(Charge::Tau), &[Charge::Tau]);
    /// ```
    pub fn fuse(self, other: Charge) -> &'static [Charge] {
        match (self, other) {
            (Charge::Vacuum, Charge::Vacuum) => &VACUUM_ONLY,
            (Charge::Vacuum, Charge::Tau) | (Charge::Tau, Charge::Vacuum) => &TAU_ONLY,
            (Charge::Tau, Charge::Tau) => &BOTH,
        }
    }

    /// Whether `self × other` can produce `outcome`
    #[inline]
    pub fn can_fuse_to(self, other: Charge, outcome: Charge) -> bool {
        self.fuse(other).contains(&outcome)
    }

    #[inline]
    pub fn is_vacuum(self) -> bool {
        self == Charge::Vacuum
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charge::Vacuum => write!(f, "1"),
            Charge::Tau => write!(f, "τ"),
        }
    }
}

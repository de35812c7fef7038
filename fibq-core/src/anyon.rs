//! Anyon and qudit addressing

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type-safe identifier for an anyon
///
/// Anyons are numbered from 1 across the whole circuit: qudit 0 holds
/// anyons `1..=n_0`, qudit 1 the next `n_1`, and so on.
///
/// # Example
/// ```
/// use fibq_core::AnyonId;
///
/// let a = AnyonId::new(3);
/// assert_eq!(a.get(), 3);
/// assert_eq!(a.to_string(), "a3");
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnyonId(usize);

impl AnyonId {
    /// Create a new anyon identifier from its 1-based global position
    #[inline]
    pub const fn new(position: usize) -> Self {
        Self(position)
    }

    /// Get the 1-based global position
    #[inline]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AnyonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

impl From<usize> for AnyonId {
    #[inline]
    fn from(position: usize) -> Self {
        Self::new(position)
    }
}

/// Type-safe identifier for a qudit (0-based)
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuditId(usize);

impl QuditId {
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for QuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

impl From<usize> for QuditId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QuditId> for usize {
    #[inline]
    fn from(qid: QuditId) -> Self {
        qid.index()
    }
}

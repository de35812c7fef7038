//! Fusion-tree bases of a single qudit
//!
//! A basis state of `n` anyons is the sequence of intermediate charges
//! `[c_0, c_1, ..., c_{n-1}]` met while fusing the anyons left to right:
//! `c_0 = τ` is the first anyon itself, `c_k ∈ c_{k-1} × τ`, and `c_{n-1}`
//! is the total charge of the qudit.
//!
//! Enumeration is depth-first with vacuum explored before τ, so basis
//! indices follow the lexicographic order of labels with `1 < τ`:
//!
//! ```text
//! n = 3, free boundary:   0: [τ,1,τ]   1: [τ,τ,1]   2: [τ,τ,τ]
//! ```

use crate::{AnyonError, Charge, Result};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constraint on the total charge of a qudit
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Boundary {
    /// Any total charge is allowed
    #[default]
    Free,
    /// The total charge is pinned
    Fixed(Charge),
}

impl Boundary {
    /// Whether a final charge satisfies this boundary
    #[inline]
    pub fn admits(self, total: Charge) -> bool {
        match self {
            Boundary::Free => true,
            Boundary::Fixed(charge) => charge == total,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Free => write!(f, "free"),
            Boundary::Fixed(charge) => write!(f, "fixed({})", charge),
        }
    }
}

/// Intermediate charges of one fusion-tree basis state
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasisLabel(SmallVec<[Charge; 8]>);

impl BasisLabel {
    pub fn new(charges: impl IntoIterator<Item = Charge>) -> Self {
        Self(charges.into_iter().collect())
    }

    /// Total charge of the qudit (last intermediate charge)
    pub fn total(&self) -> Charge {
        self.0.last().copied().unwrap_or(Charge::Vacuum)
    }

    /// Number of anyons the label describes
    pub fn anyons(&self) -> usize {
        self.0.len()
    }

    /// Copy of this label with one intermediate charge replaced
    pub fn with_charge(&self, position: usize, charge: Charge) -> Self {
        let mut charges = self.0.clone();
        charges[position] = charge;
        Self(charges)
    }
}

impl Deref for BasisLabel {
    type Target = [Charge];

    fn deref(&self) -> &[Charge] {
        &self.0
    }
}

impl fmt::Display for BasisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, charge) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", charge)?;
        }
        write!(f, "]")
    }
}

/// Indexed list of basis labels with reverse lookup
#[derive(Debug, Clone)]
pub struct BasisTable {
    anyons: usize,
    boundary: Boundary,
    labels: Vec<BasisLabel>,
    index: AHashMap<BasisLabel, usize>,
}

impl BasisTable {
    fn from_labels(anyons: usize, boundary: Boundary, labels: Vec<BasisLabel>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self {
            anyons,
            boundary,
            labels,
            index,
        }
    }

    /// Dimension of the qudit's state space
    #[inline]
    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn anyons(&self) -> usize {
        self.anyons
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Label at a basis index
    pub fn label(&self, index: usize) -> Option<&BasisLabel> {
        self.labels.get(index)
    }

    pub fn labels(&self) -> &[BasisLabel] {
        &self.labels
    }

    /// Basis index of a label, if it belongs to this basis
    pub fn index_of(&self, label: &BasisLabel) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Like [`index_of`](Self::index_of) but reports a missing label as an error
    pub fn require_index(&self, label: &BasisLabel) -> Result<usize> {
        self.index_of(label)
            .ok_or_else(|| AnyonError::LabelNotInBasis(label.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &BasisLabel)> {
        self.labels.iter().enumerate()
    }
}

/// Enumerates fusion-tree bases
pub struct BasisEnumerator;

impl BasisEnumerator {
    /// Enumerate the basis of `anyons` τ anyons under `boundary`
    ///
    /// Walks the fusion tree with an explicit work stack: each entry is a
    /// `(depth, charge)` pair and the current path is truncated back to
    /// `depth` before the charge is pushed, so no partial label is ever
    /// copied until it is complete.
    ///
    /// # Errors
    /// [`AnyonError::NoAnyons`] for `anyons == 0` and
    /// [`AnyonError::UnreachableCharge`] when the boundary cannot be met.
    pub fn enumerate(anyons: usize, boundary: Boundary) -> Result<BasisTable> {
        check_reachable(anyons, boundary)?;

        let mut labels = Vec::with_capacity(basis_dimension(anyons, boundary)?);
        let mut path: SmallVec<[Charge; 8]> = SmallVec::with_capacity(anyons);
        let mut stack = vec![(0usize, Charge::Tau)];

        while let Some((depth, charge)) = stack.pop() {
            path.truncate(depth);
            path.push(charge);

            if depth + 1 == anyons {
                if boundary.admits(charge) {
                    labels.push(BasisLabel(path.clone()));
                }
                continue;
            }

            // Reverse push so the vacuum branch is popped first
            for &next in charge.fuse(Charge::Tau).iter().rev() {
                if depth + 2 == anyons && !boundary.admits(next) {
                    continue;
                }
                stack.push((depth + 1, next));
            }
        }

        Ok(BasisTable::from_labels(anyons, boundary, labels))
    }
}

fn check_reachable(anyons: usize, boundary: Boundary) -> Result<()> {
    if anyons == 0 {
        return Err(AnyonError::NoAnyons);
    }
    if let Boundary::Fixed(Charge::Vacuum) = boundary {
        if anyons == 1 {
            return Err(AnyonError::UnreachableCharge {
                charge: Charge::Vacuum,
                anyons,
            });
        }
    }
    Ok(())
}

/// Dimension of the basis without enumerating it
///
/// Counts prefixes ending in vacuum (`v`) and in τ (`t`): a vacuum can only
/// become τ, a τ can become either. With a free boundary this gives
/// `1, 2, 3, 5, 8, ...` for `n = 1, 2, 3, ...`.
pub fn basis_dimension(anyons: usize, boundary: Boundary) -> Result<usize> {
    check_reachable(anyons, boundary)?;
    let (mut v, mut t) = (0usize, 1usize);
    for _ in 1..anyons {
        (v, t) = (t, v + t);
    }
    Ok(match boundary {
        Boundary::Free => v + t,
        Boundary::Fixed(Charge::Vacuum) => v,
        Boundary::Fixed(Charge::Tau) => t,
    })
}

static BASIS_TABLES: Lazy<RwLock<AHashMap<(usize, Boundary), Arc<BasisTable>>>> =
    Lazy::new(|| RwLock::new(AHashMap::new()));

/// Shared, memoized basis table
///
/// Tables are built once per `(anyons, boundary)` and never mutated; every
/// qudit of the same size shares the same `Arc`.
pub fn basis_table(anyons: usize, boundary: Boundary) -> Result<Arc<BasisTable>> {
    if let Some(table) = BASIS_TABLES.read().get(&(anyons, boundary)) {
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(BasisEnumerator::enumerate(anyons, boundary)?);
    let mut tables = BASIS_TABLES.write();
    let entry = tables.entry((anyons, boundary)).or_insert_with(|| {
        debug!(anyons, %boundary, dim = table.dim(), "cached basis table");
        table
    });
    Ok(Arc::clone(entry))
}

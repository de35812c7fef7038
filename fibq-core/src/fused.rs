//! Joint basis of qudits sharing one fusion tree
//!
//! In the fused layout every qudit keeps its own left-to-right subtree and the
//! subtrees are then fused together in qudit order. A basis state is the
//! tuple of per-qudit local labels plus the roots `r_0, ..., r_{Q-1}`, where
//! `r_0` is the total charge of qudit 0 and `r_m ∈ r_{m-1} × k_m` with `k_m`
//! the total charge of qudit `m`.
//!
//! Ordering: local index tuples in mixed-radix order with qudit 0 least
//! significant, and for each tuple the admissible root sequences depth-first,
//! vacuum before τ.

use crate::{basis_table, AnyonError, BasisTable, Boundary, Charge, Result};
use ahash::AHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// One state of the fused basis
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FusedLabel {
    /// Local basis index of each qudit
    pub locals: SmallVec<[usize; 4]>,
    /// Root charge after fusing qudits `0..=m`
    pub roots: SmallVec<[Charge; 4]>,
}

impl FusedLabel {
    /// Total charge of all anyons
    pub fn total(&self) -> Charge {
        self.roots.last().copied().unwrap_or(Charge::Vacuum)
    }
}

impl fmt::Display for FusedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}|", self.locals.as_slice())?;
        for root in &self.roots {
            write!(f, "{}", root)?;
        }
        Ok(())
    }
}

/// Enumerated fused basis of a multi-qudit register
#[derive(Debug, Clone)]
pub struct FusedBasis {
    anyons_per_qudit: SmallVec<[usize; 4]>,
    tables: Vec<Arc<BasisTable>>,
    labels: Vec<FusedLabel>,
    index: AHashMap<FusedLabel, usize>,
}

impl FusedBasis {
    /// Enumerate the fused basis for the given anyon counts
    ///
    /// Each qudit uses the free boundary; the fused tree has no meaningful
    /// per-qudit constraint beyond the fusion rules at the roots.
    pub fn enumerate(anyons_per_qudit: &[usize]) -> Result<Self> {
        if anyons_per_qudit.is_empty() {
            return Err(AnyonError::NoAnyons);
        }
        let tables = anyons_per_qudit
            .iter()
            .map(|&n| basis_table(n, Boundary::Free))
            .collect::<Result<Vec<_>>>()?;

        let dims: Vec<usize> = tables.iter().map(|t| t.dim()).collect();
        let outer: usize = dims.iter().product();
        let mut labels = Vec::new();

        for flat in 0..outer {
            let mut locals: SmallVec<[usize; 4]> = SmallVec::with_capacity(dims.len());
            let mut rest = flat;
            for &d in &dims {
                locals.push(rest % d);
                rest /= d;
            }

            let totals: SmallVec<[Charge; 4]> = tables
                .iter()
                .zip(&locals)
                .map(|(table, &local)| {
                    table
                        .label(local)
                        .map(|label| label.total())
                        .ok_or_else(|| AnyonError::LabelNotInBasis(format!("#{local}")))
                })
                .collect::<Result<_>>()?;

            for roots in root_sequences(&totals) {
                labels.push(FusedLabel {
                    locals: locals.clone(),
                    roots,
                });
            }
        }

        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();

        Ok(Self {
            anyons_per_qudit: anyons_per_qudit.iter().copied().collect(),
            tables,
            labels,
            index,
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn anyons_per_qudit(&self) -> &[usize] {
        &self.anyons_per_qudit
    }

    /// Total number of anyons across all qudits
    pub fn total_anyons(&self) -> usize {
        self.anyons_per_qudit.iter().sum()
    }

    /// Local basis table of one qudit
    pub fn qudit_table(&self, qudit: usize) -> Option<&Arc<BasisTable>> {
        self.tables.get(qudit)
    }

    pub fn label(&self, index: usize) -> Option<&FusedLabel> {
        self.labels.get(index)
    }

    pub fn labels(&self) -> &[FusedLabel] {
        &self.labels
    }

    pub fn index_of(&self, label: &FusedLabel) -> Option<usize> {
        self.index.get(label).copied()
    }
}

/// All admissible root sequences for the given qudit totals, vacuum first
fn root_sequences(totals: &[Charge]) -> Vec<SmallVec<[Charge; 4]>> {
    let mut out = Vec::new();
    let mut path: SmallVec<[Charge; 4]> = SmallVec::new();
    let mut stack = vec![(0usize, totals[0])];

    while let Some((depth, root)) = stack.pop() {
        path.truncate(depth);
        path.push(root);
        if depth + 1 == totals.len() {
            out.push(path.clone());
            continue;
        }
        for &next in root.fuse(totals[depth + 1]).iter().rev() {
            stack.push((depth + 1, next));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis_dimension;

    #[test]
    fn test_fused_dimension_matches_chain() {
        for counts in [vec![3, 3], vec![2, 4], vec![4, 4], vec![2, 2, 3], vec![1, 5]] {
            let fused = FusedBasis::enumerate(&counts).unwrap();
            let total: usize = counts.iter().sum();
            assert_eq!(
                fused.dim(),
                basis_dimension(total, Boundary::Free).unwrap(),
                "{counts:?}"
            );
        }
    }

    #[test]
    fn test_known_sizes() {
        assert_eq!(FusedBasis::enumerate(&[3]).unwrap().dim(), 3);
        assert_eq!(FusedBasis::enumerate(&[4]).unwrap().dim(), 5);
        assert_eq!(FusedBasis::enumerate(&[3, 3]).unwrap().dim(), 13);
        assert_eq!(FusedBasis::enumerate(&[4, 4]).unwrap().dim(), 34);
    }

    #[test]
    fn test_ordering() {
        let fused = FusedBasis::enumerate(&[3, 3]).unwrap();
        // locals (0, 0): both totals τ, so two roots follow, vacuum first
        let first = fused.label(0).unwrap();
        assert_eq!(first.locals.as_slice(), &[0, 0]);
        assert_eq!(first.roots.as_slice(), &[Charge::Tau, Charge::Vacuum]);
        let second = fused.label(1).unwrap();
        assert_eq!(second.roots.as_slice(), &[Charge::Tau, Charge::Tau]);
        // qudit 0 is least significant
        assert_eq!(fused.label(2).unwrap().locals.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_roots_respect_fusion() {
        let fused = FusedBasis::enumerate(&[2, 3, 2]).unwrap();
        for (i, label) in fused.labels().iter().enumerate() {
            let totals: Vec<Charge> = label
                .locals
                .iter()
                .enumerate()
                .map(|(q, &l)| fused.qudit_table(q).unwrap().label(l).unwrap().total())
                .collect();
            assert_eq!(label.roots[0], totals[0]);
            for m in 1..totals.len() {
                assert!(label.roots[m - 1].can_fuse_to(totals[m], label.roots[m]));
            }
            assert_eq!(fused.index_of(label), Some(i));
        }
    }
}

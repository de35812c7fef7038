//! Change of basis between the chain basis and the fused basis
//!
//! The chain basis fuses all `N` anyons of the register left to right. The
//! fused basis fuses each qudit on its own first and then joins the qudit
//! totals through the roots. Both span the same space; the transform `T`
//! with `T[fused][chain]` is real orthogonal and built from F-symbols only.
//!
//! For a fused state with qudit labels `y_m` and roots `r_m`, and a chain
//! state `x`, the entry is non-zero only if the chain agrees with qudit 0,
//! and for every later qudit `m` (occupying chain positions `s..s+q`) the
//! chain charge before the qudit is `J = r_{m-1}` and the chain charge after
//! it is `r_m`. The entry is then
//!
//! `Π_m Π_{k=0}^{q-2} F(J, y[k], τ, x[s+k+1]; x[s+k], y[k+1])`,
//!
//! moving each anyon of qudit `m` from the outer chain into the qudit's own
//! subtree one F-move at a time.

use crate::matrix::BraidMatrix;
use fibq_core::{basis_table, f_symbol, AnyonError, Boundary, Charge, FusedBasis, Result};
use num_complex::Complex64;
use std::sync::Arc;
use tracing::debug;

/// Orthogonal transform from chain to fused basis
#[derive(Debug, Clone)]
pub struct FusionTransform {
    dim: usize,
    /// Row-major `T[fused][chain]`
    data: Vec<f64>,
    basis: Arc<FusedBasis>,
}

impl FusionTransform {
    /// Build the transform for the given qudit sizes
    pub fn new(anyons_per_qudit: &[usize]) -> Result<Self> {
        let basis = Arc::new(FusedBasis::enumerate(anyons_per_qudit)?);
        let chain = basis_table(basis.total_anyons(), Boundary::Free)?;
        let dim = basis.dim();
        if chain.dim() != dim {
            return Err(AnyonError::LabelNotInBasis(format!(
                "chain basis has {} states, fused basis {dim}",
                chain.dim()
            )));
        }
        let mut data = vec![0.0; dim * dim];

        let mut offsets = Vec::with_capacity(anyons_per_qudit.len());
        let mut start = 0;
        for &n in anyons_per_qudit {
            offsets.push(start);
            start += n;
        }

        for (row, fused) in basis.labels().iter().enumerate() {
            let local_labels = fused
                .locals
                .iter()
                .enumerate()
                .map(|(q, &local)| {
                    basis
                        .qudit_table(q)
                        .and_then(|table| table.label(local))
                        .map(|label| label.to_vec())
                        .ok_or_else(|| {
                            AnyonError::LabelNotInBasis(format!("qudit {q} local index {local}"))
                        })
                })
                .collect::<Result<Vec<Vec<Charge>>>>()?;

            for (col, x) in chain.iter() {
                let mut entry = if x[..local_labels[0].len()] == local_labels[0][..] {
                    1.0
                } else {
                    0.0
                };

                for m in 1..local_labels.len() {
                    if entry == 0.0 {
                        break;
                    }
                    let y = &local_labels[m];
                    let s = offsets[m];
                    let q = y.len();
                    let j = fused.roots[m - 1];
                    if x[s - 1] != j || x[s + q - 1] != fused.roots[m] {
                        entry = 0.0;
                        break;
                    }
                    for k in 0..q.saturating_sub(1) {
                        entry *= f_symbol(j, y[k], Charge::Tau, x[s + k + 1], x[s + k], y[k + 1]);
                    }
                }

                data[row * dim + col] = entry;
            }
        }

        debug!(?anyons_per_qudit, dim, "built fusion transform");
        Ok(Self { dim, data, basis })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, fused: usize, chain: usize) -> f64 {
        self.data[fused * self.dim + chain]
    }

    /// The fused basis this transform maps into
    pub fn basis(&self) -> &Arc<FusedBasis> {
        &self.basis
    }

    /// Re-express a chain-basis operator in the fused basis: `T · M · Tᵀ`
    pub fn conjugate(&self, chain_op: &BraidMatrix) -> BraidMatrix {
        let n = self.dim;
        let as_complex = |v: f64| Complex64::new(v, 0.0);

        let mut t = BraidMatrix::zeros(n);
        let mut t_transpose = BraidMatrix::zeros(n);
        for r in 0..n {
            for c in 0..n {
                let entry = as_complex(self.get(r, c));
                t.set(r, c, entry);
                t_transpose.set(c, r, entry);
            }
        }
        t.matmul(chain_op).matmul(&t_transpose)
    }

    /// Largest entry of `|T Tᵀ - I|`
    pub fn orthogonality_deviation(&self) -> f64 {
        let n = self.dim;
        let mut worst = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                let dot: f64 = (0..n).map(|k| self.get(i, k) * self.get(j, k)).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((dot - expected).abs());
            }
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_is_orthogonal() {
        for counts in [vec![3, 3], vec![2, 4], vec![2, 3], vec![2, 2, 2], vec![1, 3]] {
            let t = FusionTransform::new(&counts).unwrap();
            assert!(t.orthogonality_deviation() < 1e-12, "{counts:?}");
        }
    }

    #[test]
    fn test_single_qudit_is_identity() {
        let t = FusionTransform::new(&[4]).unwrap();
        for i in 0..t.dim() {
            for j in 0..t.dim() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(t.get(i, j), expected);
            }
        }
    }

    #[test]
    fn test_conjugating_identity_gives_identity() {
        let t = FusionTransform::new(&[2, 3]).unwrap();
        let id = BraidMatrix::identity(t.dim());
        assert!(t.conjugate(&id).max_abs_diff(&id) < 1e-12);
    }

    #[test]
    fn test_conjugate_matches_entrywise_product() {
        let t = FusionTransform::new(&[2, 2]).unwrap();
        let n = t.dim();
        let mut m = BraidMatrix::zeros(n);
        for r in 0..n {
            for c in 0..n {
                m.set(r, c, Complex64::new((r * n + c) as f64, r as f64 - c as f64));
            }
        }
        let conj = t.conjugate(&m);
        for i in 0..n {
            for j in 0..n {
                let mut expected = Complex64::new(0.0, 0.0);
                for a in 0..n {
                    for b in 0..n {
                        expected += m.get(a, b) * t.get(i, a) * t.get(j, b);
                    }
                }
                assert!((conj.get(i, j) - expected).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn test_dimension() {
        let t = FusionTransform::new(&[3, 3]).unwrap();
        assert_eq!(t.dim(), 13);
        assert_eq!(t.basis().dim(), 13);
    }
}

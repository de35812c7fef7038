//! Layout of a multi-qudit register
//!
//! The joint state is a flat array indexed by the mixed-radix number
//! `index = Σ_q local_q · stride_q`, with `stride_0 = 1` and
//! `stride_q = stride_{q-1} · d_{q-1}`. Qudit 0 is the least significant
//! digit, so the stride of a qudit is the product of the dimensions of all
//! qudits before it.

use crate::error::{Result, StateError};
use fibq_core::{basis_table, AnyonError, BasisLabel, BasisTable, Boundary, QuditId};
use smallvec::SmallVec;
use std::sync::Arc;

/// Per-qudit sizes, dimensions and index arithmetic
#[derive(Debug, Clone)]
pub struct QuditRegister {
    anyons: Vec<usize>,
    boundary: Boundary,
    tables: Vec<Arc<BasisTable>>,
    strides: Vec<usize>,
    offsets: Vec<usize>,
    dim: usize,
}

impl QuditRegister {
    /// Build the register, enumerating (or reusing) each qudit's basis
    pub fn new(anyons_per_qudit: &[usize], boundary: Boundary) -> Result<Self> {
        if anyons_per_qudit.is_empty() {
            return Err(AnyonError::NoAnyons.into());
        }
        let tables = anyons_per_qudit
            .iter()
            .map(|&n| basis_table(n, boundary))
            .collect::<fibq_core::Result<Vec<_>>>()?;

        let mut strides = Vec::with_capacity(tables.len());
        let mut offsets = Vec::with_capacity(tables.len());
        let (mut stride, mut offset) = (1usize, 0usize);
        for (table, &n) in tables.iter().zip(anyons_per_qudit) {
            strides.push(stride);
            offsets.push(offset);
            stride *= table.dim();
            offset += n;
        }

        Ok(Self {
            anyons: anyons_per_qudit.to_vec(),
            boundary,
            tables,
            strides,
            offsets,
            dim: stride,
        })
    }

    #[inline]
    pub fn num_qudits(&self) -> usize {
        self.anyons.len()
    }

    /// Dimension of the tensor-product space
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn anyons_per_qudit(&self) -> &[usize] {
        &self.anyons
    }

    pub fn total_anyons(&self) -> usize {
        self.anyons.iter().sum()
    }

    pub fn qudit_dims(&self) -> Vec<usize> {
        self.tables.iter().map(|t| t.dim()).collect()
    }

    pub fn table(&self, qudit: QuditId) -> Option<&Arc<BasisTable>> {
        self.tables.get(qudit.index())
    }

    pub fn stride(&self, qudit: QuditId) -> usize {
        self.strides[qudit.index()]
    }

    /// Qudit and 1-based local position of a 1-based global anyon index
    pub fn resolve(&self, anyon: usize) -> Result<(QuditId, usize)> {
        let total = self.total_anyons();
        if anyon == 0 || anyon > total {
            return Err(AnyonError::anyon_out_of_range(anyon, total).into());
        }
        let q = self
            .offsets
            .iter()
            .rposition(|&offset| offset < anyon)
            .unwrap_or(0);
        Ok((QuditId::new(q), anyon - self.offsets[q]))
    }

    /// Resolve both ends of a braid, requiring them to share a qudit
    pub fn resolve_pair(&self, a: usize, b: usize) -> Result<(QuditId, usize, usize)> {
        let (qa, la) = self.resolve(a)?;
        let (qb, lb) = self.resolve(b)?;
        if a == b {
            return Err(AnyonError::SameAnyon(a).into());
        }
        if qa != qb {
            return Err(AnyonError::CrossQuditBraid {
                first: a,
                second: b,
                first_qudit: qa,
                second_qudit: qb,
            }
            .into());
        }
        Ok((qa, la, lb))
    }

    /// Global anyon index of a qudit's 1-based local position
    pub fn global_anyon(&self, qudit: QuditId, local: usize) -> Result<usize> {
        let n = *self
            .anyons
            .get(qudit.index())
            .ok_or_else(|| StateError::IndexOutOfRange {
                index: qudit.index(),
                dimension: self.num_qudits(),
            })?;
        if local == 0 || local > n {
            return Err(AnyonError::anyon_out_of_range(local, n).into());
        }
        Ok(self.offsets[qudit.index()] + local)
    }

    /// Combined index of per-qudit basis indices
    pub fn encode(&self, locals: &[usize]) -> Result<usize> {
        if locals.len() != self.num_qudits() {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qudits(),
                actual: locals.len(),
            });
        }
        let mut index = 0;
        for ((&local, table), &stride) in locals.iter().zip(&self.tables).zip(&self.strides) {
            if local >= table.dim() {
                return Err(StateError::IndexOutOfRange {
                    index: local,
                    dimension: table.dim(),
                });
            }
            index += local * stride;
        }
        Ok(index)
    }

    /// Per-qudit basis indices of a combined index
    pub fn decode(&self, index: usize) -> Result<SmallVec<[usize; 4]>> {
        if index >= self.dim {
            return Err(StateError::IndexOutOfRange {
                index,
                dimension: self.dim,
            });
        }
        let mut rest = index;
        Ok(self
            .tables
            .iter()
            .map(|table| {
                let local = rest % table.dim();
                rest /= table.dim();
                local
            })
            .collect())
    }

    /// Fusion-tree labels of each qudit for a combined index
    pub fn labels(&self, index: usize) -> Result<Vec<BasisLabel>> {
        let locals = self.decode(index)?;
        Ok(locals
            .iter()
            .zip(&self.tables)
            .filter_map(|(&local, table)| table.label(local).cloned())
            .collect())
    }
}

//! Braiding engine: resolves anyons, fetches operators and evolves the state

use crate::error::{Result, StateError};
use crate::measurement::ProbabilityTable;
use crate::register::QuditRegister;
use crate::state_vector::QuditState;
use fibq_braid::{BraidMatrix, BraidOperatorBuilder, BraidSpace, FusionTransform};
use fibq_core::{AnyonError, BasisLabel, Boundary, BraidOp, FusedBasis, QuditId};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the qudits of a register are joined
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FusionLayout {
    /// Tensor product of per-qudit bases; braids stay inside one qudit
    #[default]
    Independent,
    /// One fusion tree over all qudits; any two anyons may be braided
    Fused,
}

/// Initial state of a register
#[derive(Clone, Debug, PartialEq)]
pub enum InitialState {
    /// One basis index per qudit
    Basis(Vec<usize>),
    /// A single combined basis index
    Index(usize),
    /// An explicit normalized amplitude vector
    Amplitudes(Vec<Complex64>),
}

/// Where an operator acts
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// One qudit's sub-block
    Local { qudit: QuditId, stride: usize },
    /// The whole fused space
    Global,
}

/// A validated braid with its operator, ready to apply
#[derive(Clone, Debug)]
pub struct PlannedBraid {
    pub op: BraidOp,
    pub target: Target,
    pub matrix: BraidMatrix,
}

/// Owns the live state of one register and applies braids to it
pub struct StateEngine {
    register: QuditRegister,
    layout: FusionLayout,
    fused: Option<Arc<FusionTransform>>,
    state: QuditState,
    builder: BraidOperatorBuilder,
}

impl StateEngine {
    /// Engine for the given qudit sizes, starting in basis state 0
    ///
    /// # Errors
    /// Basis errors for empty qudits or unreachable boundaries; the fused
    /// layout additionally requires [`Boundary::Free`].
    pub fn new(
        anyons_per_qudit: &[usize],
        boundary: Boundary,
        layout: FusionLayout,
        builder: BraidOperatorBuilder,
    ) -> Result<Self> {
        let register = QuditRegister::new(anyons_per_qudit, boundary)?;
        let fused = match layout {
            FusionLayout::Independent => None,
            FusionLayout::Fused => {
                if boundary != Boundary::Free {
                    return Err(AnyonError::UnsupportedBoundary(boundary).into());
                }
                Some(builder.fusion_transform(anyons_per_qudit)?)
            }
        };
        let dim = fused.as_ref().map_or(register.dim(), |t| t.dim());

        Ok(Self {
            register,
            layout,
            fused,
            state: QuditState::new(dim),
            builder,
        })
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.state = self.state.with_norm_tolerance(tolerance);
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.state = self.state.with_parallel_threshold(threshold);
        self
    }

    pub fn register(&self) -> &QuditRegister {
        &self.register
    }

    pub fn layout(&self) -> FusionLayout {
        self.layout
    }

    /// Fused basis, when the layout is [`FusionLayout::Fused`]
    pub fn fused_basis(&self) -> Option<&Arc<FusedBasis>> {
        self.fused.as_ref().map(|t| t.basis())
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.state.dim()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        self.state.amplitudes()
    }

    pub fn probability_table(&self) -> Result<ProbabilityTable> {
        ProbabilityTable::from_amplitudes(self.state.amplitudes())
    }

    /// Set the initial state; on error the state is unchanged
    ///
    /// In the fused layout a per-qudit basis tuple selects the first fused
    /// state with those local labels, i.e. the one with the lowest roots.
    pub fn initialize(&mut self, init: &InitialState) -> Result<()> {
        match init {
            InitialState::Index(index) => self.state.set_basis_state(*index),
            InitialState::Amplitudes(amplitudes) => self.state.set_amplitudes(amplitudes),
            InitialState::Basis(locals) => {
                let index = self.register.encode(locals)?;
                let index = match self.fused_basis() {
                    None => index,
                    Some(basis) => basis
                        .labels()
                        .iter()
                        .position(|label| label.locals.as_slice() == locals.as_slice())
                        .ok_or(StateError::IndexOutOfRange {
                            index,
                            dimension: basis.dim(),
                        })?,
                };
                self.state.set_basis_state(index)
            }
        }
    }

    /// Validate a braid of global anyons `a` and `b` and build its operator
    ///
    /// Nothing is applied; use this to check a whole sequence up front.
    pub fn plan(&self, a: usize, b: usize, power: i32) -> Result<PlannedBraid> {
        let op = BraidOp::new(a, b, power)?;
        let (target, matrix) = self.operator(&op)?;
        Ok(PlannedBraid { op, target, matrix })
    }

    /// Check that `a` and `b` name a braid this register can perform
    ///
    /// Same checks as [`plan`](Self::plan) without building the operator;
    /// used for zero powers, which apply nothing but must still name valid
    /// anyons.
    pub fn validate_braid(&self, a: usize, b: usize) -> Result<BraidOp> {
        let op = BraidOp::new(a, b, 0)?;
        let (first, second) = (op.first.get(), op.second.get());
        match self.fused {
            Some(_) => {
                self.register.resolve(first)?;
                self.register.resolve(second)?;
            }
            None => {
                self.register.resolve_pair(first, second)?;
            }
        }
        Ok(op)
    }

    /// Elementary generators `σ_1 .. σ_{n-1}` of every braid space
    ///
    /// One list per qudit in the independent layout (empty for a one-anyon
    /// qudit), a single list over all anyons in the fused layout.
    pub fn generators(&self) -> Result<Vec<Vec<Arc<BraidMatrix>>>> {
        let spaces: Vec<BraidSpace> = match &self.fused {
            Some(transform) => vec![BraidSpace::fused(transform.basis().anyons_per_qudit())],
            None => self
                .register
                .anyons_per_qudit()
                .iter()
                .map(|&n| BraidSpace::qudit(n, self.register.boundary()))
                .collect(),
        };
        spaces
            .iter()
            .map(|space| {
                (1..space.anyons())
                    .map(|pair| Ok(self.builder.elementary(space, pair)?))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    /// Operator and target of a logged braid
    pub fn operator(&self, op: &BraidOp) -> Result<(Target, BraidMatrix)> {
        let (first, second) = (op.first.get(), op.second.get());
        match &self.fused {
            Some(transform) => {
                let space = BraidSpace::fused(transform.basis().anyons_per_qudit());
                let matrix = self.builder.exchange_power(&space, first, second, op.power)?;
                Ok((Target::Global, matrix))
            }
            None => {
                let (qudit, s, t) = self.register.resolve_pair(first, second)?;
                let space = BraidSpace::qudit(
                    self.register.anyons_per_qudit()[qudit.index()],
                    self.register.boundary(),
                );
                let matrix = self.builder.exchange_power(&space, s, t, op.power)?;
                let stride = self.register.stride(qudit);
                Ok((Target::Local { qudit, stride }, matrix))
            }
        }
    }

    /// Apply a planned braid
    pub fn apply(&mut self, planned: &PlannedBraid) -> Result<()> {
        debug!(
            first = planned.op.first.get(),
            second = planned.op.second.get(),
            power = planned.op.power,
            "applying braid"
        );
        match planned.target {
            Target::Local { stride, .. } => self.state.apply_local(&planned.matrix, stride),
            Target::Global => self.state.apply_global(&planned.matrix),
        }
    }

    /// Braid global anyons `a` and `b`; `a < b` is the positive direction
    pub fn braid(&mut self, a: usize, b: usize, power: i32) -> Result<BraidOp> {
        let planned = self.plan(a, b, power)?;
        self.apply(&planned)?;
        Ok(planned.op)
    }

    /// Validate every `(position, power)` before applying any of them
    ///
    /// `position` names the global pair `(position, position + 1)`. Entries
    /// with power 0 are validated like the others but not applied.
    pub fn braid_sequence(&mut self, sequence: &[(usize, i32)]) -> Result<Vec<BraidOp>> {
        let mut planned = Vec::with_capacity(sequence.len());
        for &(position, power) in sequence {
            let next = position.checked_add(1).ok_or_else(|| {
                AnyonError::anyon_out_of_range(position, self.register.total_anyons())
            })?;
            if power == 0 {
                self.validate_braid(position, next)?;
            } else {
                planned.push(self.plan(position, next, power)?);
            }
        }
        for p in &planned {
            self.apply(p)?;
        }
        Ok(planned.into_iter().map(|p| p.op).collect())
    }

    /// Like [`braid_sequence`](Self::braid_sequence) with positions local to one qudit
    pub fn braid_sequence_on(
        &mut self,
        qudit: QuditId,
        sequence: &[(usize, i32)],
    ) -> Result<Vec<BraidOp>> {
        let n = self
            .register
            .anyons_per_qudit()
            .get(qudit.index())
            .copied()
            .ok_or(StateError::IndexOutOfRange {
                index: qudit.index(),
                dimension: self.register.num_qudits(),
            })?;
        let global = sequence
            .iter()
            .map(|&(position, power)| {
                if position == 0 || position >= n {
                    return Err(StateError::from(AnyonError::invalid_pair(position, n)));
                }
                Ok((self.register.global_anyon(qudit, position)?, power))
            })
            .collect::<Result<Vec<_>>>()?;
        self.braid_sequence(&global)
    }

    /// Per-qudit basis indices of an outcome label
    pub fn decode_outcome(&self, label: usize) -> Result<SmallVec<[usize; 4]>> {
        match self.fused_basis() {
            None => self.register.decode(label),
            Some(basis) => basis
                .label(label)
                .map(|l| l.locals.clone())
                .ok_or(StateError::IndexOutOfRange {
                    index: label,
                    dimension: basis.dim(),
                }),
        }
    }

    /// Fusion-tree label of every qudit for an outcome label
    pub fn outcome_labels(&self, label: usize) -> Result<Vec<BasisLabel>> {
        let locals = self.decode_outcome(label)?;
        Ok(locals
            .iter()
            .enumerate()
            .filter_map(|(q, &local)| {
                self.register
                    .table(QuditId::new(q))
                    .and_then(|table| table.label(local).cloned())
            })
            .collect())
    }
}

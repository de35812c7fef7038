//! Anyonic circuit: initialize, braid, measure, run

use crate::config::CircuitConfig;
use crate::error::{Result, SimulatorError};
use crate::result::RunResult;
use crate::statistics::ExecutionStatistics;
use fibq_braid::{BraidMatrix, BraidOperatorBuilder};
use fibq_core::{BasisLabel, BasisTable, BraidLog, FusedBasis, QuditId};
use fibq_state::{FusionLayout, InitialState, ProbabilityTable, Sampler, StateEngine, Target};
use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// A register of Fibonacci anyon qudits driven by braids
///
/// The circuit follows a fixed protocol: optionally [`initialize`], then any
/// number of braids, then [`measure`] once, then [`run`] as often as needed.
/// Measurement does not collapse the state; every run samples the same
/// distribution.
///
/// [`initialize`]: AnyonicCircuit::initialize
/// [`measure`]: AnyonicCircuit::measure
/// [`run`]: AnyonicCircuit::run
///
/// # Example
/// ```
/// use fibq_sim::{AnyonicCircuit, CircuitConfig, InitialState};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut circuit = AnyonicCircuit::new(CircuitConfig::new(1, 3)).unwrap();
/// circuit.initialize(InitialState::Index(2)).unwrap();
/// circuit.braid_sequence(&[(1, 2), (2, -2)]).unwrap();
/// circuit.measure().unwrap();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let result = circuit.run(100, &mut rng).unwrap();
/// assert_eq!(result.counts.values().sum::<usize>(), 100);
/// ```
pub struct AnyonicCircuit {
    config: CircuitConfig,
    engine: StateEngine,
    log: BraidLog,
    probabilities: Option<ProbabilityTable>,
    sampler: Sampler,
    statistics: ExecutionStatistics,
}

impl AnyonicCircuit {
    /// Build a circuit using the process-wide operator cache
    pub fn new(config: CircuitConfig) -> Result<Self> {
        Self::with_builder(config, BraidOperatorBuilder::new())
    }

    /// Build a circuit with an explicit operator builder
    pub fn with_builder(config: CircuitConfig, builder: BraidOperatorBuilder) -> Result<Self> {
        config.validate().map_err(SimulatorError::InvalidConfig)?;
        let start = Instant::now();

        let counts = config.anyon_counts();
        let engine = StateEngine::new(&counts, config.boundary, config.layout, builder)?
            .with_norm_tolerance(config.norm_tolerance)
            .with_parallel_threshold(config.parallel_threshold);

        info!(
            qudits = config.nb_qudits,
            anyons = ?counts,
            layout = ?config.layout,
            dim = engine.dim(),
            "created anyonic circuit"
        );

        let statistics = ExecutionStatistics {
            construction_time: start.elapsed(),
            state_dim: engine.dim(),
            ..Default::default()
        };

        Ok(Self {
            config,
            engine,
            log: BraidLog::new(),
            probabilities: None,
            sampler: Sampler::new(),
            statistics,
        })
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn nb_qudits(&self) -> usize {
        self.config.nb_qudits
    }

    pub fn layout(&self) -> FusionLayout {
        self.engine.layout()
    }

    /// Dimension of the state vector
    pub fn dim(&self) -> usize {
        self.engine.dim()
    }

    /// Dimension of each qudit's own basis
    pub fn qudit_dims(&self) -> Vec<usize> {
        self.engine.register().qudit_dims()
    }

    pub fn total_anyons(&self) -> usize {
        self.engine.register().total_anyons()
    }

    /// Fusion-tree basis of one qudit
    pub fn basis(&self, qudit: usize) -> Option<&Arc<BasisTable>> {
        self.engine.register().table(QuditId::new(qudit))
    }

    /// Joint basis in the fused layout
    pub fn fused_basis(&self) -> Option<&Arc<FusedBasis>> {
        self.engine.fused_basis()
    }

    /// Set the initial state
    ///
    /// Only allowed before the first braid and before measurement.
    pub fn initialize(&mut self, init: InitialState) -> Result<()> {
        if self.log.is_measured() {
            return Err(SimulatorError::AlreadyMeasured);
        }
        if self.log.braids().next().is_some() {
            return Err(SimulatorError::InitializeAfterBraid);
        }
        self.engine.initialize(&init)?;
        self.probabilities = None;
        Ok(())
    }

    /// Braid global anyons `a` and `b` once
    ///
    /// `a < b` moves `a` counter-clockwise around `b`; `a > b` is the inverse.
    pub fn braid(&mut self, a: usize, b: usize) -> Result<()> {
        self.braid_power(a, b, 1)
    }

    /// Braid global anyons `a` and `b` `power` times
    ///
    /// A zero power is validated like any other but applies and logs nothing.
    pub fn braid_power(&mut self, a: usize, b: usize, power: i32) -> Result<()> {
        self.ensure_not_measured()?;
        if power == 0 {
            self.engine.validate_braid(a, b)?;
            return Ok(());
        }
        let start = Instant::now();
        let op = self.engine.braid(a, b, power)?;
        self.log.push_braid(op);
        self.after_braids(1, start);
        Ok(())
    }

    /// Apply `(position, power)` braids on the global pairs `(position, position + 1)`
    ///
    /// The whole sequence is validated before anything is applied; zero
    /// powers are skipped.
    pub fn braid_sequence(&mut self, sequence: &[(usize, i32)]) -> Result<()> {
        self.ensure_not_measured()?;
        let start = Instant::now();
        let ops = self.engine.braid_sequence(sequence)?;
        let applied = ops.len();
        for op in ops {
            self.log.push_braid(op);
        }
        self.after_braids(applied, start);
        Ok(())
    }

    /// Like [`braid_sequence`](Self::braid_sequence) with positions local to one qudit
    pub fn braid_sequence_on(&mut self, qudit: usize, sequence: &[(usize, i32)]) -> Result<()> {
        self.ensure_not_measured()?;
        let start = Instant::now();
        let ops = self
            .engine
            .braid_sequence_on(QuditId::new(qudit), sequence)?;
        let applied = ops.len();
        for op in ops {
            self.log.push_braid(op);
        }
        self.after_braids(applied, start);
        Ok(())
    }

    /// Mark the circuit ready for sampling; the state is not modified
    pub fn measure(&mut self) -> Result<()> {
        self.ensure_not_measured()?;
        self.log.push_measure();
        Ok(())
    }

    pub fn is_measured(&self) -> bool {
        self.log.is_measured()
    }

    /// Sample `shots` outcomes with the given random source
    pub fn run<R: Rng + ?Sized>(&mut self, shots: usize, rng: &mut R) -> Result<RunResult> {
        if !self.log.is_measured() {
            return Err(SimulatorError::NotMeasured);
        }
        if shots == 0 {
            return Err(SimulatorError::InvalidArgument(
                "number of shots must be positive".to_string(),
            ));
        }

        let start = Instant::now();
        if self.probabilities.is_none() {
            self.probabilities = Some(self.engine.probability_table()?);
        }
        let table = match &self.probabilities {
            Some(table) => table,
            None => {
                return Err(SimulatorError::InvariantViolated(
                    "probability table missing after construction".to_string(),
                ))
            }
        };
        let sampling = self.sampler.run(table, shots, rng)?;

        self.statistics.sampling_time += start.elapsed();
        self.statistics.runs += 1;
        self.statistics.shots_drawn += shots;

        let result = RunResult::new(sampling);
        Ok(if self.config.collect_statistics {
            result.with_statistics(self.statistics.clone())
        } else {
            result
        })
    }

    /// [`run`](Self::run) with a ChaCha generator seeded from the configuration
    ///
    /// Without a configured seed the generator is seeded from the OS.
    pub fn run_seeded(&mut self, shots: usize) -> Result<RunResult> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run(shots, &mut rng)
    }

    /// Current amplitudes
    pub fn statevector(&self) -> &[Complex64] {
        self.engine.amplitudes()
    }

    /// Accumulated unitary of every braid so far
    ///
    /// One matrix per qudit in the independent layout, a single matrix on
    /// the whole space in the fused layout.
    pub fn unitary(&self) -> Result<Vec<BraidMatrix>> {
        let mut unitaries: Vec<BraidMatrix> = match self.engine.fused_basis() {
            Some(basis) => vec![BraidMatrix::identity(basis.dim())],
            None => self
                .qudit_dims()
                .into_iter()
                .map(BraidMatrix::identity)
                .collect(),
        };

        for op in self.log.braids() {
            let (target, matrix) = self.engine.operator(op)?;
            let slot = match target {
                Target::Local { qudit, .. } => qudit.index(),
                Target::Global => 0,
            };
            unitaries[slot] = matrix.matmul(&unitaries[slot]);
        }
        Ok(unitaries)
    }

    /// The ordered braid/measurement log
    pub fn history(&self) -> &BraidLog {
        &self.log
    }

    /// One σ factor per braid in application order, e.g. `["σ1", "σ2^-1"]`
    pub fn history_sigmas(&self) -> Vec<String> {
        self.log.sigmas()
    }

    /// Elementary braid generators, one list per braid space
    ///
    /// Independent layout: `σ_1 .. σ_{n_q - 1}` of each qudit `q`. Fused
    /// layout: a single list over all anyons.
    pub fn braiding_operators(&self) -> Result<Vec<Vec<Arc<BraidMatrix>>>> {
        Ok(self.engine.generators()?)
    }

    /// Per-qudit basis indices of an outcome label
    pub fn decode_outcome(&self, label: usize) -> Result<Vec<usize>> {
        Ok(self.engine.decode_outcome(label)?.into_vec())
    }

    /// Fusion-tree label of every qudit for an outcome label
    pub fn outcome_labels(&self, label: usize) -> Result<Vec<BasisLabel>> {
        Ok(self.engine.outcome_labels(label)?)
    }

    /// Statistics collected so far, if enabled
    pub fn statistics(&self) -> Option<&ExecutionStatistics> {
        self.config.collect_statistics.then_some(&self.statistics)
    }

    fn ensure_not_measured(&self) -> Result<()> {
        if self.log.is_measured() {
            Err(SimulatorError::AlreadyMeasured)
        } else {
            Ok(())
        }
    }

    fn after_braids(&mut self, applied: usize, start: Instant) {
        self.probabilities = None;
        self.statistics.braids_applied += applied;
        self.statistics.braid_time += start.elapsed();
    }
}

//! Error types for the circuit front end

use fibq_core::AnyonError;
use fibq_state::StateError;
use std::fmt;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur while building, braiding or sampling a circuit
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorError {
    /// Invalid configuration
    InvalidConfig(String),

    /// Basis construction failed (no anyons, unreachable total charge)
    InvalidBasis(String),

    /// Braid names anyons that are out of range or in different qudits
    InvalidBraid(String),

    /// Initial state index or vector rejected
    InvalidState(String),

    /// Bad call argument, such as a zero shot count
    InvalidArgument(String),

    /// A computed operator or state broke a mathematical invariant
    InvariantViolated(String),

    /// The circuit has already been measured
    AlreadyMeasured,

    /// `run` was called before `measure`
    NotMeasured,

    /// Initialization after the first braid
    InitializeAfterBraid,
}

impl SimulatorError {
    /// True for internal defects rather than caller errors
    pub fn is_internal(&self) -> bool {
        matches!(self, SimulatorError::InvariantViolated(_))
    }
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::InvalidConfig(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            SimulatorError::InvalidBasis(msg) => write!(f, "Invalid basis: {}", msg),
            SimulatorError::InvalidBraid(msg) => write!(f, "Invalid braid: {}", msg),
            SimulatorError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            SimulatorError::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {}", msg)
            }
            SimulatorError::InvariantViolated(msg) => {
                write!(f, "Internal invariant violated: {}", msg)
            }
            SimulatorError::AlreadyMeasured => {
                write!(f, "Circuit has already been measured")
            }
            SimulatorError::NotMeasured => {
                write!(f, "Circuit must be measured before it can be run")
            }
            SimulatorError::InitializeAfterBraid => {
                write!(f, "Circuit can only be initialized before the first braid")
            }
        }
    }
}

impl std::error::Error for SimulatorError {}

impl From<AnyonError> for SimulatorError {
    fn from(err: AnyonError) -> Self {
        let msg = err.to_string();
        if err.is_basis_error() {
            SimulatorError::InvalidBasis(msg)
        } else if err.is_braid_error() {
            SimulatorError::InvalidBraid(msg)
        } else {
            SimulatorError::InvariantViolated(msg)
        }
    }
}

impl From<StateError> for SimulatorError {
    fn from(err: StateError) -> Self {
        match &err {
            StateError::Anyon(inner) => inner.clone().into(),
            StateError::InvalidShots { .. } => SimulatorError::InvalidArgument(err.to_string()),
            StateError::NormDrift { .. } => SimulatorError::InvariantViolated(err.to_string()),
            StateError::IndexOutOfRange { .. }
            | StateError::DimensionMismatch { .. }
            | StateError::NotNormalized { .. } => SimulatorError::InvalidState(err.to_string()),
        }
    }
}

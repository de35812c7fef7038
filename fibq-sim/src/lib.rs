//! Fibonacci anyon circuit simulator
//!
//! `fibq-sim` is the user-facing layer: it owns a register of anyonic
//! qudits, records braids and measurement, and samples outcome labels.
//!
//! # Quick start
//!
//! ```
//! use fibq_sim::{AnyonicCircuit, CircuitConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // Two qudits of three anyons, braided one qudit at a time
//! let mut circuit = AnyonicCircuit::new(CircuitConfig::new(2, 3)).unwrap();
//! circuit.braid(1, 2).unwrap();
//! circuit.braid(5, 4).unwrap();
//! circuit.measure().unwrap();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let result = circuit.run(50, &mut rng).unwrap();
//! assert!(result.labels().all(|label| label < circuit.dim()));
//! ```
//!
//! # Layouts
//!
//! With [`FusionLayout::Independent`] each qudit keeps its own fusion tree
//! and braids between anyons of different qudits are rejected. With
//! [`FusionLayout::Fused`] the qudits share one tree, so any pair of anyons
//! can be exchanged at the cost of a larger state.

pub mod circuit;
pub mod config;
pub mod error;
pub mod result;
pub mod statistics;

pub use circuit::AnyonicCircuit;
pub use config::{AnyonCounts, CircuitConfig};
pub use error::{Result, SimulatorError};
pub use result::RunResult;
pub use statistics::ExecutionStatistics;

pub use fibq_braid::BraidMatrix;
pub use fibq_core::{BasisLabel, Boundary, BraidLog, BraidOp, Charge, CircuitOp, QuditId};
pub use fibq_state::{FusionLayout, InitialState};

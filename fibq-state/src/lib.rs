//! Anyonic register states and measurement sampling
//!
//! This crate owns the live state of a register of Fibonacci anyon qudits:
//! - [`QuditRegister`]: per-qudit dimensions and mixed-radix index arithmetic
//! - [`QuditState`]: the flat amplitude vector, updated by qudit-local or
//!   global operators without materializing Kronecker products
//! - [`StateEngine`]: resolves global anyon indices and applies braids
//! - [`Sampler`]: draws shots from the squared amplitudes
//!
//! # Example
//!
//! ```
//! use fibq_braid::BraidOperatorBuilder;
//! use fibq_core::Boundary;
//! use fibq_state::{FusionLayout, InitialState, StateEngine};
//!
//! let mut engine = StateEngine::new(
//!     &[3, 3],
//!     Boundary::Free,
//!     FusionLayout::Independent,
//!     BraidOperatorBuilder::new(),
//! )
//! .unwrap();
//! engine.initialize(&InitialState::Basis(vec![2, 0])).unwrap();
//! engine.braid(1, 2, 1).unwrap();
//! assert_eq!(engine.dim(), 9);
//! ```

pub mod engine;
pub mod error;
pub mod measurement;
pub mod register;
pub mod state_vector;
pub mod validation;

pub use engine::{FusionLayout, InitialState, PlannedBraid, StateEngine, Target};
pub use error::{Result, StateError};
pub use measurement::{ProbabilityTable, Sampler, SamplingResult};
pub use register::QuditRegister;
pub use state_vector::{QuditState, DEFAULT_PARALLEL_THRESHOLD};
pub use validation::DEFAULT_NORM_TOLERANCE;

//! Core types for Fibonacci anyon simulation
//!
//! This crate holds the algebraic ground truth the rest of the workspace builds on:
//! - [`Charge`]: topological charges of the Fibonacci model (vacuum and τ) and their fusion rules
//! - [`BasisEnumerator`] / [`BasisTable`]: fusion-tree bases of a single qudit
//! - [`FusedBasis`]: the joint basis when all qudits hang off one fusion tree
//! - [`recoupling`]: R- and F-symbols and the exchange amplitudes built from them
//! - [`BraidLog`]: the ordered braid/measurement record of a circuit
//!
//! # Example
//! ```
//! use fibq_core::{BasisEnumerator, Boundary, Charge};
//!
//! let table = BasisEnumerator::enumerate(3, Boundary::Free).unwrap();
//! assert_eq!(table.dim(), 3);
//! assert_eq!(table.label(0).unwrap().total(), Charge::Tau);
//! ```

pub mod anyon;
pub mod basis;
pub mod charge;
pub mod circuit;
pub mod error;
pub mod fused;
pub mod recoupling;

// Re-exports for convenience
pub use anyon::{AnyonId, QuditId};
pub use basis::{basis_dimension, basis_table, BasisEnumerator, BasisLabel, BasisTable, Boundary};
pub use charge::Charge;
pub use circuit::{BraidLog, BraidOp, CircuitOp};
pub use error::AnyonError;
pub use fused::{FusedBasis, FusedLabel};
pub use num_complex::Complex64;
pub use recoupling::{f_symbol, r_symbol, recouple, Recoupling, PHI};

/// Type alias for results in fibq
pub type Result<T> = std::result::Result<T, AnyonError>;

//! Ordered record of braids and measurement
//!
//! The log is what a diagram renderer consumes: it never sees amplitudes,
//! only which anyons were exchanged, in which direction, and whether the
//! circuit has been measured.

use crate::{AnyonError, AnyonId, Result};
use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One braid between two anyons
///
/// Stored with `first < second`; `power > 0` passes `first` counter-clockwise
/// around `second`, negative powers go the other way. The power is widened
/// to `i64` so that flipping the orientation of any `i32` power is exact.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BraidOp {
    pub first: AnyonId,
    pub second: AnyonId,
    pub power: i64,
}

impl BraidOp {
    /// Braid `a` with `b` `power` times, normalising the orientation
    ///
    /// ```
    /// use fibq_core::BraidOp;
    /// let op = BraidOp::new(2, 1, 1).unwrap();
    /// assert_eq!((op.first.get(), op.second.get(), op.power), (1, 2, -1));
    /// ```
    pub fn new(a: usize, b: usize, power: i32) -> Result<Self> {
        if a == b {
            return Err(AnyonError::SameAnyon(a));
        }
        let power = i64::from(power);
        let (first, second, power) = if a < b {
            (a, b, power)
        } else {
            (b, a, -power)
        };
        Ok(Self {
            first: AnyonId::new(first),
            second: AnyonId::new(second),
            power,
        })
    }

    /// Whether the two anyons are neighbours
    #[inline]
    pub fn is_adjacent(&self) -> bool {
        self.second.get() == self.first.get() + 1
    }

    /// Inverse braid
    ///
    /// Exact for every op built by [`BraidOp::new`]; a hand-written
    /// `i64::MIN` power saturates.
    pub fn inverse(&self) -> Self {
        Self {
            power: self.power.saturating_neg(),
            ..*self
        }
    }

    fn sigma(&self) -> String {
        match self.power {
            1 => format!("σ{}", self.generator()),
            p => format!("σ{}^{}", self.generator(), p),
        }
    }

    fn generator(&self) -> String {
        if self.is_adjacent() {
            self.first.get().to_string()
        } else {
            format!("{},{}", self.first.get(), self.second.get())
        }
    }
}

/// Entry of the circuit log
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CircuitOp {
    Braid(BraidOp),
    Measure,
}

/// Ordered braid/measurement log of one circuit
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BraidLog {
    ops: Vec<CircuitOp>,
}

impl BraidLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a braid
    pub fn push_braid(&mut self, op: BraidOp) {
        self.ops.push(CircuitOp::Braid(op));
    }

    /// Append the measurement event
    pub fn push_measure(&mut self) {
        self.ops.push(CircuitOp::Measure);
    }

    pub fn is_measured(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, CircuitOp::Measure))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[CircuitOp] {
        &self.ops
    }

    /// Braids only, in application order
    pub fn braids(&self) -> impl Iterator<Item = &BraidOp> {
        self.ops.iter().filter_map(|op| match op {
            CircuitOp::Braid(b) => Some(b),
            CircuitOp::Measure => None,
        })
    }

    /// Braid word with runs on the same pair merged into one power
    ///
    /// A merge that would overflow starts a new factor instead.
    pub fn word(&self) -> Vec<BraidOp> {
        let mut word: Vec<BraidOp> = Vec::new();
        for op in self.braids() {
            let merged = match word.last() {
                Some(last) if last.first == op.first && last.second == op.second => {
                    last.power.checked_add(op.power)
                }
                _ => None,
            };
            match merged {
                Some(0) => {
                    word.pop();
                }
                Some(power) => {
                    if let Some(last) = word.last_mut() {
                        last.power = power;
                    }
                }
                None => word.push(*op),
            }
        }
        word
    }

    /// One σ factor per logged braid, in application order, unmerged
    ///
    /// `["σ1", "σ2^-1", "σ1,3^2"]`
    pub fn sigmas(&self) -> Vec<String> {
        self.braids().map(BraidOp::sigma).collect()
    }

    /// Braid word in σ notation, e.g. `σ1^2 σ2^-1`
    pub fn sigma_notation(&self) -> String {
        self.word()
            .iter()
            .map(BraidOp::sigma)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Braid word as a LaTeX operator product
    ///
    /// Factors are written in product order: the last braid applied is the
    /// leftmost factor, and a measurement, if logged, precedes them all.
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        if self.is_measured() {
            out.push_str("\\mathcal{M}\\,");
        }
        for op in self.word().iter().rev() {
            let _ = write!(out, "\\sigma_{{{}}}", op.generator());
            if op.power != 1 {
                let _ = write!(out, "^{{{}}}", op.power);
            }
        }
        out
    }
}

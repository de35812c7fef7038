//! Fibonacci R- and F-symbols and the exchange of two neighbouring anyons
//!
//! All values are closed-form in the golden ratio `φ = (1+√5)/2`.
//!
//! Exchanging anyons `i` and `i+1` (1-based) of a left-to-right fusion tree
//! with intermediate charges `c` only touches the local subtree
//!
//! ```text
//!   left = c[i-2]   τ (anyon i)   τ (anyon i+1)
//!        \_________/             /
//!          middle = c[i-1]      /
//!               \______________/
//!                 total = c[i]
//! ```
//!
//! An F-move re-associates it so that the two anyons fuse first into a channel
//! `f`, the R-symbol multiplies that channel by its exchange phase, and the
//! inverse F-move restores the canonical shape:
//!
//! `B[a][b] = Σ_f F(a, f) · R_f · F(b, f)`
//!
//! For the first pair the left charge is the vacuum, the F-move is trivial and
//! the exchange reduces to the phase `R_{c[1]}`.

use crate::{AnyonError, Charge, Result};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::f64::consts::PI;

/// The golden ratio
pub const PHI: f64 = 1.618_033_988_749_895;

/// Exchange phase of two τ anyons fusing into `channel`
///
/// `R_1 = e^{-4πi/5}`, `R_τ = e^{3πi/5}`.
pub fn r_symbol(channel: Charge) -> Complex64 {
    match channel {
        Charge::Vacuum => Complex64::from_polar(1.0, -4.0 * PI / 5.0),
        Charge::Tau => Complex64::from_polar(1.0, 3.0 * PI / 5.0),
    }
}

/// `F^{τττ}_τ`, rows indexed by the left channel, columns by the right one
pub fn f_matrix() -> [[f64; 2]; 2] {
    let inv_phi = 1.0 / PHI;
    let inv_sqrt_phi = inv_phi.sqrt();
    [[inv_phi, inv_sqrt_phi], [inv_sqrt_phi, -inv_phi]]
}

/// General F-symbol `((a b)_e c)_d → (a (b c)_f)_d`
///
/// Zero unless every vertex of both trees is allowed by the fusion rules.
/// Only `F^{τττ}_τ` is non-trivial; every other allowed symbol is 1.
pub fn f_symbol(a: Charge, b: Charge, c: Charge, d: Charge, e: Charge, f: Charge) -> f64 {
    let admissible = a.can_fuse_to(b, e)
        && e.can_fuse_to(c, d)
        && b.can_fuse_to(c, f)
        && a.can_fuse_to(f, d);
    if !admissible {
        return 0.0;
    }
    if [a, b, c, d].iter().all(|&x| x == Charge::Tau) {
        f_matrix()[e.index()][f.index()]
    } else {
        1.0
    }
}

/// Local recoupling data for one basis label and one neighbouring pair
#[derive(Debug, Clone, PartialEq)]
pub struct Recoupling {
    /// 1-based position of the pair `(pair, pair+1)`
    pub pair: usize,
    /// Charge of everything left of the pair (vacuum for the first pair)
    pub left: Charge,
    /// Current intermediate charge between the two anyons
    pub middle: Charge,
    /// Charge after both anyons are fused in
    pub total: Charge,
    /// F-move `F^{left τ τ}_{total}`, rows by middle charge, columns by pair channel
    pub transform: [[f64; 2]; 2],
}

impl Recoupling {
    /// The pair's fusion channels in the re-associated tree, with their weights
    ///
    /// This is the row of the F-move for the current middle charge: the
    /// grouping in which the pair are siblings.
    pub fn channels(&self) -> SmallVec<[(Charge, f64); 2]> {
        Charge::ALL
            .iter()
            .map(|&f| (f, self.transform[self.middle.index()][f.index()]))
            .filter(|&(_, w)| w != 0.0)
            .collect()
    }

    /// Image of this label under the exchange: `(new middle charge, amplitude)`
    pub fn exchange(&self) -> SmallVec<[(Charge, Complex64); 2]> {
        let a = self.middle.index();
        Charge::ALL
            .iter()
            .filter_map(|&b| {
                let amplitude: Complex64 = Charge::ALL
                    .iter()
                    .map(|&f| {
                        r_symbol(f) * self.transform[a][f.index()] * self.transform[b.index()][f.index()]
                    })
                    .sum();
                (amplitude.norm_sqr() > 1e-30).then_some((b, amplitude))
            })
            .collect()
    }
}

/// Recoupling data for exchanging anyons `pair` and `pair + 1` of `label`
///
/// # Errors
/// [`AnyonError::InvalidPair`] when `pair` is not in `1..label.len()`.
pub fn recouple(label: &[Charge], pair: usize) -> Result<Recoupling> {
    if pair == 0 || pair >= label.len() {
        return Err(AnyonError::invalid_pair(pair, label.len()));
    }
    let left = if pair >= 2 {
        label[pair - 2]
    } else {
        Charge::Vacuum
    };
    let middle = label[pair - 1];
    let total = label[pair];

    let mut transform = [[0.0; 2]; 2];
    for e in Charge::ALL {
        for f in Charge::ALL {
            transform[e.index()][f.index()] =
                f_symbol(left, Charge::Tau, Charge::Tau, total, e, f);
        }
    }

    Ok(Recoupling {
        pair,
        left,
        middle,
        total,
        transform,
    })
}

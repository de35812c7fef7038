//! Dense complex matrices for braid operators
//!
//! Matrices are square and stored row-major in a flat `Vec<Complex64>`, so
//! entry `(r, c)` of a `d × d` matrix lives at `r * d + c`. Column `c` is the
//! image of basis state `c`.

use num_complex::Complex64;
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Above this dimension products are split across rows in parallel
#[cfg(feature = "parallel")]
const PARALLEL_DIM: usize = 64;

/// Square complex matrix acting on a fusion space
#[derive(Clone, PartialEq)]
pub struct BraidMatrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl BraidMatrix {
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![ZERO; dim * dim],
        }
    }

    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.data[i * dim + i] = ONE;
        }
        m
    }

    /// Wrap row-major data; `None` if it is not `dim × dim`
    pub fn from_row_major(dim: usize, data: Vec<Complex64>) -> Option<Self> {
        (data.len() == dim * dim).then_some(Self { dim, data })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.dim + col] = value;
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[Complex64] {
        &self.data[row * self.dim..(row + 1) * self.dim]
    }

    /// Matrix product `self · other`
    ///
    /// # Panics
    /// Panics if the dimensions differ.
    pub fn matmul(&self, other: &BraidMatrix) -> BraidMatrix {
        assert_eq!(self.dim, other.dim, "Matrix dimensions must match");
        let n = self.dim;
        let mut out = vec![ZERO; n * n];

        let fill_row = |r: usize, out_row: &mut [Complex64]| {
            for k in 0..n {
                let a = self.data[r * n + k];
                if a == ZERO {
                    continue;
                }
                for (c, slot) in out_row.iter_mut().enumerate() {
                    *slot += a * other.data[k * n + c];
                }
            }
        };

        #[cfg(feature = "parallel")]
        if n >= PARALLEL_DIM {
            out.par_chunks_mut(n)
                .enumerate()
                .for_each(|(r, row)| fill_row(r, row));
            return BraidMatrix { dim: n, data: out };
        }

        for (r, row) in out.chunks_mut(n.max(1)).enumerate() {
            fill_row(r, row);
        }
        BraidMatrix { dim: n, data: out }
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> BraidMatrix {
        let n = self.dim;
        let mut out = Self::zeros(n);
        for r in 0..n {
            for c in 0..n {
                out.data[c * n + r] = self.data[r * n + c].conj();
            }
        }
        out
    }

    /// Integer power; negative exponents use the adjoint
    ///
    /// Only meaningful for unitary matrices when `exp < 0`.
    pub fn pow(&self, exp: i64) -> BraidMatrix {
        let mut base = if exp < 0 { self.adjoint() } else { self.clone() };
        let mut k = exp.unsigned_abs();
        let mut acc = Self::identity(self.dim);
        while k > 0 {
            if k & 1 == 1 {
                acc = acc.matmul(&base);
            }
            k >>= 1;
            if k > 0 {
                base = base.matmul(&base);
            }
        }
        acc
    }

    /// Largest entry of `|U†U - I|`
    pub fn unitarity_deviation(&self) -> f64 {
        let n = self.dim;
        let mut worst = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                let mut sum = ZERO;
                for k in 0..n {
                    sum += self.data[k * n + i].conj() * self.data[k * n + j];
                }
                let expected = if i == j { ONE } else { ZERO };
                worst = worst.max((sum - expected).norm());
            }
        }
        worst
    }

    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// Largest entry-wise distance to another matrix
    pub fn max_abs_diff(&self, other: &BraidMatrix) -> f64 {
        if self.dim != other.dim {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Matrix-vector product into `out`
    ///
    /// # Panics
    /// Panics if either slice is not of length `dim`.
    pub fn apply_into(&self, input: &[Complex64], out: &mut [Complex64]) {
        assert_eq!(input.len(), self.dim, "Input vector dimension mismatch");
        assert_eq!(out.len(), self.dim, "Output vector dimension mismatch");
        for (r, slot) in out.iter_mut().enumerate() {
            *slot = self
                .row(r)
                .iter()
                .zip(input)
                .map(|(a, x)| a * x)
                .sum();
        }
    }

    /// Matrix-vector product
    pub fn apply(&self, input: &[Complex64]) -> Vec<Complex64> {
        let mut out = vec![ZERO; self.dim];
        self.apply_into(input, &mut out);
        out
    }
}

impl fmt::Debug for BraidMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BraidMatrix({}x{}) [", self.dim, self.dim)?;
        for r in 0..self.dim {
            write!(f, "  ")?;
            for c in 0..self.dim {
                let z = self.get(r, c);
                write!(f, "{:+.4}{:+.4}i ", z.re, z.im)?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

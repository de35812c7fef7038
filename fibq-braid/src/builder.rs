//! Synthesis of unitary braid operators

use crate::cache::{BraidCache, OperatorKey};
use crate::fused::FusionTransform;
use crate::matrix::BraidMatrix;
use crate::BraidSpace;
use fibq_core::{basis_table, recouple, AnyonError, BasisTable, Boundary, Result};
use std::sync::Arc;
use tracing::debug;

/// Default tolerance of the unitarity check on built operators
pub const DEFAULT_UNITARITY_TOLERANCE: f64 = 1e-10;

/// Order of every exchange operator
///
/// Each exchange is conjugate to a diagonal of R phases `e^{-4πi/5}` and
/// `e^{3πi/5}`, both tenth roots of unity, so `σ^10 = I`.
pub const EXCHANGE_ORDER: i64 = 10;

/// Smallest-magnitude exponent equivalent to `power` modulo [`EXCHANGE_ORDER`]
#[inline]
pub fn reduce_power(power: i64) -> i64 {
    let r = power.rem_euclid(EXCHANGE_ORDER);
    if r > EXCHANGE_ORDER / 2 {
        r - EXCHANGE_ORDER
    } else {
        r
    }
}

/// Builds and caches braid operators for a fusion space
///
/// # Example
/// ```
/// use fibq_braid::{BraidOperatorBuilder, BraidSpace};
/// use fibq_core::Boundary;
///
/// let builder = BraidOperatorBuilder::new();
/// let space = BraidSpace::qudit(3, Boundary::Free);
/// let sigma = builder.build(&space, 2, 1).unwrap();
/// assert_eq!(sigma.dim(), 3);
/// assert!(sigma.is_unitary(1e-10));
/// ```
#[derive(Clone)]
pub struct BraidOperatorBuilder {
    cache: Arc<BraidCache>,
    tolerance: f64,
}

impl BraidOperatorBuilder {
    /// Builder backed by the process-wide cache
    pub fn new() -> Self {
        Self::with_cache(BraidCache::global())
    }

    /// Builder backed by a private cache
    pub fn with_cache(cache: Arc<BraidCache>) -> Self {
        Self {
            cache,
            tolerance: DEFAULT_UNITARITY_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn cache(&self) -> &Arc<BraidCache> {
        &self.cache
    }

    /// The elementary generator `σ_pair` exchanging positions `pair` and `pair + 1`
    pub fn elementary(&self, space: &BraidSpace, pair: usize) -> Result<Arc<BraidMatrix>> {
        let anyons = space.anyons();
        if pair == 0 || pair >= anyons {
            return Err(AnyonError::invalid_pair(pair, anyons));
        }

        let key = OperatorKey::elementary(space, pair);
        if let Some(op) = self.cache.get(&key) {
            return Ok(op);
        }

        let op = match space {
            BraidSpace::Qudit { anyons, boundary } => {
                let table = basis_table(*anyons, *boundary)?;
                chain_generator(&table, pair)?
            }
            BraidSpace::Fused { anyons_per_qudit } => {
                let transform = self.fusion_transform(anyons_per_qudit)?;
                let chain = self.elementary(&BraidSpace::qudit(anyons, Boundary::Free), pair)?;
                transform.conjugate(&chain)
            }
        };

        self.check_unitary(&op, || format!("σ{pair} on {space}"))?;
        debug!(%space, pair, dim = op.dim(), "cached elementary braid");
        Ok(self.cache.insert(key, op))
    }

    /// `σ_pair^power`; power 0 is the identity, negative powers use `σ†`
    pub fn build(&self, space: &BraidSpace, pair: usize, power: i32) -> Result<BraidMatrix> {
        let sigma = self.elementary(space, pair)?;
        if power == 0 {
            return Ok(BraidMatrix::identity(sigma.dim()));
        }
        Ok(sigma.pow(reduce_power(i64::from(power))))
    }

    /// Exchange of positions `a` and `b` (1-based), `a < b` positive
    ///
    /// Neighbours use the elementary generator. For `s < t` further apart
    /// the band generator `W σ_s W†` with `W = σ_{t-1} ⋯ σ_{s+1}` carries
    /// anyon `s` past everything in between, so the recoupling depth grows
    /// with `t - s`.
    pub fn exchange(&self, space: &BraidSpace, a: usize, b: usize) -> Result<Arc<BraidMatrix>> {
        let anyons = space.anyons();
        for position in [a, b] {
            if position == 0 || position > anyons {
                return Err(AnyonError::anyon_out_of_range(position, anyons));
            }
        }
        if a == b {
            return Err(AnyonError::SameAnyon(a));
        }

        let (s, t) = (a.min(b), a.max(b));
        let forward = if t == s + 1 {
            self.elementary(space, s)?
        } else {
            let key = OperatorKey {
                space: space.clone(),
                first: s,
                second: t,
            };
            match self.cache.get(&key) {
                Some(op) => op,
                None => {
                    let sigma_s = self.elementary(space, s)?;
                    let mut w = BraidMatrix::identity(sigma_s.dim());
                    for k in (s + 1..t).rev() {
                        let sigma_k = self.elementary(space, k)?;
                        w = w.matmul(&sigma_k);
                    }
                    let band = w.matmul(&sigma_s).matmul(&w.adjoint());
                    self.check_unitary(&band, || format!("band ({s},{t}) on {space}"))?;
                    self.cache.insert(key, band)
                }
            }
        };

        if a < b {
            Ok(forward)
        } else {
            Ok(Arc::new(forward.adjoint()))
        }
    }

    /// Exchange of `a` and `b` repeated `power` times
    ///
    /// The power is reduced modulo [`EXCHANGE_ORDER`] first, so any `i64`
    /// costs at most a handful of products.
    pub fn exchange_power(
        &self,
        space: &BraidSpace,
        a: usize,
        b: usize,
        power: i64,
    ) -> Result<BraidMatrix> {
        let op = self.exchange(space, a, b)?;
        Ok(op.pow(reduce_power(power)))
    }

    /// Shared chain-to-fused transform for the given qudit sizes
    pub fn fusion_transform(&self, anyons_per_qudit: &[usize]) -> Result<Arc<FusionTransform>> {
        if let Some(t) = self.cache.transform(anyons_per_qudit) {
            return Ok(t);
        }
        let transform = FusionTransform::new(anyons_per_qudit)?;
        Ok(self.cache.insert_transform(transform))
    }

    fn check_unitary(&self, op: &BraidMatrix, context: impl FnOnce() -> String) -> Result<()> {
        let deviation = op.unitarity_deviation();
        if deviation > self.tolerance {
            return Err(AnyonError::NotUnitary {
                context: context(),
                deviation,
            });
        }
        Ok(())
    }
}

impl Default for BraidOperatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `σ_pair` on one left-to-right fusion chain, assembled column by column
fn chain_generator(table: &BasisTable, pair: usize) -> Result<BraidMatrix> {
    let mut op = BraidMatrix::zeros(table.dim());
    for (col, label) in table.iter() {
        for (middle, amplitude) in recouple(label, pair)?.exchange() {
            let image = label.with_charge(pair - 1, middle);
            let row = table.require_index(&image)?;
            op.set(row, col, amplitude);
        }
    }
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibq_core::{r_symbol, Charge};

    fn builder() -> BraidOperatorBuilder {
        BraidOperatorBuilder::with_cache(Arc::new(BraidCache::new()))
    }

    #[test]
    fn test_first_generator_is_diagonal_phase() {
        let b = builder();
        let space = BraidSpace::qudit(3, Boundary::Free);
        let sigma = b.elementary(&space, 1).unwrap();
        // [τ,1,τ], [τ,τ,1], [τ,τ,τ]: phases set by the second charge
        let expected = [r_symbol(Charge::Vacuum), r_symbol(Charge::Tau), r_symbol(Charge::Tau)];
        for (i, e) in expected.iter().enumerate() {
            assert!((sigma.get(i, i) - e).norm() < 1e-14);
            for j in 0..3 {
                if j != i {
                    assert_eq!(sigma.get(i, j).norm(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_power_zero_is_identity() {
        let b = builder();
        let space = BraidSpace::qudit(4, Boundary::Free);
        let id = b.build(&space, 2, 0).unwrap();
        assert!(id.max_abs_diff(&BraidMatrix::identity(5)) < 1e-15);
    }

    #[test]
    fn test_negative_power_inverts() {
        let b = builder();
        let space = BraidSpace::qudit(4, Boundary::Free);
        let forward = b.build(&space, 2, 3).unwrap();
        let backward = b.build(&space, 2, -3).unwrap();
        let id = forward.matmul(&backward);
        assert!(id.max_abs_diff(&BraidMatrix::identity(5)) < 1e-12);
    }

    #[test]
    fn test_cache_reuse() {
        let b = builder();
        let space = BraidSpace::qudit(5, Boundary::Free);
        let first = b.elementary(&space, 3).unwrap();
        let second = b.elementary(&space, 3).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(b.cache().hits(), 1);
    }

    #[test]
    fn test_invalid_pairs() {
        let b = builder();
        let space = BraidSpace::qudit(3, Boundary::Free);
        assert!(matches!(
            b.elementary(&space, 0),
            Err(AnyonError::InvalidPair { .. })
        ));
        assert!(matches!(
            b.elementary(&space, 3),
            Err(AnyonError::InvalidPair { position: 3, anyons: 3 })
        ));
        assert!(matches!(
            b.exchange(&space, 1, 4),
            Err(AnyonError::AnyonOutOfRange { anyon: 4, total: 3 })
        ));
        assert_eq!(b.exchange(&space, 2, 2).unwrap_err(), AnyonError::SameAnyon(2));
    }

    #[test]
    fn test_reverse_exchange_is_inverse() {
        let b = builder();
        let space = BraidSpace::qudit(4, Boundary::Free);
        let forward = b.exchange(&space, 2, 3).unwrap();
        let backward = b.exchange(&space, 3, 2).unwrap();
        let id = forward.matmul(&backward);
        assert!(id.max_abs_diff(&BraidMatrix::identity(5)) < 1e-12);
    }

    #[test]
    fn test_band_generator_next_nearest() {
        // σ_{1,3} = σ2 σ1 σ2⁻¹ = σ1⁻¹ σ2 σ1 by the braid relation
        let b = builder();
        let space = BraidSpace::qudit(4, Boundary::Free);
        let band = b.exchange(&space, 1, 3).unwrap();
        let s1 = b.elementary(&space, 1).unwrap();
        let s2 = b.elementary(&space, 2).unwrap();
        let alt = s1.adjoint().matmul(&s2).matmul(&s1);
        assert!(band.max_abs_diff(&alt) < 1e-12);
        assert!(band.is_unitary(1e-12));
    }

    #[test]
    fn test_band_generator_spans_several() {
        let b = builder();
        let space = BraidSpace::qudit(5, Boundary::Free);
        let band = b.exchange(&space, 1, 4).unwrap();
        let s1 = b.elementary(&space, 1).unwrap();
        let s2 = b.elementary(&space, 2).unwrap();
        let s3 = b.elementary(&space, 3).unwrap();
        let w = s3.matmul(&s2);
        let expected = w.matmul(&s1).matmul(&w.adjoint());
        assert!(band.max_abs_diff(&expected) < 1e-12);
        assert!(Arc::ptr_eq(&band, &b.exchange(&space, 1, 4).unwrap()));
    }

    #[test]
    fn test_extreme_power() {
        // σ1 on two anyons is diagonal with tenth roots of unity, and
        // 2^31 = 8 (mod 10)
        let b = builder();
        let space = BraidSpace::qudit(2, Boundary::Free);
        let far = b.exchange_power(&space, 1, 2, i64::from(i32::MIN)).unwrap();
        let near = b.exchange_power(&space, 1, 2, 2).unwrap();
        assert!(far.max_abs_diff(&near) < 1e-12);

        let space = BraidSpace::qudit(4, Boundary::Free);
        let sigma = b.exchange(&space, 2, 3).unwrap();
        for power in [-13i64, -6, 7, 13, 25] {
            let reduced = b.exchange_power(&space, 2, 3, power).unwrap();
            assert!(reduced.max_abs_diff(&sigma.pow(power)) < 1e-11, "power {power}");
        }
        assert_eq!(reduce_power(i64::MIN), 2);
        assert_eq!(reduce_power(-4), -4);
        assert_eq!(reduce_power(6), -4);
    }

    #[test]
    fn test_fixed_boundary_generators() {
        let b = builder();
        for boundary in [Boundary::Fixed(Charge::Vacuum), Boundary::Fixed(Charge::Tau)] {
            let space = BraidSpace::qudit(5, boundary);
            for pair in 1..5 {
                let sigma = b.elementary(&space, pair).unwrap();
                assert!(sigma.is_unitary(1e-12));
            }
        }
    }
}

//! Braid group and unitarity properties of the built operators

use fibq_braid::{BraidCache, BraidMatrix, BraidOperatorBuilder, BraidSpace, EXCHANGE_ORDER};
use fibq_core::{Boundary, Charge};
use num_complex::Complex64;
use proptest::prelude::*;
use std::sync::Arc;

const EPSILON: f64 = 1e-10;

fn builder() -> BraidOperatorBuilder {
    BraidOperatorBuilder::with_cache(Arc::new(BraidCache::new()))
}

fn sigma(b: &BraidOperatorBuilder, space: &BraidSpace, i: usize) -> BraidMatrix {
    b.elementary(space, i).unwrap().as_ref().clone()
}

#[test]
fn test_generators_are_unitary() {
    let b = builder();
    for n in 2..=8 {
        for boundary in [Boundary::Free, Boundary::Fixed(Charge::Tau)] {
            let space = BraidSpace::qudit(n, boundary);
            for i in 1..n {
                let s = sigma(&b, &space, i);
                assert!(
                    s.unitarity_deviation() < EPSILON,
                    "σ{i} for n = {n}, {boundary}"
                );
            }
        }
    }
}

#[test]
fn test_yang_baxter() {
    let b = builder();
    for n in 3..=8 {
        let space = BraidSpace::qudit(n, Boundary::Free);
        for i in 1..n - 1 {
            let s1 = sigma(&b, &space, i);
            let s2 = sigma(&b, &space, i + 1);
            let lhs = s1.matmul(&s2).matmul(&s1);
            let rhs = s2.matmul(&s1).matmul(&s2);
            assert!(lhs.max_abs_diff(&rhs) < EPSILON, "n = {n}, i = {i}");
        }
    }
}

#[test]
fn test_distant_generators_commute() {
    let b = builder();
    let space = BraidSpace::qudit(6, Boundary::Free);
    for i in 1..6 {
        for j in i + 2..6 {
            let si = sigma(&b, &space, i);
            let sj = sigma(&b, &space, j);
            assert!(si.matmul(&sj).max_abs_diff(&sj.matmul(&si)) < EPSILON);
        }
    }
}

#[test]
fn test_generator_has_order_ten() {
    // R phases are tenth roots of unity, so σ^10 = 1
    let b = builder();
    let space = BraidSpace::qudit(5, Boundary::Free);
    for i in 1..5 {
        let s10 = b.elementary(&space, i).unwrap().pow(EXCHANGE_ORDER);
        assert!(s10.max_abs_diff(&BraidMatrix::identity(8)) < EPSILON);
    }
    let band = b.exchange(&space, 1, 5).unwrap().pow(EXCHANGE_ORDER);
    assert!(band.max_abs_diff(&BraidMatrix::identity(8)) < EPSILON);
}

#[test]
fn test_band_generators_are_unitary() {
    let b = builder();
    let space = BraidSpace::qudit(6, Boundary::Free);
    for s in 1..6 {
        for t in s + 1..=6 {
            let band = b.exchange(&space, s, t).unwrap();
            assert!(band.is_unitary(EPSILON), "({s},{t})");
        }
    }
}

#[test]
fn test_fused_generators_are_unitary_and_braid() {
    let b = builder();
    let space = BraidSpace::fused(&[3, 3]);
    for i in 1..6 {
        assert!(sigma(&b, &space, i).is_unitary(EPSILON));
    }
    // relation across the qudit boundary
    let s3 = sigma(&b, &space, 3);
    let s4 = sigma(&b, &space, 4);
    let lhs = s3.matmul(&s4).matmul(&s3);
    let rhs = s4.matmul(&s3).matmul(&s4);
    assert!(lhs.max_abs_diff(&rhs) < EPSILON);
}

#[test]
fn test_fused_braid_within_qudit_is_local() {
    let b = builder();
    let counts = [3, 3];
    let space = BraidSpace::fused(&counts);
    let transform = b.fusion_transform(&counts).unwrap();
    let basis = transform.basis();

    // anyons 4 and 5 are the first pair of qudit 1: a pure phase
    let s4 = sigma(&b, &space, 4);
    for r in 0..s4.dim() {
        for c in 0..s4.dim() {
            if r != c {
                assert!(s4.get(r, c).norm() < EPSILON);
            }
        }
    }

    // anyons 5 and 6 never touch qudit 0 or the roots
    let s5 = sigma(&b, &space, 5);
    for r in 0..s5.dim() {
        for c in 0..s5.dim() {
            if s5.get(r, c).norm() > EPSILON {
                let (row, col) = (basis.label(r).unwrap(), basis.label(c).unwrap());
                assert_eq!(row.locals[0], col.locals[0]);
                assert_eq!(row.roots, col.roots);
            }
        }
    }
}

#[test]
fn test_fused_single_qudit_matches_chain() {
    let b = builder();
    let fused = sigma(&b, &BraidSpace::fused(&[4]), 2);
    let chain = sigma(&b, &BraidSpace::qudit(4, Boundary::Free), 2);
    assert!(fused.max_abs_diff(&chain) < EPSILON);
}

fn power() -> impl Strategy<Value = i32> {
    prop_oneof![
        8 => -3i32..=3,
        1 => Just(i32::MIN),
        1 => Just(i32::MAX),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_words_preserve_norm(
        n in 3usize..=6,
        word in prop::collection::vec((1usize..6, power()), 1..20),
        start in 0usize..8,
    ) {
        let b = builder();
        let space = BraidSpace::qudit(n, Boundary::Free);
        let dim = fibq_core::basis_dimension(n, Boundary::Free).unwrap();
        let mut state = vec![Complex64::new(0.0, 0.0); dim];
        state[start % dim] = Complex64::new(1.0, 0.0);

        let mut unitary = BraidMatrix::identity(dim);
        for (pair, power) in word {
            let pair = 1 + (pair - 1) % (n - 1);
            let op = b.build(&space, pair, power).unwrap();
            state = op.apply(&state);
            unitary = op.matmul(&unitary);
        }

        let norm: f64 = state.iter().map(|a| a.norm_sqr()).sum();
        prop_assert!((norm - 1.0).abs() < EPSILON);
        prop_assert!(unitary.is_unitary(1e-9));
    }

    #[test]
    fn inverse_round_trip(n in 2usize..=7, pair in 1usize..7, start in 0usize..13) {
        let b = builder();
        let pair = 1 + (pair - 1) % (n - 1);
        let space = BraidSpace::qudit(n, Boundary::Free);
        let dim = fibq_core::basis_dimension(n, Boundary::Free).unwrap();
        let mut state = vec![Complex64::new(0.0, 0.0); dim];
        state[start % dim] = Complex64::new(1.0, 0.0);

        let there = b.build(&space, pair, 1).unwrap().apply(&state);
        let back = b.build(&space, pair, -1).unwrap().apply(&there);
        for (x, y) in back.iter().zip(&state) {
            prop_assert!((x - y).norm() < EPSILON);
        }
    }
}

//! Fusion-tree bases and recoupling data across anyon counts

use approx::assert_relative_eq;
use fibq_core::{
    basis_dimension, basis_table, recouple, r_symbol, BasisEnumerator, Boundary, Charge,
    FusedBasis, PHI,
};
use proptest::prelude::*;

fn fibonacci(n: usize) -> usize {
    let (mut a, mut b) = (1usize, 1usize);
    for _ in 0..n {
        let next = a + b;
        a = b;
        b = next;
    }
    a
}

#[test]
fn free_dimensions_follow_fibonacci() {
    for n in 1..=20 {
        let dim = basis_dimension(n, Boundary::Free).unwrap();
        assert_eq!(dim, fibonacci(n), "n = {n}");
    }
}

#[test]
fn fixed_boundaries_partition_free_basis() {
    for n in 2..=14 {
        let vacuum = basis_dimension(n, Boundary::Fixed(Charge::Vacuum)).unwrap();
        let tau = basis_dimension(n, Boundary::Fixed(Charge::Tau)).unwrap();
        assert_eq!(vacuum + tau, basis_dimension(n, Boundary::Free).unwrap());
    }
}

#[test]
fn enumerated_labels_are_valid_sorted_and_unique() {
    for n in 1..=12 {
        for boundary in [
            Boundary::Free,
            Boundary::Fixed(Charge::Vacuum),
            Boundary::Fixed(Charge::Tau),
        ] {
            let Ok(table) = BasisEnumerator::enumerate(n, boundary) else {
                assert_eq!((n, boundary), (1, Boundary::Fixed(Charge::Vacuum)));
                continue;
            };
            assert_eq!(table.dim(), basis_dimension(n, boundary).unwrap());

            for (index, label) in table.iter() {
                assert_eq!(label.anyons(), n);
                assert_eq!(label[0], Charge::Tau);
                for pair in label.windows(2) {
                    assert!(pair[0].can_fuse_to(Charge::Tau, pair[1]));
                }
                assert!(boundary.admits(label.total()));
                assert_eq!(table.index_of(label), Some(index));
            }
            assert!(table.labels().windows(2).all(|w| w[0][..] < w[1][..]));
        }
    }
}

#[test]
fn memoised_tables_are_shared() {
    let a = basis_table(9, Boundary::Free).unwrap();
    let b = basis_table(9, Boundary::Free).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn fused_basis_matches_chain_dimension() {
    for counts in [vec![3, 3], vec![2, 4], vec![1, 3], vec![2, 2, 2], vec![3, 1, 2]] {
        let fused = FusedBasis::enumerate(&counts).unwrap();
        let total: usize = counts.iter().sum();
        assert_eq!(fused.dim(), basis_dimension(total, Boundary::Free).unwrap());
        assert_eq!(fused.total_anyons(), total);
    }
}

#[test]
fn r_symbols_are_phases() {
    for channel in Charge::ALL {
        assert_relative_eq!(r_symbol(channel).norm(), 1.0, epsilon = 1e-15);
    }
    assert_relative_eq!(PHI * PHI, PHI + 1.0, epsilon = 1e-12);
}

proptest! {
    #[test]
    fn exchange_columns_have_unit_norm(n in 2usize..12, seed in any::<prop::sample::Index>(), pair in 1usize..12) {
        let table = basis_table(n, Boundary::Free).unwrap();
        let label = table.label(seed.index(table.dim())).unwrap();
        prop_assume!(pair < n);

        let data = recouple(label, pair).unwrap();
        let weight: f64 = data.channels().iter().map(|(_, w)| w * w).sum();
        prop_assert!((weight - 1.0).abs() < 1e-12);

        let norm: f64 = data.exchange().iter().map(|(_, a)| a.norm_sqr()).sum();
        prop_assert!((norm - 1.0).abs() < 1e-12);
    }
}

//! Integration tests for threshold filtering

mod common;

use common::{all_kernels, arb_csr, create_tridiagonal_csr, from_rows};
use parilut::{threshold_filter, ParIlutError, SparseMatrixCSR};
use proptest::prelude::*;

#[test]
fn test_filter_keeps_diagonal_below_threshold() {
    // [0.01  2.0   0.3 ]
    // [0.5   0.02  0   ]
    // [0     7.0   0.03]
    let a = from_rows(3, &[
        vec![(0, 0.01), (1, 2.0), (2, 0.3)],
        vec![(0, 0.5), (1, 0.02)],
        vec![(1, 7.0), (2, 0.03)],
    ]);

    for kernels in all_kernels() {
        let filtered = kernels.threshold_filter(&a, 1.0).unwrap();
        assert_eq!(filtered.row_ptr, vec![0, 2, 3, 5]);
        assert_eq!(filtered.col_idx, vec![0, 1, 1, 1, 2]);
        assert_eq!(filtered.values, vec![0.01, 2.0, 0.02, 7.0, 0.03]);
        assert_eq!(filtered.diagonal_count(), 3);
    }
}

#[test]
fn test_filter_zero_threshold_is_copy() {
    let a = create_tridiagonal_csr(50);
    for kernels in all_kernels() {
        assert_eq!(kernels.threshold_filter(&a, 0.0).unwrap(), a);
    }
}

#[test]
fn test_filter_infinite_threshold_keeps_only_diagonal() {
    let a = create_tridiagonal_csr(20);
    for kernels in all_kernels() {
        let filtered = kernels.threshold_filter(&a, f64::INFINITY).unwrap();
        assert_eq!(filtered.nnz(), 20);
        assert_eq!(filtered.diagonal_count(), 20);
        assert_eq!(filtered.row_ptr, (0..=20).collect::<Vec<_>>());
    }
}

#[test]
fn test_filter_rectangular_and_empty_rows() {
    let a = from_rows(5, &[
        vec![],
        vec![(3, 0.1), (4, 9.0)],
        vec![],
    ]);
    for kernels in all_kernels() {
        let filtered = kernels.threshold_filter(&a, 1.0).unwrap();
        assert_eq!(filtered.shape(), (3, 5));
        assert_eq!(filtered.row_ptr, vec![0, 0, 1, 1]);
        assert_eq!(filtered.col_idx, vec![4]);
    }
}

#[test]
fn test_filter_keeps_row_order_of_unsorted_input() {
    let a = from_rows(4, &[vec![(3, 5.0), (0, 0.1), (1, 6.0), (2, 7.0)]]);
    for kernels in all_kernels() {
        let filtered = kernels.threshold_filter(&a, 1.0).unwrap();
        assert_eq!(filtered.col_idx, vec![3, 0, 1, 2]);
    }
    let filtered = threshold_filter(&a, 5.5).unwrap();
    assert_eq!(filtered.col_idx, vec![0, 1, 2]);
}

#[test]
fn test_filter_rejects_bad_threshold() {
    let a = create_tridiagonal_csr(4);
    for kernels in all_kernels() {
        assert!(matches!(
            kernels.threshold_filter(&a, -1.0),
            Err(ParIlutError::InvalidArgument { arg: "threshold", .. })
        ));
        assert!(kernels.threshold_filter(&a, f64::NAN).is_err());
    }
}

#[test]
fn test_filter_rejects_malformed_layout() {
    let bad = SparseMatrixCSR {
        n_rows: 3,
        n_cols: 3,
        row_ptr: vec![0, 2, 1, 2],
        col_idx: vec![0, 1],
        values: vec![1.0, 2.0],
    };
    for kernels in all_kernels() {
        assert_eq!(
            kernels.threshold_filter(&bad, 0.5),
            Err(ParIlutError::RowPtrNotMonotonic { row: 1, start: 2, end: 1 })
        );
    }
}

#[test]
fn test_malformed_row_ptr_past_nnz_is_rejected() {
    let bad = SparseMatrixCSR {
        n_rows: 2,
        n_cols: 2,
        row_ptr: vec![0, 5, 2],
        col_idx: vec![0, 1],
        values: vec![1.0, 2.0],
    };
    let identity = SparseMatrixCSR::<f64>::identity(2);
    let expected = Err(ParIlutError::RowPtrNotMonotonic { row: 1, start: 5, end: 2 });

    for kernels in all_kernels() {
        assert_eq!(kernels.threshold_filter(&bad, 0.5), expected);
        assert_eq!(kernels.spgeam(1.0, &identity, 1.0, &bad), expected);
        assert_eq!(kernels.spgeam(1.0, &bad, 1.0, &identity), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every kept entry is large or diagonal, and every dropped entry is small
    /// and off-diagonal
    #[test]
    fn prop_filter_sound_and_complete(a in arb_csr(24), threshold in 0.0f64..10.0) {
        for kernels in all_kernels() {
            let filtered = kernels.threshold_filter(&a, threshold).unwrap();
            prop_assert!(filtered.validate().is_ok());
            prop_assert_eq!(filtered.shape(), a.shape());

            for i in 0..a.n_rows {
                let expected: Vec<(usize, f64)> = a
                    .row_iter(i)
                    .filter(|&(j, v)| v.abs() >= threshold || i == j)
                    .map(|(j, &v)| (j, v))
                    .collect();
                let kept: Vec<(usize, f64)> = filtered.row_iter(i).map(|(j, &v)| (j, v)).collect();
                prop_assert_eq!(kept, expected);
            }
        }
    }

    /// Property: filtering twice with the same threshold changes nothing
    #[test]
    fn prop_filter_idempotent(a in arb_csr(24), threshold in 0.0f64..10.0) {
        for kernels in all_kernels() {
            let once = kernels.threshold_filter(&a, threshold).unwrap();
            let twice = kernels.threshold_filter(&once, threshold).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    /// Property: a higher threshold never keeps more entries
    #[test]
    fn prop_filter_monotonic(a in arb_csr(24), t1 in 0.0f64..10.0, t2 in 0.0f64..10.0) {
        let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        for kernels in all_kernels() {
            let loose = kernels.threshold_filter(&a, low).unwrap();
            let strict = kernels.threshold_filter(&a, high).unwrap();
            prop_assert!(strict.nnz() <= loose.nnz());
        }
    }
}

//! Every backend must agree with the reference backend

mod common;

use common::{all_kernels, arb_csr, arb_csr_pair};
use parilut::{
    create_kernels, AcceleratorKernels, Backend, ParIlutConfig, ParIlutKernels, ParallelKernels,
    ReferenceKernels, SparseMatrixCSR,
};
use proptest::prelude::*;

/// Block matrix with dense diagonal blocks and a sprinkling of far entries
fn block_matrix(blocks: usize, block_size: usize) -> SparseMatrixCSR<f64> {
    let n = blocks * block_size;
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    let mut values = Vec::new();

    for i in 0..n {
        let block_start = (i / block_size) * block_size;
        for j in block_start..block_start + block_size {
            col_idx.push(j);
            values.push(((i * 13 + j * 7) % 19) as f64 - 9.0);
        }
        if i % 3 == 0 && block_start + block_size < n {
            col_idx.push(n - 1);
            values.push(0.5);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

#[test]
fn test_backends_agree_on_block_matrix() {
    let a = block_matrix(40, 8);
    let b = block_matrix(64, 5);
    let reference = ReferenceKernels::default();

    let config = ParIlutConfig::default().with_threads(3);
    let parallel = ParallelKernels::new(&config).unwrap();
    let accelerator = AcceleratorKernels::new(&config).unwrap();

    let expected_sum = reference.spgeam(1.0, &a, 0.25, &b).unwrap();
    let expected_filter = reference.threshold_filter(&expected_sum, 4.0).unwrap();
    let rank = expected_sum.nnz() / 3;
    let expected_select = reference.threshold_select(&expected_sum.values, rank).unwrap();

    let others: [&dyn ParIlutKernels<f64>; 2] = [&parallel, &accelerator];
    for kernels in others {
        assert_eq!(kernels.spgeam(1.0, &a, 0.25, &b).unwrap(), expected_sum);
        assert_eq!(kernels.threshold_filter(&expected_sum, 4.0).unwrap(), expected_filter);
        assert_eq!(kernels.threshold_select(&expected_sum.values, rank).unwrap(), expected_select);
    }
}

#[test]
fn test_thread_counts_do_not_change_results() {
    let a = block_matrix(25, 12);
    let expected = ReferenceKernels::default().threshold_filter(&a, 6.0).unwrap();

    for n_threads in [1, 2, 7] {
        for backend in [Backend::Parallel, Backend::Accelerator] {
            let config = ParIlutConfig::for_backend(backend).with_threads(n_threads);
            let kernels = create_kernels::<f64>(&config).unwrap();
            assert_eq!(kernels.threshold_filter(&a, 6.0).unwrap(), expected);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: filtering is identical on every backend
    #[test]
    fn prop_filter_equivalent(a in arb_csr(40), threshold in 0.0f64..10.0) {
        let kernels = all_kernels();
        let expected = kernels[0].threshold_filter(&a, threshold).unwrap();
        for k in &kernels[1..] {
            prop_assert_eq!(k.threshold_filter(&a, threshold).unwrap(), expected.clone());
        }
    }

    /// Property: addition is bit-identical on every backend
    #[test]
    fn prop_spgeam_equivalent((a, b) in arb_csr_pair(40), alpha in -2.0f64..2.0, beta in -2.0f64..2.0) {
        let kernels = all_kernels();
        let expected = kernels[0].spgeam(alpha, &a, beta, &b).unwrap();
        for k in &kernels[1..] {
            prop_assert_eq!(k.spgeam(alpha, &a, beta, &b).unwrap(), expected.clone());
        }
    }

    /// Property: selection returns the same order statistic on every backend
    #[test]
    fn prop_select_equivalent(a in arb_csr(40), index in any::<prop::sample::Index>()) {
        prop_assume!(a.nnz() > 0);
        let rank = index.index(a.nnz());
        let kernels = all_kernels();
        let expected = kernels[0].threshold_select(&a.values, rank).unwrap();
        for k in &kernels[1..] {
            prop_assert_eq!(k.threshold_select(&a.values, rank).unwrap(), expected);
        }
    }
}

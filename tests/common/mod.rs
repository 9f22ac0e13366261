//! Shared matrix builders and strategies for the integration tests

#![allow(dead_code)]

use parilut::{create_kernels, Backend, ParIlutConfig, ParIlutKernels, SparseMatrixCSR};
use proptest::prelude::*;

/// Kernels for every backend, tuned so small inputs still recurse
pub fn all_kernels() -> Vec<Box<dyn ParIlutKernels<f64>>> {
    Backend::ALL
        .iter()
        .map(|&backend| {
            let mut config = ParIlutConfig::for_backend(backend).with_threads(4);
            config.select_base_case = 16;
            config.select_sample_size = 32;
            config.select_bucket_count = 8;
            config.lane_group_size = 4;
            create_kernels::<f64>(&config).unwrap()
        })
        .collect()
}

/// Builds a CSR matrix from per-row `(column, value)` lists
pub fn from_rows(n_cols: usize, rows: &[Vec<(usize, f64)>]) -> SparseMatrixCSR<f64> {
    let mut row_ptr = Vec::with_capacity(rows.len() + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for row in rows {
        for &(col, val) in row {
            col_idx.push(col);
            values.push(val);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(rows.len(), n_cols, row_ptr, col_idx, values)
}

/// Tridiagonal matrix with a strong diagonal
pub fn create_tridiagonal_csr(n: usize) -> SparseMatrixCSR<f64> {
    let rows: Vec<Vec<(usize, f64)>> = (0..n)
        .map(|i| {
            let mut row = Vec::new();
            if i > 0 {
                row.push((i - 1, -1.0));
            }
            row.push((i, 4.0));
            if i + 1 < n {
                row.push((i + 1, -1.0));
            }
            row
        })
        .collect();
    from_rows(n, &rows)
}

/// Column-sorted matrix of the given shape with roughly 40% density
pub fn arb_csr_with_shape(n_rows: usize, n_cols: usize) -> impl Strategy<Value = SparseMatrixCSR<f64>> {
    prop::collection::vec(
        prop::collection::vec((prop::bool::weighted(0.4), -10.0f64..10.0), n_cols),
        n_rows,
    )
    .prop_map(move |dense_rows| {
        let rows: Vec<Vec<(usize, f64)>> = dense_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .filter(|(_, (present, _))| *present)
                    .map(|(col, (_, val))| (col, val))
                    .collect()
            })
            .collect();
        from_rows(n_cols, &rows)
    })
}

/// Column-sorted matrix with up to `max_dim` rows and columns
pub fn arb_csr(max_dim: usize) -> impl Strategy<Value = SparseMatrixCSR<f64>> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(|(n_rows, n_cols)| arb_csr_with_shape(n_rows, n_cols))
}

/// Two column-sorted matrices of the same shape
pub fn arb_csr_pair(
    max_dim: usize,
) -> impl Strategy<Value = (SparseMatrixCSR<f64>, SparseMatrixCSR<f64>)> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(|(n_rows, n_cols)| {
        (
            arb_csr_with_shape(n_rows, n_cols),
            arb_csr_with_shape(n_rows, n_cols),
        )
    })
}

//! Sequential reference implementation of the ParILUT kernels
//!
//! This provides a baseline for correctness testing and performance comparison.
//! Every row is processed in order on the calling thread; the two-phase
//! structure is kept so that the outputs match the parallel backends
//! exactly.

use num_traits::Zero;
use tracing::debug;

use crate::constants::DEFAULT_MAX_SELECT_DEPTH;
use crate::error::Result;
use crate::kernels::{check_spgeam_operands, check_threshold, row, ParIlutKernels};
use crate::matrix::{Backend, ParIlutConfig, SparseMatrixCSR, SparseValue};
use crate::select::{check_rank, magnitudes, quickselect};
use crate::utils::{exclusive_scan, try_alloc};

/// Sequential kernels
#[derive(Debug, Clone)]
pub struct ReferenceKernels {
    max_select_depth: usize,
}

impl Default for ReferenceKernels {
    fn default() -> Self {
        Self {
            max_select_depth: DEFAULT_MAX_SELECT_DEPTH,
        }
    }
}

impl ReferenceKernels {
    /// Create the sequential kernels from a configuration
    pub fn new(config: &ParIlutConfig) -> Self {
        Self {
            max_select_depth: config.max_select_depth,
        }
    }
}

/// Count, scan, allocate, fill: one row at a time
fn build_two_phase<T, C, F>(n_rows: usize, n_cols: usize, count: C, fill: F) -> Result<SparseMatrixCSR<T>>
where
    T: SparseValue,
    C: Fn(usize) -> usize,
    F: Fn(usize, &mut [usize], &mut [T]),
{
    let counts: Vec<usize> = (0..n_rows).map(&count).collect();
    let row_ptr = exclusive_scan(&counts);
    let nnz = row_ptr[n_rows];

    let mut col_idx = try_alloc(nnz, 0usize)?;
    let mut values = try_alloc(nnz, T::zero())?;

    for i in 0..n_rows {
        let (start, end) = (row_ptr[i], row_ptr[i + 1]);
        fill(i, &mut col_idx[start..end], &mut values[start..end]);
    }

    Ok(SparseMatrixCSR {
        n_rows,
        n_cols,
        row_ptr,
        col_idx,
        values,
    })
}

impl<T: SparseValue> ParIlutKernels<T> for ReferenceKernels {
    fn backend(&self) -> Backend {
        Backend::Reference
    }

    fn threshold_select(&self, values: &[T], rank: usize) -> Result<T::Real> {
        check_rank(values.len(), rank)?;
        let mut working = magnitudes(values)?;
        let selected = quickselect(&mut working, rank, self.max_select_depth);
        debug!(backend = "reference", size = values.len(), rank, threshold = ?selected, "threshold_select");
        Ok(selected)
    }

    fn threshold_filter(
        &self,
        a: &SparseMatrixCSR<T>,
        threshold: T::Real,
    ) -> Result<SparseMatrixCSR<T>> {
        a.validate()?;
        check_threshold(threshold)?;

        let result = build_two_phase(
            a.n_rows,
            a.n_cols,
            |i| row::count_filtered(i, a.row_cols(i), a.row_values(i), threshold),
            |i, out_cols, out_vals| {
                row::write_filtered(i, a.row_cols(i), a.row_values(i), threshold, out_cols, out_vals)
            },
        )?;

        debug!(
            backend = "reference",
            rows = a.n_rows,
            nnz_in = a.nnz(),
            nnz_out = result.nnz(),
            threshold = ?threshold,
            "threshold_filter"
        );
        Ok(result)
    }

    fn spgeam(
        &self,
        alpha: T,
        a: &SparseMatrixCSR<T>,
        beta: T,
        b: &SparseMatrixCSR<T>,
    ) -> Result<SparseMatrixCSR<T>> {
        check_spgeam_operands(a, b)?;

        let result = build_two_phase(
            a.n_rows,
            a.n_cols,
            |i| {
                let (a_cols, _) = row::scaled_row(alpha, a, i);
                let (b_cols, _) = row::scaled_row(beta, b, i);
                row::count_merged(a_cols, b_cols)
            },
            |i, out_cols, out_vals| {
                let (a_cols, a_vals) = row::scaled_row(alpha, a, i);
                let (b_cols, b_vals) = row::scaled_row(beta, b, i);
                row::write_merged(alpha, a_cols, a_vals, beta, b_cols, b_vals, out_cols, out_vals)
            },
        )?;

        debug!(
            backend = "reference",
            rows = a.n_rows,
            nnz_a = a.nnz(),
            nnz_b = b.nnz(),
            nnz_out = result.nnz(),
            alpha_zero = alpha.is_zero(),
            beta_zero = beta.is_zero(),
            "spgeam"
        );
        Ok(result)
    }
}

//! # Parallel implementation of the ParILUT kernels
//!
//! This module provides a shared-memory backend using Rayon: filtering and
//! addition count every row in parallel, build row pointers with a blocked
//! parallel scan, then fill disjoint per-row output slices in parallel.
//! Selection partitions the flat magnitude array in parallel rounds.

use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use crate::constants::SCAN_BLOCK_SIZE;
use crate::error::Result;
use crate::kernels::{check_spgeam_operands, check_threshold, row, ParIlutKernels};
use crate::matrix::{Backend, ParIlutConfig, SparseMatrixCSR, SparseValue};
use crate::select::{check_rank, par_magnitudes, parallel_select};
use crate::utils::{parallel_exclusive_scan, split_by_offsets, try_alloc};

/// Kernels running on a dedicated Rayon thread pool
///
/// # Examples
///
/// ```
/// use parilut::{ParIlutConfig, ParIlutKernels, ParallelKernels, SparseMatrixCSR};
///
/// let config = ParIlutConfig::default().with_threads(2);
/// let kernels = ParallelKernels::new(&config).unwrap();
///
/// let a = SparseMatrixCSR::<f64>::new(
///     2, 2,
///     vec![0, 2, 3],
///     vec![0, 1, 1],
///     vec![1.0, 0.01, 2.0],
/// );
///
/// let filtered = kernels.threshold_filter(&a, 0.5).unwrap();
/// assert_eq!(filtered.nnz(), 2);
/// ```
#[derive(Debug)]
pub struct ParallelKernels {
    pool: rayon::ThreadPool,
    select_base_case: usize,
    max_select_depth: usize,
}

impl ParallelKernels {
    /// Build the thread pool described by `config`
    pub fn new(config: &ParIlutConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.system_params.n_threads)
            .build()?;
        Ok(Self {
            pool,
            select_base_case: config.select_base_case,
            max_select_depth: config.max_select_depth,
        })
    }

    /// Number of worker threads
    pub fn n_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

/// Count rows in parallel, scan, allocate, fill rows in parallel
fn build_two_phase<T, C, F>(n_rows: usize, n_cols: usize, count: C, fill: F) -> Result<SparseMatrixCSR<T>>
where
    T: SparseValue,
    C: Fn(usize) -> usize + Sync,
    F: Fn(usize, &mut [usize], &mut [T]) + Sync,
{
    let counts: Vec<usize> = (0..n_rows).into_par_iter().map(&count).collect();
    let row_ptr = parallel_exclusive_scan(&counts, SCAN_BLOCK_SIZE);
    let nnz = row_ptr[n_rows];

    let mut col_idx = try_alloc(nnz, 0usize)?;
    let mut values = try_alloc(nnz, T::zero())?;

    split_by_offsets(&row_ptr, &mut col_idx, &mut values)
        .into_par_iter()
        .enumerate()
        .for_each(|(i, (out_cols, out_vals))| fill(i, out_cols, out_vals));

    Ok(SparseMatrixCSR {
        n_rows,
        n_cols,
        row_ptr,
        col_idx,
        values,
    })
}

impl<T: SparseValue> ParIlutKernels<T> for ParallelKernels {
    fn backend(&self) -> Backend {
        Backend::Parallel
    }

    fn threshold_select(&self, values: &[T], rank: usize) -> Result<T::Real> {
        check_rank(values.len(), rank)?;
        let selected = self.pool.install(|| -> Result<T::Real> {
            let working = par_magnitudes(values)?;
            Ok(parallel_select(working, rank, self.select_base_case, self.max_select_depth))
        })?;
        debug!(backend = "parallel", size = values.len(), rank, threshold = ?selected, "threshold_select");
        Ok(selected)
    }

    fn threshold_filter(
        &self,
        a: &SparseMatrixCSR<T>,
        threshold: T::Real,
    ) -> Result<SparseMatrixCSR<T>> {
        a.validate()?;
        check_threshold(threshold)?;

        let result = self.pool.install(|| {
            build_two_phase(
                a.n_rows,
                a.n_cols,
                |i| row::count_filtered(i, a.row_cols(i), a.row_values(i), threshold),
                |i, out_cols, out_vals| {
                    row::write_filtered(i, a.row_cols(i), a.row_values(i), threshold, out_cols, out_vals)
                },
            )
        })?;

        debug!(
            backend = "parallel",
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

        let result = self.pool.install(|| {
            build_two_phase(
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
            )
        })?;

        debug!(
            backend = "parallel",
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

//! Accelerator-style implementation of the ParILUT kernels
//!
//! Mirrors how a massively parallel device executes these kernels, on the
//! host: rows are dealt out to fixed-size lane groups, each group walks its
//! rows independently, row pointers come from a blocked scan (block
//! reductions, a scan over block totals, then per-block fix-up), and the
//! order statistic is found with bucket sample-select. Lane groups are
//! scheduled onto a Rayon pool.
//!
//! Memory placement and launch configuration are outside this module; it
//! only reproduces the work decomposition, so results are identical to the
//! other backends.

use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use crate::constants::SCAN_BLOCK_SIZE;
use crate::error::Result;
use crate::kernels::{check_spgeam_operands, check_threshold, row, ParIlutKernels};
use crate::matrix::{Backend, ParIlutConfig, SparseMatrixCSR, SparseValue};
use crate::select::{check_rank, par_magnitudes, sample_select, SampleSelectParams};
use crate::utils::{parallel_exclusive_scan, split_by_offsets, try_alloc};

/// Lane-group kernels
#[derive(Debug)]
pub struct AcceleratorKernels {
    pool: rayon::ThreadPool,
    lane_group_size: usize,
    select_params: SampleSelectParams,
}

impl AcceleratorKernels {
    /// Build the kernels and their worker pool from `config`
    pub fn new(config: &ParIlutConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.system_params.n_threads)
            .build()?;
        Ok(Self {
            pool,
            lane_group_size: config.lane_group_size.max(1),
            select_params: SampleSelectParams {
                sample_size: config.select_sample_size,
                bucket_count: config.select_bucket_count,
                base_case: config.select_base_case,
                max_depth: config.max_select_depth,
                block_size: SCAN_BLOCK_SIZE,
            },
        })
    }

    /// Rows handled by one lane group
    pub fn lane_group_size(&self) -> usize {
        self.lane_group_size
    }

    /// Two-phase build with one lane group per `lane_group_size` rows
    fn build_two_phase<T, C, F>(&self, n_rows: usize, n_cols: usize, count: C, fill: F) -> Result<SparseMatrixCSR<T>>
    where
        T: SparseValue,
        C: Fn(usize) -> usize + Sync,
        F: Fn(usize, &mut [usize], &mut [T]) + Sync,
    {
        let lanes = self.lane_group_size;

        // Phase 1: every lane group sizes its own rows
        let mut counts = vec![0usize; n_rows];
        counts
            .par_chunks_mut(lanes)
            .enumerate()
            .for_each(|(group, group_counts)| {
                let first_row = group * lanes;
                for (offset, slot) in group_counts.iter_mut().enumerate() {
                    *slot = count(first_row + offset);
                }
            });

        // Barrier: row pointers must be complete before any group writes
        let row_ptr = parallel_exclusive_scan(&counts, SCAN_BLOCK_SIZE);
        let nnz = row_ptr[n_rows];

        let mut col_idx = try_alloc(nnz, 0usize)?;
        let mut values = try_alloc(nnz, T::zero())?;

        // Phase 2: every lane group fills the contiguous span of its rows
        let mut group_offsets: Vec<usize> = row_ptr.iter().step_by(lanes).copied().collect();
        if n_rows % lanes != 0 {
            group_offsets.push(nnz);
        }

        split_by_offsets(&group_offsets, &mut col_idx, &mut values)
            .into_par_iter()
            .enumerate()
            .for_each(|(group, (group_cols, group_vals))| {
                let first_row = group * lanes;
                let last_row = (first_row + lanes).min(n_rows);
                let base = row_ptr[first_row];
                for i in first_row..last_row {
                    let (start, end) = (row_ptr[i] - base, row_ptr[i + 1] - base);
                    fill(i, &mut group_cols[start..end], &mut group_vals[start..end]);
                }
            });

        Ok(SparseMatrixCSR {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }
}

impl<T: SparseValue> ParIlutKernels<T> for AcceleratorKernels {
    fn backend(&self) -> Backend {
        Backend::Accelerator
    }

    fn threshold_select(&self, values: &[T], rank: usize) -> Result<T::Real> {
        check_rank(values.len(), rank)?;
        let selected = self.pool.install(|| -> Result<T::Real> {
            let working = par_magnitudes(values)?;
            Ok(sample_select(working, rank, &self.select_params))
        })?;
        debug!(backend = "accelerator", size = values.len(), rank, threshold = ?selected, "threshold_select");
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
            self.build_two_phase(
                a.n_rows,
                a.n_cols,
                |i| row::count_filtered(i, a.row_cols(i), a.row_values(i), threshold),
                |i, out_cols, out_vals| {
                    row::write_filtered(i, a.row_cols(i), a.row_values(i), threshold, out_cols, out_vals)
                },
            )
        })?;

        debug!(
            backend = "accelerator",
            rows = a.n_rows,
            lane_groups = a.n_rows.div_ceil(self.lane_group_size),
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
            self.build_two_phase(
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
            backend = "accelerator",
            rows = a.n_rows,
            lane_groups = a.n_rows.div_ceil(self.lane_group_size),
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

//! The three ParILUT kernels and their execution backends
//!
//! One refinement sweep of a factor chains all three: [`ParIlutKernels::spgeam`]
//! merges the factor with candidate fill-in, [`ParIlutKernels::threshold_select`]
//! finds the magnitude that keeps the target number of entries, and
//! [`ParIlutKernels::threshold_filter`] drops everything below it.
//!
//! Each backend implements the same contract:
//!
//! - [`ReferenceKernels`]: sequential, the baseline for correctness tests
//! - [`ParallelKernels`]: rows and value partitions spread over a rayon pool
//! - [`AcceleratorKernels`]: fixed-size lane groups, blocked scans and
//!   bucket sample-select
//!
//! Filter and addition produce identical patterns and bit-identical values
//! on every backend, since rows are independent and the per-row code in
//! [`row`] is shared. Selection returns the same order statistic everywhere.

pub mod accelerator;
pub mod parallel;
pub mod reference;
pub mod row;

use std::fmt::Debug;

use num_traits::Float;

use crate::error::{ParIlutError, Result};
use crate::matrix::{Backend, ParIlutConfig, SparseMatrixCSR, SparseValue};

pub use accelerator::AcceleratorKernels;
pub use parallel::ParallelKernels;
pub use reference::ReferenceKernels;

/// The kernel set a ParILUT driver calls into
///
/// All operations take read-only views and return freshly allocated
/// outputs; a rejected call produces no partial output.
pub trait ParIlutKernels<T: SparseValue>: Send + Sync {
    /// Backend implementing these kernels
    fn backend(&self) -> Backend;

    /// Magnitude that would sit at `rank` if `values` were sorted by magnitude
    ///
    /// Fails with [`ParIlutError::EmptySelection`] on empty input and
    /// [`ParIlutError::RankOutOfRange`] when `rank >= values.len()`.
    fn threshold_select(&self, values: &[T], rank: usize) -> Result<T::Real>;

    /// Copy of `a` keeping entries with magnitude `>= threshold` plus every
    /// stored diagonal entry
    ///
    /// Within-row order is preserved. Fails on malformed input layouts and
    /// on negative or NaN thresholds.
    fn threshold_filter(
        &self,
        a: &SparseMatrixCSR<T>,
        threshold: T::Real,
    ) -> Result<SparseMatrixCSR<T>>;

    /// `alpha * a + beta * b` over the union of both patterns
    ///
    /// Rows of `a` and `b` must be sorted by column; the result rows are
    /// sorted with one entry per column. A matrix with a zero coefficient
    /// contributes no entries. Fails with [`ParIlutError::DimensionMismatch`]
    /// when the shapes differ.
    fn spgeam(
        &self,
        alpha: T,
        a: &SparseMatrixCSR<T>,
        beta: T,
        b: &SparseMatrixCSR<T>,
    ) -> Result<SparseMatrixCSR<T>>;
}

/// Create the kernel set selected by `config.backend`
pub fn create_kernels<T: SparseValue>(config: &ParIlutConfig) -> Result<Box<dyn ParIlutKernels<T>>> {
    let kernels: Box<dyn ParIlutKernels<T>> = match config.backend {
        Backend::Reference => Box::new(ReferenceKernels::new(config)),
        Backend::Parallel => Box::new(ParallelKernels::new(config)?),
        Backend::Accelerator => Box::new(AcceleratorKernels::new(config)?),
    };
    Ok(kernels)
}

/// Order statistic of the magnitudes of `values`, on the reference backend
pub fn threshold_select<T: SparseValue>(values: &[T], rank: usize) -> Result<T::Real> {
    <ReferenceKernels as ParIlutKernels<T>>::threshold_select(&ReferenceKernels::default(), values, rank)
}

/// Threshold filter with forced diagonal, on the reference backend
pub fn threshold_filter<T: SparseValue>(
    a: &SparseMatrixCSR<T>,
    threshold: T::Real,
) -> Result<SparseMatrixCSR<T>> {
    ReferenceKernels::default().threshold_filter(a, threshold)
}

/// Generalized sparse addition, on the reference backend
pub fn spgeam<T: SparseValue>(
    alpha: T,
    a: &SparseMatrixCSR<T>,
    beta: T,
    b: &SparseMatrixCSR<T>,
) -> Result<SparseMatrixCSR<T>> {
    ReferenceKernels::default().spgeam(alpha, a, beta, b)
}

/// Rejects negative and NaN thresholds
pub(crate) fn check_threshold<R: Float + Debug>(threshold: R) -> Result<()> {
    if threshold.is_nan() || threshold < R::zero() {
        return Err(ParIlutError::InvalidArgument {
            arg: "threshold",
            reason: format!("must be a non-negative number, got {:?}", threshold),
        });
    }
    Ok(())
}

/// Validates both addition operands and their shapes
pub(crate) fn check_spgeam_operands<T: SparseValue>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
) -> Result<()> {
    a.validate()?;
    b.validate()?;
    if a.shape() != b.shape() {
        return Err(ParIlutError::DimensionMismatch {
            lhs: a.shape(),
            rhs: b.shape(),
        });
    }
    debug_assert!(
        a.is_sorted_by_column() && b.is_sorted_by_column(),
        "spgeam requires column-sorted rows"
    );
    Ok(())
}

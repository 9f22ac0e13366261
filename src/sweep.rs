//! One threshold refinement step of a ParILUT factor
//!
//! A driver refines L and U separately, each sweep doing:
//!
//! 1. `spgeam(1, factor, 1, candidates)`: the factor grows by the
//!    candidate fill-in
//! 2. `threshold_select` at rank `nnz - target_nnz` on the grown values
//! 3. `threshold_filter` at that magnitude, shrinking back to roughly
//!    `target_nnz` entries (ties and forced diagonals may keep a few more)
//!
//! The filter keeps magnitudes `>=` the threshold, so the element at rank
//! `nnz - target_nnz` is itself kept along with the `target_nnz - 1`
//! above it: exactly `target_nnz` entries for distinct magnitudes. The
//! rank `nnz - target_nnz - 1` seen in some formulations would keep one
//! extra entry with this inclusive comparison.
//!
//! Sweep counts, convergence checks and the coupling between L and U stay
//! with the caller.

use num_traits::One;
use tracing::{debug, info};

use crate::error::{ParIlutError, Result};
use crate::kernels::ParIlutKernels;
use crate::matrix::{SparseMatrixCSR, SparseValue};

/// What one refinement step did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSummary<R> {
    /// Stored entries after adding the candidates
    pub intermediate_nnz: usize,
    /// Rank passed to the selector, if filtering was needed
    pub rank: Option<usize>,
    /// Threshold used by the filter, if filtering was needed
    pub threshold: Option<R>,
    /// Stored entries of the refined factor
    pub result_nnz: usize,
}

/// Adds `candidates` to `factor` and filters back towards `target_nnz` entries
///
/// Both matrices must have column-sorted rows. When the merged factor
/// already holds at most `target_nnz` entries it is returned unfiltered.
///
/// # Examples
///
/// ```
/// use parilut::{refine_factor, ReferenceKernels, SparseMatrixCSR};
///
/// let factor = SparseMatrixCSR::<f64>::identity(2);
/// let candidates = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![0.5, 3.0]);
///
/// let (refined, summary) = refine_factor(&ReferenceKernels::default(), &factor, &candidates, 3).unwrap();
/// assert_eq!(summary.intermediate_nnz, 4);
/// assert_eq!(refined.nnz(), 3);
/// ```
pub fn refine_factor<T, K>(
    kernels: &K,
    factor: &SparseMatrixCSR<T>,
    candidates: &SparseMatrixCSR<T>,
    target_nnz: usize,
) -> Result<(SparseMatrixCSR<T>, SweepSummary<T::Real>)>
where
    T: SparseValue,
    K: ParIlutKernels<T> + ?Sized,
{
    if target_nnz == 0 {
        return Err(ParIlutError::InvalidArgument {
            arg: "target_nnz",
            reason: "must keep at least one entry".to_string(),
        });
    }

    let intermediate = kernels.spgeam(T::one(), factor, T::one(), candidates)?;
    let intermediate_nnz = intermediate.nnz();

    if intermediate_nnz <= target_nnz {
        debug!(intermediate_nnz, target_nnz, "factor within target, no filtering");
        let summary = SweepSummary {
            intermediate_nnz,
            rank: None,
            threshold: None,
            result_nnz: intermediate_nnz,
        };
        return Ok((intermediate, summary));
    }

    let rank = intermediate_nnz - target_nnz;
    let threshold = kernels.threshold_select(&intermediate.values, rank)?;
    let refined = kernels.threshold_filter(&intermediate, threshold)?;

    info!(
        backend = kernels.backend().name(),
        intermediate_nnz,
        target_nnz,
        result_nnz = refined.nnz(),
        "refinement step"
    );

    let summary = SweepSummary {
        intermediate_nnz,
        rank: Some(rank),
        threshold: Some(threshold),
        result_nnz: refined.nnz(),
    };
    Ok((refined, summary))
}

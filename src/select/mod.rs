//! Order-statistic selection on value magnitudes
//!
//! Every backend answers the same question: which magnitude would sit at
//! position `rank` if the values were sorted ascending by magnitude. The
//! backends differ only in how they narrow the search:
//!
//! - [`quickselect`]: sequential three-way partitioning
//! - [`partition`]: the same partitioning step done with rayon over the
//!   whole working set, one barrier per round
//! - [`sample`]: bucket selection driven by a sorted sample, with block
//!   histograms reduced in parallel
//!
//! All three work on a private copy of the magnitudes and cap their
//! recursion depth, falling back to a full sort past the cap.

pub mod partition;
pub mod quickselect;
pub mod sample;

use rayon::prelude::*;

use crate::error::{ParIlutError, Result};
use crate::matrix::SparseValue;

pub use partition::parallel_select;
pub use quickselect::quickselect;
pub use sample::{sample_select, SampleSelectParams};

/// Rejects empty inputs and ranks outside `[0, size)`
pub fn check_rank(size: usize, rank: usize) -> Result<()> {
    if size == 0 {
        return Err(ParIlutError::EmptySelection);
    }
    if rank >= size {
        return Err(ParIlutError::RankOutOfRange { rank, size });
    }
    Ok(())
}

/// Private working copy of the magnitudes of `values`
pub fn magnitudes<T: SparseValue>(values: &[T]) -> Result<Vec<T::Real>> {
    let mut working = Vec::new();
    working
        .try_reserve_exact(values.len())
        .map_err(|_| ParIlutError::AllocationFailed { elements: values.len() })?;
    working.extend(values.iter().map(|v| v.magnitude()));
    Ok(working)
}

/// Same as [`magnitudes`], computed in parallel
pub fn par_magnitudes<T: SparseValue>(values: &[T]) -> Result<Vec<T::Real>> {
    let mut working = Vec::new();
    working
        .try_reserve_exact(values.len())
        .map_err(|_| ParIlutError::AllocationFailed { elements: values.len() })?;
    working.par_extend(values.par_iter().map(|v| v.magnitude()));
    Ok(working)
}

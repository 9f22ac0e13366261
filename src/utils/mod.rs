//! Utility functions and helpers
//!
//! Prefix sums used to build row pointers, exact-size allocation and
//! splitting of output buffers into disjoint per-row (or per-group) slices.

pub mod formats;

use rayon::prelude::*;

use crate::error::{ParIlutError, Result};

pub use formats::{from_sprs_csr, to_dense, to_sprs_csr};

/// Computes an exclusive prefix sum (scan) for a vector
///
/// The result has one more element than the input and starts at 0, so
/// scanning per-row counts yields row pointers directly.
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// Blocked parallel exclusive scan
///
/// Each block is reduced in parallel, the block totals are scanned
/// sequentially, and each block then writes its running sums starting at
/// its offset. Same output as [`exclusive_scan`].
pub fn parallel_exclusive_scan(input: &[usize], block_size: usize) -> Vec<usize> {
    let block_size = block_size.max(1);

    let block_sums: Vec<usize> = input
        .par_chunks(block_size)
        .map(|block| block.iter().sum())
        .collect();
    let block_offsets = exclusive_scan(&block_sums);

    let mut result = vec![0; input.len() + 1];
    result[1..]
        .par_chunks_mut(block_size)
        .zip(input.par_chunks(block_size))
        .zip(block_offsets.par_iter())
        .for_each(|((out, block), &offset)| {
            let mut sum = offset;
            for (slot, &val) in out.iter_mut().zip(block) {
                sum += val;
                *slot = sum;
            }
        });

    result
}

/// Allocates a vector of exactly `len` copies of `value`
///
/// Reports allocation failure instead of aborting.
pub fn try_alloc<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| ParIlutError::AllocationFailed { elements: len })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Splits parallel column/value buffers at the given offsets
///
/// `offsets` must be non-decreasing, start at 0 and end at the buffer
/// length; piece `i` covers `offsets[i]..offsets[i + 1]`. Passing row
/// pointers yields one piece per row.
pub fn split_by_offsets<'a, T>(
    offsets: &[usize],
    cols: &'a mut [usize],
    vals: &'a mut [T],
) -> Vec<(&'a mut [usize], &'a mut [T])> {
    let mut pieces = Vec::with_capacity(offsets.len().saturating_sub(1));
    let mut cols_rest = cols;
    let mut vals_rest = vals;

    for bounds in offsets.windows(2) {
        let len = bounds[1] - bounds[0];
        let (cols_head, cols_tail) = std::mem::take(&mut cols_rest).split_at_mut(len);
        let (vals_head, vals_tail) = std::mem::take(&mut vals_rest).split_at_mut(len);
        pieces.push((cols_head, vals_head));
        cols_rest = cols_tail;
        vals_rest = vals_tail;
    }

    pieces
}

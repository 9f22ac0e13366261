//! Per-row primitives shared by every backend
//!
//! Both filtering and addition run in two phases: a counting pass that
//! fixes the length of every output row, and a writing pass into buffers
//! sized from the scanned counts. The counting and writing variants of
//! each operation walk a row identically, so phase one always predicts
//! phase two exactly. Backends only decide how rows are scheduled.

use std::ops::Range;

use num_traits::Zero;

use crate::matrix::{SparseMatrixCSR, SparseValue};

/// Whether an entry survives filtering at `threshold`
///
/// Diagonal entries always survive.
#[inline]
pub fn keeps_entry<T: SparseValue>(row: usize, col: usize, val: T, threshold: T::Real) -> bool {
    col == row || val.magnitude() >= threshold
}

/// Number of entries of a row that survive filtering
pub fn count_filtered<T: SparseValue>(
    row: usize,
    cols: &[usize],
    vals: &[T],
    threshold: T::Real,
) -> usize {
    cols.iter()
        .zip(vals)
        .filter(|&(&col, &val)| keeps_entry(row, col, val, threshold))
        .count()
}

/// Writes the surviving entries of a row, keeping their relative order
///
/// `out_cols` and `out_vals` must have exactly the length returned by
/// [`count_filtered`] for the same row.
pub fn write_filtered<T: SparseValue>(
    row: usize,
    cols: &[usize],
    vals: &[T],
    threshold: T::Real,
    out_cols: &mut [usize],
    out_vals: &mut [T],
) {
    let mut nz = 0;
    for (&col, &val) in cols.iter().zip(vals) {
        if keeps_entry(row, col, val, threshold) {
            out_cols[nz] = col;
            out_vals[nz] = val;
            nz += 1;
        }
    }
    debug_assert_eq!(nz, out_cols.len(), "filter count and write passes disagree");
}

/// Walks the union of two column-sorted rows
///
/// Calls `emit(col, a_run, b_run)` once per distinct column in ascending
/// order, where the runs are the index ranges in `a_cols` and `b_cols`
/// holding that column. At least one run is non-empty; a run is longer
/// than one only if the input row repeats the column.
pub fn merge_walk<F>(a_cols: &[usize], b_cols: &[usize], mut emit: F)
where
    F: FnMut(usize, Range<usize>, Range<usize>),
{
    let mut i = 0;
    let mut j = 0;

    loop {
        let col = match (a_cols.get(i), b_cols.get(j)) {
            (Some(&ca), Some(&cb)) => ca.min(cb),
            (Some(&ca), None) => ca,
            (None, Some(&cb)) => cb,
            (None, None) => break,
        };

        let a_start = i;
        while i < a_cols.len() && a_cols[i] == col {
            i += 1;
        }
        let b_start = j;
        while j < b_cols.len() && b_cols[j] == col {
            j += 1;
        }

        emit(col, a_start..i, b_start..j);
    }
}

/// Length of the merged row: `|a| + |b| - overlap` for duplicate-free rows
pub fn count_merged(a_cols: &[usize], b_cols: &[usize]) -> usize {
    let mut count = 0;
    merge_walk(a_cols, b_cols, |_, _, _| count += 1);
    count
}

/// Writes `alpha * a + beta * b` for one row
///
/// Each side's run is scaled term by term and summed in storage order; a
/// column present in both rows gets `sum_a + sum_b`. `out_cols` and
/// `out_vals` must have exactly the length returned by [`count_merged`].
#[allow(clippy::too_many_arguments)]
pub fn write_merged<T: SparseValue>(
    alpha: T,
    a_cols: &[usize],
    a_vals: &[T],
    beta: T,
    b_cols: &[usize],
    b_vals: &[T],
    out_cols: &mut [usize],
    out_vals: &mut [T],
) {
    let mut nz = 0;
    merge_walk(a_cols, b_cols, |col, a_run, b_run| {
        let value = match (scaled_sum(alpha, &a_vals[a_run]), scaled_sum(beta, &b_vals[b_run])) {
            (Some(a), Some(b)) => a + b,
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => T::zero(),
        };
        out_cols[nz] = col;
        out_vals[nz] = value;
        nz += 1;
    });
    debug_assert_eq!(nz, out_cols.len(), "merge count and write passes disagree");
}

#[inline]
fn scaled_sum<T: SparseValue>(coef: T, vals: &[T]) -> Option<T> {
    let (&first, rest) = vals.split_first()?;
    Some(rest.iter().fold(coef * first, |acc, &v| acc + coef * v))
}

/// Row `i` of `matrix` as it takes part in an addition scaled by `coef`
///
/// A zero coefficient removes the matrix from the sum entirely, structure
/// included, so the row is empty.
#[inline]
pub fn scaled_row<T: SparseValue>(coef: T, matrix: &SparseMatrixCSR<T>, i: usize) -> (&[usize], &[T]) {
    if coef.is_zero() {
        (&matrix.col_idx[..0], &matrix.values[..0])
    } else {
        (matrix.row_cols(i), matrix.row_values(i))
    }
}

//! Utilities for converting between our matrix format and external libraries

use ndarray::Array2;
use num_traits::Num;
use sprs::CsMat;

use crate::matrix::SparseMatrixCSR;

/// Converts our CSR matrix format to sprs CsMat format
///
/// Rows are sorted by column first, since sprs requires sorted indices.
///
/// # Panics
///
/// Panics if a row holds the same column twice.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    let sorted = matrix.sort_rows();
    CsMat::new(
        (sorted.n_rows, sorted.n_cols),
        sorted.row_ptr,
        sorted.col_idx,
        sorted.values,
    )
}

/// Converts sprs CsMat in CSR format to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}

/// Expands a CSR matrix into a dense array
///
/// Duplicate entries within a row are summed.
pub fn to_dense<T>(matrix: &SparseMatrixCSR<T>) -> Array2<T>
where
    T: Copy + Num,
{
    let mut dense = Array2::from_elem((matrix.n_rows, matrix.n_cols), T::zero());
    for i in 0..matrix.n_rows {
        for (j, &val) in matrix.row_iter(i) {
            dense[[i, j]] = dense[[i, j]] + val;
        }
    }
    dense
}

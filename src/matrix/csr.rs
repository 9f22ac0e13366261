//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

use num_traits::Num;

use crate::error::{ParIlutError, Result};

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Rows need not be sorted by column. The addition kernel requires sorted
/// rows and always produces them; see [`SparseMatrixCSR::sort_rows`].
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Stored values (size: nnz)
    pub values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    ///
    /// Use [`SparseMatrixCSR::try_new`] to get an error instead.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
        assert_eq!(
            row_ptr[n_rows], col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );

        for &col in &col_idx {
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Creates a new CSR matrix, rejecting malformed layouts
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks the CSR layout invariants
    ///
    /// Verifies the row pointer length, that row pointers start at zero,
    /// never decrease and end at nnz, that column indices and values agree
    /// in length, and that every column index is below `n_cols`.
    pub fn validate(&self) -> Result<()> {
        if self.row_ptr.len() != self.n_rows + 1 {
            return Err(ParIlutError::InvalidRowPtr {
                len: self.row_ptr.len(),
                expected: self.n_rows + 1,
            });
        }
        if self.col_idx.len() != self.values.len() {
            return Err(ParIlutError::LengthMismatch {
                col_idx: self.col_idx.len(),
                values: self.values.len(),
            });
        }

        let start = self.row_ptr[0];
        let end = self.row_ptr[self.n_rows];
        if start != 0 || end != self.col_idx.len() {
            return Err(ParIlutError::NnzMismatch {
                row_ptr_start: start,
                row_ptr_end: end,
                nnz: self.col_idx.len(),
            });
        }

        // Monotonic pointers bounded by nnz at both ends stay in range, so
        // the column pass below can slice every row.
        if let Some((row, bounds)) = self
            .row_ptr
            .windows(2)
            .enumerate()
            .find(|(_, bounds)| bounds[0] > bounds[1])
        {
            return Err(ParIlutError::RowPtrNotMonotonic {
                row,
                start: bounds[0],
                end: bounds[1],
            });
        }

        for row in 0..self.n_rows {
            let (start, end) = (self.row_ptr[row], self.row_ptr[row + 1]);
            if let Some(&col) = self.col_idx[start..end].iter().find(|&&c| c >= self.n_cols) {
                return Err(ParIlutError::ColumnOutOfBounds {
                    row,
                    col,
                    n_cols: self.n_cols,
                });
            }
        }

        Ok(())
    }

    /// Returns the number of stored elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns `(n_rows, n_cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Column indices of row i
    pub fn row_cols(&self, i: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]]
    }

    /// Values of row i
    pub fn row_values(&self, i: usize) -> &[T] {
        &self.values[self.row_ptr[i]..self.row_ptr[i + 1]]
    }

    /// Returns an iterator over the stored elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a stored element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Whether every row lists its columns in non-decreasing order
    pub fn is_sorted_by_column(&self) -> bool {
        (0..self.n_rows).all(|i| self.row_cols(i).windows(2).all(|w| w[0] <= w[1]))
    }

    /// Returns a copy with every row sorted by column
    ///
    /// The sort is stable, so duplicate columns keep their storage order.
    pub fn sort_rows(&self) -> Self {
        let mut col_idx = Vec::with_capacity(self.nnz());
        let mut values = Vec::with_capacity(self.nnz());

        for i in 0..self.n_rows {
            let mut entries: Vec<(usize, T)> = self.row_iter(i).map(|(c, &v)| (c, v)).collect();
            entries.sort_by_key(|&(col, _)| col);
            for (col, val) in entries {
                col_idx.push(col);
                values.push(val);
            }
        }

        Self {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_ptr: self.row_ptr.clone(),
            col_idx,
            values,
        }
    }

    /// Number of stored entries that lie on the diagonal
    pub fn diagonal_count(&self) -> usize {
        (0..self.n_rows)
            .map(|i| self.row_cols(i).iter().filter(|&&c| c == i).count())
            .sum()
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}

//! Error types for the ParILUT kernels

use thiserror::Error;

/// Result type alias using [`ParIlutError`]
pub type Result<T> = std::result::Result<T, ParIlutError>;

/// Errors that can occur in the ParILUT kernels
///
/// Every variant except [`ParIlutError::AllocationFailed`] and
/// [`ParIlutError::ThreadPool`] is a precondition violation: the call is
/// rejected before any output is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParIlutError {
    /// Selection over an empty collection
    #[error("Cannot select from an empty collection")]
    EmptySelection,

    /// Selection rank outside `[0, size)`
    #[error("Rank {rank} out of range for collection of size {size}")]
    RankOutOfRange {
        /// Requested rank
        rank: usize,
        /// Collection size
        size: usize,
    },

    /// Row pointer array has the wrong length
    #[error("Invalid row pointers: length {len} (expected {expected})")]
    InvalidRowPtr {
        /// Actual length
        len: usize,
        /// Expected length (rows + 1)
        expected: usize,
    },

    /// Row pointers decrease somewhere
    #[error("Row pointers not monotonic at row {row}: {start} > {end}")]
    RowPtrNotMonotonic {
        /// Offending row
        row: usize,
        /// row_ptr[row]
        start: usize,
        /// row_ptr[row + 1]
        end: usize,
    },

    /// Row pointers do not start at zero or do not end at nnz
    #[error("Row pointers span [{row_ptr_start}, {row_ptr_end}) but matrix stores {nnz} entries")]
    NnzMismatch {
        /// row_ptr[0]
        row_ptr_start: usize,
        /// row_ptr[rows]
        row_ptr_end: usize,
        /// Stored entries
        nnz: usize,
    },

    /// Column index and value arrays disagree in length
    #[error("Length mismatch: {col_idx} column indices but {values} values")]
    LengthMismatch {
        /// Number of column indices
        col_idx: usize,
        /// Number of values
        values: usize,
    },

    /// Column index outside `[0, n_cols)`
    #[error("Column index {col} in row {row} out of bounds (n_cols = {n_cols})")]
    ColumnOutOfBounds {
        /// Row holding the entry
        row: usize,
        /// Offending column index
        col: usize,
        /// Number of columns
        n_cols: usize,
    },

    /// Operands of a binary kernel have different shapes
    #[error("Dimension mismatch: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        /// Shape of the left operand
        lhs: (usize, usize),
        /// Shape of the right operand
        rhs: (usize, usize),
    },

    /// Invalid scalar argument
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Output buffer could not be allocated
    #[error("Failed to allocate output buffer of {elements} elements")]
    AllocationFailed {
        /// Requested number of elements
        elements: usize,
    },

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for ParIlutError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ParIlutError::ThreadPool(err.to_string())
    }
}

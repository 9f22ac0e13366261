//! # ParILUT kernels
//!
//! The computational core of a parallel threshold-based incomplete LU
//! factorization (ParILUT). Each refinement sweep of a factor enlarges it
//! with candidate fill-in, picks a magnitude threshold that keeps a target
//! number of entries, and drops everything below it.
//!
//! ## Kernels
//!
//! 1. **Threshold selection**: the magnitude at a given rank of an unsorted
//!    value array, found by selection rather than sorting.
//!
//! 2. **Threshold filtering**: a CSR copy that keeps entries at or above
//!    the threshold, plus every stored diagonal entry.
//!
//! 3. **Generalized sparse addition**: `C = alpha * A + beta * B` over the
//!    union of two column-sorted patterns.
//!
//! Filtering and addition both count first, scan the counts into row
//! pointers, allocate exactly, then fill.
//!
//! ## Backends
//!
//! The [`ParIlutKernels`] trait is implemented by a sequential reference
//! backend, a multicore backend and an accelerator-style lane-group
//! backend. [`create_kernels`] picks one from a [`ParIlutConfig`].
//!
//! ## Usage
//!
//! ```
//! use parilut::{create_kernels, Backend, ParIlutConfig, SparseMatrixCSR};
//!
//! let a = SparseMatrixCSR::<f64>::new(
//!     2, 2,
//!     vec![0, 2, 4],
//!     vec![0, 1, 0, 1],
//!     vec![4.0, 0.1, -3.0, 0.2],
//! );
//!
//! let config = ParIlutConfig::for_backend(Backend::Reference);
//! let kernels = create_kernels::<f64>(&config).unwrap();
//!
//! // keep the two largest entries
//! let threshold = kernels.threshold_select(&a.values, a.nnz() - 2).unwrap();
//! let filtered = kernels.threshold_filter(&a, threshold).unwrap();
//!
//! // (1, 1) survives as a diagonal entry despite its magnitude
//! assert_eq!(filtered.col_idx, vec![0, 0, 1]);
//! ```

pub mod constants;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod select;
pub mod sweep;
pub mod utils;

// Re-export primary components
pub use error::{ParIlutError, Result};
pub use kernels::{
    create_kernels, spgeam, threshold_filter, threshold_select, AcceleratorKernels, ParIlutKernels,
    ParallelKernels, ReferenceKernels,
};
pub use matrix::{
    compare_magnitudes, Backend, ParIlutConfig, SparseMatrixCSR, SparseValue, SystemParameters,
};
pub use sweep::{refine_factor, SweepSummary};
pub use utils::{from_sprs_csr, to_dense, to_sprs_csr};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

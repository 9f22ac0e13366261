// Matrix data structures, value types and configuration

pub mod config;
pub mod csr;
pub mod value;

pub use config::{Backend, ParIlutConfig, SystemParameters};
pub use csr::SparseMatrixCSR;
pub use value::{compare_magnitudes, SparseValue};

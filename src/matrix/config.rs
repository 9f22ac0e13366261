//! Configuration and system parameters for the ParILUT kernels

use crate::constants::{
    DEFAULT_LANE_GROUP_SIZE, DEFAULT_MAX_SELECT_DEPTH, DEFAULT_SELECT_BASE_CASE,
    DEFAULT_SELECT_BUCKET_COUNT, DEFAULT_SELECT_SAMPLE_SIZE,
};

/// Execution backend for the three kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Sequential reference implementation
    Reference,
    /// Shared-memory data parallelism over rows and value partitions
    Parallel,
    /// Many small lane groups with blocked scans and bucket selection
    Accelerator,
}

impl Backend {
    /// All backends, in order of increasing parallelism
    pub const ALL: [Backend; 3] = [Backend::Reference, Backend::Parallel, Backend::Accelerator];

    /// Short backend name used in logs and benchmark ids
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Reference => "reference",
            Backend::Parallel => "parallel",
            Backend::Accelerator => "accelerator",
        }
    }

    /// Whether this backend runs on a worker pool
    pub fn is_parallel(&self) -> bool {
        !matches!(self, Backend::Reference)
    }
}

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of threads to use
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
        }
    }
}

/// Configuration for the ParILUT kernels
#[derive(Debug, Clone)]
pub struct ParIlutConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Backend executing the kernels
    pub backend: Backend,

    /// Rows handled by one lane group on the accelerator backend
    pub lane_group_size: usize,

    /// Number of samples drawn per sample-select round
    pub select_sample_size: usize,

    /// Number of buckets per sample-select round
    pub select_bucket_count: usize,

    /// Below this size, selection switches to the sequential quickselect
    pub select_base_case: usize,

    /// Recursion depth after which selection falls back to a full sort
    pub max_select_depth: usize,
}

impl Default for ParIlutConfig {
    fn default() -> Self {
        Self::for_backend(Backend::Parallel)
    }
}

impl ParIlutConfig {
    /// Create a config for a specific backend
    pub fn for_backend(backend: Backend) -> Self {
        Self {
            system_params: SystemParameters::default(),
            backend,
            lane_group_size: DEFAULT_LANE_GROUP_SIZE,
            select_sample_size: DEFAULT_SELECT_SAMPLE_SIZE,
            select_bucket_count: DEFAULT_SELECT_BUCKET_COUNT,
            select_base_case: DEFAULT_SELECT_BASE_CASE,
            max_select_depth: DEFAULT_MAX_SELECT_DEPTH,
        }
    }

    /// Same config with a fixed thread count
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.system_params.n_threads = n_threads;
        self
    }
}

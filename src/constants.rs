//! Centralized constants for the ParILUT kernels
//!
//! Tuning defaults for selection and the accelerator execution model,
//! organized by category.

// ============================================================================
// SELECTION
// ============================================================================

/// Samples drawn per sample-select round
pub const DEFAULT_SELECT_SAMPLE_SIZE: usize = 1024;

/// Buckets per sample-select round (splitters = buckets - 1)
pub const DEFAULT_SELECT_BUCKET_COUNT: usize = 256;

/// Size below which parallel selection hands off to sequential quickselect
pub const DEFAULT_SELECT_BASE_CASE: usize = 4096;

/// Recursion depth after which selection falls back to a full sort
pub const DEFAULT_MAX_SELECT_DEPTH: usize = 32;

/// Size below which quickselect sorts directly
pub const QUICKSELECT_SORT_CUTOFF: usize = 16;

// ============================================================================
// ACCELERATOR EXECUTION MODEL
// ============================================================================

/// Rows handled by one lane group
pub const DEFAULT_LANE_GROUP_SIZE: usize = 32;

/// Elements reduced by one block in the blocked parallel scan and the
/// bucket histogram
pub const SCAN_BLOCK_SIZE: usize = 1024;

//! Parallel partition-based selection
//!
//! Each round picks a pivot from a small equidistant sample, then splits
//! the working set into `< pivot` and `> pivot` with rayon. The `== pivot`
//! run is only counted. Once the working set drops below the base case the
//! search continues sequentially.

use num_traits::Float;
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{trace, warn};

use crate::matrix::compare_magnitudes;
use crate::select::quickselect;

const PIVOT_SAMPLES: usize = 9;

/// Returns the element that would sit at `rank` after sorting `data`
///
/// # Panics
///
/// Panics if `rank >= data.len()`; callers check ranks first.
pub fn parallel_select<R>(mut data: Vec<R>, mut rank: usize, base_case: usize, max_depth: usize) -> R
where
    R: Float + Send + Sync,
{
    assert!(rank < data.len(), "rank {} out of range for {} elements", rank, data.len());

    let mut depth = 0;
    loop {
        if data.len() <= base_case {
            return quickselect(&mut data, rank, max_depth);
        }
        if depth >= max_depth {
            warn!(depth, len = data.len(), "parallel select depth cap reached, sorting");
            data.par_sort_unstable_by(compare_magnitudes);
            return data[rank];
        }

        let pivot = sample_pivot(&data);
        let less: Vec<R> = data
            .par_iter()
            .copied()
            .filter(|x| compare_magnitudes(x, &pivot) == Ordering::Less)
            .collect();
        let greater: Vec<R> = data
            .par_iter()
            .copied()
            .filter(|x| compare_magnitudes(x, &pivot) == Ordering::Greater)
            .collect();
        let equal = data.len() - less.len() - greater.len();
        trace!(depth, len = data.len(), less = less.len(), equal, "parallel select round");

        if rank < less.len() {
            data = less;
        } else if rank < less.len() + equal {
            return pivot;
        } else {
            rank -= less.len() + equal;
            data = greater;
        }
        depth += 1;
    }
}

/// Median of an equidistant sample
///
/// The pivot is always an element of `data`, so the `== pivot` run is
/// never empty and every round makes progress.
fn sample_pivot<R: Float>(data: &[R]) -> R {
    let count = PIVOT_SAMPLES.min(data.len());
    let stride = data.len() / count;
    let mut sample: Vec<R> = (0..count).map(|i| data[i * stride]).collect();
    sample.sort_unstable_by(compare_magnitudes);
    sample[count / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sort() {
        let data: Vec<f64> = (0..10_000).map(|i| ((i * 7919) % 10_007) as f64).collect();
        let mut reference = data.clone();
        reference.sort_by(compare_magnitudes);

        for rank in [0, 1, 500, 4999, 5000, 9998, 9999] {
            assert_eq!(parallel_select(data.clone(), rank, 64, 32), reference[rank]);
        }
    }

    #[test]
    fn test_heavy_duplicates() {
        let data: Vec<f32> = (0..5000).map(|i| (i % 3) as f32).collect();
        assert_eq!(parallel_select(data.clone(), 0, 16, 32), 0.0);
        assert_eq!(parallel_select(data.clone(), 2500, 16, 32), 1.0);
        assert_eq!(parallel_select(data, 4999, 16, 32), 2.0);
    }

    #[test]
    fn test_depth_cap() {
        let data: Vec<f64> = (0..1000).rev().map(|i| i as f64).collect();
        assert_eq!(parallel_select(data, 123, 16, 0), 123.0);
    }

    #[test]
    fn test_sample_pivot_is_member() {
        let data = vec![4.0f64, 8.0, 15.0, 16.0, 23.0, 42.0];
        let pivot = sample_pivot(&data);
        assert!(data.contains(&pivot));
    }
}

//! Bucket sample-select
//!
//! The selection scheme of a massively parallel backend: a sorted sample
//! defines `bucket_count - 1` splitters, every element is classified into
//! a bucket, per-block histograms are reduced into global bucket counts,
//! and a scan over the counts names the one bucket that holds the
//! requested rank. Only that bucket survives into the next round.

use num_traits::Float;
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{trace, warn};

use crate::constants::{
    DEFAULT_MAX_SELECT_DEPTH, DEFAULT_SELECT_BASE_CASE, DEFAULT_SELECT_BUCKET_COUNT,
    DEFAULT_SELECT_SAMPLE_SIZE, SCAN_BLOCK_SIZE,
};
use crate::matrix::compare_magnitudes;
use crate::select::quickselect;
use crate::utils::exclusive_scan;

/// Tuning of [`sample_select`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSelectParams {
    /// Samples drawn per round
    pub sample_size: usize,
    /// Buckets per round
    pub bucket_count: usize,
    /// Below this size the search finishes with quickselect
    pub base_case: usize,
    /// Rounds before falling back to a full sort
    pub max_depth: usize,
    /// Elements per histogram block
    pub block_size: usize,
}

impl Default for SampleSelectParams {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SELECT_SAMPLE_SIZE,
            bucket_count: DEFAULT_SELECT_BUCKET_COUNT,
            base_case: DEFAULT_SELECT_BASE_CASE,
            max_depth: DEFAULT_MAX_SELECT_DEPTH,
            block_size: SCAN_BLOCK_SIZE,
        }
    }
}

/// Returns the element that would sit at `rank` after sorting `data`
///
/// # Panics
///
/// Panics if `rank >= data.len()`; callers check ranks first.
pub fn sample_select<R>(mut data: Vec<R>, mut rank: usize, params: &SampleSelectParams) -> R
where
    R: Float + Send + Sync,
{
    assert!(rank < data.len(), "rank {} out of range for {} elements", rank, data.len());

    let bucket_count = params.bucket_count.max(2);
    let block_size = params.block_size.max(1);
    let mut depth = 0;

    loop {
        let len = data.len();
        if len <= params.base_case {
            return quickselect(&mut data, rank, params.max_depth);
        }
        if depth >= params.max_depth {
            warn!(depth, len, "sample select depth cap reached, sorting");
            data.par_sort_unstable_by(compare_magnitudes);
            return data[rank];
        }

        let sample_size = params.sample_size.max(bucket_count).min(len);
        let splitters = choose_splitters(&data, sample_size, bucket_count);
        let histogram = bucket_histogram(&data, &splitters, block_size);
        let offsets = exclusive_scan(&histogram);

        // Last bucket whose offset does not exceed the rank; it is never
        // empty because the next offset is already past the rank.
        let bucket = offsets.partition_point(|&offset| offset <= rank) - 1;
        trace!(depth, len, bucket, bucket_len = histogram[bucket], "sample select round");

        if histogram[bucket] == len {
            return finish_without_progress(data, rank, params.max_depth);
        }

        rank -= offsets[bucket];
        data = data
            .par_iter()
            .copied()
            .filter(|x| bucket_of(&splitters, x) == bucket)
            .collect();
        depth += 1;
    }
}

/// Sorted sample reduced to `bucket_count - 1` equidistant splitters
fn choose_splitters<R: Float>(data: &[R], sample_size: usize, bucket_count: usize) -> Vec<R> {
    let stride = data.len() / sample_size;
    let mut sample: Vec<R> = (0..sample_size).map(|i| data[i * stride]).collect();
    sample.sort_unstable_by(compare_magnitudes);

    (1..bucket_count)
        .map(|b| sample[b * sample_size / bucket_count])
        .collect()
}

/// Bucket index of `x`: the number of splitters not greater than `x`
#[inline]
fn bucket_of<R: Float>(splitters: &[R], x: &R) -> usize {
    splitters.partition_point(|s| compare_magnitudes(s, x) != Ordering::Greater)
}

/// Per-block histograms, reduced into global bucket counts
fn bucket_histogram<R>(data: &[R], splitters: &[R], block_size: usize) -> Vec<usize>
where
    R: Float + Send + Sync,
{
    let bucket_count = splitters.len() + 1;
    data.par_chunks(block_size)
        .map(|block| {
            let mut counts = vec![0usize; bucket_count];
            for x in block {
                counts[bucket_of(splitters, x)] += 1;
            }
            counts
        })
        .reduce(
            || vec![0usize; bucket_count],
            |mut acc, counts| {
                for (total, count) in acc.iter_mut().zip(counts) {
                    *total += count;
                }
                acc
            },
        )
}

/// Every element landed in a single bucket
///
/// Either all elements are equal, which answers the query directly, or
/// the sample was too unlucky to split them and the sequential search
/// takes over.
fn finish_without_progress<R>(mut data: Vec<R>, rank: usize, max_depth: usize) -> R
where
    R: Float + Send + Sync,
{
    let first = data[0];
    if data.par_iter().all(|x| compare_magnitudes(x, &first) == Ordering::Equal) {
        return first;
    }
    warn!(len = data.len(), "sample select made no progress, switching to quickselect");
    quickselect(&mut data, rank, max_depth)
}

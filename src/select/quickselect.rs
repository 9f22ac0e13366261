//! Sequential quickselect with three-way partitioning

use num_traits::Float;
use std::cmp::Ordering;
use tracing::{trace, warn};

use crate::constants::QUICKSELECT_SORT_CUTOFF;
use crate::matrix::compare_magnitudes;

/// Returns the element that would sit at `rank` after sorting `data`
///
/// `data` is reordered in place. Each round partitions the active range
/// into `< pivot`, `== pivot` and `> pivot`, so runs of equal values end
/// the search instead of stalling it. After `max_depth` rounds the active
/// range is sorted outright.
///
/// # Panics
///
/// Panics if `rank >= data.len()`; callers check ranks first.
pub fn quickselect<R: Float>(data: &mut [R], rank: usize, max_depth: usize) -> R {
    assert!(rank < data.len(), "rank {} out of range for {} elements", rank, data.len());

    let mut lo = 0;
    let mut hi = data.len();
    let mut depth = 0;

    loop {
        let len = hi - lo;
        if len <= QUICKSELECT_SORT_CUTOFF {
            data[lo..hi].sort_unstable_by(compare_magnitudes);
            return data[rank];
        }
        if depth >= max_depth {
            warn!(depth, len, "quickselect depth cap reached, sorting remaining range");
            data[lo..hi].sort_unstable_by(compare_magnitudes);
            return data[rank];
        }

        let pivot = median_of_three(data[lo], data[lo + len / 2], data[hi - 1]);
        let (lt, gt) = partition_three_way(&mut data[lo..hi], pivot);
        let (lt, gt) = (lo + lt, lo + gt);
        trace!(depth, len, less = lt - lo, equal = gt - lt, "quickselect round");

        if rank < lt {
            hi = lt;
        } else if rank < gt {
            return pivot;
        } else {
            lo = gt;
        }
        depth += 1;
    }
}

fn median_of_three<R: Float>(a: R, b: R, c: R) -> R {
    let mut three = [a, b, c];
    three.sort_unstable_by(compare_magnitudes);
    three[1]
}

/// Dutch national flag partition
///
/// Returns `(lt, gt)` with `data[..lt] < pivot`, `data[lt..gt] == pivot`
/// and `data[gt..] > pivot`.
fn partition_three_way<R: Float>(data: &mut [R], pivot: R) -> (usize, usize) {
    let mut lt = 0;
    let mut i = 0;
    let mut gt = data.len();

    while i < gt {
        match compare_magnitudes(&data[i], &pivot) {
            Ordering::Less => {
                data.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                data.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }

    (lt, gt)
}

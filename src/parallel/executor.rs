//! Work partitioning and dispatch for concurrent map/reduce.
//!
//! A scoped thread pool performs the slice work, and results are collected
//! through an `IndexedParallelIterator`, which rayon guarantees returns them
//! in source order regardless of which slice finishes first.

use rayon::prelude::*;

use crate::error::{Error, Result};

/// Below this input size, map/reduce runs sequentially on the calling
/// thread instead of dispatching to the worker pool.
pub const DEFAULT_MULTITHREAD_THRESHOLD: usize = 32;

/// Number of workers the runtime can use, per `hardware_concurrency()`.
pub fn hardware_concurrency() -> usize {
    num_cpus::get().max(1)
}

/// Slice count for an input of size `n`: `min(n, hardware_concurrency())`,
/// never zero.
pub fn slice_count(n: usize) -> usize {
    n.min(hardware_concurrency()).max(1)
}

/// Splits `[0, n)` into `k` contiguous, near-equal slices. The last slice
/// absorbs the remainder so no element is ever dropped.
pub fn slice_bounds(n: usize, k: usize) -> Vec<(usize, usize)> {
    let k = k.max(1);
    let base = n / k;
    let remainder = n % k;
    let mut bounds = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let extra = if i + 1 == k { remainder } else { 0 };
        let end = start + base + extra;
        bounds.push((start, end));
        start = end;
    }
    bounds
}

/// Runs `work` over `slice_count(n)` slices of `[0, n)` on a scoped rayon
/// thread pool, returning results in slice order. A slice error short
/// circuits the collection; which error is returned when multiple slices
/// fail is unspecified.
pub fn run_sliced<F, R>(n: usize, work: F) -> Result<Vec<R>>
where
    F: Fn(usize, usize) -> Result<R> + Send + Sync,
    R: Send,
{
    let k = slice_count(n);
    let bounds = slice_bounds(n, k);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(k)
        .build()
        .map_err(|e| Error::Internal {
            message: format!("failed to create worker pool: {}", e),
        })?;

    pool.install(|| bounds.par_iter().map(|&(lo, hi)| work(lo, hi)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_bounds_even_split() {
        let bounds = slice_bounds(8, 4);
        assert_eq!(bounds, vec![(0, 2), (2, 4), (4, 6), (6, 8)]);
    }

    #[test]
    fn test_slice_bounds_residue_absorbed_by_last() {
        let bounds = slice_bounds(10, 3);
        assert_eq!(bounds, vec![(0, 3), (3, 6), (6, 10)]);
        let total: usize = bounds.iter().map(|&(lo, hi)| hi - lo).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_slice_bounds_single_slice() {
        assert_eq!(slice_bounds(5, 1), vec![(0, 5)]);
    }

    #[test]
    fn test_run_sliced_preserves_order() {
        let results = run_sliced(10, |lo, hi| Ok((lo, hi))).unwrap();
        let mut prev_end = 0;
        for (lo, hi) in results {
            assert_eq!(lo, prev_end);
            prev_end = hi;
        }
        assert_eq!(prev_end, 10);
    }

    #[test]
    fn test_run_sliced_propagates_error() {
        let result: Result<Vec<i64>> = run_sliced(10, |lo, _hi| {
            if lo == 0 {
                Err(Error::Internal {
                    message: "boom".to_string(),
                })
            } else {
                Ok(0)
            }
        });
        assert!(result.is_err());
    }
}

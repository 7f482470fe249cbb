//! Concurrency runtime: slices map/reduce inputs across a rayon worker
//! pool and reassembles results deterministically in slice order.

mod executor;

pub use executor::{
    hardware_concurrency, run_sliced, slice_bounds, slice_count, DEFAULT_MULTITHREAD_THRESHOLD,
};

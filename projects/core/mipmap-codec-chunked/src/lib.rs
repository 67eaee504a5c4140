#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod container;
pub mod settings;

mod compress;
mod decompress;
mod error;

use alloc::vec::Vec;

pub use compress::compress_chunked;
pub use container::{ChunkEntry, ContainerHeader, ContainerLayout};
pub use decompress::{decompress_chunked, decompress_chunked_slice};
pub use error::{ChunkedError, ContainerError};
pub use settings::{ChunkedSettings, ChunkedSettingsBuilder, DEFAULT_MAX_BLOCK_SIZE};

#[cfg(test)]
pub mod test_prelude;

/// Runs `f` over every task, returning the results in task order.
///
/// Every task runs to completion, even if an earlier one failed.
#[cfg(feature = "multithreaded")]
pub(crate) fn run_tasks<T, R, F>(parallel: bool, tasks: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        // One chunk per rayon job; chunks are large.
        tasks.into_par_iter().with_max_len(1).map(f).collect()
    } else {
        tasks.into_iter().map(f).collect()
    }
}

/// Runs `f` over every task, returning the results in task order.
#[cfg(not(feature = "multithreaded"))]
pub(crate) fn run_tasks<T, R, F>(_parallel: bool, tasks: Vec<T>, f: F) -> Vec<R>
where
    F: Fn(T) -> R,
{
    tasks.into_iter().map(f).collect()
}

/// Runs `f` over every task with a scratch value shared by the tasks of one worker, returning
/// the results in task order.
///
/// Each rayon job starts from `S::default()`; sequential runs use one scratch for every task.
#[cfg(feature = "multithreaded")]
pub(crate) fn run_tasks_with_scratch<T, S, R, F>(parallel: bool, tasks: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    S: Default,
    R: Send,
    F: Fn(&mut S, T) -> R + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        tasks.into_par_iter().map_init(S::default, f).collect()
    } else {
        let mut scratch = S::default();
        tasks.into_iter().map(|task| f(&mut scratch, task)).collect()
    }
}

/// Runs `f` over every task with one scratch value, returning the results in task order.
#[cfg(not(feature = "multithreaded"))]
pub(crate) fn run_tasks_with_scratch<T, S, R, F>(_parallel: bool, tasks: Vec<T>, f: F) -> Vec<R>
where
    S: Default,
    F: Fn(&mut S, T) -> R,
{
    let mut scratch = S::default();
    tasks.into_iter().map(|task| f(&mut scratch, task)).collect()
}

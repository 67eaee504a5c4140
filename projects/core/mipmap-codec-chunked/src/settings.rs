//! Settings shared by compression and decompression.

use crate::error::ChunkedError;
use core::fmt::Debug;

/// Default chunk size; the size of a mip chunk in the game engine.
pub const DEFAULT_MAX_BLOCK_SIZE: u32 = 0x20000;

/// Settings for [`compress_chunked`] and [`decompress_chunked`].
///
/// The same `max_block_size` must be used to read a container as was used to write it.
///
/// [`compress_chunked`]: crate::compress_chunked
/// [`decompress_chunked`]: crate::decompress_chunked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedSettings {
    /// Largest number of uncompressed bytes in a single chunk. Must be non-zero.
    pub max_block_size: u32,

    /// Process chunks on the rayon thread pool.
    /// Ignored without the `multithreaded` feature.
    pub parallel: bool,
}

impl ChunkedSettings {
    /// Returns the block size, or an error if the settings can't be used.
    pub(crate) fn validated_block_size<E: Debug>(&self) -> Result<u32, ChunkedError<E>> {
        if self.max_block_size == 0 {
            return Err(ChunkedError::InvalidSettings);
        }
        Ok(self.max_block_size)
    }
}

impl Default for ChunkedSettings {
    fn default() -> Self {
        ChunkedSettingsBuilder::new().build()
    }
}

/// Builder for [`ChunkedSettings`].
#[derive(Debug, Clone, Copy)]
pub struct ChunkedSettingsBuilder {
    max_block_size: Option<u32>,
    parallel: Option<bool>,
}

impl ChunkedSettingsBuilder {
    /// Create a new settings builder.
    pub fn new() -> Self {
        Self {
            max_block_size: None,
            parallel: None,
        }
    }

    /// Set the largest number of uncompressed bytes per chunk.
    ///
    /// Smaller chunks allow more parallelism at the cost of compression ratio.
    /// Defaults to [`DEFAULT_MAX_BLOCK_SIZE`].
    pub fn max_block_size(mut self, max_block_size: u32) -> Self {
        self.max_block_size = Some(max_block_size);
        self
    }

    /// Set whether chunks are processed in parallel. Defaults to `true`.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Build the settings using the configured values.
    pub fn build(self) -> ChunkedSettings {
        ChunkedSettings {
            max_block_size: self.max_block_size.unwrap_or(DEFAULT_MAX_BLOCK_SIZE),
            parallel: self.parallel.unwrap_or(true),
        }
    }
}

impl Default for ChunkedSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

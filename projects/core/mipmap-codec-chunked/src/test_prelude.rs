//! Common test imports and utilities for chunked compression tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::error::{ChunkedError, ContainerError};
pub use crate::settings::{ChunkedSettings, ChunkedSettingsBuilder};

// Common types from mipmap_codec_common
pub use mipmap_codec_common::compressor::{ByteCompressor, NoCompression};

/// Helper to generate `len` bytes of non-repeating-looking test data.
pub(crate) fn test_data(len: usize) -> Vec<u8> {
    (0..len).map(|x| (x % 251) as u8).collect()
}

/// Helper to generate `chunks` chunks of `block_size` bytes, each filled with its chunk index.
/// [`FailingCompressor`] uses the first byte of a chunk to decide whether to fail it.
pub(crate) fn chunk_marked_data(chunks: usize, block_size: usize) -> Vec<u8> {
    (0..chunks * block_size)
        .map(|x| (x / block_size) as u8)
        .collect()
}

/// Error returned by [`FailingCompressor`], carrying the marker byte of the failing chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MarkerError(pub u8);

/// Copy-through compressor that misbehaves on chunks whose first byte is listed.
#[derive(Debug, Default)]
pub(crate) struct FailingCompressor {
    pub fail_compress_on: Vec<u8>,
    pub fail_decompress_on: Vec<u8>,
    pub empty_on: Option<u8>,
    pub oversize_on: Option<u8>,
}

impl ByteCompressor for FailingCompressor {
    type Error = MarkerError;

    fn max_compressed_size(&self, len_bytes: usize) -> usize {
        len_bytes
    }

    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        let marker = source.first().copied().unwrap_or(0);
        if self.fail_compress_on.contains(&marker) {
            return Err(MarkerError(marker));
        }
        if self.empty_on == Some(marker) {
            return Ok(0);
        }

        destination[..source.len()].copy_from_slice(source);
        Ok(source.len())
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        let marker = source.first().copied().unwrap_or(0);
        if self.fail_decompress_on.contains(&marker) {
            return Err(MarkerError(marker));
        }

        destination[..source.len()].copy_from_slice(source);
        if self.oversize_on == Some(marker) {
            destination[source.len()] = marker;
            return Ok(source.len() + 1);
        }
        Ok(source.len())
    }
}

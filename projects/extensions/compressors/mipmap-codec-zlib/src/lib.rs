#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use mipmap_codec_common::compressor::ByteCompressor;
use thiserror::Error;

/// Errors that can occur during zlib compression or decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZlibError {
    /// Invalid compression level
    #[error("Invalid compression level: {0}")]
    InvalidLevel(u32),

    /// The output did not fit in the destination buffer.
    #[error("Destination buffer too small")]
    DestinationTooSmall,

    /// The compressed stream ended before its final block.
    #[error("Compressed stream is truncated")]
    Truncated,

    /// The compressed stream is not valid zlib data.
    #[error("Compressed stream is corrupt")]
    Corrupt,

    /// The deflate encoder reported an error.
    #[error("Zlib compression failed")]
    CompressFailed,
}

/// Zlib implementation of [`ByteCompressor`].
///
/// The compression level is configured when creating the compressor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibCompressor {
    compression_level: u32,
}

impl ZlibCompressor {
    /// Creates a new zlib compressor with the specified compression level.
    ///
    /// # Parameters
    /// * `compression_level` - Compression level (0-9, where 0 stores and 9 is best compression)
    pub fn new(compression_level: u32) -> Result<Self, ZlibError> {
        if compression_level > 9 {
            return Err(ZlibError::InvalidLevel(compression_level));
        }

        Ok(Self { compression_level })
    }

    /// Creates a new zlib compressor with compression level 1 (fastest).
    pub fn new_fast() -> Self {
        Self {
            compression_level: 1,
        }
    }

    /// Creates a new zlib compressor with compression level 6 (default).
    pub fn new_default() -> Self {
        Self {
            compression_level: 6,
        }
    }

    /// Creates a new zlib compressor with compression level 9 (best compression).
    pub fn new_best() -> Self {
        Self {
            compression_level: 9,
        }
    }

    /// The compression level used by [`ByteCompressor::compress`].
    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }
}

impl Default for ZlibCompressor {
    fn default() -> Self {
        Self::new_default()
    }
}

impl ByteCompressor for ZlibCompressor {
    type Error = ZlibError;

    /// Same bound as zlib's `compressBound`.
    fn max_compressed_size(&self, len_bytes: usize) -> usize {
        len_bytes
            .saturating_add(len_bytes >> 12)
            .saturating_add(len_bytes >> 14)
            .saturating_add(len_bytes >> 25)
            .saturating_add(13)
    }

    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        compress(self.compression_level, source, destination)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        decompress(source, destination)
    }
}

/// Compresses data into a single zlib stream.
/// Does not use fallback to 'copy' if compression is ineffective.
///
/// # Parameters
///
/// * `level`: Level at which we are compressing.
/// * `source`: Source data to compress.
/// * `destination`: Destination buffer.
fn compress(level: u32, source: &[u8], destination: &mut [u8]) -> Result<usize, ZlibError> {
    let mut stream = Compress::new(Compression::new(level), true);
    match stream.compress(source, destination, FlushCompress::Finish) {
        Ok(Status::StreamEnd) => Ok(stream.total_out() as usize),
        Ok(_) => Err(ZlibError::DestinationTooSmall),
        Err(_) => Err(ZlibError::CompressFailed),
    }
}

/// Decompresses a single zlib stream.
///
/// # Parameters
///
/// * `source`: Source data to decompress.
/// * `destination`: Destination buffer for decompressed data.
fn decompress(source: &[u8], destination: &mut [u8]) -> Result<usize, ZlibError> {
    let mut stream = Decompress::new(true);
    match stream.decompress(source, destination, FlushDecompress::Finish) {
        Ok(Status::StreamEnd) => Ok(stream.total_out() as usize),
        Ok(_) if stream.total_out() as usize == destination.len() => {
            Err(ZlibError::DestinationTooSmall)
        }
        Ok(_) => Err(ZlibError::Truncated),
        Err(_) => Err(ZlibError::Corrupt),
    }
}

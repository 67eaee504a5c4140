//! Byte level compression seam.
//!
//! The chunked container compressor does not know how bytes are compressed; it hands each
//! chunk to a [`ByteCompressor`]. Implementations carry their own configuration (such as the
//! compression level), and must be usable from multiple threads at once, since chunks are
//! processed in parallel.

use alloc::boxed::Box;

/// A one-shot byte compressor.
///
/// # Contract
///
/// - [`ByteCompressor::compress`] is given a destination of at least
///   [`ByteCompressor::max_compressed_size`] bytes and returns the number of bytes written.
/// - [`ByteCompressor::decompress`] writes at most `destination.len()` bytes and returns the
///   number of bytes written. Output that does not fit is an error, not a truncation.
/// - Data compressed by an instance must be decompressible by any other instance of the same
///   type, regardless of its compression level.
pub trait ByteCompressor: Sync {
    /// The error type returned by compression operations.
    type Error: core::fmt::Debug + Send;

    /// Returns the maximum size required for a compression buffer.
    ///
    /// # Parameters
    /// * `len_bytes` - Length of the input data in bytes
    fn max_compressed_size(&self, len_bytes: usize) -> usize;

    /// Compresses `source` into `destination`.
    ///
    /// # Returns
    /// The number of bytes written to `destination`.
    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error>;

    /// Decompresses `source` into `destination`.
    ///
    /// # Returns
    /// The number of bytes written to `destination`.
    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Blanket implementation of [`ByteCompressor`] for any boxed variant of it.
impl<T: ByteCompressor + ?Sized> ByteCompressor for Box<T> {
    type Error = T::Error;

    fn max_compressed_size(&self, len_bytes: usize) -> usize {
        (**self).max_compressed_size(len_bytes)
    }

    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).compress(source, destination)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).decompress(source, destination)
    }
}

/// Impl for references, so a compressor can be shared without cloning.
impl<T: ByteCompressor + ?Sized> ByteCompressor for &T {
    type Error = T::Error;

    fn max_compressed_size(&self, len_bytes: usize) -> usize {
        (**self).max_compressed_size(len_bytes)
    }

    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).compress(source, destination)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).decompress(source, destination)
    }
}

/// Compressor which stores bytes as-is.
///
/// Useful for inspecting the container layout and for testing; the output is
/// always exactly as large as the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompression;

/// Error returned by [`NoCompression`] when the destination cannot hold the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationTooSmall {
    /// Bytes that had to be written.
    pub needed: usize,
    /// Bytes available.
    pub actual: usize,
}

impl ByteCompressor for NoCompression {
    type Error = DestinationTooSmall;

    fn max_compressed_size(&self, len_bytes: usize) -> usize {
        len_bytes
    }

    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        copy_to(source, destination)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        copy_to(source, destination)
    }
}

fn copy_to(source: &[u8], destination: &mut [u8]) -> Result<usize, DestinationTooSmall> {
    let Some(target) = destination.get_mut(..source.len()) else {
        return Err(DestinationTooSmall {
            needed: source.len(),
            actual: destination.len(),
        });
    };
    target.copy_from_slice(source);
    Ok(source.len())
}

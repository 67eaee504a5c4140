//! Error types for chunked compression.

use mipmap_codec_common::allocate::AllocateError;
use thiserror::Error;

/// A container whose framing or chunk table is inconsistent.
///
/// Detected before any chunk is decompressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Fewer bytes were provided than the container needs.
    #[error("Container truncated: need {needed} bytes, but only {actual} bytes available.")]
    Truncated {
        /// The required size in bytes
        needed: u64,
        /// The actual size in bytes
        actual: u64,
    },

    /// The header describes a container of a different size than the one provided.
    #[error("Container framing mismatch: header describes {expected} bytes, got {actual}.")]
    FramingMismatch {
        /// Size computed from the header
        expected: u64,
        /// Size of the provided container
        actual: u64,
    },

    /// The chunk table's compressed sizes don't add up to the header's.
    #[error("Chunk table compressed sizes sum to {table}, header says {header}.")]
    CompressedSizeMismatch {
        /// Sum of the table entries
        table: u64,
        /// Value in the header
        header: u32,
    },

    /// The chunk table's uncompressed sizes don't add up to the header's.
    #[error("Chunk table uncompressed sizes sum to {table}, header says {header}.")]
    UncompressedSizeMismatch {
        /// Sum of the table entries
        table: u64,
        /// Value in the header
        header: u32,
    },

    /// A chunk claims to be larger than the block size allows.
    #[error("Chunk {chunk} is {size} bytes, larger than the block size of {max_block_size}.")]
    ChunkTooLarge {
        /// Index of the chunk
        chunk: usize,
        /// Uncompressed size recorded for the chunk
        size: u32,
        /// Configured block size
        max_block_size: u32,
    },
}

/// Errors that can occur during chunked compression or decompression.
///
/// `E` is the error type of the [`ByteCompressor`] in use.
///
/// [`ByteCompressor`]: mipmap_codec_common::compressor::ByteCompressor
#[derive(Debug, Error)]
pub enum ChunkedError<E>
where
    E: core::fmt::Debug,
{
    /// The settings can't be used; `max_block_size` is zero.
    #[error("Invalid settings: max_block_size must be non-zero.")]
    InvalidSettings,

    /// The input is too large to describe in the container's 32-bit sizes.
    #[error("Input too large: {len} bytes. The container supports at most 4GiB.")]
    InputTooLarge {
        /// The input length in bytes
        len: usize,
    },

    /// The compressed payloads are too large to describe in the container's 32-bit sizes.
    #[error("Compressed output too large: {size} bytes.")]
    OutputTooLarge {
        /// Total compressed size in bytes
        size: u64,
    },

    /// The compressor failed on a chunk.
    #[error("Compression of chunk {chunk} failed: {error:?}")]
    CompressorFailed {
        /// Index of the failing chunk
        chunk: usize,
        /// Error returned by the compressor
        error: E,
    },

    /// The compressor produced no output for a chunk.
    #[error("Compression of chunk {chunk} produced no data.")]
    EmptyChunk {
        /// Index of the failing chunk
        chunk: usize,
    },

    /// The container is malformed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The compressor failed to decompress a chunk.
    #[error("Decompression of chunk {chunk} failed: {error:?}")]
    DecompressorFailed {
        /// Index of the failing chunk
        chunk: usize,
        /// Error returned by the compressor
        error: E,
    },

    /// A chunk decompressed to a different size than its table entry records.
    #[error("Chunk {chunk} decompressed to {actual} bytes, expected {expected}.")]
    SizeMismatch {
        /// Index of the failing chunk
        chunk: usize,
        /// Size recorded in the chunk table
        expected: usize,
        /// Size produced by the decompressor
        actual: usize,
    },

    /// Memory allocation failed.
    #[error(transparent)]
    Allocation(#[from] AllocateError),
}

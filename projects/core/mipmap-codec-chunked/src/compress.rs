use crate::container::{ChunkEntry, ContainerHeader, CHUNK_ENTRY_SIZE, HEADER_SIZE};
use crate::error::ChunkedError;
use crate::run_tasks;
use crate::settings::ChunkedSettings;
use alloc::vec::Vec;
use log::{debug, warn};
use mipmap_codec_common::allocate::{try_vec_with_capacity, try_zeroed_vec};
use mipmap_codec_common::compressor::ByteCompressor;

/// A compressed chunk, owned by the task that produced it until the container is assembled.
struct CompressedChunk {
    data: Vec<u8>,
    uncompressed_size: u32,
}

/// Compresses `buffer` into a chunked container.
///
/// The buffer is split into `ceil(len / max_block_size)` chunks, which are compressed
/// independently. If any chunk fails, every other chunk still runs to completion and the
/// failure with the lowest chunk index is returned; no partial container is produced.
///
/// # Parameters
///
/// - `compressor`: Compresses each chunk
/// - `buffer`: Data to compress; at most [`u32::MAX`] bytes
/// - `settings`: Block size and parallelism
///
/// # Returns
///
/// The container bytes: header, chunk table, then the payloads in chunk order.
///
/// # Errors
///
/// - [`ChunkedError::InvalidSettings`] if `max_block_size` is zero
/// - [`ChunkedError::InputTooLarge`] if `buffer` does not fit the 32-bit header
/// - [`ChunkedError::CompressorFailed`] / [`ChunkedError::EmptyChunk`] if a chunk can't be compressed
/// - [`ChunkedError::OutputTooLarge`] if the payloads don't fit the 32-bit header
/// - [`ChunkedError::Allocation`] if a buffer can't be allocated
pub fn compress_chunked<C: ByteCompressor>(
    compressor: &C,
    buffer: &[u8],
    settings: &ChunkedSettings,
) -> Result<Vec<u8>, ChunkedError<C::Error>> {
    let max_block_size = settings.validated_block_size()?;
    let uncompressed_size = u32::try_from(buffer.len())
        .map_err(|_| ChunkedError::InputTooLarge { len: buffer.len() })?;

    let tasks: Vec<(usize, &[u8])> = buffer.chunks(max_block_size as usize).enumerate().collect();
    debug!(
        "Compressing {} bytes as {} chunks of up to {} bytes",
        buffer.len(),
        tasks.len(),
        max_block_size
    );

    let chunks = run_tasks(settings.parallel, tasks, |(index, chunk)| {
        compress_chunk(compressor, index, chunk)
    })
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    let compressed_size: u64 = chunks.iter().map(|chunk| chunk.data.len() as u64).sum();
    let compressed_size = u32::try_from(compressed_size)
        .map_err(|_| ChunkedError::OutputTooLarge {
            size: compressed_size,
        })?;

    let total_size = HEADER_SIZE + chunks.len() * CHUNK_ENTRY_SIZE + compressed_size as usize;
    let mut output = try_vec_with_capacity(total_size)?;

    let header = ContainerHeader {
        compressed_size,
        uncompressed_size,
    };
    output.extend_from_slice(&header.to_bytes());
    for chunk in &chunks {
        let entry = ChunkEntry {
            compressed_size: chunk.data.len() as u32,
            uncompressed_size: chunk.uncompressed_size,
        };
        output.extend_from_slice(&entry.to_bytes());
    }
    for chunk in &chunks {
        output.extend_from_slice(&chunk.data);
    }

    debug!(
        "Compressed {} bytes to {} bytes",
        uncompressed_size,
        output.len()
    );
    Ok(output)
}

fn compress_chunk<C: ByteCompressor>(
    compressor: &C,
    index: usize,
    chunk: &[u8],
) -> Result<CompressedChunk, ChunkedError<C::Error>> {
    let mut data = try_zeroed_vec(compressor.max_compressed_size(chunk.len()))?;
    let written = match compressor.compress(chunk, &mut data) {
        Ok(written) => written,
        Err(error) => {
            warn!("Chunk {index} failed to compress: {error:?}");
            return Err(ChunkedError::CompressorFailed {
                chunk: index,
                error,
            });
        }
    };

    if written == 0 {
        warn!("Chunk {index} compressed to zero bytes");
        return Err(ChunkedError::EmptyChunk { chunk: index });
    }

    data.truncate(written);
    Ok(CompressedChunk {
        data,
        // Chunks are at most `max_block_size` bytes, which is a u32.
        uncompressed_size: chunk.len() as u32,
    })
}

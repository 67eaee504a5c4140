use crate::container::ContainerLayout;
use crate::error::ChunkedError;
use crate::run_tasks_with_scratch;
use crate::settings::ChunkedSettings;
use alloc::vec::Vec;
use log::{debug, warn};
use mipmap_codec_common::allocate::{try_zeroed_vec, AlignedBuffer};
use mipmap_codec_common::compressor::ByteCompressor;

/// Work for one chunk: its payload and the part of the output it fills.
struct DecompressTask<'a> {
    index: usize,
    payload: &'a [u8],
    output: &'a mut [u8],
}

/// Decompresses a chunked container.
///
/// The header and chunk table are fully validated before any chunk is decompressed. Chunks are
/// then decompressed independently; each must produce exactly the size recorded in its table
/// entry. If any chunk fails, every other chunk still runs to completion and the failure with
/// the lowest chunk index is returned; no partial buffer is produced.
///
/// # Parameters
///
/// - `compressor`: Decompresses each chunk
/// - `input`: Buffer starting with the container
/// - `expected_total_size`: Exact size of the container; bytes past it are ignored
/// - `settings`: Must use the block size the container was written with
///
/// # Returns
///
/// The original buffer.
///
/// # Errors
///
/// - [`ChunkedError::InvalidSettings`] if `max_block_size` is zero
/// - [`ChunkedError::Container`] if the framing or chunk table is invalid
/// - [`ChunkedError::DecompressorFailed`] if the compressor rejects a chunk
/// - [`ChunkedError::SizeMismatch`] if a chunk decompresses to the wrong size
/// - [`ChunkedError::Allocation`] if a buffer can't be allocated
pub fn decompress_chunked<C: ByteCompressor>(
    compressor: &C,
    input: &[u8],
    expected_total_size: usize,
    settings: &ChunkedSettings,
) -> Result<Vec<u8>, ChunkedError<C::Error>> {
    let max_block_size = settings.validated_block_size()?;
    let layout = ContainerLayout::parse(input, expected_total_size, max_block_size).map_err(
        |error| {
            warn!("Rejected container: {error}");
            error
        },
    )?;

    let uncompressed_size = layout.header().uncompressed_size as usize;
    debug!(
        "Decompressing {} chunks into {} bytes",
        layout.chunks().len(),
        uncompressed_size
    );

    let mut output = try_zeroed_vec(uncompressed_size)?;

    // The table sums were validated, so the chunk outputs exactly tile the buffer.
    let mut tasks = Vec::with_capacity(layout.chunks().len());
    let mut remaining = output.as_mut_slice();
    for (index, (entry, payload)) in layout.payloads(input).enumerate() {
        let (chunk_output, rest) =
            core::mem::take(&mut remaining).split_at_mut(entry.uncompressed_size as usize);
        remaining = rest;
        tasks.push(DecompressTask {
            index,
            payload,
            output: chunk_output,
        });
    }

    // Leave headroom so an over-long chunk is detected instead of silently cut off.
    let scratch_size = (max_block_size as usize).saturating_mul(2);
    run_tasks_with_scratch(settings.parallel, tasks, |scratch, task| {
        decompress_chunk(compressor, task, scratch, scratch_size)
    })
    .into_iter()
    .collect::<Result<(), _>>()?;

    Ok(output)
}

/// Decompresses a chunked container that spans the whole of `container`.
///
/// Same as [`decompress_chunked`] with `expected_total_size` set to `container.len()`.
pub fn decompress_chunked_slice<C: ByteCompressor>(
    compressor: &C,
    container: &[u8],
    settings: &ChunkedSettings,
) -> Result<Vec<u8>, ChunkedError<C::Error>> {
    decompress_chunked(compressor, container, container.len(), settings)
}

/// Decompresses one chunk through `scratch`, which is allocated on first use and then reused.
fn decompress_chunk<C: ByteCompressor>(
    compressor: &C,
    task: DecompressTask<'_>,
    scratch: &mut Option<AlignedBuffer>,
    scratch_size: usize,
) -> Result<(), ChunkedError<C::Error>> {
    let scratch = match scratch {
        Some(scratch) => scratch,
        empty => empty.insert(AlignedBuffer::new(scratch_size)?),
    };
    let produced = match compressor.decompress(task.payload, scratch.as_mut_slice()) {
        Ok(produced) => produced,
        Err(error) => {
            warn!("Chunk {} failed to decompress: {error:?}", task.index);
            return Err(ChunkedError::DecompressorFailed {
                chunk: task.index,
                error,
            });
        }
    };

    if produced != task.output.len() {
        warn!(
            "Chunk {} decompressed to {produced} bytes, expected {}",
            task.index,
            task.output.len()
        );
        return Err(ChunkedError::SizeMismatch {
            chunk: task.index,
            expected: task.output.len(),
            actual: produced,
        });
    }

    task.output.copy_from_slice(&scratch.as_slice()[..produced]);
    Ok(())
}

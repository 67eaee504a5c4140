//! Container header and chunk table.
//!
//! ```text
//! [compressed_size: u32] [uncompressed_size: u32]              <- ContainerHeader
//! { [compressed_size: u32] [uncompressed_size: u32] } * N      <- ChunkEntry per chunk
//! [payload 0] ... [payload N-1]
//! ```
//!
//! All values are little endian. `N` is derived from the header and the block size, see
//! [`chunk_count`]. A container can be inspected without decompressing it through
//! [`ContainerLayout::parse`].

use crate::error::ContainerError;
use alloc::vec::Vec;
use endian_writer::{EndianReader, EndianWriter, LittleEndianReader, LittleEndianWriter};

/// Size of the [`ContainerHeader`] in bytes.
pub const HEADER_SIZE: usize = 8;

/// Size of a single [`ChunkEntry`] in bytes.
pub const CHUNK_ENTRY_SIZE: usize = 8;

/// The fixed header at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerHeader {
    /// Sum of the compressed sizes of all chunks; the payload length.
    pub compressed_size: u32,
    /// Length of the original buffer.
    pub uncompressed_size: u32,
}

/// One entry of the chunk table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkEntry {
    /// Length of the chunk's payload.
    pub compressed_size: u32,
    /// Length of the chunk once decompressed.
    pub uncompressed_size: u32,
}

/// Reads two consecutive little endian `u32`s.
#[inline]
fn read_pair(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 8 {
        return None;
    }

    // SAFETY: We checked data.len() >= 8
    let mut reader = unsafe { LittleEndianReader::new(data.as_ptr()) };
    unsafe { Some((reader.read_u32_at(0), reader.read_u32_at(4))) }
}

/// Writes two consecutive little endian `u32`s.
#[inline]
fn write_pair(first: u32, second: u32) -> [u8; 8] {
    let mut bytes = [0u8; 8];

    // SAFETY: `bytes` is 8 bytes long.
    let mut writer = unsafe { LittleEndianWriter::new(bytes.as_mut_ptr()) };
    unsafe {
        writer.write_u32_at(first, 0);
        writer.write_u32_at(second, 4);
    }
    bytes
}

impl ContainerHeader {
    /// Reads a header from the start of `data`.
    ///
    /// Returns [`None`] if `data` is shorter than [`HEADER_SIZE`].
    pub fn read(data: &[u8]) -> Option<Self> {
        read_pair(data).map(|(compressed_size, uncompressed_size)| Self {
            compressed_size,
            uncompressed_size,
        })
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        write_pair(self.compressed_size, self.uncompressed_size)
    }
}

impl ChunkEntry {
    /// Reads an entry from the start of `data`.
    ///
    /// Returns [`None`] if `data` is shorter than [`CHUNK_ENTRY_SIZE`].
    pub fn read(data: &[u8]) -> Option<Self> {
        read_pair(data).map(|(compressed_size, uncompressed_size)| Self {
            compressed_size,
            uncompressed_size,
        })
    }

    /// Serializes the entry.
    pub fn to_bytes(&self) -> [u8; CHUNK_ENTRY_SIZE] {
        write_pair(self.compressed_size, self.uncompressed_size)
    }
}

/// Number of chunks a buffer of `len` bytes is split into; `ceil(len / max_block_size)`.
///
/// Returns 0 when `max_block_size` is 0.
#[inline]
pub fn chunk_count(len: u64, max_block_size: u32) -> u64 {
    if max_block_size == 0 {
        return 0;
    }
    len.div_ceil(max_block_size as u64)
}

/// Total size of the container described by `header`, including the header and chunk table.
#[inline]
pub fn container_size(header: &ContainerHeader, max_block_size: u32) -> u64 {
    let chunks = chunk_count(header.uncompressed_size as u64, max_block_size);
    HEADER_SIZE as u64 + chunks * CHUNK_ENTRY_SIZE as u64 + header.compressed_size as u64
}

/// A validated view of a container's header and chunk table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLayout {
    header: ContainerHeader,
    chunks: Vec<ChunkEntry>,
}

impl ContainerLayout {
    /// Reads and validates the header and chunk table of a container.
    ///
    /// # Parameters
    ///
    /// - `input`: The container; may be followed by unrelated bytes
    /// - `expected_total_size`: Exact size of the container within `input`
    /// - `max_block_size`: Block size the container was written with
    ///
    /// # Errors
    ///
    /// - [`ContainerError::Truncated`] if `input` is shorter than `expected_total_size`, or
    ///   `expected_total_size` can't hold a header.
    /// - [`ContainerError::FramingMismatch`] if the header describes a container of a
    ///   different size.
    /// - Any of the table errors if the chunk table is inconsistent with the header or the
    ///   block size.
    pub fn parse(
        input: &[u8],
        expected_total_size: usize,
        max_block_size: u32,
    ) -> Result<Self, ContainerError> {
        if expected_total_size < HEADER_SIZE {
            return Err(ContainerError::Truncated {
                needed: HEADER_SIZE as u64,
                actual: expected_total_size as u64,
            });
        }
        if input.len() < expected_total_size {
            return Err(ContainerError::Truncated {
                needed: expected_total_size as u64,
                actual: input.len() as u64,
            });
        }

        let header = ContainerHeader::read(input).ok_or(ContainerError::Truncated {
            needed: HEADER_SIZE as u64,
            actual: input.len() as u64,
        })?;

        let framed_size = container_size(&header, max_block_size);
        if framed_size != expected_total_size as u64 {
            return Err(ContainerError::FramingMismatch {
                expected: framed_size,
                actual: expected_total_size as u64,
            });
        }

        // Framing matched, so the whole table is within `input`.
        let count = chunk_count(header.uncompressed_size as u64, max_block_size) as usize;
        let table_end = HEADER_SIZE + count * CHUNK_ENTRY_SIZE;
        let chunks = input[HEADER_SIZE..table_end]
            .chunks_exact(CHUNK_ENTRY_SIZE)
            .map(ChunkEntry::read)
            .collect::<Option<Vec<_>>>()
            .ok_or(ContainerError::Truncated {
                needed: table_end as u64,
                actual: input.len() as u64,
            })?;

        let mut compressed_total = 0u64;
        let mut uncompressed_total = 0u64;
        for (chunk, entry) in chunks.iter().enumerate() {
            if entry.uncompressed_size > max_block_size {
                return Err(ContainerError::ChunkTooLarge {
                    chunk,
                    size: entry.uncompressed_size,
                    max_block_size,
                });
            }
            compressed_total += entry.compressed_size as u64;
            uncompressed_total += entry.uncompressed_size as u64;
        }

        if compressed_total != header.compressed_size as u64 {
            return Err(ContainerError::CompressedSizeMismatch {
                table: compressed_total,
                header: header.compressed_size,
            });
        }
        if uncompressed_total != header.uncompressed_size as u64 {
            return Err(ContainerError::UncompressedSizeMismatch {
                table: uncompressed_total,
                header: header.uncompressed_size,
            });
        }

        Ok(Self { header, chunks })
    }

    /// The container header.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// The chunk table, in payload order.
    pub fn chunks(&self) -> &[ChunkEntry] {
        &self.chunks
    }

    /// Offset of the first payload byte.
    pub fn payload_offset(&self) -> usize {
        HEADER_SIZE + self.chunks.len() * CHUNK_ENTRY_SIZE
    }

    /// Total size of the container in bytes.
    pub fn total_size(&self) -> usize {
        self.payload_offset() + self.header.compressed_size as usize
    }

    /// Pairs each chunk entry with its payload in `input`.
    ///
    /// `input` must be the container this layout was parsed from.
    pub fn payloads<'a>(
        &'a self,
        input: &'a [u8],
    ) -> impl Iterator<Item = (ChunkEntry, &'a [u8])> + 'a {
        let mut offset = self.payload_offset();
        self.chunks.iter().map(move |entry| {
            let start = offset;
            offset += entry.compressed_size as usize;
            (*entry, &input[start..offset])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn build_container(entries: &[ChunkEntry], payload: &[u8]) -> Vec<u8> {
        let header = ContainerHeader {
            compressed_size: entries.iter().map(|e| e.compressed_size).sum(),
            uncompressed_size: entries.iter().map(|e| e.uncompressed_size).sum(),
        };

        let mut data = header.to_bytes().to_vec();
        for entry in entries {
            data.extend_from_slice(&entry.to_bytes());
        }
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn header_is_little_endian() {
        let header = ContainerHeader {
            compressed_size: 0x0403_0201,
            uncompressed_size: 0x0807_0605,
        };
        assert_eq!(header.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(ContainerHeader::read(&header.to_bytes()), Some(header));
        assert_eq!(ContainerHeader::read(&[0; 7]), None);
    }

    #[rstest]
    #[case(0, 4096, 0)]
    #[case(1, 4096, 1)]
    #[case(4095, 4096, 1)]
    #[case(4096, 4096, 1)]
    #[case(4097, 4096, 2)]
    #[case(10_000, 4096, 3)]
    #[case(u32::MAX as u64, 1, u32::MAX as u64)]
    #[case(100, 0, 0)]
    fn counts_chunks(#[case] len: u64, #[case] max_block_size: u32, #[case] expected: u64) {
        assert_eq!(chunk_count(len, max_block_size), expected);
    }

    #[test]
    fn parses_valid_container() {
        let entries = [
            ChunkEntry {
                compressed_size: 3,
                uncompressed_size: 4,
            },
            ChunkEntry {
                compressed_size: 2,
                uncompressed_size: 2,
            },
        ];
        let container = build_container(&entries, b"abcde");

        let layout = ContainerLayout::parse(&container, container.len(), 4).unwrap();
        assert_eq!(layout.chunks(), &entries);
        assert_eq!(layout.payload_offset(), 24);
        assert_eq!(layout.total_size(), container.len());

        let payloads: Vec<_> = layout.payloads(&container).map(|(_, p)| p).collect();
        assert_eq!(payloads, [&b"abc"[..], &b"de"[..]]);
    }

    #[test]
    fn rejects_truncated_input() {
        let result = ContainerLayout::parse(&[0; 4], 4, 4096);
        assert_eq!(
            result,
            Err(ContainerError::Truncated {
                needed: 8,
                actual: 4
            })
        );

        let result = ContainerLayout::parse(&[0; 8], 16, 4096);
        assert_eq!(
            result,
            Err(ContainerError::Truncated {
                needed: 16,
                actual: 8
            })
        );
    }

    #[test]
    fn rejects_framing_mismatch() {
        let entries = [ChunkEntry {
            compressed_size: 3,
            uncompressed_size: 3,
        }];
        let mut container = build_container(&entries, b"xyz");
        container.push(0);

        let result = ContainerLayout::parse(&container, container.len(), 4096);
        assert_eq!(
            result,
            Err(ContainerError::FramingMismatch {
                expected: 19,
                actual: 20
            })
        );

        // Trailing bytes past the expected size are fine.
        assert!(ContainerLayout::parse(&container, 19, 4096).is_ok());
    }

    #[test]
    fn rejects_table_sum_mismatch() {
        let entries = [
            ChunkEntry {
                compressed_size: 2,
                uncompressed_size: 4,
            },
            ChunkEntry {
                compressed_size: 2,
                uncompressed_size: 4,
            },
        ];
        let mut container = build_container(&entries, b"abcd");

        // Move a byte of compressed size between entries and header; framing still holds.
        container[HEADER_SIZE] = 3;
        let result = ContainerLayout::parse(&container, container.len(), 4);
        assert_eq!(
            result,
            Err(ContainerError::CompressedSizeMismatch { table: 5, header: 4 })
        );
    }

    #[test]
    fn rejects_oversized_chunk() {
        let entries = [
            ChunkEntry {
                compressed_size: 1,
                uncompressed_size: 5,
            },
            ChunkEntry {
                compressed_size: 1,
                uncompressed_size: 3,
            },
        ];
        let container = build_container(&entries, b"ab");
        let result = ContainerLayout::parse(&container, container.len(), 4);
        assert_eq!(
            result,
            Err(ContainerError::ChunkTooLarge {
                chunk: 0,
                size: 5,
                max_block_size: 4
            })
        );
    }
}

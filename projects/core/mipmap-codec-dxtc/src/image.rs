//! Whole mip level compression.
//!
//! Splits an RGBA8888 image into 4x4 tiles, compresses each with the tile codecs and lays the
//! blocks out left to right, top to bottom, as found in a DDS file. Images whose size is not
//! a multiple of 4 (including the 1x1 and 2x2 tail of a mip chain) are padded by repeating the
//! last row and column; decoding crops the padding away again.
//!
//! With the `multithreaded` feature, each row of blocks is processed on the rayon thread pool.

use crate::endpoint_search::{EndpointSearch, RangeFitSearch};
use crate::error::DxtcError;
use crate::tile::{compress_rgb_tile_with, compress_tile_with, decompress_rgb_tile, decompress_tile};
use crate::tile::{AlphaMode, PackedTile, PACKED_TILE_BYTES};
use alloc::vec::Vec;
use derive_enum_all_values::AllValues;
use mipmap_codec_common::allocate::try_zeroed_vec;
use mipmap_codec_common::color_8888::Color8888;
use mipmap_codec_common::tile::Tile;

/// Compressed block formats supported by the image helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum BlockFormat {
    /// Colour only, with optional 1-bit alpha. 8 bytes per block.
    Dxt1,
    /// Explicit 4-bit alpha. 16 bytes per block.
    Dxt3,
    /// Gradient alpha. 16 bytes per block.
    Dxt5,
}

impl BlockFormat {
    /// Size of one compressed 4x4 block in bytes.
    pub const fn bytes_per_block(self) -> usize {
        match self {
            BlockFormat::Dxt1 => 8,
            BlockFormat::Dxt3 | BlockFormat::Dxt5 => PACKED_TILE_BYTES,
        }
    }

    /// Number of bytes needed to store an image of the given size in this format.
    ///
    /// Returns [`None`] if the size overflows.
    pub fn compressed_size(self, width: usize, height: usize) -> Option<usize> {
        width
            .div_ceil(4)
            .checked_mul(height.div_ceil(4))?
            .checked_mul(self.bytes_per_block())
    }
}

/// Block grid of an image.
#[derive(Clone, Copy)]
struct ImageLayout {
    width: usize,
    height: usize,
    blocks_wide: usize,
    rgba_len: usize,
    compressed_len: usize,
}

impl ImageLayout {
    fn new(width: usize, height: usize, format: BlockFormat) -> Result<Self, DxtcError> {
        let invalid = DxtcError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }

        let rgba_len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(invalid.clone())?;
        let compressed_len = format.compressed_size(width, height).ok_or(invalid)?;

        Ok(Self {
            width,
            height,
            blocks_wide: width.div_ceil(4),
            rgba_len,
            compressed_len,
        })
    }

    /// Reads the tile at the given block position, clamping reads to the image edge.
    fn read_tile(&self, rgba: &[u8], block_x: usize, block_y: usize) -> Tile {
        Tile::from_pixels(core::array::from_fn(|index| {
            let x = (block_x * 4 + index % 4).min(self.width - 1);
            let y = (block_y * 4 + index / 4).min(self.height - 1);
            let offset = (y * self.width + x) * 4;
            Color8888::new(
                rgba[offset],
                rgba[offset + 1],
                rgba[offset + 2],
                rgba[offset + 3],
            )
        }))
    }
}

/// Compresses an RGBA8888 image using [`RangeFitSearch`].
///
/// DXT1 output ignores alpha; use [`compress_image_with`] for 1-bit alpha.
///
/// # Parameters
///
/// - `rgba`: Row-major RGBA8888 pixels; at least `width * height * 4` bytes
/// - `width`, `height`: Image size in pixels; both non-zero
/// - `format`: Block format to produce
///
/// # Returns
///
/// The compressed blocks, [`BlockFormat::compressed_size`] bytes long.
pub fn compress_image(
    rgba: &[u8],
    width: usize,
    height: usize,
    format: BlockFormat,
) -> Result<Vec<u8>, DxtcError> {
    compress_image_with(rgba, width, height, format, None, &RangeFitSearch::new())
}

/// Compresses an RGBA8888 image with an explicit endpoint search.
///
/// `dxt1_alpha_threshold` only applies to [`BlockFormat::Dxt1`]; pixels whose alpha is below it
/// become transparent.
pub fn compress_image_with<S: EndpointSearch + ?Sized>(
    rgba: &[u8],
    width: usize,
    height: usize,
    format: BlockFormat,
    dxt1_alpha_threshold: Option<u8>,
    search: &S,
) -> Result<Vec<u8>, DxtcError> {
    let layout = ImageLayout::new(width, height, format)?;
    if rgba.len() < layout.rgba_len {
        return Err(DxtcError::InputTooSmall {
            needed: layout.rgba_len,
            actual: rgba.len(),
        });
    }

    let mut output = try_zeroed_vec(layout.compressed_len)?;
    let bytes_per_block = format.bytes_per_block();
    let row_bytes = layout.blocks_wide * bytes_per_block;

    let compress_row = |(block_y, row): (usize, &mut [u8])| {
        for (block_x, block) in row.chunks_exact_mut(bytes_per_block).enumerate() {
            let tile = layout.read_tile(rgba, block_x, block_y);
            match format {
                BlockFormat::Dxt1 => {
                    let words = compress_rgb_tile_with(&tile, dxt1_alpha_threshold, search);
                    block[..4].copy_from_slice(&words[0].to_le_bytes());
                    block[4..].copy_from_slice(&words[1].to_le_bytes());
                }
                BlockFormat::Dxt3 => block.copy_from_slice(
                    &compress_tile_with(&tile, AlphaMode::Explicit, search).to_le_bytes(),
                ),
                BlockFormat::Dxt5 => block.copy_from_slice(
                    &compress_tile_with(&tile, AlphaMode::Gradient, search).to_le_bytes(),
                ),
            }
        }
    };

    #[cfg(feature = "multithreaded")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(compress_row);
    }

    #[cfg(not(feature = "multithreaded"))]
    output
        .chunks_mut(row_bytes)
        .enumerate()
        .for_each(compress_row);

    Ok(output)
}

/// Decompresses blocks produced by [`compress_image`] (or any DXT encoder) to RGBA8888.
///
/// # Returns
///
/// `width * height * 4` bytes of row-major RGBA8888 pixels.
pub fn decompress_image(
    blocks: &[u8],
    width: usize,
    height: usize,
    format: BlockFormat,
) -> Result<Vec<u8>, DxtcError> {
    let layout = ImageLayout::new(width, height, format)?;
    if blocks.len() < layout.compressed_len {
        return Err(DxtcError::InputTooSmall {
            needed: layout.compressed_len,
            actual: blocks.len(),
        });
    }

    let mut output = try_zeroed_vec(layout.rgba_len)?;
    let bytes_per_block = format.bytes_per_block();
    let row_bytes = layout.blocks_wide * bytes_per_block;
    let pixel_row_bytes = width * 4;

    // Each output chunk holds the (up to) four pixel rows covered by one row of blocks.
    let decompress_row = |(block_y, pixels): (usize, &mut [u8])| {
        let block_row = &blocks[block_y * row_bytes..][..row_bytes];
        for (block_x, block) in block_row.chunks_exact(bytes_per_block).enumerate() {
            let tile = decode_block(block, format);
            for (y, line) in pixels.chunks_exact_mut(pixel_row_bytes).enumerate() {
                for x in 0..4 {
                    let image_x = block_x * 4 + x;
                    if image_x >= width {
                        break;
                    }
                    let offset = image_x * 4;
                    line[offset..offset + 4].copy_from_slice(&tile.get_pixel(x, y).to_bytes());
                }
            }
        }
    };

    #[cfg(feature = "multithreaded")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_mut(pixel_row_bytes * 4)
            .enumerate()
            .for_each(decompress_row);
    }

    #[cfg(not(feature = "multithreaded"))]
    output
        .chunks_mut(pixel_row_bytes * 4)
        .enumerate()
        .for_each(decompress_row);

    Ok(output)
}

fn decode_block(block: &[u8], format: BlockFormat) -> Tile {
    match format {
        BlockFormat::Dxt1 => decompress_rgb_tile(&[
            u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
            u32::from_le_bytes([block[4], block[5], block[6], block[7]]),
        ]),
        BlockFormat::Dxt3 | BlockFormat::Dxt5 => {
            let mut bytes = [0u8; PACKED_TILE_BYTES];
            bytes.copy_from_slice(&block[..PACKED_TILE_BYTES]);
            let alpha = match format {
                BlockFormat::Dxt3 => AlphaMode::Explicit,
                _ => AlphaMode::Gradient,
            };
            decompress_tile(&PackedTile::from_le_bytes(&bytes), alpha)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn solid_image(width: usize, height: usize, pixel: Color8888) -> Vec<u8> {
        pixel.to_bytes().repeat(width * height)
    }

    #[rstest]
    #[case(BlockFormat::Dxt1, 8)]
    #[case(BlockFormat::Dxt3, 16)]
    #[case(BlockFormat::Dxt5, 16)]
    fn bytes_per_block(#[case] format: BlockFormat, #[case] expected: usize) {
        assert_eq!(format.bytes_per_block(), expected);
    }

    #[rstest]
    #[case(4, 4, 1)]
    #[case(1, 1, 1)]
    #[case(2, 2, 1)]
    #[case(5, 4, 2)]
    #[case(16, 8, 8)]
    fn compressed_size_counts_partial_blocks(
        #[case] width: usize,
        #[case] height: usize,
        #[case] blocks: usize,
    ) {
        for format in BlockFormat::all_values() {
            assert_eq!(
                format.compressed_size(width, height),
                Some(blocks * format.bytes_per_block())
            );
        }
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(4, 4)]
    #[case(6, 3)]
    #[case(32, 16)]
    fn solid_images_round_trip(#[case] width: usize, #[case] height: usize) {
        let pixel = Color8888::new(255, 130, 0, 255);
        let image = solid_image(width, height, pixel);
        for format in BlockFormat::all_values() {
            let blocks = compress_image(&image, width, height, *format).unwrap();
            assert_eq!(blocks.len(), format.compressed_size(width, height).unwrap());
            let decoded = decompress_image(&blocks, width, height, *format).unwrap();
            assert_eq!(decoded, image, "{format:?} {width}x{height}");
        }
    }

    #[test]
    fn blocks_are_laid_out_in_raster_order() {
        // 8x4 image: left block red, right block blue.
        let mut image = Vec::new();
        for _y in 0..4 {
            for x in 0..8 {
                let pixel = if x < 4 {
                    Color8888::new(255, 0, 0, 255)
                } else {
                    Color8888::new(0, 0, 255, 255)
                };
                image.extend_from_slice(&pixel.to_bytes());
            }
        }

        let blocks = compress_image(&image, 8, 4, BlockFormat::Dxt1).unwrap();
        assert_eq!(&blocks[..4], &[0x00, 0xF8, 0x00, 0xF8]);
        assert_eq!(&blocks[8..12], &[0x1F, 0x00, 0x1F, 0x00]);
    }

    #[test]
    fn dxt1_threshold_produces_transparent_pixels() {
        let image = solid_image(4, 4, Color8888::new(10, 20, 30, 0));
        let blocks = compress_image_with(
            &image,
            4,
            4,
            BlockFormat::Dxt1,
            Some(128),
            &RangeFitSearch::new(),
        )
        .unwrap();
        let decoded = decompress_image(&blocks, 4, 4, BlockFormat::Dxt1).unwrap();
        assert!(decoded.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn rejects_zero_dimensions() {
        let result = compress_image(&[], 0, 4, BlockFormat::Dxt5);
        assert_eq!(
            result,
            Err(DxtcError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn rejects_short_input() {
        let result = compress_image(&[0; 60], 4, 4, BlockFormat::Dxt5);
        assert_eq!(
            result,
            Err(DxtcError::InputTooSmall {
                needed: 64,
                actual: 60
            })
        );

        let result = decompress_image(&[0; 15], 4, 4, BlockFormat::Dxt3);
        assert_eq!(
            result,
            Err(DxtcError::InputTooSmall {
                needed: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let result = decompress_image(&[], usize::MAX, 2, BlockFormat::Dxt1);
        assert!(matches!(result, Err(DxtcError::InvalidDimensions { .. })));
    }
}

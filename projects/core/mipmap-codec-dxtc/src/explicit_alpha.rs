//! # Explicit Alpha Codec
//!
//! Stores each pixel's alpha as an independent 4-bit value; the alpha half of a DXT3 block.
//!
//! The 64 bits are laid out as eight bytes in raster order, each holding two pixels:
//! the earlier pixel in the low nibble, the later one in the high nibble.

use mipmap_codec_common::tile::TILE_PIXELS;

/// Quantizes an 8-bit alpha value to 4 bits, rounding to the nearest level.
#[inline]
pub const fn quantize_alpha(alpha: u8) -> u8 {
    ((alpha as u32 * 15 + 127) / 255) as u8
}

/// Expands a 4-bit alpha level back to 8 bits.
#[inline]
pub const fn expand_alpha(level: u8) -> u8 {
    (level & 0xF) | ((level & 0xF) << 4)
}

/// Compresses an alpha plane into a packed explicit alpha block.
pub fn compress_explicit_alpha(alpha: &[u8; TILE_PIXELS]) -> [u32; 2] {
    let mut bytes = [0u8; 8];
    for (byte, pair) in bytes.iter_mut().zip(alpha.chunks_exact(2)) {
        *byte = quantize_alpha(pair[0]) | (quantize_alpha(pair[1]) << 4);
    }

    [
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    ]
}

/// Decompresses a packed explicit alpha block into sixteen alpha values in raster order.
pub fn decompress_explicit_alpha(block: &[u32; 2]) -> [u8; TILE_PIXELS] {
    let bits = block[0] as u64 | ((block[1] as u64) << 32);
    core::array::from_fn(|x| expand_alpha(((bits >> (x * 4)) & 0xF) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0, 0)]
    #[case(8, 0)]
    #[case(9, 1)]
    #[case(17, 1)]
    #[case(128, 8)]
    #[case(246, 14)]
    #[case(247, 15)]
    #[case(255, 15)]
    fn quantizes_to_nearest_level(#[case] alpha: u8, #[case] level: u8) {
        assert_eq!(quantize_alpha(alpha), level);
    }

    #[test]
    fn round_trip_error_is_bounded() {
        for alpha in 0..=255u8 {
            let restored = expand_alpha(quantize_alpha(alpha));
            assert!((alpha as i32 - restored as i32).abs() <= 8, "alpha {alpha}");
            if alpha % 17 == 0 {
                assert_eq!(restored, alpha);
            }
        }
    }

    #[test]
    fn nibble_layout_matches_dxt3() {
        let alpha: [u8; 16] = core::array::from_fn(|x| expand_alpha(x as u8));
        let packed = compress_explicit_alpha(&alpha);
        assert_eq!(packed, [0x7654_3210, 0xFEDC_BA98]);
        assert_eq!(decompress_explicit_alpha(&packed), alpha);
    }
}

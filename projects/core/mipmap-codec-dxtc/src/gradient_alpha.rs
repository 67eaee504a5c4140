//! # Gradient Alpha Codec
//!
//! Encodes a 4x4 alpha plane as two 8-bit endpoints and sixteen 3-bit indices into an
//! interpolated palette. This is the alpha half of a DXT5 block (and the whole of a BC4 block).
//!
//! ## Packed Layout
//!
//! The standard 8 byte block, read as two little endian `u32` words:
//!
//! ```text
//! byte 0: a0
//! byte 1: a1
//! bytes 2-7: 48 bits of indices, 3 per pixel, pixel 0 in the lowest bits
//! ```
//!
//! ## Palette
//!
//! - `a0 > a1`: `a0`, `a1` and six values interpolated between them in sevenths.
//! - `a0 <= a1`: `a0`, `a1`, four values interpolated in fifths, then `0` and `255`.
//!
//! Interpolation truncates.

use mipmap_codec_common::tile::TILE_PIXELS;

/// Computes the eight alpha values addressable by a block with the given endpoints.
#[inline]
pub fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0_wide, a1_wide) = (a0 as u32, a1 as u32);
    let mut palette = [a0, a1, 0, 0, 0, 0, 0, 255];

    if a0 > a1 {
        for i in 1..=6u32 {
            palette[i as usize + 1] = (((7 - i) * a0_wide + i * a1_wide) / 7) as u8;
        }
    } else {
        for i in 1..=4u32 {
            palette[i as usize + 1] = (((5 - i) * a0_wide + i * a1_wide) / 5) as u8;
        }
        palette[6] = 0;
        palette[7] = 255;
    }

    palette
}

/// Compresses an alpha plane into a packed gradient alpha block.
///
/// Both palette layouts are tried, and the one with the lower squared error is kept. When they
/// tie, the eight value palette wins. A flat plane is always encoded exactly.
///
/// ```
/// use mipmap_codec_dxtc::gradient_alpha::{compress_gradient_alpha, decompress_gradient_alpha};
///
/// let alpha: [u8; 16] = core::array::from_fn(|x| [0, 85, 170, 255][x % 4]);
/// let packed = compress_gradient_alpha(&alpha);
/// assert_eq!(decompress_gradient_alpha(&packed), alpha);
/// ```
pub fn compress_gradient_alpha(alpha: &[u8; TILE_PIXELS]) -> [u32; 2] {
    let first = alpha[0];
    if alpha.iter().all(|&value| value == first) {
        return pack(first, first, &[0; TILE_PIXELS]);
    }

    let min = alpha.iter().copied().min().unwrap_or(0);
    let max = alpha.iter().copied().max().unwrap_or(0);
    let eight = fit(max, min, alpha);

    // The six value palette serves 0 and 255 from its fixed slots, so only the values in
    // between need to be spanned.
    let mut inner = alpha.iter().copied().filter(|&value| value != 0 && value != 255);
    let six = match inner.next() {
        Some(value) => {
            let (low, high) = inner.fold((value, value), |(low, high), value| {
                (low.min(value), high.max(value))
            });
            fit(low, high, alpha)
        }
        None => fit(0, 0, alpha),
    };

    let best = if six.error < eight.error { six } else { eight };
    pack(best.a0, best.a1, &best.indices)
}

/// Decompresses a packed gradient alpha block into sixteen alpha values in raster order.
pub fn decompress_gradient_alpha(block: &[u32; 2]) -> [u8; TILE_PIXELS] {
    let a0 = block[0] as u8;
    let a1 = (block[0] >> 8) as u8;
    let palette = alpha_palette(a0, a1);

    let bits = (block[0] >> 16) as u64 | ((block[1] as u64) << 16);
    core::array::from_fn(|x| palette[((bits >> (x * 3)) & 0b111) as usize])
}

struct AlphaFit {
    a0: u8,
    a1: u8,
    indices: [u8; TILE_PIXELS],
    error: u32,
}

fn fit(a0: u8, a1: u8, alpha: &[u8; TILE_PIXELS]) -> AlphaFit {
    let palette = alpha_palette(a0, a1);
    let mut indices = [0u8; TILE_PIXELS];
    let mut error = 0u32;

    for (index, &value) in indices.iter_mut().zip(alpha.iter()) {
        let mut best_distance = u32::MAX;
        for (candidate, &entry) in palette.iter().enumerate() {
            let distance = (entry as i32 - value as i32).unsigned_abs();
            if distance < best_distance {
                best_distance = distance;
                *index = candidate as u8;
            }
        }
        error += best_distance * best_distance;
    }

    AlphaFit {
        a0,
        a1,
        indices,
        error,
    }
}

fn pack(a0: u8, a1: u8, indices: &[u8; TILE_PIXELS]) -> [u32; 2] {
    let mut bits = 0u64;
    for (x, &index) in indices.iter().enumerate() {
        bits |= ((index & 0b111) as u64) << (x * 3);
    }

    [
        a0 as u32 | ((a1 as u32) << 8) | ((bits as u32 & 0xFFFF) << 16),
        (bits >> 16) as u32,
    ]
}

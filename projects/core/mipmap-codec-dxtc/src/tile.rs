//! # Tile Assembler
//!
//! Combines the colour block codec with one of the alpha codecs to compress a whole RGBA tile.
//!
//! A [`PackedTile`] holds four words; the two alpha words come first, followed by the two
//! colour words, so writing them little endian yields a standard 16 byte DXT3 or DXT5 block.
//! Tiles without alpha are compressed to a two word DXT1 block by [`compress_rgb_tile`].

use crate::color_block::{
    compress_color_block_with, decompress_color_block, ColorBlockMode, ColorDecodeMode,
};
use crate::endpoint_search::{EndpointSearch, RangeFitSearch};
use crate::explicit_alpha::{compress_explicit_alpha, decompress_explicit_alpha};
use crate::gradient_alpha::{compress_gradient_alpha, decompress_gradient_alpha};
use mipmap_codec_common::tile::Tile;

/// Size of a [`PackedTile`] in bytes.
pub const PACKED_TILE_BYTES: usize = 16;

/// Which codec stores a tile's alpha plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// Interpolated 3-bit indices (DXT5).
    Gradient,
    /// Independent 4-bit values (DXT3).
    Explicit,
}

/// A compressed RGBA tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedTile {
    /// Words 0 and 1 hold the alpha block, words 2 and 3 the colour block.
    pub words: [u32; 4],
}

impl PackedTile {
    /// Builds a packed tile from its alpha and colour halves.
    #[inline]
    pub const fn new(alpha: [u32; 2], color: [u32; 2]) -> Self {
        Self {
            words: [alpha[0], alpha[1], color[0], color[1]],
        }
    }

    /// The alpha half.
    #[inline]
    pub const fn alpha(&self) -> [u32; 2] {
        [self.words[0], self.words[1]]
    }

    /// The colour half.
    #[inline]
    pub const fn color(&self) -> [u32; 2] {
        [self.words[2], self.words[3]]
    }

    /// Serializes the tile as a 16 byte DXT3/DXT5 block.
    pub fn to_le_bytes(&self) -> [u8; PACKED_TILE_BYTES] {
        let mut bytes = [0u8; PACKED_TILE_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.words.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Reads a tile from a 16 byte DXT3/DXT5 block.
    pub fn from_le_bytes(bytes: &[u8; PACKED_TILE_BYTES]) -> Self {
        let word = |x: usize| {
            u32::from_le_bytes([bytes[x * 4], bytes[x * 4 + 1], bytes[x * 4 + 2], bytes[x * 4 + 3]])
        };
        Self {
            words: [word(0), word(1), word(2), word(3)],
        }
    }
}

/// Compresses a tile with gradient alpha (DXT5), using the given endpoint search.
pub fn compress_tile_gradient_alpha_with<S: EndpointSearch + ?Sized>(
    tile: &Tile,
    search: &S,
) -> PackedTile {
    PackedTile::new(
        compress_gradient_alpha(&tile.alpha_plane()),
        compress_color_block_with(tile, ColorBlockMode::FourColor, search),
    )
}

/// Compresses a tile with explicit alpha (DXT3), using the given endpoint search.
pub fn compress_tile_explicit_alpha_with<S: EndpointSearch + ?Sized>(
    tile: &Tile,
    search: &S,
) -> PackedTile {
    PackedTile::new(
        compress_explicit_alpha(&tile.alpha_plane()),
        compress_color_block_with(tile, ColorBlockMode::FourColor, search),
    )
}

/// Compresses a tile with gradient alpha (DXT5).
pub fn compress_tile_gradient_alpha(tile: &Tile) -> PackedTile {
    compress_tile_gradient_alpha_with(tile, &RangeFitSearch::new())
}

/// Compresses a tile with explicit alpha (DXT3).
pub fn compress_tile_explicit_alpha(tile: &Tile) -> PackedTile {
    compress_tile_explicit_alpha_with(tile, &RangeFitSearch::new())
}

/// Decompresses a tile packed with gradient alpha (DXT5).
pub fn decompress_tile_gradient_alpha(packed: &PackedTile) -> Tile {
    let mut tile = decompress_color_block(&packed.color(), ColorDecodeMode::FourColor);
    tile.set_alpha_plane(&decompress_gradient_alpha(&packed.alpha()));
    tile
}

/// Decompresses a tile packed with explicit alpha (DXT3).
pub fn decompress_tile_explicit_alpha(packed: &PackedTile) -> Tile {
    let mut tile = decompress_color_block(&packed.color(), ColorDecodeMode::FourColor);
    tile.set_alpha_plane(&decompress_explicit_alpha(&packed.alpha()));
    tile
}

/// Compresses a tile with the given alpha codec, using the given endpoint search.
pub fn compress_tile_with<S: EndpointSearch + ?Sized>(
    tile: &Tile,
    alpha: AlphaMode,
    search: &S,
) -> PackedTile {
    match alpha {
        AlphaMode::Gradient => compress_tile_gradient_alpha_with(tile, search),
        AlphaMode::Explicit => compress_tile_explicit_alpha_with(tile, search),
    }
}

/// Compresses a tile with the given alpha codec.
pub fn compress_tile(tile: &Tile, alpha: AlphaMode) -> PackedTile {
    compress_tile_with(tile, alpha, &RangeFitSearch::new())
}

/// Decompresses a tile packed with the given alpha codec.
pub fn decompress_tile(packed: &PackedTile, alpha: AlphaMode) -> Tile {
    match alpha {
        AlphaMode::Gradient => decompress_tile_gradient_alpha(packed),
        AlphaMode::Explicit => decompress_tile_explicit_alpha(packed),
    }
}

/// Compresses a tile's colours into a DXT1 block, using the given endpoint search.
///
/// With an `alpha_threshold`, pixels whose alpha is below it decode as transparent black.
/// Otherwise alpha is ignored and the tile decodes fully opaque.
pub fn compress_rgb_tile_with<S: EndpointSearch + ?Sized>(
    tile: &Tile,
    alpha_threshold: Option<u8>,
    search: &S,
) -> [u32; 2] {
    compress_color_block_with(tile, ColorBlockMode::Dxt1 { alpha_threshold }, search)
}

/// Compresses a tile's colours into a DXT1 block.
pub fn compress_rgb_tile(tile: &Tile, alpha_threshold: Option<u8>) -> [u32; 2] {
    compress_rgb_tile_with(tile, alpha_threshold, &RangeFitSearch::new())
}

/// Decompresses a DXT1 block.
pub fn decompress_rgb_tile(block: &[u32; 2]) -> Tile {
    decompress_color_block(block, ColorDecodeMode::Dxt1)
}

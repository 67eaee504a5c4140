//! # 4x4 Tile
//!
//! The [`Tile`] structure represents one uncompressed 4x4 block of RGBA8888 pixels, the atomic
//! unit of the block codecs.
//!
//! ## Memory Layout
//!
//! The pixels are stored in row-major order:
//! ```text
//! [ 0] [ 1] [ 2] [ 3]
//! [ 4] [ 5] [ 6] [ 7]
//! [ 8] [ 9] [10] [11]
//! [12] [13] [14] [15]
//! ```
//!
//! A tile is usually built from a contiguous 64 byte RGBA buffer and written back to one:
//!
//! ```
//! use mipmap_codec_common::color_8888::Color8888;
//! use mipmap_codec_common::tile::Tile;
//!
//! let grey = Tile::new(Color8888::new(128, 128, 128, 255));
//! let bytes = grey.to_rgba_bytes();
//! assert_eq!(Tile::from_rgba_bytes(&bytes), grey);
//! assert!(grey.has_identical_pixels_ignore_alpha());
//! ```

use crate::color_8888::Color8888;

/// Number of pixels in a tile.
pub const TILE_PIXELS: usize = 16;

/// Number of bytes in an RGBA8888 tile.
pub const TILE_RGBA_BYTES: usize = TILE_PIXELS * 4;

/// Represents a 4x4 block of RGBA8888 pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    /// The 16 pixels in the block (row-major order)
    /// (i.e. `pixels[0]` is top-left, `pixels[3]` is top-right, etc.)
    pub pixels: [Color8888; TILE_PIXELS],
}

impl Tile {
    /// Constructs a new tile initialised with 16 copies of the provided pixel.
    #[inline]
    pub const fn new(pixel: Color8888) -> Self {
        Self {
            pixels: [pixel; TILE_PIXELS],
        }
    }

    /// Constructs a tile from 16 row-major pixels.
    #[inline]
    pub const fn from_pixels(pixels: [Color8888; TILE_PIXELS]) -> Self {
        Self { pixels }
    }

    /// Constructs a tile from a contiguous 64 byte RGBA8888 buffer.
    #[inline]
    pub fn from_rgba_bytes(bytes: &[u8; TILE_RGBA_BYTES]) -> Self {
        let mut pixels = [Color8888::default(); TILE_PIXELS];
        for (pixel, chunk) in pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            *pixel = Color8888::new(chunk[0], chunk[1], chunk[2], chunk[3]);
        }
        Self { pixels }
    }

    /// Writes the tile into a contiguous 64 byte RGBA8888 buffer.
    #[inline]
    pub fn to_rgba_bytes(&self) -> [u8; TILE_RGBA_BYTES] {
        let mut bytes = [0u8; TILE_RGBA_BYTES];
        for (chunk, pixel) in bytes.chunks_exact_mut(4).zip(self.pixels.iter()) {
            chunk.copy_from_slice(&pixel.to_bytes());
        }
        bytes
    }

    /// Gets a pixel at the specified coordinates (0-3, 0-3)
    ///
    /// # Panics
    ///
    /// If `x` or `y` is 4 or above.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color8888 {
        assert!(x < 4 && y < 4, "pixel ({x}, {y}) is outside of a 4x4 tile");
        self.pixels[y * 4 + x]
    }

    /// Sets a pixel at the specified coordinates (0-3, 0-3)
    ///
    /// # Panics
    ///
    /// If `x` or `y` is 4 or above.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Color8888) {
        assert!(x < 4 && y < 4, "pixel ({x}, {y}) is outside of a 4x4 tile");
        self.pixels[y * 4 + x] = pixel;
    }

    /// Extracts the alpha channel of every pixel, in raster order.
    #[inline]
    pub fn alpha_plane(&self) -> [u8; TILE_PIXELS] {
        core::array::from_fn(|x| self.pixels[x].a)
    }

    /// Overwrites only the alpha byte of every pixel; colour channels are kept.
    #[inline]
    pub fn set_alpha_plane(&mut self, alpha: &[u8; TILE_PIXELS]) {
        for (pixel, &a) in self.pixels.iter_mut().zip(alpha.iter()) {
            *pixel = pixel.with_alpha(a);
        }
    }

    /// Checks if all pixels in the block have the same color values, ignoring alpha.
    #[inline]
    pub fn has_identical_pixels_ignore_alpha(&self) -> bool {
        let first = self.pixels[0].without_alpha();
        self.pixels
            .iter()
            .all(|pixel| pixel.without_alpha() == first)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(Color8888::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_tile() -> Tile {
        Tile::from_pixels(core::array::from_fn(|x| {
            Color8888::new(x as u8 * 16, 255 - x as u8, 7, x as u8 * 17)
        }))
    }

    #[test]
    fn rgba_bytes_roundtrip() {
        let tile = gradient_tile();
        let bytes = tile.to_rgba_bytes();
        assert_eq!(&bytes[4..8], &[16, 254, 7, 17]);
        assert_eq!(Tile::from_rgba_bytes(&bytes), tile);
    }

    #[test]
    fn pixels_are_row_major() {
        let tile = gradient_tile();
        assert_eq!(tile.get_pixel(3, 0), tile.pixels[3]);
        assert_eq!(tile.get_pixel(0, 1), tile.pixels[4]);
        assert_eq!(tile.get_pixel(3, 3), tile.pixels[15]);
    }

    #[test]
    fn alpha_plane_replaces_only_alpha() {
        let mut tile = gradient_tile();
        let before = tile;
        tile.set_alpha_plane(&[9; TILE_PIXELS]);
        for (new, old) in tile.pixels.iter().zip(before.pixels.iter()) {
            assert_eq!(new.without_alpha(), old.without_alpha());
            assert_eq!(new.a, 9);
        }
        assert!(!tile.has_identical_pixels_ignore_alpha());
    }

    #[test]
    fn identical_pixel_checks() {
        let mut tile = Tile::new(Color8888::new(1, 2, 3, 4));
        assert!(tile.has_identical_pixels_ignore_alpha());
        tile.set_pixel(2, 2, Color8888::new(1, 2, 3, 5));
        assert!(tile.has_identical_pixels_ignore_alpha());
        tile.set_pixel(3, 1, Color8888::new(1, 2, 4, 4));
        assert!(!tile.has_identical_pixels_ignore_alpha());
    }
}

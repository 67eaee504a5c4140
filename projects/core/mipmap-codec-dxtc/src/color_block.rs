//! # Colour Block Codec
//!
//! Encodes the RGB portion of a 4x4 tile into two 5:6:5 endpoints and sixteen 2-bit indices,
//! and decodes it back. This is the colour half of DXT1, DXT3 and DXT5 blocks.
//!
//! ## Packed Layout
//!
//! ```text
//! word0: [c0: u16 (bits 0-15)] [c1: u16 (bits 16-31)]
//! word1: [index for pixel 0: bits 0-1] [pixel 1: bits 2-3] ... [pixel 15: bits 30-31]
//! ```
//!
//! Writing both words little endian yields a standard 8 byte DXT1 block.
//!
//! ## Palette Selection
//!
//! The order of the endpoints selects the palette when decoding a DXT1 block:
//!
//! - `c0 > c1`: four colours; `c0`, `c1`, `(2*c0 + c1 + 1) / 3`, `(2*c1 + c0 + 1) / 3`.
//! - `c0 <= c1`: three colours; `c0`, `c1`, `(c0 + c1) / 2`, and transparent black.
//!
//! DXT3 and DXT5 colour blocks always decode with the four colour palette.
//! The encoder reorders endpoints (remapping indices) so the stored order matches the palette
//! it picked.

use crate::endpoint_search::{ColorFit, EndpointSearch, PaletteSize, RangeFitSearch};
use mipmap_codec_common::color_565::Color565;
use mipmap_codec_common::color_8888::Color8888;
use mipmap_codec_common::tile::{Tile, TILE_PIXELS};

/// How a colour block is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorBlockMode {
    /// Always use the four colour palette.
    /// Used for the colour half of DXT3 and DXT5 blocks.
    #[default]
    FourColor,

    /// Standalone DXT1 block; pick whichever of the three or four colour palettes fits better.
    Dxt1 {
        /// Pixels with alpha below this value are encoded as transparent, which forces the
        /// three colour palette. [`None`] ignores alpha entirely.
        alpha_threshold: Option<u8>,
    },
}

/// How a colour block is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorDecodeMode {
    /// Always decode with the four colour palette (DXT3/DXT5 colour).
    #[default]
    FourColor,
    /// Endpoint order selects the palette; three colour blocks may contain transparent pixels.
    Dxt1,
}

/// A colour block before it is packed, with the error of the chosen fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlockEncoding {
    /// Endpoints in the order the indices refer to.
    pub endpoints: [Color565; 2],
    /// 2-bit palette index per pixel.
    pub indices: [u8; TILE_PIXELS],
    /// Error score reported by the endpoint search.
    pub error: u32,
    /// Palette the block was fitted to.
    pub palette: PaletteSize,
}

impl ColorBlockEncoding {
    fn from_fit(fit: ColorFit, palette: PaletteSize) -> Self {
        Self {
            endpoints: fit.endpoints,
            indices: fit.indices,
            error: fit.error,
            palette,
        }
    }

    /// Packs the block into its two words, ordering the endpoints to signal the palette.
    pub fn pack(&self) -> [u32; 2] {
        let [mut c0, mut c1] = self.endpoints;
        let mut indices = self.indices;

        match self.palette {
            PaletteSize::Four => {
                if c0 == c1 {
                    // Every palette entry decodes to the same colour.
                    indices = [0; TILE_PIXELS];
                } else if c0.raw_value() < c1.raw_value() {
                    core::mem::swap(&mut c0, &mut c1);
                    for index in indices.iter_mut() {
                        *index ^= 1;
                    }
                }
            }
            PaletteSize::Three => {
                if c0.raw_value() > c1.raw_value() {
                    core::mem::swap(&mut c0, &mut c1);
                    for index in indices.iter_mut() {
                        if *index < 2 {
                            *index ^= 1;
                        }
                    }
                }
            }
        }

        let mut index_bits = 0u32;
        for (x, index) in indices.iter().enumerate() {
            index_bits |= ((*index & 0b11) as u32) << (x * 2);
        }

        [
            c0.raw_value() as u32 | ((c1.raw_value() as u32) << 16),
            index_bits,
        ]
    }
}

/// Computes the four palette entries for a pair of endpoints, exactly as the decoder does.
///
/// For [`PaletteSize::Three`], entry 3 is transparent black.
pub fn color_palette(c0: Color565, c1: Color565, palette: PaletteSize) -> [Color8888; 4] {
    let a = c0.to_color_8888();
    let b = c1.to_color_8888();

    match palette {
        PaletteSize::Four => {
            let third = |x: u8, y: u8| ((2 * x as u32 + y as u32 + 1) / 3) as u8;
            [
                a,
                b,
                Color8888::new(third(a.r, b.r), third(a.g, b.g), third(a.b, b.b), 255),
                Color8888::new(third(b.r, a.r), third(b.g, a.g), third(b.b, a.b), 255),
            ]
        }
        PaletteSize::Three => {
            let half = |x: u8, y: u8| ((x as u32 + y as u32) / 2) as u8;
            [
                a,
                b,
                Color8888::new(half(a.r, b.r), half(a.g, b.g), half(a.b, b.b), 255),
                Color8888::TRANSPARENT,
            ]
        }
    }
}

/// Fits a tile's colours to endpoints and indices without packing them.
pub fn encode_color_block_with<S: EndpointSearch + ?Sized>(
    tile: &Tile,
    mode: ColorBlockMode,
    search: &S,
) -> ColorBlockEncoding {
    match mode {
        ColorBlockMode::FourColor => {
            let fit = search.fit(tile, PaletteSize::Four, None);
            ColorBlockEncoding::from_fit(fit, PaletteSize::Four)
        }
        ColorBlockMode::Dxt1 { alpha_threshold } => {
            let three = search.fit(tile, PaletteSize::Three, alpha_threshold);
            let has_transparency = alpha_threshold
                .is_some_and(|threshold| tile.pixels.iter().any(|pixel| pixel.a < threshold));

            // Exact fits never need the bigger palette; transparency can't use it.
            if three.error == 0 || has_transparency {
                return ColorBlockEncoding::from_fit(three, PaletteSize::Three);
            }

            let four = search.fit(tile, PaletteSize::Four, None);
            if four.error < three.error {
                ColorBlockEncoding::from_fit(four, PaletteSize::Four)
            } else {
                ColorBlockEncoding::from_fit(three, PaletteSize::Three)
            }
        }
    }
}

/// [`encode_color_block_with`] using [`RangeFitSearch`].
pub fn encode_color_block(tile: &Tile, mode: ColorBlockMode) -> ColorBlockEncoding {
    encode_color_block_with(tile, mode, &RangeFitSearch::new())
}

/// Compresses the colours of a tile into a packed colour block.
pub fn compress_color_block_with<S: EndpointSearch + ?Sized>(
    tile: &Tile,
    mode: ColorBlockMode,
    search: &S,
) -> [u32; 2] {
    encode_color_block_with(tile, mode, search).pack()
}

/// Compresses the colours of a tile into a packed colour block, using [`RangeFitSearch`].
///
/// ```
/// use mipmap_codec_common::color_8888::Color8888;
/// use mipmap_codec_common::tile::Tile;
/// use mipmap_codec_dxtc::color_block::{compress_color_block, ColorBlockMode};
///
/// let red = Tile::new(Color8888::new(255, 0, 0, 255));
/// let packed = compress_color_block(&red, ColorBlockMode::FourColor);
/// assert_eq!(packed, [0xF800_F800, 0]);
/// ```
pub fn compress_color_block(tile: &Tile, mode: ColorBlockMode) -> [u32; 2] {
    compress_color_block_with(tile, mode, &RangeFitSearch::new())
}

/// Decodes a packed colour block into a tile.
///
/// Every pixel is opaque, except index 3 of a three colour [`ColorDecodeMode::Dxt1`] block,
/// which is transparent black.
pub fn decompress_color_block(block: &[u32; 2], mode: ColorDecodeMode) -> Tile {
    let c0 = Color565::from_raw(block[0] as u16);
    let c1 = Color565::from_raw((block[0] >> 16) as u16);

    let palette = match mode {
        ColorDecodeMode::Dxt1 if !c0.greater_than(&c1) => PaletteSize::Three,
        _ => PaletteSize::Four,
    };
    let colours = color_palette(c0, c1, palette);

    let indices = block[1];
    Tile::from_pixels(core::array::from_fn(|x| {
        colours[((indices >> (x * 2)) & 0b11) as usize]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_four_colour_block() {
        // White and black, indices 0,1,2,3 repeating.
        let block = [0x0000_FFFF, 0xE4E4_E4E4];
        let tile = decompress_color_block(&block, ColorDecodeMode::Dxt1);
        assert_eq!(tile.pixels[0], Color8888::new(255, 255, 255, 255));
        assert_eq!(tile.pixels[1], Color8888::new(0, 0, 0, 255));
        assert_eq!(tile.pixels[2], Color8888::new(170, 170, 170, 255));
        assert_eq!(tile.pixels[3], Color8888::new(85, 85, 85, 255));
    }

    #[test]
    fn decodes_three_colour_block_with_transparency() {
        // Black then white; c0 <= c1 signals three colours.
        let block = [0xFFFF_0000, 0xE4E4_E4E4];
        let tile = decompress_color_block(&block, ColorDecodeMode::Dxt1);
        assert_eq!(tile.pixels[0], Color8888::new(0, 0, 0, 255));
        assert_eq!(tile.pixels[1], Color8888::new(255, 255, 255, 255));
        assert_eq!(tile.pixels[2], Color8888::new(127, 127, 127, 255));
        assert_eq!(tile.pixels[3], Color8888::TRANSPARENT);
    }

    #[test]
    fn four_colour_decode_ignores_endpoint_order() {
        let block = [0xFFFF_0000, 0xE4E4_E4E4];
        let tile = decompress_color_block(&block, ColorDecodeMode::FourColor);
        assert_eq!(tile.pixels[2], Color8888::new(85, 85, 85, 255));
        assert_eq!(tile.pixels[3], Color8888::new(170, 170, 170, 255));
    }

    #[rstest]
    #[case(ColorBlockMode::FourColor)]
    #[case(ColorBlockMode::Dxt1 { alpha_threshold: None })]
    #[case(ColorBlockMode::Dxt1 { alpha_threshold: Some(128) })]
    fn flat_representable_grey_is_exact(#[case] mode: ColorBlockMode) {
        let grey = Color8888::new(132, 130, 132, 255);
        let tile = Tile::new(grey);
        let packed = compress_color_block(&tile, mode);
        let decode_mode = match mode {
            ColorBlockMode::FourColor => ColorDecodeMode::FourColor,
            ColorBlockMode::Dxt1 { .. } => ColorDecodeMode::Dxt1,
        };
        assert_eq!(decompress_color_block(&packed, decode_mode), tile);
    }

    #[test]
    fn flat_mid_grey_uses_two_colour_mode_with_zero_error() {
        let tile = Tile::new(Color8888::new(128, 128, 128, 255));
        let encoding = encode_color_block(&tile, ColorBlockMode::Dxt1 { alpha_threshold: None });
        assert_eq!(encoding.palette, PaletteSize::Three);
        assert_eq!(encoding.error, 0);

        // 128 has no exact 5:6:5 form; it lands on the nearest representable grey.
        let decoded = decompress_color_block(&encoding.pack(), ColorDecodeMode::Dxt1);
        assert_eq!(decoded, Tile::new(Color8888::new(132, 130, 132, 255)));
    }

    #[test]
    fn transparent_pixels_survive_dxt1_round_trip() {
        let tile = Tile::from_pixels(core::array::from_fn(|x| {
            if x % 5 == 0 {
                Color8888::new(40, 200, 90, 0)
            } else {
                Color8888::new(255, 255, 255, 255)
            }
        }));

        let packed = compress_color_block(&tile, ColorBlockMode::Dxt1 { alpha_threshold: Some(128) });
        let decoded = decompress_color_block(&packed, ColorDecodeMode::Dxt1);
        for (x, pixel) in decoded.pixels.iter().enumerate() {
            if x % 5 == 0 {
                assert_eq!(*pixel, Color8888::TRANSPARENT, "pixel {x}");
            } else {
                assert_eq!(*pixel, Color8888::new(255, 255, 255, 255), "pixel {x}");
            }
        }
    }

    #[test]
    fn packing_swaps_four_colour_endpoints_and_remaps() {
        let encoding = ColorBlockEncoding {
            endpoints: [Color565::from_raw(0x0000), Color565::from_raw(0xFFFF)],
            indices: [0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3],
            error: 0,
            palette: PaletteSize::Four,
        };
        let unswapped = color_palette(encoding.endpoints[0], encoding.endpoints[1], PaletteSize::Four);

        let packed = encoding.pack();
        assert_eq!(packed[0], 0x0000_FFFF);
        let decoded = decompress_color_block(&packed, ColorDecodeMode::Dxt1);
        for (x, index) in encoding.indices.iter().enumerate() {
            assert_eq!(decoded.pixels[x], unswapped[*index as usize]);
        }
    }

    #[test]
    fn packing_swaps_three_colour_endpoints_and_keeps_transparent_index() {
        let encoding = ColorBlockEncoding {
            endpoints: [Color565::from_raw(0xFFFF), Color565::from_raw(0x0000)],
            indices: [0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3],
            error: 0,
            palette: PaletteSize::Three,
        };
        let unswapped = color_palette(encoding.endpoints[0], encoding.endpoints[1], PaletteSize::Three);

        let packed = encoding.pack();
        assert_eq!(packed[0], 0xFFFF_0000);
        let decoded = decompress_color_block(&packed, ColorDecodeMode::Dxt1);
        for (x, index) in encoding.indices.iter().enumerate() {
            assert_eq!(decoded.pixels[x], unswapped[*index as usize]);
        }
    }

    #[test]
    fn equal_four_colour_endpoints_zero_the_indices() {
        let encoding = ColorBlockEncoding {
            endpoints: [Color565::from_raw(0x1234); 2],
            indices: [2; 16],
            error: 0,
            palette: PaletteSize::Four,
        };
        assert_eq!(encoding.pack(), [0x1234_1234, 0]);
    }

    fn arbitrary_tile() -> impl Strategy<Value = Tile> {
        prop::array::uniform16(any::<[u8; 4]>())
            .prop_map(|pixels| Tile::from_pixels(pixels.map(Color8888::from_bytes)))
    }

    proptest! {
        #[test]
        fn endpoint_order_signals_palette(tile in arbitrary_tile(), threshold in prop::option::of(any::<u8>())) {
            let mode = ColorBlockMode::Dxt1 { alpha_threshold: threshold };
            let encoding = encode_color_block(&tile, mode);
            let packed = encoding.pack();
            let low = packed[0] as u16;
            let high = (packed[0] >> 16) as u16;

            match encoding.palette {
                PaletteSize::Three => prop_assert!(low <= high),
                PaletteSize::Four => prop_assert!(low > high || (low == high && packed[1] == 0)),
            }
        }

        #[test]
        fn four_colour_mode_never_signals_three_colours(tile in arbitrary_tile()) {
            let packed = compress_color_block(&tile, ColorBlockMode::FourColor);
            let low = packed[0] as u16;
            let high = (packed[0] >> 16) as u16;
            prop_assert!(low >= high);
        }

        #[test]
        fn decoded_error_matches_reported_palette(tile in arbitrary_tile()) {
            // Decoding the packed block must reproduce the palette the search scored.
            let encoding = encode_color_block(&tile, ColorBlockMode::FourColor);
            let palette = color_palette(encoding.endpoints[0], encoding.endpoints[1], PaletteSize::Four);
            let decoded = decompress_color_block(&encoding.pack(), ColorDecodeMode::FourColor);
            for (x, index) in encoding.indices.iter().enumerate() {
                prop_assert_eq!(decoded.pixels[x], palette[*index as usize]);
            }
        }
    }
}

//! Endpoint search for colour blocks.
//!
//! Picking the two endpoint colours of a block is the expensive, quality defining part of
//! colour block compression. The codec consumes it through the [`EndpointSearch`] trait so that
//! better (slower) searches can be plugged in without touching the packing rules.
//!
//! [`RangeFitSearch`] is the default implementation: it fits a line through the block's colours
//! along their principal axis, snaps the extremes to 5:6:5, assigns every pixel to its nearest
//! palette entry and then refines the endpoints with a least squares solve over the chosen
//! indices.
//!
//! # Error Score
//!
//! The error reported by a search is the summed squared RGB distance between each decoded
//! pixel and the source pixel *at 5:6:5 precision* (each channel snapped to the nearest value
//! an endpoint can hold). Measuring against the precision reduced source means a flat block
//! always reports an error of exactly zero, whatever its colour.

use crate::color_block::color_palette;
use mipmap_codec_common::color_565::{Color565, BLUE_BITS, GREEN_BITS, RED_BITS};
use mipmap_codec_common::color_8888::Color8888;
use mipmap_codec_common::tile::{Tile, TILE_PIXELS};

/// Number of colours a block palette may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteSize {
    /// Both endpoints, their midpoint, and a transparent entry (index 3).
    /// Also referred to as 2-colour (or 1-bit alpha) mode.
    Three,
    /// Both endpoints and two colours interpolated at 1/3 and 2/3.
    Four,
}

/// The result of an endpoint search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFit {
    /// The two endpoints, in the order the `indices` refer to them.
    pub endpoints: [Color565; 2],
    /// Palette index for every pixel, in raster order.
    pub indices: [u8; TILE_PIXELS],
    /// Reconstruction error; see the module documentation.
    pub error: u32,
}

/// Finds endpoints and indices for a tile.
///
/// # Requirements
///
/// - Every index must be valid for the requested [`PaletteSize`].
/// - With [`PaletteSize::Three`] and an `alpha_threshold` of `Some(t)`, each pixel with
///   alpha below `t` must use index 3 (transparent), and no other pixel may use it.
/// - Without an alpha threshold, index 3 of a [`PaletteSize::Three`] palette must not be used.
/// - The error must be computed with the decoder's palette rules, see
///   [`color_palette`](crate::color_block::color_palette).
pub trait EndpointSearch: Sync {
    /// Fits the tile's colours to a palette of the given size.
    fn fit(&self, tile: &Tile, palette: PaletteSize, alpha_threshold: Option<u8>) -> ColorFit;
}

impl<T: EndpointSearch + ?Sized> EndpointSearch for &T {
    fn fit(&self, tile: &Tile, palette: PaletteSize, alpha_threshold: Option<u8>) -> ColorFit {
        (**self).fit(tile, palette, alpha_threshold)
    }
}

/// Principal axis range fit with least squares refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFitSearch {
    /// How many least squares passes to attempt after the initial fit.
    /// Each pass is only kept if it lowers the error.
    pub refinement_iterations: u32,
}

impl RangeFitSearch {
    /// Creates a search with the default amount of refinement.
    pub const fn new() -> Self {
        Self {
            refinement_iterations: 2,
        }
    }
}

impl Default for RangeFitSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointSearch for RangeFitSearch {
    fn fit(&self, tile: &Tile, palette: PaletteSize, alpha_threshold: Option<u8>) -> ColorFit {
        let block = SearchBlock::new(tile, palette, alpha_threshold);

        let Some(first) = block.first_opaque() else {
            // Whole block is transparent, endpoints don't matter.
            return ColorFit {
                endpoints: [Color565::default(); 2],
                indices: [3; TILE_PIXELS],
                error: 0,
            };
        };

        if block.is_single_colour(first) {
            let colour = nearest_565(first);
            return block.evaluate([colour, colour]);
        }

        let (low, high) = block.principal_extremes();
        let mut best = block.evaluate([nearest_565(high), nearest_565(low)]);

        for _ in 0..self.refinement_iterations {
            if best.error == 0 {
                break;
            }

            let Some(endpoints) = block.least_squares(&best.indices) else {
                break;
            };

            let candidate = block.evaluate(endpoints);
            if candidate.error >= best.error {
                break;
            }
            best = candidate;
        }

        best
    }
}

/// Tile being searched, plus which of its pixels are excluded as transparent.
struct SearchBlock<'a> {
    tile: &'a Tile,
    transparent: [bool; TILE_PIXELS],
    palette: PaletteSize,
}

impl<'a> SearchBlock<'a> {
    fn new(tile: &'a Tile, palette: PaletteSize, alpha_threshold: Option<u8>) -> Self {
        let transparent = match (palette, alpha_threshold) {
            (PaletteSize::Three, Some(threshold)) => {
                core::array::from_fn(|x| tile.pixels[x].a < threshold)
            }
            _ => [false; TILE_PIXELS],
        };

        Self {
            tile,
            transparent,
            palette,
        }
    }

    fn opaque(&self) -> impl Iterator<Item = Color8888> + '_ {
        self.tile
            .pixels
            .iter()
            .zip(self.transparent.iter())
            .filter(|(_, &transparent)| !transparent)
            .map(|(pixel, _)| *pixel)
    }

    fn first_opaque(&self) -> Option<Color8888> {
        self.opaque().next()
    }

    fn is_single_colour(&self, first: Color8888) -> bool {
        // Transparent pixels take the first opaque colour so they can't break the run.
        let mut opaque = *self.tile;
        for (pixel, &transparent) in opaque.pixels.iter_mut().zip(self.transparent.iter()) {
            if transparent {
                *pixel = first;
            }
        }
        opaque.has_identical_pixels_ignore_alpha()
    }

    /// Returns the opaque pixels with the lowest and highest projection on the principal axis.
    fn principal_extremes(&self) -> (Color8888, Color8888) {
        let mut mean = [0f32; 3];
        let mut count = 0f32;
        for pixel in self.opaque() {
            let v = to_vec(pixel);
            for c in 0..3 {
                mean[c] += v[c];
            }
            count += 1.0;
        }
        for value in mean.iter_mut() {
            *value /= count;
        }

        let mut covariance = [[0f32; 3]; 3];
        for pixel in self.opaque() {
            let v = to_vec(pixel);
            let d = [v[0] - mean[0], v[1] - mean[1], v[2] - mean[2]];
            for row in 0..3 {
                for col in 0..3 {
                    covariance[row][col] += d[row] * d[col];
                }
            }
        }

        let axis = principal_axis(&covariance);

        let mut low = (f32::MAX, Color8888::default());
        let mut high = (f32::MIN, Color8888::default());
        for pixel in self.opaque() {
            let v = to_vec(pixel);
            let t = (v[0] - mean[0]) * axis[0] + (v[1] - mean[1]) * axis[1] + (v[2] - mean[2]) * axis[2];
            if t < low.0 {
                low = (t, pixel);
            }
            if t > high.0 {
                high = (t, pixel);
            }
        }

        (low.1, high.1)
    }

    /// Solves for the endpoints minimising squared error given fixed indices.
    fn least_squares(&self, indices: &[u8; TILE_PIXELS]) -> Option<[Color565; 2]> {
        let mut alpha2 = 0f32;
        let mut beta2 = 0f32;
        let mut alphabeta = 0f32;
        let mut alphax = [0f32; 3];
        let mut betax = [0f32; 3];

        for (x, pixel) in self.tile.pixels.iter().enumerate() {
            if self.transparent[x] {
                continue;
            }

            let beta = match (self.palette, indices[x]) {
                (_, 0) => 0.0,
                (_, 1) => 1.0,
                (PaletteSize::Three, 2) => 0.5,
                (PaletteSize::Four, 2) => 1.0 / 3.0,
                (PaletteSize::Four, 3) => 2.0 / 3.0,
                _ => continue,
            };
            let alpha = 1.0 - beta;
            let v = to_vec(*pixel);

            alpha2 += alpha * alpha;
            beta2 += beta * beta;
            alphabeta += alpha * beta;
            for c in 0..3 {
                alphax[c] += alpha * v[c];
                betax[c] += beta * v[c];
            }
        }

        let determinant = alpha2 * beta2 - alphabeta * alphabeta;
        if abs(determinant) < 1e-6 {
            return None;
        }

        let factor = 1.0 / determinant;
        let a: [f32; 3] =
            core::array::from_fn(|c| (alphax[c] * beta2 - betax[c] * alphabeta) * factor);
        let b: [f32; 3] =
            core::array::from_fn(|c| (betax[c] * alpha2 - alphax[c] * alphabeta) * factor);

        Some([nearest_565(from_vec(a)), nearest_565(from_vec(b))])
    }

    /// Assigns each pixel to its closest palette entry and scores the result.
    fn evaluate(&self, endpoints: [Color565; 2]) -> ColorFit {
        let colours = color_palette(endpoints[0], endpoints[1], self.palette);
        let usable = match self.palette {
            PaletteSize::Three => 3,
            PaletteSize::Four => 4,
        };

        let mut indices = [0u8; TILE_PIXELS];
        let mut error = 0u32;
        for (x, pixel) in self.tile.pixels.iter().enumerate() {
            if self.transparent[x] {
                indices[x] = 3;
                continue;
            }

            let mut best_index = 0;
            let mut best_distance = u32::MAX;
            for (index, colour) in colours[..usable].iter().enumerate() {
                let distance = distance_squared(*colour, *pixel);
                if distance < best_distance {
                    best_distance = distance;
                    best_index = index;
                }
            }

            indices[x] = best_index as u8;
            error += distance_squared(colours[best_index], precision_reduced(*pixel));
        }

        ColorFit {
            endpoints,
            indices,
            error,
        }
    }
}

/// Power iteration for the dominant eigenvector of a covariance matrix.
fn principal_axis(covariance: &[[f32; 3]; 3]) -> [f32; 3] {
    // Start from the row with the largest variance; it can't be orthogonal to the answer.
    let mut start = 0;
    for c in 1..3 {
        if covariance[c][c] > covariance[start][start] {
            start = c;
        }
    }

    let mut axis = covariance[start];
    for _ in 0..8 {
        let next: [f32; 3] = core::array::from_fn(|row| {
            covariance[row][0] * axis[0] + covariance[row][1] * axis[1] + covariance[row][2] * axis[2]
        });

        let scale = abs(next[0]).max(abs(next[1])).max(abs(next[2]));
        if scale < 1e-6 {
            break;
        }
        axis = [next[0] / scale, next[1] / scale, next[2] / scale];
    }

    if abs(axis[0]) + abs(axis[1]) + abs(axis[2]) < 1e-6 {
        [1.0, 1.0, 1.0]
    } else {
        axis
    }
}

/// Expands a quantized channel the same way the decoder does.
#[inline]
pub(crate) fn expand_channel(value: u8, bits: u32) -> u8 {
    let shifted = (value as u32) << (8 - bits);
    (shifted + (shifted >> bits)) as u8
}

/// Finds the quantized channel value whose expansion is closest to `value`.
#[inline]
pub(crate) fn nearest_channel(value: u8, bits: u32) -> u8 {
    let max = (1u32 << bits) - 1;
    let guess = (value as u32 * max + 127) / 255;

    let mut best = guess;
    let mut best_distance = u32::MAX;
    for candidate in guess.saturating_sub(1)..=(guess + 1).min(max) {
        let distance = (expand_channel(candidate as u8, bits) as i32 - value as i32).unsigned_abs();
        if distance < best_distance {
            best_distance = distance;
            best = candidate;
        }
    }

    best as u8
}

/// Snaps a colour to the closest representable 5:6:5 colour.
#[inline]
pub(crate) fn nearest_565(pixel: Color8888) -> Color565 {
    Color565::from_quantized(
        nearest_channel(pixel.r, RED_BITS),
        nearest_channel(pixel.g, GREEN_BITS),
        nearest_channel(pixel.b, BLUE_BITS),
    )
}

/// The source pixel as an endpoint would best hold it.
#[inline]
fn precision_reduced(pixel: Color8888) -> Color8888 {
    nearest_565(pixel).to_color_8888_with_alpha(pixel.a)
}

#[inline]
fn distance_squared(a: Color8888, b: Color8888) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

#[inline]
fn to_vec(pixel: Color8888) -> [f32; 3] {
    [pixel.r as f32, pixel.g as f32, pixel.b as f32]
}

#[inline]
fn from_vec(v: [f32; 3]) -> Color8888 {
    let channel = |x: f32| (x.clamp(0.0, 255.0) + 0.5) as u8;
    Color8888::new(channel(v[0]), channel(v[1]), channel(v[2]), 255)
}

// f32::abs lives in std; this crate also builds without it.
#[inline]
fn abs(x: f32) -> f32 {
    if x < 0.0 {
        -x
    } else {
        x
    }
}

//! # RGB565 Color Format Support
//!
//! 16-bit RGB565 colours, as used for the endpoints of DXT1/DXT3/DXT5 colour blocks.
//!
//! - **Red**: 5 bits (bits 15-11)
//! - **Green**: 6 bits (bits 10-5)
//! - **Blue**: 5 bits (bits 4-0)
//!
//! ## Color Expansion
//!
//! When converting back to 8-bit components, each channel is shifted to the top of the byte
//! and its high bits are replicated into the low bits (`v += v >> bits` on the shifted value).
//! This matches the quantization used by the encoder bit for bit; a multiply based
//! expansion (`v * 255 / 31`) rounds differently for some values and must not be used.
//!
//! ```rust
//! use mipmap_codec_common::color_565::Color565;
//!
//! let color = Color565::from_raw(0xF800); // Pure red
//! assert_eq!(color.red(), 255);
//! assert_eq!(color.green(), 0);
//! assert_eq!(color.blue(), 0);
//! ```

use crate::color_8888::Color8888;

/// Number of bits in the red channel.
pub const RED_BITS: u32 = 5;
/// Number of bits in the green channel.
pub const GREEN_BITS: u32 = 6;
/// Number of bits in the blue channel.
pub const BLUE_BITS: u32 = 5;

/// Represents a 16-bit RGB565 color (5 bits red, 6 bits green, 5 bits blue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Color565 {
    /// The underlying 16-bit RGB565 value
    value: u16,
}

impl Color565 {
    /// Creates a new [`Color565`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Creates a new [`Color565`] from separate 8-bit RGB components by truncating
    /// each channel to its top bits.
    ///
    /// # Parameters
    ///
    /// - `r`: The red component (0-255)
    /// - `g`: The green component (0-255)
    /// - `b`: The blue component (0-255)
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            value: ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3),
        }
    }

    /// Creates a new [`Color565`] from already quantized channel values.
    ///
    /// `r` and `b` must be below 32, `g` below 64; excess bits are masked off.
    #[inline]
    pub const fn from_quantized(r: u8, g: u8, b: u8) -> Self {
        Self {
            value: (((r & 0x1F) as u16) << 11) | (((g & 0x3F) as u16) << 5) | (b & 0x1F) as u16,
        }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    /// Returns the raw 5-bit red value.
    #[inline]
    pub const fn red_bits(&self) -> u8 {
        (self.value >> 11) as u8
    }

    /// Returns the raw 6-bit green value.
    #[inline]
    pub const fn green_bits(&self) -> u8 {
        ((self.value >> 5) & 0x3F) as u8
    }

    /// Returns the raw 5-bit blue value.
    #[inline]
    pub const fn blue_bits(&self) -> u8 {
        (self.value & 0x1F) as u8
    }

    /// Extracts the expanded 8-bit red component (0-255)
    #[inline]
    pub const fn red(&self) -> u8 {
        let r = ((self.value & 0xF800) >> 8) as u32;
        (r + (r >> RED_BITS)) as u8
    }

    /// Extracts the expanded 8-bit green component (0-255)
    #[inline]
    pub const fn green(&self) -> u8 {
        let g = ((self.value & 0x07E0) >> 3) as u32;
        (g + (g >> GREEN_BITS)) as u8
    }

    /// Extracts the expanded 8-bit blue component (0-255)
    #[inline]
    pub const fn blue(&self) -> u8 {
        let b = ((self.value & 0x001F) << 3) as u32;
        (b + (b >> BLUE_BITS)) as u8
    }

    /// Compares two [`Color565`] values
    ///
    /// Returns if this value is greater than the other.
    /// The comparison selects the palette of a colour block when decoding.
    #[inline]
    pub const fn greater_than(&self, other: &Self) -> bool {
        self.value > other.value
    }

    /// Converts this [`Color565`] to a [`Color8888`] with full opacity (alpha=255)
    ///
    /// ```
    /// use mipmap_codec_common::color_565::Color565;
    ///
    /// let rgba8888 = Color565::from_rgb(255, 0, 0).to_color_8888();
    /// assert_eq!((rgba8888.r, rgba8888.g, rgba8888.b, rgba8888.a), (255, 0, 0, 255));
    /// ```
    #[inline]
    pub const fn to_color_8888(&self) -> Color8888 {
        self.to_color_8888_with_alpha(255)
    }

    /// Converts this RGB565 color to a RGBA8888 color with the specified alpha value
    #[inline]
    pub const fn to_color_8888_with_alpha(&self, alpha: u8) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), alpha)
    }
}

impl From<Color8888> for Color565 {
    #[inline]
    fn from(color: Color8888) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }
}

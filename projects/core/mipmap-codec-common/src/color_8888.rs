//! RGBA8888 pixel type shared by the tile codecs.

/// Represents a single RGBA8888 pixel color.
///
/// The in-memory layout matches a raw RGBA8888 pixel (`r`, `g`, `b`, `a` bytes in order).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color8888 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Color8888 {
    /// Constructs a new [`Color8888`] from the specified red, green, blue, and alpha components.
    ///
    /// # Examples
    ///
    /// ```
    /// use mipmap_codec_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// assert_eq!(pixel.r, 255);
    /// assert_eq!(pixel.a, 255);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black; what index 3 of a transparent DXT1 block decodes to.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Constructs a pixel from 4 RGBA bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Returns the pixel as 4 RGBA bytes.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns a copy of this pixel with the alpha replaced.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Returns the colour channels packed into a `u32`, ignoring alpha.
    /// Only useful for comparisons.
    #[inline]
    pub const fn without_alpha(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, 0])
    }
}

use mipmap_codec_common::allocate::AllocateError;
use thiserror::Error;

/// Errors from the image level helpers.
///
/// The tile and block codecs themselves cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DxtcError {
    /// Width or height is zero, or the image is too large to address.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels.
        width: usize,
        /// Height in pixels.
        height: usize,
    },

    /// The input buffer is too small for the given dimensions.
    #[error("Input too small. Needed {needed} bytes, got {actual}")]
    InputTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes provided.
        actual: usize,
    },

    /// The output buffer could not be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocateError),
}

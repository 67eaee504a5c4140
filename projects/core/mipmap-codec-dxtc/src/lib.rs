#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod color_block;
pub mod endpoint_search;
pub mod explicit_alpha;
pub mod gradient_alpha;
pub mod image;
pub mod tile;

mod error;

pub use error::DxtcError;
pub use image::{compress_image, compress_image_with, decompress_image, BlockFormat};
pub use tile::{
    compress_rgb_tile, compress_tile, compress_tile_explicit_alpha, compress_tile_gradient_alpha,
    decompress_rgb_tile, decompress_tile, decompress_tile_explicit_alpha,
    decompress_tile_gradient_alpha, AlphaMode, PackedTile,
};

#[cfg(test)]
pub mod test_prelude;

//! Common test imports and utilities for the block codec tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.

// External crates commonly used in tests
pub use rstest::rstest;

// Common types from mipmap_codec_common
pub use mipmap_codec_common::color_565::Color565;
pub use mipmap_codec_common::color_8888::Color8888;
pub use mipmap_codec_common::tile::Tile;

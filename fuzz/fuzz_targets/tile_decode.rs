#![no_main]

// Decodes arbitrary DXT1/DXT3/DXT5 blocks, then re-encodes the decoded pixels.
// Every bit pattern is a valid block, so neither direction may panic.

use libfuzzer_sys::{arbitrary, fuzz_target};
use mipmap_codec_dxtc::tile::PACKED_TILE_BYTES;
use mipmap_codec_dxtc::{
    compress_rgb_tile, compress_tile, decompress_rgb_tile, decompress_tile, AlphaMode, PackedTile,
};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Block {
    pub bytes: [u8; PACKED_TILE_BYTES],
    pub alpha_threshold: Option<u8>,
}

fuzz_target!(|block: Block| {
    let packed = PackedTile::from_le_bytes(&block.bytes);
    assert_eq!(packed.to_le_bytes(), block.bytes);

    // DXT1: the colour half on its own.
    let rgb = decompress_rgb_tile(&packed.color());
    let repacked = compress_rgb_tile(&rgb, block.alpha_threshold);
    let _ = decompress_rgb_tile(&repacked);

    // DXT5
    let tile = decompress_tile(&packed, AlphaMode::Gradient);
    let repacked = compress_tile(&tile, AlphaMode::Gradient);
    let _ = decompress_tile(&repacked, AlphaMode::Gradient);

    // DXT3: decoded 4-bit alpha re-encodes to the same nibbles.
    let tile = decompress_tile(&packed, AlphaMode::Explicit);
    let repacked = compress_tile(&tile, AlphaMode::Explicit);
    assert_eq!(
        repacked.alpha(),
        packed.alpha(),
        "Explicit alpha did not survive a decode/encode cycle\nBlock: {:?}",
        block.bytes
    );
});

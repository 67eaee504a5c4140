#![no_main]

// Feeds arbitrary containers to the chunked decompressor. Malformed input must be
// rejected with an error, never a panic or an oversized allocation.

use libfuzzer_sys::{arbitrary, fuzz_target};
use mipmap_codec_chunked::{
    compress_chunked, decompress_chunked, decompress_chunked_slice, ChunkedSettingsBuilder,
};
use mipmap_codec_common::compressor::NoCompression;
use mipmap_codec_zlib::ZlibCompressor;
use mipmap_codec_zstd::ZStandardCompressor;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub max_block_size: u16,
    pub expected_total_size: u16,
    pub data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let settings = ChunkedSettingsBuilder::new()
        .max_block_size(input.max_block_size as u32)
        .parallel(false)
        .build();

    // As a container.
    let _ = decompress_chunked_slice(&NoCompression, &input.data, &settings);
    let _ = decompress_chunked_slice(&ZStandardCompressor::new_fast(), &input.data, &settings);
    let _ = decompress_chunked_slice(&ZlibCompressor::new_fast(), &input.data, &settings);
    let _ = decompress_chunked(
        &ZStandardCompressor::new_fast(),
        &input.data,
        input.expected_total_size as usize,
        &settings,
    );

    // As a buffer to compress.
    if let Ok(container) = compress_chunked(&NoCompression, &input.data, &settings) {
        let restored = decompress_chunked_slice(&NoCompression, &container, &settings)
            .expect("Freshly written container failed to decompress");
        assert_eq!(restored, input.data);
    }
});

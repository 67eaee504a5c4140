#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

use core::ffi::c_void;
use mipmap_codec_common::compressor::ByteCompressor;
use thiserror::Error;
use zstd_sys::ZSTD_cParameter::*;
use zstd_sys::ZSTD_dParameter::*;
use zstd_sys::ZSTD_format_e::*;
use zstd_sys::*;

/// Errors that can occur during ZStandard compression or decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZStandardError {
    /// Invalid compression level
    #[error("Invalid compression level: {0}")]
    InvalidLevel(i32),

    /// ZStandard internal error
    #[error("ZStandard internal error: {0:?}")]
    ZStandardInternal(ZSTD_ErrorCode),
}

/// ZStandard implementation of [`ByteCompressor`].
///
/// The compression level is configured when creating the compressor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZStandardCompressor {
    compression_level: i32,
}

impl ZStandardCompressor {
    /// Creates a new ZStandard compressor with the specified compression level.
    ///
    /// # Parameters
    /// * `compression_level` - Compression level (1-22, where 1 is fastest and 22 is best compression)
    pub fn new(compression_level: i32) -> Result<Self, ZStandardError> {
        if !(1..=22).contains(&compression_level) {
            return Err(ZStandardError::InvalidLevel(compression_level));
        }

        Ok(Self { compression_level })
    }

    /// Creates a new ZStandard compressor with compression level 1 (fastest).
    pub fn new_fast() -> Self {
        Self {
            compression_level: 1,
        }
    }

    /// Creates a new ZStandard compressor with compression level 3 (default).
    pub fn new_default() -> Self {
        Self {
            compression_level: 3,
        }
    }

    /// Creates a new ZStandard compressor with compression level 22 (best compression).
    pub fn new_best() -> Self {
        Self {
            compression_level: 22,
        }
    }

    /// The compression level used by [`ByteCompressor::compress`].
    pub fn compression_level(&self) -> i32 {
        self.compression_level
    }
}

impl Default for ZStandardCompressor {
    fn default() -> Self {
        Self::new_default()
    }
}

impl ByteCompressor for ZStandardCompressor {
    type Error = ZStandardError;

    fn max_compressed_size(&self, len_bytes: usize) -> usize {
        unsafe { ZSTD_compressBound(len_bytes) }
    }

    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        compress(self.compression_level, source, destination)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize, Self::Error> {
        decompress(source, destination)
    }
}

/// Compresses data with ZStandard.
/// Does not use fallback to 'copy' if compression is ineffective.
///
/// # Parameters
///
/// * `level`: Level at which we are compressing.
/// * `source`: Source data to compress.
/// * `destination`: Destination buffer.
fn compress(level: i32, source: &[u8], destination: &mut [u8]) -> Result<usize, ZStandardError> {
    // Create a compression context
    let cctx = unsafe { ZSTD_createCCtx() };
    if cctx.is_null() {
        return Err(ZStandardError::ZStandardInternal(
            ZSTD_ErrorCode::ZSTD_error_memory_allocation,
        ));
    }

    // Set compression parameters (magicless format, no extra headers)
    zstd_setcommoncompressparams(cctx, level);

    let result = unsafe {
        ZSTD_compress2(
            cctx,
            destination.as_mut_ptr() as *mut c_void,
            destination.len(),
            source.as_ptr() as *const c_void,
            source.len(),
        )
    };

    unsafe {
        ZSTD_freeCCtx(cctx);
    }

    if unsafe { ZSTD_isError(result) } == 0 {
        return Ok(result);
    }

    Err(ZStandardError::ZStandardInternal(unsafe {
        ZSTD_getErrorCode(result)
    }))
}

/// Decompresses data with ZStandard.
///
/// # Parameters
///
/// * `source`: Source data to decompress.
/// * `destination`: Destination buffer for decompressed data.
fn decompress(source: &[u8], destination: &mut [u8]) -> Result<usize, ZStandardError> {
    let dctx = unsafe { ZSTD_createDCtx() };
    if dctx.is_null() {
        return Err(ZStandardError::ZStandardInternal(
            ZSTD_ErrorCode::ZSTD_error_memory_allocation,
        ));
    }

    // Must match the format set at compression time.
    unsafe {
        ZSTD_DCtx_setParameter(
            dctx,
            ZSTD_d_experimentalParam1, // zstd_d_format
            ZSTD_f_zstd1_magicless as i32,
        );
    }

    let result = unsafe {
        ZSTD_decompressDCtx(
            dctx,
            destination.as_mut_ptr() as *mut c_void,
            destination.len(),
            source.as_ptr() as *const c_void,
            source.len(),
        )
    };

    unsafe {
        ZSTD_freeDCtx(dctx);
    }

    if unsafe { ZSTD_isError(result) } != 0 {
        return Err(ZStandardError::ZStandardInternal(unsafe {
            ZSTD_getErrorCode(result)
        }));
    }

    Ok(result)
}

#[inline(always)]
fn zstd_setcommoncompressparams(cctx: *mut ZSTD_CCtx_s, level: i32) {
    unsafe {
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_compressionLevel, level);
        ZSTD_CCtx_setParameter(
            cctx,
            ZSTD_c_experimentalParam2, // zstd_c_format
            ZSTD_f_zstd1_magicless as i32,
        );
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_contentSizeFlag, 0);
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_checksumFlag, 0);
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_dictIDFlag, 0);
    }
}

//! Memory allocation utilities with recoverable failure.
//!
//! Running out of memory while (de)compressing a large mip level is reported to the caller
//! as an [`AllocateError`] instead of aborting the process.
//!
//! ## Useful APIs
//!
//! [`allocate_align_64`]: Allocates uninitialized memory aligned to 64-bytes.
//! [`AlignedBuffer`]: Zero filled memory aligned to 64-bytes, usable as a byte slice.
//! [`try_zeroed_vec`]: Allocates a zero filled [`Vec`], reporting failure as an error.
//!
//! Memory is automatically deallocated when the allocation wrappers are dropped.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::alloc::{Layout, LayoutError};
use core::ptr::write_bytes;
use core::slice;
use safe_allocator_api::AllocError;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Allocates data with an alignment of 64 bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate. Must be non-zero.
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated data
pub fn allocate_align_64(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    let layout = Layout::from_size_align(num_bytes, 64)?;
    Ok(RawAlloc::new(layout)?)
}

/// A zero filled buffer aligned to 64 bytes.
///
/// Used as per-task scratch space; dropping it releases the memory.
pub struct AlignedBuffer {
    alloc: RawAlloc,
}

impl AlignedBuffer {
    /// Allocates a zero filled buffer of `num_bytes` bytes. `num_bytes` must be non-zero.
    pub fn new(num_bytes: usize) -> Result<Self, AllocateError> {
        let mut alloc = allocate_align_64(num_bytes)?;
        // SAFETY: The allocation is exactly `num_bytes` long.
        unsafe { write_bytes(alloc.as_mut_ptr(), 0, num_bytes) };
        Ok(Self { alloc })
    }

    /// Length of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.alloc.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alloc.len() == 0
    }

    /// Views the buffer as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: Memory is initialized in `new` and owned by `self`.
        unsafe { slice::from_raw_parts(self.alloc.as_ptr(), self.alloc.len()) }
    }

    /// Views the buffer as a mutable byte slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: Memory is initialized in `new` and uniquely borrowed through `self`.
        unsafe { slice::from_raw_parts_mut(self.alloc.as_mut_ptr(), self.alloc.len()) }
    }
}

/// Allocates a [`Vec`] of `len` zero bytes.
///
/// # Returns
///
/// The vector, or [`AllocateError::TryReserveFailed`] if the memory could not be reserved.
pub fn try_zeroed_vec(len: usize) -> Result<Vec<u8>, AllocateError> {
    let mut result = try_vec_with_capacity(len)?;
    result.resize(len, 0);
    Ok(result)
}

/// Allocates an empty [`Vec`] able to hold `capacity` bytes without reallocating.
pub fn try_vec_with_capacity(capacity: usize) -> Result<Vec<u8>, AllocateError> {
    let mut result = Vec::new();
    result.try_reserve_exact(capacity)?;
    Ok(result)
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` in `allocate_align_64` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),

    /// Reserving capacity for a buffer failed.
    #[error("Failed to reserve buffer memory: {0}")]
    TryReserveFailed(#[from] TryReserveError),
}

//! The owned byte region holding every object of a [`RawHetVec`].
//!
//! This module encapsulates the `ptr` and `layout` fields of [`RawBuffer`],
//! guaranteeing the safety invariant: **a non-empty buffer's pointer always
//! comes from the global allocator with exactly the stored layout**.
//!
//! A [`RawBuffer`] knows nothing about the objects placed in it. Dropping it
//! releases the bytes without running any destructor, which is exactly what
//! relocation needs for the old region once every object has been moved out.
//!
//! [`RawHetVec`]: crate::RawHetVec

use alloc::alloc::{alloc, dealloc};
use core::{alloc::Layout, num::NonZeroUsize, ptr::NonNull};

use crate::error::TryReserveError;

/// An owned, uninitialized byte region aligned to a fixed alignment.
///
/// A zero-capacity buffer does not allocate; its pointer is dangling but
/// aligned, which is enough to place zero-sized objects.
pub(crate) struct RawBuffer {
    /// Start of the region.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `layout.size() > 0`, the pointer was returned by the global
    ///    allocator for `layout` and has not been deallocated.
    /// 2. If `layout.size() == 0`, the pointer is a dangling pointer aligned
    ///    to `layout.align()` and is never deallocated.
    ptr: NonNull<u8>,
    /// Size and alignment of the region.
    layout: Layout,
}

impl RawBuffer {
    /// Creates an empty buffer for objects aligned to at most `align` bytes.
    ///
    /// `align` must be a power of two.
    #[inline]
    pub(crate) const fn dangling(align: usize) -> Self {
        let ptr = match NonZeroUsize::new(align) {
            Some(align) => NonNull::without_provenance(align),
            None => NonNull::dangling(),
        };
        let layout = match Layout::from_size_align(0, align) {
            Ok(layout) => layout,
            Err(_) => Layout::new::<()>(),
        };
        Self { ptr, layout }
    }

    /// Allocates a buffer of `capacity` bytes aligned to `align`.
    ///
    /// A `capacity` of zero does not allocate.
    pub(crate) fn allocate(capacity: usize, align: usize) -> Result<Self, TryReserveError> {
        let layout =
            Layout::from_size_align(capacity, align).map_err(|_| TryReserveError::CapacityOverflow)?;
        if capacity == 0 {
            return Ok(Self::dangling(align));
        }

        // SAFETY: `layout` has a non-zero size as checked above.
        let ptr = unsafe { alloc(layout) };
        let ptr = NonNull::new(ptr).ok_or(TryReserveError::AllocError { layout })?;

        Ok(Self { ptr, layout })
    }

    /// Pointer to the first byte of the region.
    #[inline]
    pub(crate) fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Address of the first byte, used for alignment arithmetic.
    #[inline]
    pub(crate) fn base_address(&self) -> usize {
        self.ptr.addr().get()
    }

    /// Number of bytes in the region.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Alignment of the region.
    #[inline]
    pub(crate) fn align(&self) -> usize {
        self.layout.align()
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: The buffer is non-empty, so the pointer came from `alloc` with
            // this exact layout and has not been freed, as guaranteed by the
            // invariants on this type.
            unsafe {
                dealloc(self.ptr.as_ptr(), self.layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_is_aligned() {
        for align in [1usize, 2, 8, 64, 4096] {
            let buffer = RawBuffer::dangling(align);
            assert_eq!(buffer.capacity(), 0);
            assert_eq!(buffer.align(), align);
            assert_eq!(buffer.base_address() % align, 0);
        }
    }

    #[test]
    fn test_allocate_is_aligned() {
        for align in [1usize, 4, 16, 256] {
            let buffer = RawBuffer::allocate(100, align).unwrap();
            assert_eq!(buffer.capacity(), 100);
            assert_eq!(buffer.base_address() % align, 0);
        }
    }

    #[test]
    fn test_allocate_zero_does_not_allocate() {
        let buffer = RawBuffer::allocate(0, 8).unwrap();
        assert_eq!(buffer.capacity(), 0);
        assert_eq!(buffer.base_address(), 8);
    }

    #[test]
    fn test_allocate_overflow() {
        assert_eq!(
            RawBuffer::allocate(usize::MAX - 2, 8).err(),
            Some(TryReserveError::CapacityOverflow)
        );
    }

    #[test]
    fn test_buffer_is_writable() {
        let buffer = RawBuffer::allocate(16, 8).unwrap();
        let ptr = buffer.as_ptr().cast::<u64>();
        // SAFETY: The buffer holds 16 bytes aligned to 8, room for one `u64`.
        unsafe {
            ptr.write(0xdead_beef);
        }
        // SAFETY: The value was written just above.
        let value = unsafe { ptr.read() };
        assert_eq!(value, 0xdead_beef);
    }
}

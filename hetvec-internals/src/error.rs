//! Errors raised while growing the metadata arrays or the data buffer.

use core::alloc::Layout;

/// The error type for the fallible reservation methods.
///
/// Whenever one of these is returned, the vector that produced it is left
/// exactly as it was before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
    /// The computed byte or entry count overflowed, or exceeded the maximum
    /// size of a single allocation (`isize::MAX` bytes).
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The global allocator returned an error for the given layout.
    #[error("memory allocation of {} bytes (align {}) failed", .layout.size(), .layout.align())]
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

//! Errors returned by [`HetVec`](crate::HetVec).

pub use hetvec_internals::TryReserveError;

/// The error type for checked element access.
///
/// A failed access never reads the slot's bytes: asking for the wrong type is
/// reported, not reinterpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The index is not smaller than the length of the vector.
    #[error("index {index} is out of range for a vector of length {len}")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the vector.
        len: usize,
    },
    /// The slot holds a different type than the one requested.
    #[error("slot {index} holds a `{found}`, not a `{expected}`")]
    TypeMismatch {
        /// The requested index.
        index: usize,
        /// Name of the requested type.
        expected: &'static str,
        /// Name of the type actually stored at `index`.
        found: &'static str,
    },
}

impl AccessError {
    /// Returns `true` for [`AccessError::TypeMismatch`].
    #[inline]
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Returns `true` for [`AccessError::OutOfRange`].
    #[inline]
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_display() {
        let error = AccessError::OutOfRange { index: 4, len: 3 };
        assert_eq!(
            error.to_string(),
            "index 4 is out of range for a vector of length 3"
        );
        assert!(error.is_out_of_range());
        assert!(!error.is_type_mismatch());

        let error = AccessError::TypeMismatch {
            index: 0,
            expected: "f64",
            found: "i32",
        };
        assert_eq!(error.to_string(), "slot 0 holds a `i32`, not a `f64`");
        assert!(error.is_type_mismatch());
    }

    #[test]
    fn test_error_traits() {
        static_assertions::assert_impl_all!(AccessError: core::error::Error, Send, Sync, Copy);
        static_assertions::assert_impl_all!(TryReserveError: core::error::Error, Send, Sync, Copy);
    }
}

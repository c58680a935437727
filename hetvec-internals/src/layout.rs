//! Alignment arithmetic shared by slot placement and buffer relayout.
//!
//! These are pure functions of integers. They never touch memory, which keeps
//! them trivially testable and lets [`RawHetVec`] use the same arithmetic for
//! a fresh push and for every slot it walks while relocating.
//!
//! [`RawHetVec`]: crate::RawHetVec

/// Returns the number of padding bytes needed to move `address` up to the
/// next multiple of `align`.
///
/// Computes `(align - address % align) % align`, so an already aligned
/// address needs no padding.
///
/// `align` must be a power of two, which every alignment reported by
/// [`core::mem::align_of`] is.
///
/// # Examples
///
/// ```
/// use hetvec_internals::layout::padding_for;
///
/// assert_eq!(padding_for(0x1000, 8), 0);
/// assert_eq!(padding_for(0x1001, 8), 7);
/// assert_eq!(padding_for(0x1007, 4), 1);
/// ```
#[inline]
#[must_use]
pub const fn padding_for(address: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    address.wrapping_neg() & (align - 1)
}

/// Returns the offset at which an object with alignment `align` may be placed
/// when the previous object ends at `end` bytes into a buffer whose first
/// byte lives at `base_address`.
///
/// Returns `None` if the padded offset does not fit in a `usize`.
#[inline]
#[must_use]
pub const fn aligned_offset(base_address: usize, end: usize, align: usize) -> Option<usize> {
    let address = base_address.wrapping_add(end);
    end.checked_add(padding_for(address, align))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_known_pairs() {
        let cases: &[(usize, usize, usize)] = &[
            (0, 1, 0),
            (0, 8, 0),
            (1, 1, 0),
            (1, 2, 1),
            (1, 4, 3),
            (1, 8, 7),
            (3, 4, 1),
            (4, 4, 0),
            (5, 4, 3),
            (6, 8, 2),
            (15, 16, 1),
            (17, 16, 15),
            (0x1000, 4096, 0),
            (0x1001, 4096, 4095),
        ];

        for &(address, align, expected) in cases {
            assert_eq!(
                padding_for(address, align),
                expected,
                "padding_for({address}, {align})"
            );
        }
    }

    #[test]
    fn test_padding_matches_formula() {
        for align in [1usize, 2, 4, 8, 16, 32, 64] {
            for address in 0..256usize {
                let expected = (align - address % align) % align;
                assert_eq!(padding_for(address, align), expected);
                assert_eq!((address + padding_for(address, align)) % align, 0);
            }
        }
    }

    #[test]
    fn test_padding_near_usize_max() {
        assert_eq!(padding_for(usize::MAX, 8), 1);
        assert_eq!(padding_for(usize::MAX - 7, 8), 0);
    }

    #[test]
    fn test_aligned_offset_respects_base() {
        // A base that is only 4-aligned shifts the padding for an 8-aligned object.
        assert_eq!(aligned_offset(0x1000, 4, 8), Some(8));
        assert_eq!(aligned_offset(0x1004, 4, 8), Some(4));
        assert_eq!(aligned_offset(0x1000, 0, 16), Some(0));
        assert_eq!(aligned_offset(0x1000, 13, 1), Some(13));
    }

    #[test]
    fn test_aligned_offset_overflow() {
        assert_eq!(aligned_offset(0, usize::MAX, 8), None);
        assert_eq!(aligned_offset(0, usize::MAX, 1), Some(usize::MAX));
    }
}

//! Borrowed, type-erased views of single elements.

use core::marker::PhantomData;

use hetvec_internals::RawSlotRef;

use crate::type_set::{Member, TypeSet};

/// A view of one element of a [`HetVec`](crate::HetVec), returned by
/// [`HetVec::element`](crate::HetVec::element) and by iteration.
///
/// It carries the element's type index and address. It does not own the
/// element and cannot outlive the borrow of the vector it came from, so no
/// growth of the vector can invalidate it while it exists.
pub struct Element<'a, S: TypeSet> {
    /// The underlying slot view.
    raw: RawSlotRef<'a>,
    /// The type set the slot's type index refers to.
    _marker: PhantomData<S>,
}

impl<'a, S: TypeSet> Element<'a, S> {
    /// Wraps a slot view of a vector over `S`.
    #[inline]
    pub(crate) fn new(raw: RawSlotRef<'a>) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Position of the element's type within the type set `S`.
    #[inline]
    pub fn type_index(&self) -> usize {
        self.raw.type_index()
    }

    /// The [`core::any::type_name`] of the element's type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.raw.type_name()
    }

    /// Size in bytes of the element's type.
    #[inline]
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// Alignment in bytes of the element's type.
    #[inline]
    pub fn align(&self) -> usize {
        self.raw.align()
    }

    /// Address of the element inside the vector's buffer.
    ///
    /// The pointer is only meaningful while the vector stays borrowed; any
    /// later push may relocate the element.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.raw.as_ptr()
    }

    /// Returns `true` if the element is a `T`.
    #[inline]
    pub fn is<T, I>(&self) -> bool
    where
        S: Member<T, I>,
    {
        self.type_index() == <S as Member<T, I>>::INDEX
    }

    /// Returns the element as a `&T`, or `None` if it holds another type.
    #[inline]
    pub fn downcast_ref<T, I>(&self) -> Option<&'a T>
    where
        S: Member<T, I>,
    {
        if !self.is::<T, I>() {
            return None;
        }
        // SAFETY: The type index of the slot equals the position of `T` in `S`, and
        // the slot's vtable is the row `S::VTABLES` holds at that position, which
        // was created for `T`.
        Some(unsafe { self.raw.downcast_unchecked::<T>() })
    }
}

impl<S: TypeSet> Clone for Element<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: TypeSet> Copy for Element<'_, S> {}

// SAFETY: An element view only hands out shared references to a value of one
// of the types in `S`. Sending such references to another thread is sound when
// all of those types are `Sync`.
unsafe impl<S: TypeSet + Sync> Send for Element<'_, S> {}

// SAFETY: Sharing the view shares the same references, see above.
unsafe impl<S: TypeSet + Sync> Sync for Element<'_, S> {}

impl<S: TypeSet> core::fmt::Debug for Element<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Element")
            .field("type_index", &self.type_index())
            .field("type_name", &self.type_name())
            .finish()
    }
}

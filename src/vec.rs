//! The [`HetVec`] container.

use alloc::alloc::handle_alloc_error;
use core::marker::PhantomData;

use hetvec_internals::{RawHetVec, TryReserveError};

use crate::{
    element::Element,
    error::AccessError,
    iter::Iter,
    type_set::{CloneTypeSet, Member, TypeSet},
};

/// An append-only vector of values whose types are drawn from the type set
/// `S`, packed into one contiguous buffer.
///
/// Each element is stored at its natural size and alignment right after the
/// previous one, so a vector of mixed small and large types does not pay for
/// the largest type in every slot, and no element gets its own allocation.
/// Next to the buffer, four parallel arrays record the offset, size, alignment
/// and type index of every element.
///
/// `S` is a tuple listing the storable types, such as `(i32, f64, String)`.
/// Pushing a type outside the tuple does not compile.
///
/// # Growth
///
/// The metadata arrays grow to `2 * entries + 1` when full. The buffer grows
/// to `max(required, 2 * capacity)` bytes when the next element does not
/// fit; every element is then moved into the new buffer and its offset is
/// recomputed. References into the vector borrow it, so they can never
/// observe a relocation.
///
/// # Examples
///
/// ```
/// use hetvec::HetVec;
///
/// let mut values: HetVec<(i32, f64, String)> = HetVec::new();
/// values.push(42);
/// values.push(3.14);
/// values.push(String::from("hello"));
///
/// assert_eq!(values.len(), 3);
/// assert_eq!(values.get::<i32, _>(0), Ok(&42));
/// assert_eq!(values.get::<f64, _>(1), Ok(&3.14));
/// assert_eq!(values.get::<String, _>(2).map(String::as_str), Ok("hello"));
/// assert!(values.get::<f64, _>(0).unwrap_err().is_type_mismatch());
/// ```
pub struct HetVec<S: TypeSet> {
    /// The type-erased storage.
    ///
    /// Every slot was pushed with a type index `S::INDEX` for the type it was
    /// constructed as, and the storage was created with `S::VTABLES`.
    raw: RawHetVec,
    /// The vector owns values of the types in `S`.
    _marker: PhantomData<S>,
}

impl<S: TypeSet> HetVec<S> {
    /// Creates an empty vector. Does not allocate.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        debug_assert!(S::VTABLES.len() == S::LEN);
        Self {
            raw: RawHetVec::new(S::VTABLES),
            _marker: PhantomData,
        }
    }

    /// Creates an empty vector with room for `entries` elements and a buffer
    /// of `bytes` bytes.
    ///
    /// # Panics
    ///
    /// Panics if either size overflows; aborts on allocation failure.
    #[must_use]
    pub fn with_capacity(entries: usize, bytes: usize) -> Self {
        let mut values = Self::new();
        values.reserve(entries);
        values.reserve_bytes(bytes);
        values
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of elements the metadata arrays have room for.
    #[inline]
    pub fn entries(&self) -> usize {
        self.raw.entries()
    }

    /// Size of the data buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Number of buffer bytes in use, padding included.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.raw.byte_len()
    }

    /// Type index of element `index`, or `None` if `index >= len()`.
    #[inline]
    pub fn type_index(&self, index: usize) -> Option<usize> {
        self.raw.type_index(index)
    }

    /// Grows the metadata arrays to hold at least `entries` elements.
    ///
    /// # Panics
    ///
    /// Panics if the size overflows; aborts on allocation failure.
    pub fn reserve(&mut self, entries: usize) {
        handle_reserve(self.raw.try_reserve_entries(entries));
    }

    /// Fallible version of [`reserve`](Self::reserve). On error the vector is
    /// unchanged.
    pub fn try_reserve(&mut self, entries: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve_entries(entries)
    }

    /// Grows the data buffer to at least `bytes` bytes, relocating every
    /// element.
    ///
    /// # Panics
    ///
    /// Panics if the size overflows; aborts on allocation failure.
    pub fn reserve_bytes(&mut self, bytes: usize) {
        handle_reserve(self.raw.try_reserve_bytes(bytes));
    }

    /// Fallible version of [`reserve_bytes`](Self::reserve_bytes). On error
    /// the vector is unchanged.
    pub fn try_reserve_bytes(&mut self, bytes: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve_bytes(bytes)
    }

    /// Appends `value`, moving it into the buffer.
    ///
    /// # Panics
    ///
    /// Panics if a size overflows; aborts on allocation failure.
    #[inline]
    pub fn push<T, I>(&mut self, value: T)
    where
        S: Member<T, I>,
    {
        handle_reserve(self.try_push(value));
    }

    /// Appends a clone of `value`.
    ///
    /// # Panics
    ///
    /// Panics if a size overflows or if cloning panics; aborts on allocation
    /// failure. In every case the vector keeps its previous elements.
    #[inline]
    pub fn push_cloned<T, I>(&mut self, value: &T)
    where
        S: Member<T, I>,
        T: Clone,
    {
        self.emplace_with(|| value.clone());
    }

    /// Fallible version of [`push`](Self::push).
    ///
    /// On error `value` is dropped and the elements are unchanged. The metadata
    /// capacity reported by [`entries`](Self::entries) may still have grown.
    pub fn try_push<T, I>(&mut self, value: T) -> Result<(), TryReserveError>
    where
        S: Member<T, I>,
    {
        // SAFETY:
        // 1. `S::INDEX < S::VTABLES.len()`, as `Member` is only implemented for the
        //    positions of the tuple.
        // 2. `S::VTABLES[S::INDEX]` was created by `SlotVtable::new::<T>()`.
        unsafe { self.raw.push_with::<T, _>(<S as Member<T, I>>::INDEX, || value) }?;
        Ok(())
    }

    /// Appends the value returned by `f`, constructing it directly in its
    /// slot, and returns a reference to it.
    ///
    /// Room for the element is made before `f` is called. If `f` panics, the
    /// vector keeps its previous elements and no element is added.
    ///
    /// # Panics
    ///
    /// Panics if a size overflows; aborts on allocation failure.
    pub fn emplace_with<T, I, F>(&mut self, f: F) -> &mut T
    where
        S: Member<T, I>,
        F: FnOnce() -> T,
    {
        // SAFETY: See `try_push`.
        handle_reserve(unsafe { self.raw.push_with::<T, _>(<S as Member<T, I>>::INDEX, f) })
    }

    /// Returns a view of element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    #[track_caller]
    pub fn element(&self, index: usize) -> Element<'_, S> {
        match self.raw.slot(index) {
            Some(slot) => Element::new(slot),
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len()
            ),
        }
    }

    /// Returns a view of element `index` without checking the index.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `index < len()`.
    #[inline]
    pub unsafe fn element_unchecked(&self, index: usize) -> Element<'_, S> {
        // SAFETY: `index < len()` as guaranteed by the caller.
        Element::new(unsafe { self.raw.slot_unchecked(index) })
    }

    /// Returns element `index` as a `&T`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::OutOfRange`] if `index >= len()`.
    /// - [`AccessError::TypeMismatch`] if the element is not a `T`.
    pub fn get<T, I>(&self, index: usize) -> Result<&T, AccessError>
    where
        S: Member<T, I>,
    {
        let slot = self.raw.slot(index).ok_or(AccessError::OutOfRange {
            index,
            len: self.len(),
        })?;
        if slot.type_index() != <S as Member<T, I>>::INDEX {
            return Err(AccessError::TypeMismatch {
                index,
                expected: core::any::type_name::<T>(),
                found: slot.type_name(),
            });
        }

        // SAFETY: The slot's type index is the position of `T` in `S`, so it was
        // pushed as a `T`.
        Ok(unsafe { slot.downcast_unchecked::<T>() })
    }

    /// Returns element `index` as a `&mut T`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::OutOfRange`] if `index >= len()`.
    /// - [`AccessError::TypeMismatch`] if the element is not a `T`.
    pub fn get_mut<T, I>(&mut self, index: usize) -> Result<&mut T, AccessError>
    where
        S: Member<T, I>,
    {
        let len = self.len();
        let slot = self
            .raw
            .slot_mut(index)
            .ok_or(AccessError::OutOfRange { index, len })?;
        if slot.type_index() != <S as Member<T, I>>::INDEX {
            return Err(AccessError::TypeMismatch {
                index,
                expected: core::any::type_name::<T>(),
                found: slot.type_name(),
            });
        }

        // SAFETY: The slot's type index is the position of `T` in `S`, so it was
        // pushed as a `T`.
        Ok(unsafe { slot.into_mut_unchecked::<T>() })
    }

    /// Returns an iterator over views of every element, in order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, S> {
        Iter::new(self)
    }

    /// Views of element `index`, for the iterator.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> Option<Element<'_, S>> {
        self.raw.slot(index).map(Element::new)
    }

    /// Destroys every element and releases all storage.
    fn reset(&mut self) {
        self.raw.clear();
    }
}

impl<S: CloneTypeSet> HetVec<S> {
    /// Appends clones of every element of `source`, in order, reserving the
    /// source's metadata capacity up front.
    ///
    /// Offsets are computed afresh for this vector's buffer, so they may differ
    /// from the source's.
    fn extend_cloned(&mut self, source: &Self) {
        self.reserve(self.len().max(source.entries()));
        self.reserve_bytes(self.byte_len() + source.byte_len());
        for index in 0..source.len() {
            let Some(slot) = source.raw.slot(index) else {
                break;
            };
            let clone = &S::CLONE_VTABLES[slot.type_index()];
            // SAFETY:
            // 1. Both vectors were created with `S::VTABLES`, so the slot's type index
            //    names the same type in both.
            // 2. `S::CLONE_VTABLES` has the same order as `S::VTABLES`, so `clone` was
            //    created for that type.
            handle_reserve(unsafe { self.raw.push_clone_of(slot, clone) });
        }
        tracing::debug!(
            target: "hetvec::vec",
            len = source.len(),
            bytes = source.byte_len(),
            "cloned elements"
        );
    }
}

impl<S: CloneTypeSet> Clone for HetVec<S> {
    fn clone(&self) -> Self {
        let mut values = Self::new();
        values.extend_cloned(self);
        values
    }

    /// Resets `self` to empty, releasing its storage, then rebuilds it from
    /// `source`.
    fn clone_from(&mut self, source: &Self) {
        self.reset();
        self.extend_cloned(source);
    }
}

impl<S: TypeSet> Default for HetVec<S> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TypeSet> core::fmt::Debug for HetVec<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|element| element.type_name()))
            .finish()
    }
}

impl<'a, S: TypeSet> IntoIterator for &'a HetVec<S> {
    type Item = Element<'a, S>;
    type IntoIter = Iter<'a, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// SAFETY: The vector exclusively owns its elements, so sending it sends values
// of the types in `S`, which is sound when all of them are `Send`.
unsafe impl<S: TypeSet + Send> Send for HetVec<S> {}

// SAFETY: A shared vector only hands out shared references to its elements,
// which is sound to do from several threads when all types in `S` are `Sync`.
unsafe impl<S: TypeSet + Sync> Sync for HetVec<S> {}

/// Unwraps the result of a reservation the way `Vec` does: capacity overflow
/// panics, allocation failure goes to [`handle_alloc_error`].
#[inline]
#[track_caller]
fn handle_reserve<T>(result: Result<T, TryReserveError>) -> T {
    match result {
        Ok(value) => value,
        Err(TryReserveError::CapacityOverflow) => panic!("capacity overflow"),
        Err(TryReserveError::AllocError { layout }) => handle_alloc_error(layout),
    }
}

//! Type-erased heterogeneous vector storage.
//!
//! This module encapsulates the fields of [`RawHetVec`], ensuring they are only
//! visible within this module. This visibility restriction guarantees the
//! safety invariant: **every live slot holds an initialized object of the type
//! described by `vtables[type_index]`, at an offset aligned for that type and
//! inside the buffer**.
//!
//! # Safety Invariant
//!
//! Slots can only be created through [`RawHetVec::push_with`] and
//! [`RawHetVec::push_clone_of`], whose callers promise that the object matches
//! the type index they pass. The offsets can only change during relayout,
//! which moves each object with the relocate function of its own vtable row.
//! The [`Drop`] implementation relies on this invariant to destroy every
//! object with the matching destroy function.
//!
//! # Layout
//!
//! Objects are packed in push order. Each one starts at the end of the
//! previous one plus the minimal padding that aligns its address. The buffer
//! itself is aligned to the largest alignment of the type set, so the padding
//! computed against the real address is also the padding relative to the start
//! of the buffer, and a relayout into a larger buffer reproduces offsets that
//! fit.

use core::{marker::PhantomData, ptr::NonNull};

use crate::{
    buffer::RawBuffer,
    error::TryReserveError,
    layout::{aligned_offset, padding_for},
    slots::{SlotMeta, SlotTable},
    vtable::{CloneVtable, SlotVtable},
};

/// Packed storage for a sequence of objects of types drawn from a fixed set,
/// described by a table of [`SlotVtable`]s.
///
/// The vector knows the types of its objects only by their index into that
/// table. It owns every object it holds and destroys them, in index order, when
/// it is cleared or dropped.
pub struct RawHetVec {
    /// The dispatch table of the type set, indexed by type index.
    vtables: &'static [SlotVtable],
    /// The bytes of every live object.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. For every live slot `i`, `buffer[offset[i]..offset[i] + byte_size[i]]`
    ///    lies inside the buffer and holds an initialized object of the type
    ///    described by `vtables[type_index[i]]`.
    /// 2. The buffer is aligned to the largest alignment in `vtables`.
    /// 3. Byte ranges of live slots are ordered and never overlap.
    buffer: RawBuffer,
    /// Metadata of every live slot.
    slots: SlotTable,
}

impl RawHetVec {
    /// Creates an empty vector over the type set described by `vtables`.
    ///
    /// Does not allocate.
    #[inline]
    #[must_use]
    pub const fn new(vtables: &'static [SlotVtable]) -> Self {
        Self {
            vtables,
            buffer: RawBuffer::dangling(max_align(vtables)),
            slots: SlotTable::new(),
        }
    }

    /// The dispatch table this vector was created with.
    #[inline]
    pub fn vtables(&self) -> &'static [SlotVtable] {
        self.vtables
    }

    /// Number of live slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the vector holds no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots the metadata arrays have room for.
    #[inline]
    pub fn entries(&self) -> usize {
        self.slots.entries()
    }

    /// Size of the data buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Alignment of the data buffer, the largest alignment of the type set.
    #[inline]
    pub fn buffer_align(&self) -> usize {
        self.buffer.align()
    }

    /// Number of bytes from the start of the buffer to the end of the last
    /// object, padding included.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.slots.last().map_or(0, |meta| meta.end())
    }

    /// Type index of slot `index`, or `None` if `index >= len()`.
    #[inline]
    pub fn type_index(&self, index: usize) -> Option<usize> {
        self.slots.type_index(index)
    }

    /// Grows the metadata arrays to hold at least `entries` slots.
    ///
    /// On error the vector is unchanged.
    pub fn try_reserve_entries(&mut self, entries: usize) -> Result<(), TryReserveError> {
        let before = self.slots.entries();
        self.slots.reserve_entries(entries)?;
        if self.slots.entries() != before {
            tracing::trace!(
                target: "hetvec_internals::raw",
                from = before,
                to = self.slots.entries(),
                "grew slot metadata"
            );
        }
        Ok(())
    }

    /// Grows the data buffer to `new_capacity` bytes, relocating every object.
    ///
    /// Does nothing if `new_capacity <= capacity()`. Otherwise a new region is
    /// allocated, every slot's offset is recomputed from scratch against the
    /// new base address, each object is moved with its own relocate function,
    /// and the old region is released without running destructors.
    ///
    /// On error the vector is unchanged.
    pub fn try_reserve_bytes(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        if new_capacity <= self.buffer.capacity() {
            return Ok(());
        }

        let vtables = self.vtables;
        let new_buffer = RawBuffer::allocate(new_capacity, self.buffer.align())?;
        let base_address = new_buffer.base_address();
        let mut end = 0;
        for index in 0..self.slots.len() {
            let Some(meta) = self.slots.get(index) else {
                break;
            };
            let vtable = &vtables[meta.type_index];
            // The slots fit into the old buffer with the same relative padding, so
            // neither of these can overflow.
            let offset = end + padding_for(base_address + end, meta.alignment);
            end = offset + meta.byte_size;
            debug_assert!(end <= new_capacity);

            // SAFETY: `meta.offset + meta.byte_size` lies inside the old buffer (type
            // invariant 1), so the offset pointer stays in bounds.
            let src = unsafe { self.buffer.as_ptr().add(meta.offset) };
            // SAFETY: The relayout reproduces the old relative layout, which fit in
            // the old buffer, and the new buffer is strictly larger.
            let dst = unsafe { new_buffer.as_ptr().add(offset) };

            // SAFETY:
            // 1. `src` holds an initialized object of the type of `vtable`, aligned
            //    for it (type invariant 1).
            // 2. `dst` is inside the new allocation, aligned by the padding computed
            //    above, and cannot overlap the old allocation.
            // 3. The old buffer is released below without dropping anything, so the
            //    moved-out object is never touched again.
            unsafe {
                vtable.relocate(dst, src);
            }
            self.slots.set_offset(index, offset);
        }

        let old_buffer = core::mem::replace(&mut self.buffer, new_buffer);
        tracing::trace!(
            target: "hetvec_internals::raw",
            from = old_buffer.capacity(),
            to = new_capacity,
            relocated = self.slots.len(),
            "grew data buffer"
        );
        // Only the bytes are released; the objects now live in `self.buffer`.
        drop(old_buffer);
        Ok(())
    }

    /// Makes room for one more slot of the given size and alignment and
    /// returns its offset.
    ///
    /// Grows the metadata when it is full, then grows the buffer to
    /// `max(required, 2 * capacity)` bytes when the new object would not fit.
    /// On error no slot is added and every object stays where it was, though
    /// the metadata may already have grown.
    fn prepare_slot(&mut self, byte_size: usize, alignment: usize) -> Result<usize, TryReserveError> {
        if self.slots.is_full() {
            let entries = self.slots.next_entries()?;
            self.try_reserve_entries(entries)?;
        }

        loop {
            let offset = aligned_offset(self.buffer.base_address(), self.byte_len(), alignment)
                .ok_or(TryReserveError::CapacityOverflow)?;
            let required = offset
                .checked_add(byte_size)
                .ok_or(TryReserveError::CapacityOverflow)?;
            let capacity = self.buffer.capacity();
            if required <= capacity {
                return Ok(offset);
            }

            let doubled = capacity.checked_mul(2).unwrap_or(required);
            self.try_reserve_bytes(required.max(doubled))?;
        }
    }

    /// Appends an object of type `T` produced by `f`, constructing it in place
    /// in its slot, and returns a reference to it.
    ///
    /// Room for the slot is made before `f` is called. If `f` panics the
    /// vector keeps all its previous objects and no slot is added.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `type_index < vtables().len()`
    /// 2. `vtables()[type_index]` was created by [`SlotVtable::new::<T>`].
    pub unsafe fn push_with<T, F>(&mut self, type_index: usize, f: F) -> Result<&mut T, TryReserveError>
    where
        F: FnOnce() -> T,
    {
        debug_assert_eq!(self.vtables[type_index].size(), size_of::<T>());
        debug_assert_eq!(self.vtables[type_index].align(), align_of::<T>());

        let offset = self.prepare_slot(size_of::<T>(), align_of::<T>())?;
        // SAFETY: `prepare_slot` guarantees `offset + size_of::<T>() <= capacity`.
        let ptr = unsafe { self.buffer.as_ptr().add(offset) };
        let mut ptr: NonNull<T> = ptr.cast::<T>();

        let value = f();
        // SAFETY: The slot lies inside the buffer, is aligned for `T` by the padding
        // computed in `prepare_slot`, and starts after the end of every live slot.
        unsafe {
            ptr.write(value);
        }
        self.slots.push(SlotMeta {
            offset,
            byte_size: size_of::<T>(),
            alignment: align_of::<T>(),
            type_index,
        });

        // SAFETY: The `T` was initialized above, and the returned reference borrows
        // `self` mutably, so no other access to the slot can happen while it lives.
        Ok(unsafe { ptr.as_mut() })
    }

    /// Appends a clone of the object behind `source`.
    ///
    /// If the clone panics the vector keeps all its previous objects and no slot
    /// is added.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source.type_index() < vtables().len()` and
    ///    `vtables()[source.type_index()]` describes the same type as the
    ///    vtable `source` was read with.
    /// 2. `clone` was created by [`CloneVtable::new::<T>`] for that same type
    ///    `T`.
    pub unsafe fn push_clone_of(
        &mut self,
        source: RawSlotRef<'_>,
        clone: &CloneVtable,
    ) -> Result<(), TryReserveError> {
        debug_assert_eq!(self.vtables[source.type_index].size(), source.size());
        debug_assert_eq!(self.vtables[source.type_index].align(), source.align());

        let offset = self.prepare_slot(source.size(), source.align())?;
        // SAFETY: `prepare_slot` guarantees `offset + size <= capacity`.
        let dst = unsafe { self.buffer.as_ptr().add(offset) };

        // SAFETY:
        // 1. `source` points to an initialized object of the clone vtable's type, as
        //    guaranteed by the `RawSlotRef` invariants and the caller.
        // 2. `dst` is in bounds and aligned for that type by `prepare_slot`.
        unsafe {
            clone.clone_into(dst, source.ptr);
        }
        self.slots.push(SlotMeta {
            offset,
            byte_size: source.size(),
            alignment: source.align(),
            type_index: source.type_index,
        });
        Ok(())
    }

    /// Returns a view of slot `index`, or `None` if `index >= len()`.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<RawSlotRef<'_>> {
        let vtables = self.vtables;
        let meta = self.slots.get(index)?;
        // SAFETY: The slot exists, so its byte range lies inside the buffer.
        let ptr = unsafe { self.buffer.as_ptr().add(meta.offset) };
        Some(RawSlotRef {
            ptr,
            type_index: meta.type_index,
            vtable: &vtables[meta.type_index],
            _marker: PhantomData,
        })
    }

    /// Returns a view of slot `index` without checking the index.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < len()`
    #[inline]
    pub unsafe fn slot_unchecked(&self, index: usize) -> RawSlotRef<'_> {
        debug_assert!(index < self.len());
        match self.slot(index) {
            Some(slot) => slot,
            // SAFETY: `index < len()` as guaranteed by the caller.
            None => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    /// Returns a mutable view of slot `index`, or `None` if `index >= len()`.
    #[inline]
    pub fn slot_mut(&mut self, index: usize) -> Option<RawSlotMut<'_>> {
        let vtables = self.vtables;
        let meta = self.slots.get(index)?;
        // SAFETY: The slot exists, so its byte range lies inside the buffer.
        let ptr = unsafe { self.buffer.as_ptr().add(meta.offset) };
        Some(RawSlotMut {
            ptr,
            type_index: meta.type_index,
            vtable: &vtables[meta.type_index],
            _marker: PhantomData,
        })
    }

    /// Destroys every object in index order and releases the buffer and the
    /// metadata arrays, leaving the vector empty.
    ///
    /// If a destructor panics, the remaining objects are still destroyed while
    /// unwinding. A second panic during that aborts, as with `Vec`.
    pub fn clear(&mut self) {
        // Take everything out first, so a panicking destructor cannot lead to a
        // second drop of the objects already destroyed.
        let align = self.buffer.align();
        drop(SlotDrain {
            vtables: self.vtables,
            slots: core::mem::take(&mut self.slots),
            buffer: core::mem::replace(&mut self.buffer, RawBuffer::dangling(align)),
            next: 0,
        });
    }
}

/// The objects and storage taken out of a [`RawHetVec`] by
/// [`RawHetVec::clear`], destroyed when this is dropped.
struct SlotDrain {
    /// The dispatch table the slots were pushed with.
    vtables: &'static [SlotVtable],
    /// Metadata of the slots.
    slots: SlotTable,
    /// The bytes of the slots, released after every object is destroyed.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. Slots `next..slots.len()` hold initialized objects, as described by
    ///    the invariants of [`RawHetVec`].
    /// 2. Slots `0..next` have been destroyed or are being destroyed.
    buffer: RawBuffer,
    /// Index of the first slot not yet handed to its destructor.
    next: usize,
}

impl SlotDrain {
    /// Destroys the slots from `next` onwards, in index order.
    fn destroy_remaining(&mut self) {
        while let Some(meta) = self.slots.get(self.next) {
            // Advance first, so a panic below resumes after this slot.
            self.next += 1;
            // SAFETY: The slot's byte range lies inside `buffer` (invariant 1).
            let ptr = unsafe { self.buffer.as_ptr().add(meta.offset) };
            // SAFETY:
            // 1. The slot holds an initialized object of the type of this vtable row,
            //    aligned for it (invariant 1).
            // 2. `next` has moved past the slot, so it is never destroyed again.
            unsafe {
                self.vtables[meta.type_index].drop(ptr);
            }
        }
    }
}

impl Drop for SlotDrain {
    fn drop(&mut self) {
        /// Resumes destroying the remaining slots if a destructor unwinds.
        struct Resume<'a>(
            /// The drain to finish.
            &'a mut SlotDrain,
        );

        impl Drop for Resume<'_> {
            fn drop(&mut self) {
                self.0.destroy_remaining();
            }
        }

        let resume = Resume(self);
        resume.0.destroy_remaining();
        core::mem::forget(resume);
    }
}

impl Drop for RawHetVec {
    fn drop(&mut self) {
        self.clear();
    }
}

impl core::fmt::Debug for RawHetVec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawHetVec")
            .field("len", &self.len())
            .field("entries", &self.entries())
            .field("capacity", &self.capacity())
            .field("align", &self.buffer_align())
            .finish()
    }
}

/// Largest alignment among the rows of `vtables`, at least 1.
const fn max_align(vtables: &[SlotVtable]) -> usize {
    let mut align = 1;
    let mut i = 0;
    while i < vtables.len() {
        if vtables[i].align() > align {
            align = vtables[i].align();
        }
        i += 1;
    }
    align
}

/// A lifetime-bound view of one slot of a [`RawHetVec`].
///
/// We cannot use a `&'a T` directly, because the type of the slot is only
/// known by its index.
#[derive(Clone, Copy)]
pub struct RawSlotRef<'a> {
    /// Pointer to the object.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer points to an initialized object of the type described by
    ///    `vtable`, aligned for it.
    /// 2. The object is borrowed from its [`RawHetVec`] for `'a`.
    ptr: NonNull<u8>,
    /// Index of the object's type within the type set.
    type_index: usize,
    /// The vtable row of the object's type.
    vtable: &'static SlotVtable,
    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a RawHetVec`.
    _marker: PhantomData<&'a RawHetVec>,
}

impl<'a> RawSlotRef<'a> {
    /// Index of the object's type within the type set.
    #[inline]
    pub fn type_index(self) -> usize {
        self.type_index
    }

    /// The [`core::any::type_name`] of the object's type.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.vtable.type_name()
    }

    /// Size in bytes of the object's type.
    #[inline]
    pub fn size(self) -> usize {
        self.vtable.size()
    }

    /// Alignment in bytes of the object's type.
    #[inline]
    pub fn align(self) -> usize {
        self.vtable.align()
    }

    /// Address of the object.
    #[inline]
    pub fn as_ptr(self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Reinterprets the slot as a reference to a `T`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `T` is the type the slot's vtable row was created for.
    #[inline]
    pub unsafe fn downcast_unchecked<T>(self) -> &'a T {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable.size(), size_of::<T>());
        debug_assert_eq!(self.vtable.align(), align_of::<T>());

        let ptr: NonNull<T> = self.ptr.cast::<T>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawSlotRef's type invariants)
        // - The pointee is an initialized `T` (guaranteed by the caller)
        // - Shared access is allowed, as the vector is borrowed for 'a
        unsafe { ptr.as_ref() }
    }
}

impl core::fmt::Debug for RawSlotRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawSlotRef")
            .field("type_index", &self.type_index)
            .field("type_name", &self.type_name())
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// A mutable, lifetime-bound view of one slot of a [`RawHetVec`].
pub struct RawSlotMut<'a> {
    /// Pointer to the object.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer points to an initialized object of the type described by
    ///    `vtable`, aligned for it.
    /// 2. The object is mutably borrowed from its [`RawHetVec`] for `'a`.
    ptr: NonNull<u8>,
    /// Index of the object's type within the type set.
    type_index: usize,
    /// The vtable row of the object's type.
    vtable: &'static SlotVtable,
    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a mut RawHetVec`.
    _marker: PhantomData<&'a mut RawHetVec>,
}

impl<'a> RawSlotMut<'a> {
    /// Index of the object's type within the type set.
    #[inline]
    pub fn type_index(&self) -> usize {
        self.type_index
    }

    /// The [`core::any::type_name`] of the object's type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.vtable.type_name()
    }

    /// Reinterprets the slot as a mutable reference to a `T`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `T` is the type the slot's vtable row was created for.
    #[inline]
    pub unsafe fn into_mut_unchecked<T>(self) -> &'a mut T {
        debug_assert_eq!(self.vtable.size(), size_of::<T>());
        debug_assert_eq!(self.vtable.align(), align_of::<T>());

        let mut ptr: NonNull<T> = self.ptr.cast::<T>();
        // SAFETY: The pointer is non-null, aligned and points to an initialized `T`
        // (type invariants and the caller). The vector is mutably borrowed for 'a
        // and `self` is consumed, so the reference is unique.
        unsafe { ptr.as_mut() }
    }
}

impl core::fmt::Debug for RawSlotMut<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawSlotMut")
            .field("type_index", &self.type_index)
            .field("type_name", &self.type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;

    use super::*;

    const VTABLES: &[SlotVtable] = &[
        SlotVtable::new::<u8>(),
        SlotVtable::new::<u64>(),
        SlotVtable::new::<String>(),
    ];

    #[test]
    fn test_new_does_not_allocate() {
        let raw = RawHetVec::new(VTABLES);
        assert_eq!(raw.len(), 0);
        assert_eq!(raw.entries(), 0);
        assert_eq!(raw.capacity(), 0);
        assert_eq!(raw.buffer_align(), align_of::<u64>().max(align_of::<String>()));
    }

    #[test]
    fn test_max_align() {
        assert_eq!(max_align(&[]), 1);
        assert_eq!(max_align(&[SlotVtable::new::<u8>()]), 1);
        assert_eq!(max_align(VTABLES), align_of::<u64>().max(align_of::<String>()));
    }

    #[test]
    fn test_push_packs_with_padding() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 0 is the `u8` row.
        unsafe { raw.push_with::<u8, _>(0, || 7) }.unwrap();
        // SAFETY: Index 1 is the `u64` row.
        unsafe { raw.push_with::<u64, _>(1, || 11) }.unwrap();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw.slots.get(0).map(|meta| meta.offset), Some(0));
        assert_eq!(raw.slots.get(1).map(|meta| meta.offset), Some(align_of::<u64>()));
        assert_eq!(raw.byte_len(), align_of::<u64>() + 8);
    }

    #[test]
    fn test_growth_doubles_capacity() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 1 is the `u64` row.
        unsafe { raw.push_with::<u64, _>(1, || 1) }.unwrap();
        assert_eq!(raw.capacity(), 8);
        // SAFETY: As above.
        unsafe { raw.push_with::<u64, _>(1, || 2) }.unwrap();
        assert_eq!(raw.capacity(), 16);
        // SAFETY: As above.
        unsafe { raw.push_with::<u64, _>(1, || 3) }.unwrap();
        assert_eq!(raw.capacity(), 32);
        assert_eq!(raw.entries(), 3);
    }

    #[test]
    fn test_reserve_bytes_relocates() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 2 is the `String` row.
        unsafe { raw.push_with::<String, _>(2, || String::from("kept")) }.unwrap();
        // SAFETY: Index 0 is the `u8` row.
        unsafe { raw.push_with::<u8, _>(0, || 9) }.unwrap();
        let before = raw.slot(0).map(|slot| slot.as_ptr());

        raw.try_reserve_bytes(4096).unwrap();
        assert_eq!(raw.capacity(), 4096);
        assert_ne!(raw.slot(0).map(|slot| slot.as_ptr()), before);

        let slot = raw.slot(0).unwrap();
        // SAFETY: Slot 0 was pushed as a `String`.
        assert_eq!(unsafe { slot.downcast_unchecked::<String>() }, "kept");
        let slot = raw.slot(1).unwrap();
        // SAFETY: Slot 1 was pushed as a `u8`.
        assert_eq!(unsafe { *slot.downcast_unchecked::<u8>() }, 9);
    }

    #[test]
    fn test_failed_closure_keeps_state() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 1 is the `u64` row.
        unsafe { raw.push_with::<u64, _>(1, || 5) }.unwrap();

        let result = std::panic::catch_unwind(core::panic::AssertUnwindSafe(|| {
            // SAFETY: Index 2 is the `String` row.
            let _ = unsafe { raw.push_with::<String, _>(2, || panic!("no value")) };
        }));
        assert!(result.is_err());
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.type_index(0), Some(1));
        assert_eq!(raw.type_index(1), None);
    }

    #[test]
    fn test_failed_buffer_growth_keeps_objects() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 2 is the `String` row.
        unsafe { raw.push_with::<String, _>(2, || String::from("kept")) }.unwrap();
        let capacity = raw.capacity();
        let address = raw.slot(0).map(RawSlotRef::as_ptr);

        // The metadata is full, so it grows before the buffer request fails.
        assert_eq!(
            raw.prepare_slot(usize::MAX / 2 + 2, 1),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.entries(), 3);
        assert_eq!(raw.capacity(), capacity);
        assert_eq!(raw.slot(0).map(RawSlotRef::as_ptr), address);
        // SAFETY: Slot 0 holds a `String`.
        let kept = unsafe { raw.slot(0).unwrap().downcast_unchecked::<String>() };
        assert_eq!(kept, "kept");
    }

    #[test]
    fn test_slot_mut() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 1 is the `u64` row.
        unsafe { raw.push_with::<u64, _>(1, || 5) }.unwrap();
        let slot = raw.slot_mut(0).unwrap();
        assert_eq!(slot.type_index(), 1);
        // SAFETY: Slot 0 was pushed as a `u64`.
        *unsafe { slot.into_mut_unchecked::<u64>() } += 1;
        // SAFETY: As above.
        assert_eq!(unsafe { *raw.slot(0).unwrap().downcast_unchecked::<u64>() }, 6);
        assert!(raw.slot_mut(1).is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut raw = RawHetVec::new(VTABLES);
        // SAFETY: Index 2 is the `String` row.
        unsafe { raw.push_with::<String, _>(2, || String::from("gone")) }.unwrap();
        raw.clear();
        assert!(raw.is_empty());
        assert_eq!(raw.entries(), 0);
        assert_eq!(raw.capacity(), 0);
        assert_eq!(raw.byte_len(), 0);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawHetVec: Send, Sync);
        static_assertions::assert_not_impl_any!(RawSlotRef<'_>: Send, Sync);
        static_assertions::assert_not_impl_any!(RawSlotMut<'_>: Send, Sync);
    }
}

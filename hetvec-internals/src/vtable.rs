//! Dispatch table rows for type-erased slot operations.
//!
//! A type set of N types is described by a `&'static [SlotVtable]` with one
//! row per type, indexed by type index. Each row stores function pointers
//! that were monomorphized for that row's type, which lets [`RawHetVec`]
//! destroy and relocate objects knowing only their type index.
//!
//! Cloning is split into a second table of [`CloneVtable`] rows, because a
//! clone function can only be instantiated for types implementing [`Clone`],
//! while every type can be destroyed and relocated.
//!
//! # Safety Invariant
//!
//! The fields of both vtables are private to this module and can only be set
//! by [`SlotVtable::new`] and [`CloneVtable::new`], which pair every function
//! pointer with the single type `T` the constructor was instantiated with. A
//! row therefore always describes one concrete type, and calling its functions
//! on an object of that type is sound.
//!
//! [`RawHetVec`]: crate::RawHetVec

use core::ptr::NonNull;

/// Vtable holding the destroy and relocate functions for one slot type.
///
/// # Safety Invariant
///
/// The fields `drop` and `relocate` are guaranteed to point to the functions
/// defined below instantiated with the type `T` that was used to create this
/// [`SlotVtable`], and `size` and `align` are that type's size and alignment.
#[derive(Clone, Copy)]
pub struct SlotVtable {
    /// Gets the [`core::any::type_name`] of the slot type.
    type_name: fn() -> &'static str,
    /// Runs the destructor of a `T` in place.
    drop: unsafe fn(NonNull<u8>),
    /// Moves a `T` from the second pointer to the first.
    relocate: unsafe fn(NonNull<u8>, NonNull<u8>),
    /// `size_of::<T>()`
    size: usize,
    /// `align_of::<T>()`
    align: usize,
}

impl SlotVtable {
    /// Creates the [`SlotVtable`] row for the type `T`.
    #[inline]
    #[must_use]
    pub const fn new<T>() -> Self {
        Self {
            type_name: core::any::type_name::<T>,
            drop: drop::<T>,
            relocate: relocate::<T>,
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }

    /// Gets the [`core::any::type_name`] of the type this row was created for.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Size in bytes of the type this row was created for.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes of the type this row was created for.
    #[inline]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Runs the destructor of the object at `ptr` in place.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized object of the type this
    ///    [`SlotVtable`] was created for, and is aligned for it.
    /// 2. The object is not used again after this call, and is not dropped
    ///    again.
    #[inline]
    pub(crate) unsafe fn drop(&self, ptr: NonNull<u8>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<T>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Moves the object at `src` to `dst`.
    ///
    /// After this call the bytes at `src` no longer hold a live object: they
    /// must not be dropped or read as the object again.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to an initialized object of the type this
    ///    [`SlotVtable`] was created for, and is aligned for it.
    /// 2. `dst` is valid for writes of that type, is aligned for it and does
    ///    not overlap `src`.
    /// 3. The object at `src` is treated as moved-out after this call.
    #[inline]
    pub(crate) unsafe fn relocate(&self, dst: NonNull<u8>, src: NonNull<u8>) {
        // SAFETY: We know that `self.relocate` points to the function
        // `relocate::<T>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.relocate)(dst, src);
        }
    }
}

impl core::fmt::Debug for SlotVtable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotVtable")
            .field("type_name", &self.type_name())
            .field("size", &self.size)
            .field("align", &self.align)
            .finish()
    }
}

/// Vtable holding the clone-construct function for one slot type.
///
/// # Safety Invariant
///
/// The `clone` field is guaranteed to point to the `clone_into::<T>` function
/// defined below, instantiated with the type `T` that was used to create this
/// [`CloneVtable`].
#[derive(Clone, Copy)]
pub struct CloneVtable {
    /// Writes a clone of the `T` at the second pointer into the first.
    clone: unsafe fn(NonNull<u8>, NonNull<u8>),
}

impl CloneVtable {
    /// Creates the [`CloneVtable`] row for the type `T`.
    #[inline]
    #[must_use]
    pub const fn new<T: Clone>() -> Self {
        Self {
            clone: clone_into::<T>,
        }
    }

    /// Constructs a clone of the object at `src` into `dst`.
    ///
    /// If the type's [`Clone`] implementation panics, nothing has been written
    /// to `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to an initialized object of the type this
    ///    [`CloneVtable`] was created for, and is aligned for it.
    /// 2. `dst` is valid for writes of that type and is aligned for it.
    #[inline]
    pub(crate) unsafe fn clone_into(&self, dst: NonNull<u8>, src: NonNull<u8>) {
        // SAFETY: We know that `self.clone` points to the function
        // `clone_into::<T>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.clone)(dst, src);
        }
    }
}

impl core::fmt::Debug for CloneVtable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CloneVtable").finish_non_exhaustive()
    }
}

/// Drops the `T` pointed to by `ptr` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized, aligned `T`
/// 2. The `T` is not used or dropped again afterwards
unsafe fn drop<T>(ptr: NonNull<u8>) {
    let ptr: NonNull<T> = ptr.cast::<T>();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe {
        ptr.drop_in_place();
    }
}

/// Moves the `T` at `src` into `dst` with a bitwise copy.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to an initialized, aligned `T`
/// 2. `dst` is valid for writes of a `T`, aligned, and does not overlap `src`
/// 3. The `T` at `src` is never used or dropped again
unsafe fn relocate<T>(dst: NonNull<u8>, src: NonNull<u8>) {
    let dst: NonNull<T> = dst.cast::<T>();
    let src: NonNull<T> = src.cast::<T>();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    // 3. Guaranteed by the caller, which makes the copy a move
    unsafe {
        dst.copy_from_nonoverlapping(src, 1);
    }
}

/// Writes a clone of the `T` at `src` into `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to an initialized, aligned `T`
/// 2. `dst` is valid for writes of a `T` and aligned
unsafe fn clone_into<T: Clone>(dst: NonNull<u8>, src: NonNull<u8>) {
    let src: NonNull<T> = src.cast::<T>();
    // SAFETY: `src` points to an initialized `T` as guaranteed by the caller, and
    // the reference does not outlive this function.
    let value: T = unsafe { src.as_ref() }.clone();
    let dst: NonNull<T> = dst.cast::<T>();
    // SAFETY: `dst` is valid for writes and aligned as guaranteed by the caller.
    unsafe {
        dst.write(value);
    }
}

//! Type sets and compile-time type resolution.
//!
//! A [`HetVec`] is parameterized by a tuple of types, its *type set*. The
//! [`TypeSet`] trait gives the dispatch table of that tuple, and the
//! [`Member`] trait resolves a concrete type to its position in the tuple at
//! compile time.
//!
//! # Resolution
//!
//! `Member<T, I>` is implemented for every position of every tuple of up to
//! twelve types, with `I` being an [`Index`] marker naming the position. When
//! a method like [`HetVec::push`] requires `S: Member<T, I>`, the compiler
//! infers `I` from the single position holding `T`:
//!
//! ```
//! use hetvec::HetVec;
//!
//! let mut values: HetVec<(u8, String)> = HetVec::new();
//! values.push(String::from("inferred"));
//! assert_eq!(values.type_index(0), Some(1));
//! ```
//!
//! A type outside the set is rejected at compile time:
//!
//! ```compile_fail
//! use hetvec::HetVec;
//!
//! let mut values: HetVec<(u8, String)> = HetVec::new();
//! values.push(1.5f64);
//! ```
//!
//! A type listed twice cannot be inferred; name the position explicitly:
//!
//! ```
//! use hetvec::{HetVec, type_set::Index};
//!
//! let mut values: HetVec<(u32, u32)> = HetVec::new();
//! values.push::<u32, Index<1>>(7);
//! assert_eq!(values.type_index(0), Some(1));
//! ```
//!
//! [`HetVec`]: crate::HetVec
//! [`HetVec::push`]: crate::HetVec::push

use hetvec_internals::vtable::{CloneVtable, SlotVtable};

/// Marker naming the position `N` of a type within a type set.
///
/// Only used as the second parameter of [`Member`]; it is normally inferred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Index<const N: usize>;

/// A fixed, ordered set of types that a [`HetVec`] can store.
///
/// Implemented for tuples of one to twelve types. The trait is sealed: the
/// dispatch table must agree with the [`Member`] indices of the tuple, which
/// only the implementations in this crate guarantee.
///
/// [`HetVec`]: crate::HetVec
pub trait TypeSet: sealed::Sealed {
    /// Number of types in the set.
    const LEN: usize;

    /// The dispatch table: one row per type, indexed by type index.
    ///
    /// Shared by every vector over the same type set.
    const VTABLES: &'static [SlotVtable];
}

/// A [`TypeSet`] whose types all implement [`Clone`].
///
/// Vectors over such a set implement [`Clone`] themselves.
pub trait CloneTypeSet: TypeSet {
    /// The clone table: one row per type, indexed by type index.
    const CLONE_VTABLES: &'static [CloneVtable];
}

/// Resolves the type `T` to its position `I` within a [`TypeSet`].
///
/// Implemented by the tuple for each of its positions, so
/// `(A, B, C): Member<B, Index<1>>`.
pub trait Member<T, I>: TypeSet + sealed::SealedMember<T, I> {
    /// Position of `T` within the set.
    const INDEX: usize;
}

mod sealed {
    pub trait Sealed {}

    pub trait SealedMember<T, I> {}
}

macro_rules! impl_type_set {
    (@member [$($all:ident),+]) => {};
    (@member [$($all:ident),+] $ty:ident $idx:literal $(, $rest:ident $rest_idx:literal)*) => {
        impl<$($all),+> sealed::SealedMember<$ty, Index<$idx>> for ($($all,)+) {}

        impl<$($all),+> Member<$ty, Index<$idx>> for ($($all,)+) {
            const INDEX: usize = $idx;
        }

        impl_type_set!(@member [$($all),+] $($rest $rest_idx),*);
    };
    ($len:literal => $($ty:ident $idx:literal),+) => {
        impl<$($ty),+> sealed::Sealed for ($($ty,)+) {}

        impl<$($ty),+> TypeSet for ($($ty,)+) {
            const LEN: usize = $len;
            const VTABLES: &'static [SlotVtable] = &[$(SlotVtable::new::<$ty>()),+];
        }

        impl<$($ty: Clone),+> CloneTypeSet for ($($ty,)+) {
            const CLONE_VTABLES: &'static [CloneVtable] = &[$(CloneVtable::new::<$ty>()),+];
        }

        impl_type_set!(@member [$($ty),+] $($ty $idx),+);
    };
}

impl_type_set!(1 => T0 0);
impl_type_set!(2 => T0 0, T1 1);
impl_type_set!(3 => T0 0, T1 1, T2 2);
impl_type_set!(4 => T0 0, T1 1, T2 2, T3 3);
impl_type_set!(5 => T0 0, T1 1, T2 2, T3 3, T4 4);
impl_type_set!(6 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
impl_type_set!(7 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
impl_type_set!(8 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
impl_type_set!(9 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
impl_type_set!(10 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
impl_type_set!(11 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
impl_type_set!(12 => T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    fn index_of<S: Member<T, I>, T, I>() -> usize {
        <S as Member<T, I>>::INDEX
    }

    #[test]
    fn test_member_indices() {
        type Set = (i32, f64, String);
        assert_eq!(index_of::<Set, i32, _>(), 0);
        assert_eq!(index_of::<Set, f64, _>(), 1);
        assert_eq!(index_of::<Set, String, _>(), 2);
    }

    #[test]
    fn test_len_and_vtables_agree() {
        type Set = (u8, u16, u32, u64, String);
        assert_eq!(<Set as TypeSet>::LEN, 5);
        assert_eq!(<Set as TypeSet>::VTABLES.len(), 5);
        assert_eq!(<Set as CloneTypeSet>::CLONE_VTABLES.len(), 5);

        let sizes: alloc::vec::Vec<usize> =
            <Set as TypeSet>::VTABLES.iter().map(SlotVtable::size).collect();
        assert_eq!(sizes, [1, 2, 4, 8, size_of::<String>()]);
    }

    #[test]
    fn test_vtable_rows_match_member_index() {
        type Set = (u8, [u8; 5000], String);
        let row = &<Set as TypeSet>::VTABLES[index_of::<Set, [u8; 5000], _>()];
        assert_eq!(row.size(), 5000);
        assert_eq!(row.type_name(), "[u8; 5000]");
    }

    #[test]
    fn test_twelve_types() {
        type Set = (u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, char, bool);
        assert_eq!(<Set as TypeSet>::LEN, 12);
        assert_eq!(index_of::<Set, bool, _>(), 11);
        assert_eq!(index_of::<Set, char, _>(), 10);
    }
}

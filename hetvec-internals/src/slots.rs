//! The metadata store: four parallel arrays with one entry per slot.
//!
//! Slot `i` is described by `offsets[i]`, `byte_sizes[i]`, `alignments[i]`
//! and `type_indices[i]`. The arrays always have the same length, which is
//! the number of live slots. Their reserved room, `entries`, grows
//! independently of the data buffer's byte capacity.

use alloc::vec::Vec;
use core::alloc::Layout;

use crate::error::TryReserveError;

/// Metadata of a single slot, as stored across the parallel arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SlotMeta {
    /// Byte offset of the object from the start of the data buffer.
    pub(crate) offset: usize,
    /// `size_of` the stored type.
    pub(crate) byte_size: usize,
    /// `align_of` the stored type.
    pub(crate) alignment: usize,
    /// Index of the stored type within the type set.
    pub(crate) type_index: usize,
}

impl SlotMeta {
    /// Offset one past the last byte of the object.
    #[inline]
    pub(crate) fn end(&self) -> usize {
        self.offset + self.byte_size
    }
}

/// Parallel growable arrays of slot metadata.
///
/// # Invariants
///
/// - All four arrays have length `len()`.
/// - Every array can hold `entries` elements without reallocating.
#[derive(Default)]
pub(crate) struct SlotTable {
    /// Byte offset of each slot.
    offsets: Vec<usize>,
    /// Byte size of each slot's type.
    byte_sizes: Vec<usize>,
    /// Alignment of each slot's type.
    alignments: Vec<usize>,
    /// Type index of each slot.
    type_indices: Vec<usize>,
    /// Number of entries the arrays have room for.
    entries: usize,
}

impl SlotTable {
    /// Creates an empty table without allocating.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            offsets: Vec::new(),
            byte_sizes: Vec::new(),
            alignments: Vec::new(),
            type_indices: Vec::new(),
            entries: 0,
        }
    }

    /// Number of live slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Number of slots the arrays have room for.
    #[inline]
    pub(crate) fn entries(&self) -> usize {
        self.entries
    }

    /// Whether the next push needs the arrays to grow first.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len() == self.entries
    }

    /// Entry count to grow to when the table is full: `2 * entries + 1`.
    #[inline]
    pub(crate) fn next_entries(&self) -> Result<usize, TryReserveError> {
        self.entries
            .checked_mul(2)
            .and_then(|entries| entries.checked_add(1))
            .ok_or(TryReserveError::CapacityOverflow)
    }

    /// Grows the arrays so they can hold `new_entries` slots.
    ///
    /// Does nothing if `new_entries <= entries`. The live entries are kept.
    /// On failure, `entries` is unchanged and the table is still valid; some of
    /// the arrays may have gained unused room.
    pub(crate) fn reserve_entries(&mut self, new_entries: usize) -> Result<(), TryReserveError> {
        if new_entries <= self.entries {
            return Ok(());
        }

        let layout =
            Layout::array::<usize>(new_entries).map_err(|_| TryReserveError::CapacityOverflow)?;
        let additional = new_entries - self.len();
        for array in [
            &mut self.offsets,
            &mut self.byte_sizes,
            &mut self.alignments,
            &mut self.type_indices,
        ] {
            array
                .try_reserve_exact(additional)
                .map_err(|_| TryReserveError::AllocError { layout })?;
        }

        self.entries = new_entries;
        Ok(())
    }

    /// Appends the metadata of a new slot.
    ///
    /// The table must not be full, which keeps this from allocating.
    #[inline]
    pub(crate) fn push(&mut self, meta: SlotMeta) {
        debug_assert!(!self.is_full());
        self.offsets.push(meta.offset);
        self.byte_sizes.push(meta.byte_size);
        self.alignments.push(meta.alignment);
        self.type_indices.push(meta.type_index);
    }

    /// Metadata of slot `index`, if it exists.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<SlotMeta> {
        Some(SlotMeta {
            offset: *self.offsets.get(index)?,
            byte_size: self.byte_sizes[index],
            alignment: self.alignments[index],
            type_index: self.type_indices[index],
        })
    }

    /// Metadata of the last slot, if any.
    #[inline]
    pub(crate) fn last(&self) -> Option<SlotMeta> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// Overwrites the offset of slot `index` after it has been relocated.
    #[inline]
    pub(crate) fn set_offset(&mut self, index: usize, offset: usize) {
        self.offsets[index] = offset;
    }

    /// Type index of slot `index`, if it exists.
    #[inline]
    pub(crate) fn type_index(&self, index: usize) -> Option<usize> {
        self.type_indices.get(index).copied()
    }
}

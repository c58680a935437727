#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`hetvec`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and the unsafe
//! operations that power the [`hetvec`] heterogeneous vector. Every `unsafe`
//! operation of the workspace that touches raw memory lives here.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`hetvec`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`layout`]**: Pure alignment arithmetic ([`padding_for`])
//! - **[`vtable`]**: The dispatch table rows
//!   - [`SlotVtable`]: destroy and relocate functions for one type
//!   - [`CloneVtable`]: clone-construct function for one `Clone` type
//! - **[`slots`]**: The four parallel metadata arrays (offset, byte size,
//!   alignment, type index)
//! - **[`buffer`]**: The single owned byte region holding every object
//! - **[`raw`]**: [`RawHetVec`], the type-erased controller tying the above
//!   together, plus the [`RawSlotRef`]/[`RawSlotMut`] views
//!
//! # Safety Strategy
//!
//! A [`RawHetVec`] is created with a `&'static [SlotVtable]` and stores a type
//! index next to every object it holds. The only way to put an object into the
//! buffer is through one of the `unsafe` push methods, whose contract requires
//! the caller to pass the type index whose vtable was built for that object's
//! type. From then on every destroy and relocate goes through the matching
//! vtable row, so the erased bytes are always handled as the type they were
//! constructed as.
//!
//! The fields of every type in this crate are module-private, which keeps the
//! invariants locally verifiable within a single file.
//!
//! [`hetvec`]: https://docs.rs/hetvec/latest/hetvec/
//! [`padding_for`]: layout::padding_for
//! [`SlotVtable`]: vtable::SlotVtable
//! [`CloneVtable`]: vtable::CloneVtable

extern crate alloc;

mod buffer;
mod error;
pub mod layout;
mod raw;
mod slots;
pub mod vtable;

pub use error::TryReserveError;
pub use raw::{RawHetVec, RawSlotMut, RawSlotRef};

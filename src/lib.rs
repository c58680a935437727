#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! An append-only vector of values of a fixed set of types, packed into one
//! contiguous buffer.
//!
//! ## Overview
//!
//! A [`HetVec<S>`] stores values whose types are drawn from the tuple `S`. Each
//! value occupies exactly its own size, at its own alignment, right after the
//! previous value. There is no per-element allocation and no padding up to the
//! largest type, so a vector mixing `i32`s with 5000-byte structs stays dense
//! and cache friendly.
//!
//! The type of every element is remembered as its index within `S`. Reading an
//! element back checks that index, so asking for the wrong type is reported as
//! an [`AccessError`] rather than reinterpreting bytes.
//!
//! ## Quick Example
//!
//! ```
//! use hetvec::HetVec;
//!
//! #[derive(Clone)]
//! struct Big([u8; 5000]);
//!
//! let mut values: HetVec<(i32, Big)> = HetVec::new();
//! for i in 0..10 {
//!     if i % 2 == 0 {
//!         values.push(i);
//!     } else {
//!         values.push(Big([i as u8; 5000]));
//!     }
//! }
//!
//! assert_eq!(values.len(), 10);
//! assert_eq!(values.get::<i32, _>(4), Ok(&4));
//! assert_eq!(values.get::<Big, _>(5).map(|big| big.0[0]), Ok(5));
//!
//! let copy = values.clone();
//! assert_eq!(copy.get::<i32, _>(8), Ok(&8));
//! ```
//!
//! ## Type Sets
//!
//! The type set is a tuple of one to twelve types. Pushing or reading a type
//! outside the tuple is a compile error; see the [`type_set`] module for how
//! types are resolved and how to disambiguate a type listed twice. A vector
//! is [`Clone`] when every type of its set is, and [`Send`]/[`Sync`] when every
//! type is.
//!
//! ## Growth
//!
//! Element metadata and the data buffer grow independently. See
//! [`HetVec`] for the exact policy. Growth never invalidates a reference,
//! because references borrow the vector.
//!
//! ## Logging
//!
//! Buffer growth and metadata growth emit `trace` events through
//! [`tracing`](https://docs.rs/tracing), and cloning a vector emits a `debug`
//! event. Install any subscriber to see them.
//!
//! ## Architecture
//!
//! The type-erased storage lives in the `hetvec-internals` crate, which handles
//! raw allocation, offset computation and relocation through per-type vtables.
//! This crate layers the typed API on top of it.

extern crate alloc;

mod element;
mod error;
mod iter;
pub mod prelude;
pub mod type_set;
mod vec;

pub use self::{
    element::Element,
    error::{AccessError, TryReserveError},
    iter::Iter,
    type_set::{CloneTypeSet, Member, TypeSet},
    vec::HetVec,
};

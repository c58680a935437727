//! Commonly used items for convenient importing.
//!
//! ```rust
//! use hetvec::prelude::*;
//!
//! let mut values: HetVec<(u8, &'static str)> = HetVec::new();
//! values.push("hi");
//! assert_eq!(values.get::<&str, _>(0), Ok(&"hi"));
//! ```

pub use crate::{
    AccessError, Element, HetVec, TryReserveError,
    type_set::{CloneTypeSet, Index, Member, TypeSet},
};

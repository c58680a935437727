use core::{iter::FusedIterator, ops::Range};

use crate::{HetVec, element::Element, type_set::TypeSet};

/// An iterator over the elements of a [`HetVec`], in insertion order.
///
/// Yields an [`Element`] view per element. Created by [`HetVec::iter`].
#[must_use]
pub struct Iter<'a, S: TypeSet> {
    values: &'a HetVec<S>,
    range: Range<usize>,
}

impl<'a, S: TypeSet> Iter<'a, S> {
    /// Creates an iterator over every element of `values`.
    pub(crate) fn new(values: &'a HetVec<S>) -> Self {
        Self {
            values,
            range: 0..values.len(),
        }
    }
}

impl<'a, S: TypeSet> Iterator for Iter<'a, S> {
    type Item = Element<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        self.values.slot(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let index = self.range.nth(n)?;
        self.values.slot(index)
    }
}

impl<S: TypeSet> DoubleEndedIterator for Iter<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.range.next_back()?;
        self.values.slot(index)
    }
}

impl<S: TypeSet> ExactSizeIterator for Iter<'_, S> {}

impl<S: TypeSet> FusedIterator for Iter<'_, S> {}

impl<S: TypeSet> Clone for Iter<'_, S> {
    fn clone(&self) -> Self {
        Self {
            values: self.values,
            range: self.range.clone(),
        }
    }
}

impl<S: TypeSet> core::fmt::Debug for Iter<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.range).finish()
    }
}

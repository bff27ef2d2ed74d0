//! Per-traversal de-duplication.

use std::{collections::HashSet, hash::Hash};
use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Yields each element the first time it is seen, preserving first-occurrence
/// order.
///
/// The seen-set belongs to this cursor alone, so every traversal starts with
/// an empty set and memory grows with the number of distinct elements.
pub struct Distinct<C: Cursor> {
    parent: C,
    seen: HashSet<C::Item>,
    next: Option<Result<C::Item>>
}

impl<C: Cursor> Distinct<C> {
    /// Wrap `parent`, skipping elements it has already produced.
    pub fn new(parent: C) -> Self {
        Self { parent, seen: HashSet::new(), next: None }
    }
}

impl<C> Cursor for Distinct<C>
    where
        C: Cursor,
        C::Item: Eq + Hash + Clone
{
    type Item = C::Item;

    fn more(&mut self) -> bool {
        while self.next.is_none() {
            match pull(&mut self.parent) {
                Some(Ok(elem)) if self.seen.contains(&elem) => continue,
                Some(Ok(elem)) => {
                    self.seen.insert(elem.clone());
                    self.next = Some(Ok(elem));
                },
                Some(Err(err)) => self.next = Some(Err(err)),
                None => return false
            }
        }
        true
    }

    #[inline]
    fn take(&mut self) -> Result<C::Item> {
        self.more();
        self.next.take().unwrap_or(Err(Error::Exhausted))
    }
}

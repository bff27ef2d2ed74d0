//! Grouping adapters: fixed windows, predicate batches and splits.
//!
//! Each group is drained from the parent into a freshly allocated `Vec`.
//! Elements pulled from the parent to find a boundary are never delivered
//! twice: in a predicate batch the boundary element opens the next group, in
//! a split it is dropped.

use std::collections::VecDeque;
use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Fixed-size windows advancing by a fixed step.
///
/// Windows overlap when `step < size`; when `step > size` the elements
/// between windows are skipped. Elements shared with the previous window are
/// retained rather than re-read, so each parent element is pulled once. A
/// window is produced only if it holds at least one element no earlier
/// window delivered, and the final window may be shorter than `size`.
pub struct Window<C: Cursor> {
    parent: C,
    size: usize,
    step: usize,
    buffer: VecDeque<C::Item>,
    started: bool,
    next: Option<Result<Vec<C::Item>>>
}

impl<C: Cursor> Window<C> {
    /// Wrap `parent`, producing windows of `size` elements every `step` elements.
    ///
    /// # Panics
    ///
    /// If `size` or `step` is zero.
    pub fn new(parent: C, size: usize, step: usize) -> Self {
        assert!(size > 0, "window size must be greater than 0");
        assert!(step > 0, "window step must be greater than 0");

        Self {
            parent,
            size,
            step,
            buffer: VecDeque::with_capacity(size),
            started: false,
            next: None
        }
    }

    /// Pull from the parent until the buffer holds `size` elements, returning
    /// how many were added.
    fn fill(&mut self) -> Result<usize> {
        let mut added = 0;
        while self.buffer.len() < self.size {
            match pull(&mut self.parent) {
                Some(elem) => self.buffer.push_back(elem?),
                None => break
            }
            added += 1;
        }
        requires!(self.buffer.len() <= self.size, "a window never holds more than its size");
        Ok(added)
    }

    fn advance(&mut self) -> Result<usize> {
        if self.started {
            let retained = self.buffer.len().min(self.step);
            self.buffer.drain(..retained);
            if self.step > self.size {
                self.parent.skip(self.step - self.size)?;
            }
        }
        self.started = true;
        self.fill()
    }
}

impl<C> Cursor for Window<C>
    where
        C: Cursor,
        C::Item: Clone
{
    type Item = Vec<C::Item>;

    fn more(&mut self) -> bool {
        if self.next.is_none() {
            self.next = match self.advance() {
                Ok(0)  => None,
                Ok(_)  => Some(Ok(self.buffer.iter().cloned().collect())),
                Err(err) => Some(Err(err))
            };
        }
        self.next.is_some()
    }

    #[inline]
    fn take(&mut self) -> Result<Self::Item> {
        self.more();
        self.next.take().unwrap_or(Err(Error::Exhausted))
    }
}

/// Groups consecutive elements, starting a new group wherever a predicate over
/// neighbouring elements holds.
///
/// The predicate sees the last element of the current group and the
/// candidate; if it returns `true` the candidate is held back to open the
/// next group.
pub struct PredicateBatch<C: Cursor, P> {
    parent: C,
    predicate: P,
    carry: Option<C::Item>
}

impl<C: Cursor, P> PredicateBatch<C, P> {
    /// Wrap `parent`, splitting between `a` and `b` wherever `predicate(a, b)`.
    #[inline]
    pub const fn new(parent: C, predicate: P) -> Self {
        Self { parent, predicate, carry: None }
    }
}

impl<C, P> Cursor for PredicateBatch<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item, &C::Item) -> bool
{
    type Item = Vec<C::Item>;

    #[inline]
    fn more(&mut self) -> bool {
        self.carry.is_some() || self.parent.more()
    }

    fn take(&mut self) -> Result<Self::Item> {
        let first = match self.carry.take() {
            Some(first) => first,
            None => self.parent.take()?
        };

        let mut batch = vec![first];
        while let Some(candidate) = pull(&mut self.parent) {
            let candidate = candidate?;
            let last = &batch[batch.len() - 1];
            if (self.predicate)(last, &candidate) {
                self.carry = Some(candidate);
                break;
            }
            batch.push(candidate);
        }

        Ok(batch)
    }
}

/// Groups the elements between delimiters, dropping the delimiters.
///
/// A leading delimiter produces an empty first group; a trailing delimiter
/// does not produce an empty last group.
pub struct Split<C, P> {
    parent: C,
    delimiter: P
}

impl<C, P> Split<C, P> {
    /// Wrap `parent`, splitting around elements for which `delimiter` holds.
    #[inline]
    pub const fn new(parent: C, delimiter: P) -> Self {
        Self { parent, delimiter }
    }
}

impl<C, P> Cursor for Split<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item) -> bool
{
    type Item = Vec<C::Item>;

    #[inline]
    fn more(&mut self) -> bool { self.parent.more() }

    fn take(&mut self) -> Result<Self::Item> {
        if !self.parent.more() {
            return Err(Error::Exhausted);
        }

        let mut group = Vec::new();
        while let Some(elem) = pull(&mut self.parent) {
            let elem = elem?;
            if (self.delimiter)(&elem) {
                break;
            }
            group.push(elem);
        }

        Ok(group)
    }
}

//! Pass-through adapters.
//!
//! [`Map`], [`MapIndexed`], [`Inspect`], [`InspectIndexed`], [`Limit`] and
//! [`Skip`] hold no element of their own, so they forward
//! [`remove_current`](Cursor::remove_current) to their parent. [`Filter`],
//! [`FilterMap`] and [`Step`] pull ahead of what they have delivered and
//! therefore cannot.

use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Applies a function to every element.
pub struct Map<C, F> {
    parent: C,
    mapper: F
}

impl<C, F> Map<C, F> {
    /// Wrap `parent`, mapping each element through `mapper`.
    #[inline]
    pub const fn new(parent: C, mapper: F) -> Self {
        Self { parent, mapper }
    }
}

impl<C, F, U> Cursor for Map<C, F>
    where
        C: Cursor,
        F: FnMut(C::Item) -> U
{
    type Item = U;

    #[inline]
    fn more(&mut self) -> bool { self.parent.more() }

    #[inline]
    fn take(&mut self) -> Result<U> {
        self.parent.take().map(&mut self.mapper)
    }

    #[inline]
    fn skip(&mut self, n: usize) -> Result<usize> { self.parent.skip(n) }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Applies a function to every element and its zero-based position.
pub struct MapIndexed<C, F> {
    parent: C,
    mapper: F,
    index: usize
}

impl<C, F> MapIndexed<C, F> {
    /// Wrap `parent`, mapping each element and its index through `mapper`.
    #[inline]
    pub const fn new(parent: C, mapper: F) -> Self {
        Self { parent, mapper, index: 0 }
    }
}

impl<C, F, U> Cursor for MapIndexed<C, F>
    where
        C: Cursor,
        F: FnMut(C::Item, usize) -> U
{
    type Item = U;

    #[inline]
    fn more(&mut self) -> bool { self.parent.more() }

    #[inline]
    fn take(&mut self) -> Result<U> {
        let elem = self.parent.take()?;
        let index = self.index;
        self.index += 1;
        Ok((self.mapper)(elem, index))
    }

    fn skip(&mut self, n: usize) -> Result<usize> {
        let skipped = self.parent.skip(n)?;
        self.index += skipped;
        Ok(skipped)
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Calls an action on every element as it passes through.
pub struct Inspect<C, F> {
    parent: C,
    action: F
}

impl<C, F> Inspect<C, F> {
    /// Wrap `parent`, calling `action` on each element taken.
    #[inline]
    pub const fn new(parent: C, action: F) -> Self {
        Self { parent, action }
    }
}

impl<C, F> Cursor for Inspect<C, F>
    where
        C: Cursor,
        F: FnMut(&C::Item)
{
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool { self.parent.more() }

    #[inline]
    fn take(&mut self) -> Result<C::Item> {
        let elem = self.parent.take()?;
        (self.action)(&elem);
        Ok(elem)
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Calls an action on every element and its zero-based position as it passes
/// through.
pub struct InspectIndexed<C, F> {
    parent: C,
    action: F,
    index: usize
}

impl<C, F> InspectIndexed<C, F> {
    /// Wrap `parent`, calling `action` on each element taken and its index.
    #[inline]
    pub const fn new(parent: C, action: F) -> Self {
        Self { parent, action, index: 0 }
    }
}

impl<C, F> Cursor for InspectIndexed<C, F>
    where
        C: Cursor,
        F: FnMut(&C::Item, usize)
{
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool { self.parent.more() }

    #[inline]
    fn take(&mut self) -> Result<C::Item> {
        let elem = self.parent.take()?;
        (self.action)(&elem, self.index);
        self.index += 1;
        Ok(elem)
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Yields only the elements matching a predicate.
///
/// [`more`](Cursor::more) pulls ahead until a match is found or the parent is
/// exhausted, and holds that single match until it is taken.
pub struct Filter<C: Cursor, P> {
    parent: C,
    predicate: P,
    next: Option<Result<C::Item>>
}

impl<C: Cursor, P> Filter<C, P> {
    /// Wrap `parent`, keeping the elements for which `predicate` holds.
    #[inline]
    pub const fn new(parent: C, predicate: P) -> Self {
        Self { parent, predicate, next: None }
    }
}

impl<C, P> Cursor for Filter<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item) -> bool
{
    type Item = C::Item;

    fn more(&mut self) -> bool {
        while self.next.is_none() {
            match pull(&mut self.parent) {
                Some(Ok(elem)) if !(self.predicate)(&elem) => continue,
                found @ Some(_) => self.next = found,
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

/// Maps every element to an option, yielding the contents of the `Some`s.
pub struct FilterMap<C, F, U> {
    parent: C,
    mapper: F,
    next: Option<Result<U>>
}

impl<C, F, U> FilterMap<C, F, U> {
    /// Wrap `parent`, keeping the `Some` results of `mapper`.
    #[inline]
    pub const fn new(parent: C, mapper: F) -> Self {
        Self { parent, mapper, next: None }
    }
}

impl<C, F, U> Cursor for FilterMap<C, F, U>
    where
        C: Cursor,
        F: FnMut(C::Item) -> Option<U>
{
    type Item = U;

    fn more(&mut self) -> bool {
        while self.next.is_none() {
            match pull(&mut self.parent) {
                Some(Ok(elem)) => self.next = (self.mapper)(elem).map(Ok),
                Some(Err(err)) => self.next = Some(Err(err)),
                None => return false
            }
        }
        true
    }

    #[inline]
    fn take(&mut self) -> Result<U> {
        self.more();
        self.next.take().unwrap_or(Err(Error::Exhausted))
    }
}

/// Stops after a fixed number of elements regardless of the parent.
pub struct Limit<C> {
    parent: C,
    remaining: usize
}

impl<C> Limit<C> {
    /// Wrap `parent`, yielding at most `limit` elements.
    #[inline]
    pub const fn new(parent: C, limit: usize) -> Self {
        Self { parent, remaining: limit }
    }
}

impl<C: Cursor> Cursor for Limit<C> {
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        self.remaining > 0 && self.parent.more()
    }

    #[inline]
    fn take(&mut self) -> Result<C::Item> {
        if self.remaining == 0 {
            return Err(Error::Exhausted);
        }
        let elem = self.parent.take()?;
        self.remaining -= 1;
        Ok(elem)
    }

    fn skip(&mut self, n: usize) -> Result<usize> {
        let skipped = self.parent.skip(n.min(self.remaining))?;
        self.remaining -= skipped;
        Ok(skipped)
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Drops a fixed number of leading elements.
///
/// The drop is forwarded to the parent's [`skip`](Cursor::skip) on first use,
/// so parents which know their position skip without materializing.
pub struct Skip<C> {
    parent: C,
    pending: usize,
    fault: Option<Error>
}

impl<C> Skip<C> {
    /// Wrap `parent`, dropping its first `skip` elements.
    #[inline]
    pub const fn new(parent: C, skip: usize) -> Self {
        Self { parent, pending: skip, fault: None }
    }
}

impl<C: Cursor> Skip<C> {
    #[inline]
    fn prime(&mut self) {
        if self.pending > 0 {
            if let Err(err) = self.parent.skip(self.pending) {
                self.fault = Some(err);
            }
            self.pending = 0;
        }
    }
}

impl<C: Cursor> Cursor for Skip<C> {
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        self.prime();
        self.fault.is_some() || self.parent.more()
    }

    #[inline]
    fn take(&mut self) -> Result<C::Item> {
        self.prime();
        match self.fault.take() {
            Some(err) => Err(err),
            None => self.parent.take()
        }
    }

    fn skip(&mut self, n: usize) -> Result<usize> {
        self.prime();
        match self.fault.take() {
            Some(err) => Err(err),
            None => self.parent.skip(n)
        }
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Yields every `step`th element, starting with the first.
///
/// The elements in between are skipped lazily, inside the `more` call that
/// follows each `take`.
pub struct Step<C> {
    parent: C,
    step: usize,
    between: bool,
    fault: Option<Error>
}

impl<C> Step<C> {
    /// Wrap `parent`, yielding every `step`th element.
    ///
    /// # Panics
    ///
    /// If `step` is zero.
    #[inline]
    pub fn new(parent: C, step: usize) -> Self {
        assert!(step > 0, "step must be greater than 0");
        Self { parent, step, between: false, fault: None }
    }
}

impl<C: Cursor> Step<C> {
    #[inline]
    fn settle(&mut self) {
        if self.between {
            self.between = false;
            if let Err(err) = self.parent.skip(self.step - 1) {
                self.fault = Some(err);
            }
        }
    }
}

impl<C: Cursor> Cursor for Step<C> {
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        self.settle();
        self.fault.is_some() || self.parent.more()
    }

    fn take(&mut self) -> Result<C::Item> {
        self.settle();
        if let Some(err) = self.fault.take() {
            return Err(err);
        }
        let elem = self.parent.take()?;
        self.between = true;
        Ok(elem)
    }
}

//! Expanding each element into a run of elements.

use crate::{cursor::{pull, Cursor, IterCursor}, error::{Error, Result}};

/// Maps every element to an iterable and yields the elements of each in turn.
///
/// Holds the parent and the cursor over the current inner iterable. The next
/// inner iterable is made only once the current one is exhausted, and empty
/// ones are passed over inside [`more`](Cursor::more).
pub struct FlatMap<C, F, I: Iterator> {
    parent: C,
    mapper: F,
    inner: Option<IterCursor<I>>,
    fault: Option<Error>
}

impl<C, F, I: Iterator> FlatMap<C, F, I> {
    /// Wrap `parent`, expanding each element through `mapper`.
    #[inline]
    pub const fn new(parent: C, mapper: F) -> Self {
        Self { parent, mapper, inner: None, fault: None }
    }
}

impl<C, F, U, I> Cursor for FlatMap<C, F, I>
    where
        C: Cursor,
        F: FnMut(C::Item) -> U,
        U: IntoIterator<IntoIter = I, Item = I::Item>,
        I: Iterator
{
    type Item = I::Item;

    fn more(&mut self) -> bool {
        loop {
            if self.fault.is_some() {
                return true;
            }
            if let Some(inner) = &mut self.inner {
                if inner.more() {
                    return true;
                }
            }
            match pull(&mut self.parent) {
                Some(Ok(elem)) => self.inner = Some(IterCursor::new((self.mapper)(elem).into_iter())),
                Some(Err(err)) => self.fault = Some(err),
                None => {
                    self.inner = None;
                    return false;
                }
            }
        }
    }

    fn take(&mut self) -> Result<I::Item> {
        if !self.more() {
            return Err(Error::Exhausted);
        }
        if let Some(err) = self.fault.take() {
            return Err(err);
        }
        match &mut self.inner {
            Some(inner) => inner.take(),
            None        => Err(Error::Exhausted)
        }
    }
}

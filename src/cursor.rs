//! The pull primitive every adapter wraps.
//!
//! A [`Cursor`] is a single traversal: ask [`more`] whether another element
//! exists, then [`take`] it. Cursors are created per traversal by a
//! [`Sequence`] and are never shared between call sites.
//!
//! [`more`]: Cursor::more
//! [`take`]: Cursor::take
//! [`Sequence`]: crate::Sequence

use core::{fmt, iter::Iterator, marker::PhantomData, mem};
use crate::error::{Error, Result};

/// A pull-based iteration state machine over a sequence of elements.
///
/// # Contract
///
/// * [`more`] is idempotent: calling it repeatedly without an intervening
///   [`take`] always returns the same verdict and never changes what the next
///   [`take`] produces. Adapters which need to look ahead do that work inside
///   `more`, which is why it takes `&mut self`.
/// * [`take`] returns [`Error::Exhausted`] exactly when [`more`] would return
///   `false`, and otherwise advances by exactly one element.
/// * If a parent fails while an adapter is pulling ahead inside [`more`], the
///   failure is held and `more` reports `true` so the next [`take`] surfaces it.
///
/// # Example
///
/// ```
/// # use resequence::{Cursor, IterCursor, Error};
/// let mut cursor = IterCursor::new([1, 2].into_iter());
///
/// assert!(cursor.more());
/// assert!(cursor.more());
/// assert_eq!(cursor.take(), Ok(1));
/// assert_eq!(cursor.take(), Ok(2));
/// assert!(!cursor.more());
/// assert_eq!(cursor.take(), Err(Error::Exhausted));
/// ```
///
/// [`more`]: Cursor::more
/// [`take`]: Cursor::take
pub trait Cursor {
    /// The type of element produced.
    type Item;

    /// Returns `true` if [`take`](Cursor::take) will produce an element.
    fn more(&mut self) -> bool;

    /// Produces the next element, advancing the cursor by one.
    ///
    /// # Errors
    ///
    /// [`Error::Exhausted`] if [`more`](Cursor::more) would return `false`, or
    /// whatever failure a parent cursor or backing store reported.
    fn take(&mut self) -> Result<Self::Item>;

    /// Advances up to `n` elements or until exhaustion, whichever comes first,
    /// returning how many elements were skipped.
    ///
    /// Equivalent to calling [`take`](Cursor::take) `n` times; cursors which
    /// know their position override it.
    fn skip(&mut self, n: usize) -> Result<usize> {
        let mut skipped = 0;
        while skipped < n && self.more() {
            self.take()?;
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Removes the most recently taken element from the backing store.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] unless the cursor (and every adapter between it
    /// and the store) can map the taken element back to a store position.
    /// [`Error::InvalidState`] if called before any `take`, or twice without
    /// a `take` in between.
    fn remove_current(&mut self) -> Result<()> {
        Err(Error::Unsupported("remove_current"))
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool { (**self).more() }

    #[inline]
    fn take(&mut self) -> Result<Self::Item> { (**self).take() }

    #[inline]
    fn skip(&mut self, n: usize) -> Result<usize> { (**self).skip(n) }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { (**self).remove_current() }
}

/// A type-erased cursor, as produced by every [`Sequence`](crate::Sequence).
pub type BoxCursor<'a, T> = Box<dyn Cursor<Item = T> + 'a>;

/// Pull one element from `parent`, if it has one.
///
/// Adapters which look ahead inside `more` store the result verbatim, so a
/// failing parent is reported by the adapter's next `take`.
#[inline]
pub(crate) fn pull<C: Cursor + ?Sized>(parent: &mut C) -> Option<Result<C::Item>> {
    if parent.more() { Some(parent.take()) } else { None }
}

/// Unwrap the outcome of an infallible-looking traversal step.
///
/// Once [`more`](Cursor::more) has reported an element, the only failure left
/// is a backing store modified mid-traversal, which is treated like any other
/// fail-fast iterator invalidation.
#[inline]
#[track_caller]
pub(crate) fn settle<R>(result: Result<R>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => panic!("sequence traversal failed: {err}")
    }
}

/// The one element of look-ahead an [`IterCursor`] may hold.
enum Peeked<T> {
    Empty,
    Peeked(Option<T>)
}

impl<T> Peeked<T> {
    #[inline]
    #[must_use]
    const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// `true` once the underlying iterator has reported its end.
    #[inline]
    #[must_use]
    const fn is_term(&self) -> bool {
        matches!(self, Self::Peeked(None))
    }

    #[inline(always)]
    #[must_use]
    fn drain(&mut self) -> Self { mem::replace(self, Self::Empty) }
}

/// Bridges a std [`Iterator`] into a [`Cursor`].
///
/// [`more`](Cursor::more) has to pull from the iterator to answer, so the
/// pulled element is held in a single slot until it is taken. The slot is
/// filled lazily and never holds more than one element. Once the iterator
/// returns `None` the cursor stays exhausted, even if the iterator is not
/// fused.
pub struct IterCursor<I: Iterator> {
    iter: I,
    peeked: Peeked<I::Item>
}

impl<I: Iterator> IterCursor<I> {
    /// Wrap an iterator.
    #[inline]
    pub const fn new(iter: I) -> Self {
        Self { iter, peeked: Peeked::Empty }
    }

    /// Returns `true` if an element has been pulled from the iterator but
    /// not yet taken.
    #[inline]
    #[must_use]
    pub const fn is_primed(&self) -> bool {
        matches!(self.peeked, Peeked::Peeked(Some(_)))
    }
}

impl<I> fmt::Debug for IterCursor<I>
    where
        I: Iterator,
        I::Item: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peeked = match &self.peeked {
            Peeked::Peeked(Some(elem)) => Some(elem),
            _ => None
        };
        f.debug_struct("IterCursor")
            .field("peeked", &peeked)
            .field("exhausted", &self.peeked.is_term())
            .finish()
    }
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Item = I::Item;

    #[inline]
    fn more(&mut self) -> bool {
        if self.peeked.is_empty() {
            self.peeked = Peeked::Peeked(self.iter.next());
        }
        self.is_primed()
    }

    #[inline]
    fn take(&mut self) -> Result<I::Item> {
        match self.peeked.drain() {
            Peeked::Peeked(Some(elem)) => Ok(elem),
            Peeked::Peeked(None)       => {
                self.peeked = Peeked::Peeked(None);
                Err(Error::Exhausted)
            },
            Peeked::Empty => self.iter.next().ok_or_else(|| {
                self.peeked = Peeked::Peeked(None);
                Error::Exhausted
            })
        }
    }

    fn skip(&mut self, n: usize) -> Result<usize> {
        if n == 0 || self.peeked.is_term() {
            return Ok(0);
        }

        let mut skipped = match self.peeked.drain() {
            Peeked::Peeked(Some(_)) => 1,
            _ => 0
        };

        while skipped < n {
            if self.iter.next().is_none() {
                self.peeked = Peeked::Peeked(None);
                break;
            }
            skipped += 1;
        }

        Ok(skipped)
    }
}

/// A cursor with no elements.
pub struct Empty<T> {
    _marker: PhantomData<fn() -> T>
}

impl<T> Empty<T> {
    /// Create an empty cursor.
    #[inline]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for Empty<T> {
    fn default() -> Self { Self::new() }
}

impl<T> fmt::Debug for Empty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Empty")
    }
}

impl<T> Cursor for Empty<T> {
    type Item = T;

    #[inline]
    fn more(&mut self) -> bool { false }

    #[inline]
    fn take(&mut self) -> Result<T> { Err(Error::Exhausted) }

    #[inline]
    fn skip(&mut self, _n: usize) -> Result<usize> { Ok(0) }
}

/// Adapts a [`Cursor`] into a std [`Iterator`].
///
/// # Panics
///
/// [`next`](Iterator::next) panics if the cursor fails after reporting more
/// elements, which only happens when a backing store is modified during the
/// traversal. Use [`try_next`](Traversal::try_next) to observe that failure
/// as an [`Error`] instead.
pub struct Traversal<C> {
    cursor: C
}

impl<C: Cursor> Traversal<C> {
    /// Wrap a cursor.
    #[inline]
    pub const fn new(cursor: C) -> Self {
        Self { cursor }
    }

    /// Unwrap the underlying cursor, for example to call
    /// [`remove_current`](Cursor::remove_current) mid-traversal.
    #[inline]
    pub fn into_cursor(self) -> C {
        self.cursor
    }

    /// Borrow the underlying cursor.
    #[inline]
    pub fn cursor_mut(&mut self) -> &mut C {
        &mut self.cursor
    }

    /// The fallible form of [`next`](Iterator::next).
    #[inline]
    pub fn try_next(&mut self) -> Result<Option<C::Item>> {
        pull(&mut self.cursor).transpose()
    }
}

impl<C: Cursor> Iterator for Traversal<C> {
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        settle(self.try_next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// An iterator which yields after reporting its end.
    struct Flicker { calls: u8 }

    impl Iterator for Flicker {
        type Item = u8;

        fn next(&mut self) -> Option<u8> {
            self.calls += 1;
            (self.calls % 2 == 0).then_some(self.calls)
        }
    }

    #[test]
    fn stays_exhausted_over_unfused_iterator() {
        let mut cursor = IterCursor::new(Flicker { calls: 0 });
        assert!(!cursor.more());
        assert!(!cursor.more());
        assert_eq!(cursor.take(), Err(Error::Exhausted));
        assert_eq!(cursor.skip(3), Ok(0));
    }

    #[test]
    fn take_without_more() {
        let mut cursor = IterCursor::new([7, 8].into_iter());
        assert_eq!(cursor.take(), Ok(7));
        assert!(!cursor.is_primed());
        assert_eq!(cursor.take(), Ok(8));
        assert_eq!(cursor.take(), Err(Error::Exhausted));
        assert!(!cursor.more());
    }

    #[test]
    fn empty_cursor() {
        let mut cursor = Empty::<u8>::new();
        assert!(!cursor.more());
        assert_eq!(cursor.take(), Err(Error::Exhausted));
        assert_eq!(cursor.remove_current(), Err(Error::Unsupported("remove_current")));
    }

    #[test]
    fn boxed_cursor_delegates() {
        let mut cursor: BoxCursor<'_, u8> = Box::new(IterCursor::new(1..=4));
        assert_eq!(cursor.skip(2), Ok(2));
        assert_eq!(cursor.take(), Ok(3));
        assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), [4]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_048))]

        #[test]
        fn more_is_idempotent(collection in any::<Vec<u8>>(), repeats in 1..5usize) {
            let mut cursor = IterCursor::new(collection.iter().copied());
            let mut seen = Vec::new();

            loop {
                let verdict = cursor.more();
                for _ in 0..repeats {
                    prop_assert_eq!(cursor.more(), verdict);
                }
                if !verdict { break; }
                seen.push(cursor.take().unwrap());
            }

            prop_assert_eq!(seen, collection);
        }

        #[test]
        fn skip_matches_std(collection in any::<Vec<u8>>(), amnt in 0..16usize, primed in any::<bool>()) {
            let mut cursor = IterCursor::new(collection.iter().copied());
            if primed {
                let _ = cursor.more();
            }

            let skipped = cursor.skip(amnt).unwrap();
            prop_assert_eq!(skipped, amnt.min(collection.len()));

            let rest: Vec<_> = Traversal::new(cursor).collect();
            prop_assert_eq!(rest, collection.into_iter().skip(amnt).collect::<Vec<_>>());
        }
    }
}

#[cfg(all(kani, test))]
mod checks {
    use kani::proof;
    use super::*;

    #[proof]
    fn more_never_advances() {
        let mut cursor = IterCursor::new([1, 2, 3].into_iter());

        kani::assert(cursor.more(), "non-empty source reports more");
        kani::assert(cursor.is_primed(), "more primes exactly one element");
        kani::assert(cursor.more(), "repeated more keeps its verdict");
        kani::assert(cursor.take() == Ok(1), "more must not consume the primed element");
        kani::assert(!cursor.is_primed(), "take drains the slot");
    }

    #[proof]
    fn exhaustion_is_terminal() {
        let list: [u8; 0] = [];
        let mut cursor = IterCursor::new(list.into_iter());

        kani::assert(!cursor.more(), "empty source reports no more");
        kani::assert(cursor.take() == Err(Error::Exhausted), "take on exhausted fails");
        kani::assert(cursor.peeked.is_term(), "the slot remembers the end");
        kani::assert(!cursor.more(), "exhaustion is terminal");
    }
}

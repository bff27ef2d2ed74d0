//! Adapters which cut a sequence at a terminal element or start it at one.

use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Ends before the first element matching a predicate.
///
/// One element of look-ahead is held so [`more`](Cursor::more) can report
/// `false` as soon as the terminal is next, without ever emitting it. Once
/// seen, the terminal stays buffered and the cursor stays exhausted.
pub struct Until<C: Cursor, P> {
    parent: C,
    terminal: P,
    next: Option<Result<C::Item>>,
    ended: bool
}

impl<C: Cursor, P> Until<C, P> {
    /// Wrap `parent`, ending before the first element for which `terminal` holds.
    #[inline]
    pub const fn new(parent: C, terminal: P) -> Self {
        Self { parent, terminal, next: None, ended: false }
    }
}

impl<C, P> Cursor for Until<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item) -> bool
{
    type Item = C::Item;

    fn more(&mut self) -> bool {
        if self.ended {
            return false;
        }
        if self.next.is_none() {
            self.next = pull(&mut self.parent);
            if let Some(Ok(elem)) = &self.next {
                self.ended = (self.terminal)(elem);
            }
        }
        !self.ended && self.next.is_some()
    }

    #[inline]
    fn take(&mut self) -> Result<C::Item> {
        if !self.more() {
            return Err(Error::Exhausted);
        }
        self.next.take().unwrap_or(Err(Error::Exhausted))
    }
}

/// Ends after the first element matching a predicate, emitting it.
///
/// No look-ahead is needed: the terminal test runs on each element as it is
/// taken.
pub struct EndingAt<C, P> {
    parent: C,
    terminal: P,
    ended: bool
}

impl<C, P> EndingAt<C, P> {
    /// Wrap `parent`, ending with the first element for which `terminal` holds.
    #[inline]
    pub const fn new(parent: C, terminal: P) -> Self {
        Self { parent, terminal, ended: false }
    }
}

impl<C, P> Cursor for EndingAt<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item) -> bool
{
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        !self.ended && self.parent.more()
    }

    fn take(&mut self) -> Result<C::Item> {
        if self.ended {
            return Err(Error::Exhausted);
        }
        let elem = self.parent.take()?;
        self.ended = (self.terminal)(&elem);
        Ok(elem)
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Drops elements until one matches a predicate.
///
/// When inclusive the matching element is the first one produced, otherwise
/// production starts right after it. If nothing matches the cursor is empty.
pub struct StartingFrom<C: Cursor, P> {
    parent: C,
    start: P,
    inclusive: bool,
    started: bool,
    first: Option<Result<C::Item>>
}

impl<C: Cursor, P> StartingFrom<C, P> {
    /// Wrap `parent`, starting at (`inclusive`) or after the first element for
    /// which `start` holds.
    #[inline]
    pub const fn new(parent: C, start: P, inclusive: bool) -> Self {
        Self { parent, start, inclusive, started: false, first: None }
    }
}

impl<C, P> StartingFrom<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item) -> bool
{
    fn seek(&mut self) {
        self.started = true;
        while let Some(elem) = pull(&mut self.parent) {
            match elem {
                Ok(elem) if !(self.start)(&elem) => continue,
                Ok(elem) => {
                    if self.inclusive {
                        self.first = Some(Ok(elem));
                    }
                    return;
                },
                Err(err) => {
                    self.first = Some(Err(err));
                    return;
                }
            }
        }
    }
}

impl<C, P> Cursor for StartingFrom<C, P>
    where
        C: Cursor,
        P: FnMut(&C::Item) -> bool
{
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        if !self.started {
            self.seek();
        }
        self.first.is_some() || self.parent.more()
    }

    fn take(&mut self) -> Result<C::Item> {
        if !self.more() {
            return Err(Error::Exhausted);
        }
        match self.first.take() {
            Some(first) => first,
            None => self.parent.take()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{IterCursor, Traversal};
    use proptest::prelude::*;

    fn drain<C: Cursor>(cursor: C) -> Vec<C::Item> {
        Traversal::new(cursor).collect()
    }

    #[test]
    fn until_is_exclusive_and_sticky() {
        let mut cursor = Until::new(IterCursor::new([1, 2, 3, 1, 2].into_iter()), |n: &i32| *n == 3);

        assert_eq!(cursor.take(), Ok(1));
        assert_eq!(cursor.take(), Ok(2));
        assert!(!cursor.more());
        assert!(!cursor.more());
        assert_eq!(cursor.take(), Err(Error::Exhausted));
    }

    #[test]
    fn ending_at_is_inclusive() {
        let cursor = EndingAt::new(IterCursor::new(0..), |n: &u32| *n == 4);
        assert_eq!(drain(cursor), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn starting_bounds() {
        let from = StartingFrom::new(IterCursor::new(1..=5), |n: &i32| *n == 3, true);
        let after = StartingFrom::new(IterCursor::new(1..=5), |n: &i32| *n == 3, false);
        let never = StartingFrom::new(IterCursor::new(1..=5), |n: &i32| *n == 9, true);

        assert_eq!(drain(from), [3, 4, 5]);
        assert_eq!(drain(after), [4, 5]);
        assert!(drain(never).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_048))]

        #[test]
        fn until_matches_take_while(collection in any::<Vec<u8>>(), terminal in any::<u8>()) {
            let cursor = Until::new(IterCursor::new(collection.iter().copied()), |n: &u8| *n == terminal);
            let expected: Vec<_> = collection.iter().copied().take_while(|n| *n != terminal).collect();
            prop_assert_eq!(drain(cursor), expected);
        }

        #[test]
        fn starting_after_matches_skip_while(collection in any::<Vec<u8>>(), start in any::<u8>()) {
            let cursor = StartingFrom::new(IterCursor::new(collection.iter().copied()), |n: &u8| *n == start, false);
            let expected: Vec<_> = collection.iter().copied().skip_while(|n| *n != start).skip(1).collect();
            prop_assert_eq!(drain(cursor), expected);
        }
    }
}

//! Adapters which combine each element with its neighbour.
//!
//! [`BackPeeking`] looks one element behind, [`ForwardPeeking`] one element
//! ahead. Both hold exactly one element of state and refresh it exactly once
//! per element produced. Where no real neighbour exists (before the first
//! element, after the last) a caller-supplied placeholder stands in.

use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Maps each element together with the element before it.
///
/// For input `[a, b, c]` with placeholder `z` this yields
/// `[f(z, a), f(a, b), f(b, c)]`.
pub struct BackPeeking<C: Cursor, F> {
    parent: C,
    first_previous: C::Item,
    previous: Option<C::Item>,
    mapper: F
}

impl<C: Cursor, F> BackPeeking<C, F> {
    /// Wrap `parent`, using `first_previous` as the neighbour of the first element.
    #[inline]
    pub const fn new(parent: C, first_previous: C::Item, mapper: F) -> Self {
        Self { parent, first_previous, previous: None, mapper }
    }
}

impl<C, F, U> Cursor for BackPeeking<C, F>
    where
        C: Cursor,
        F: FnMut(&C::Item, &C::Item) -> U
{
    type Item = U;

    #[inline]
    fn more(&mut self) -> bool { self.parent.more() }

    fn take(&mut self) -> Result<U> {
        let current = self.parent.take()?;
        let previous = self.previous.as_ref().unwrap_or(&self.first_previous);
        let result = (self.mapper)(previous, &current);
        self.previous = Some(current);
        Ok(result)
    }

    /// Removal is forwarded, as the element taken is always the parent's
    /// most recent one.
    #[inline]
    fn remove_current(&mut self) -> Result<()> { self.parent.remove_current() }
}

/// Maps each element together with the element after it.
///
/// For input `[a, b, c]` with placeholder `z` this yields
/// `[f(a, b), f(b, c), f(c, z)]`.
///
/// The first [`more`](Cursor::more) primes one element from the parent into
/// `current`; each [`take`](Cursor::take) then pulls the following element,
/// combines the pair and shifts it into `current`. The `started` flag
/// separates "not yet primed" from "primed and nothing left".
pub struct ForwardPeeking<C: Cursor, F> {
    parent: C,
    last_next: C::Item,
    current: Option<Result<C::Item>>,
    started: bool,
    mapper: F
}

impl<C: Cursor, F> ForwardPeeking<C, F> {
    /// Wrap `parent`, using `last_next` as the neighbour of the final element.
    #[inline]
    pub const fn new(parent: C, last_next: C::Item, mapper: F) -> Self {
        Self { parent, last_next, current: None, started: false, mapper }
    }
}

impl<C, F, U> Cursor for ForwardPeeking<C, F>
    where
        C: Cursor,
        F: FnMut(&C::Item, &C::Item) -> U
{
    type Item = U;

    #[inline]
    fn more(&mut self) -> bool {
        if !self.started {
            self.started = true;
            self.current = pull(&mut self.parent);
        }
        self.current.is_some()
    }

    fn take(&mut self) -> Result<U> {
        if !self.more() {
            return Err(Error::Exhausted);
        }
        let current = self.current.take().unwrap_or(Err(Error::Exhausted))?;

        match pull(&mut self.parent).transpose()? {
            Some(next) => {
                let result = (self.mapper)(&current, &next);
                self.current = Some(Ok(next));
                Ok(result)
            },
            None => Ok((self.mapper)(&current, &self.last_next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{IterCursor, Traversal};
    use proptest::prelude::*;

    #[test]
    fn forward_uses_placeholder_last() {
        let cursor = ForwardPeeking::new(
            IterCursor::new(['a', 'b', 'c'].into_iter()),
            'z',
            |c: &char, n: &char| format!("{c}{n}")
        );
        assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), ["ab", "bc", "cz"]);
    }

    #[test]
    fn back_uses_placeholder_first() {
        let cursor = BackPeeking::new(
            IterCursor::new(['a', 'b', 'c'].into_iter()),
            'z',
            |p: &char, c: &char| format!("{p}{c}")
        );
        assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), ["za", "ab", "bc"]);
    }

    #[test]
    fn forward_primes_lazily() {
        let mut pulled = 0;
        let parent = crate::adapters::Inspect::new(IterCursor::new(1..=3), |_: &i32| pulled += 1);
        let mut cursor = ForwardPeeking::new(parent, 0, |c: &i32, n: &i32| c + n);

        assert!(cursor.more());
        assert!(cursor.more());
        assert_eq!(cursor.take(), Ok(3));
        assert_eq!(cursor.take(), Ok(5));
        assert_eq!(cursor.take(), Ok(3));
        assert!(!cursor.more());
        assert_eq!(cursor.take(), Err(Error::Exhausted));
        drop(cursor);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn forward_over_empty() {
        let mut cursor = ForwardPeeking::new(IterCursor::new(0..0), 9, |c: &i32, n: &i32| c + n);
        assert!(!cursor.more());
        assert_eq!(cursor.take(), Err(Error::Exhausted));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_048))]

        #[test]
        fn forward_matches_windows(collection in any::<Vec<u8>>(), last in any::<u8>()) {
            let cursor = ForwardPeeking::new(
                IterCursor::new(collection.iter().copied()),
                last,
                |c: &u8, n: &u8| (*c, *n)
            );

            let mut expected: Vec<_> = collection.windows(2).map(|w| (w[0], w[1])).collect();
            if let Some(tail) = collection.last() {
                expected.push((*tail, last));
            }

            prop_assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), expected);
        }

        #[test]
        fn back_matches_windows(collection in any::<Vec<u8>>(), first in any::<u8>()) {
            let cursor = BackPeeking::new(
                IterCursor::new(collection.iter().copied()),
                first,
                |p: &u8, c: &u8| (*p, *c)
            );

            let expected: Vec<_> = core::iter::once(first)
                .chain(collection.iter().copied())
                .zip(collection.iter().copied())
                .collect();

            prop_assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), expected);
        }
    }
}

//! Adapters working from the end of a sequence.

use std::collections::VecDeque;
use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Drops the last `n` elements.
///
/// Keeps an `n`-element buffer filled on first use, delivering the oldest
/// buffered element for each new one pulled. Memory is bounded by `n`.
pub struct SkipTail<C: Cursor> {
    parent: C,
    skip: usize,
    buffer: VecDeque<C::Item>,
    started: bool,
    fault: Option<Error>
}

impl<C: Cursor> SkipTail<C> {
    /// Wrap `parent`, dropping its final `skip` elements.
    pub fn new(parent: C, skip: usize) -> Self {
        Self { parent, skip, buffer: VecDeque::with_capacity(skip), started: false, fault: None }
    }

    fn prime(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        while self.buffer.len() < self.skip {
            match pull(&mut self.parent) {
                Some(Ok(elem)) => self.buffer.push_back(elem),
                Some(Err(err)) => {
                    self.fault = Some(err);
                    return;
                },
                None => return
            }
        }
    }
}

impl<C: Cursor> Cursor for SkipTail<C> {
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        self.prime();
        self.fault.is_some() || self.parent.more()
    }

    fn take(&mut self) -> Result<C::Item> {
        self.prime();
        if let Some(err) = self.fault.take() {
            return Err(err);
        }

        let next = self.parent.take()?;
        self.buffer.push_back(next);
        requires!(self.buffer.len() == self.skip + 1);
        self.buffer.pop_front().ok_or(Error::Exhausted)
    }
}

/// Keeps only the last `n` elements.
///
/// Not streaming: the first pull drains the whole parent, retaining at most
/// `n` elements.
pub struct LimitTail<C: Cursor> {
    parent: C,
    limit: usize,
    buffer: Option<Result<VecDeque<C::Item>>>
}

impl<C: Cursor> LimitTail<C> {
    /// Wrap `parent`, keeping its final `limit` elements.
    #[inline]
    pub const fn new(parent: C, limit: usize) -> Self {
        Self { parent, limit, buffer: None }
    }

    fn drain_parent(&mut self) -> Result<VecDeque<C::Item>> {
        let mut buffer = VecDeque::with_capacity(self.limit);
        let mut seen = 0usize;
        while let Some(elem) = pull(&mut self.parent) {
            let elem = elem?;
            seen += 1;
            if self.limit == 0 {
                continue;
            }
            if buffer.len() == self.limit {
                buffer.pop_front();
            }
            buffer.push_back(elem);
        }
        log::trace!("limit_tail drained {seen} elements, keeping {}", buffer.len());
        Ok(buffer)
    }
}

impl<C: Cursor> Cursor for LimitTail<C> {
    type Item = C::Item;

    fn more(&mut self) -> bool {
        if self.buffer.is_none() {
            self.buffer = Some(self.drain_parent());
        }
        match &self.buffer {
            Some(Ok(buffer)) => !buffer.is_empty(),
            Some(Err(_)) => true,
            None => false
        }
    }

    fn take(&mut self) -> Result<C::Item> {
        self.more();
        match self.buffer.as_mut() {
            Some(Ok(buffer)) => return buffer.pop_front().ok_or(Error::Exhausted),
            Some(Err(_))     => {},
            None             => return Err(Error::Exhausted)
        }

        // surface the failure once, then behave as exhausted
        match self.buffer.replace(Ok(VecDeque::new())) {
            Some(Err(err)) => Err(err),
            _ => Err(Error::Exhausted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{IterCursor, Traversal};
    use proptest::prelude::*;

    #[test]
    fn skip_tail_is_bounded() {
        // infinite source: only a bounded prefix is ever pulled
        let mut cursor = SkipTail::new(IterCursor::new(0u32..), 3);
        assert_eq!(cursor.take(), Ok(0));
        assert_eq!(cursor.take(), Ok(1));
        assert!(cursor.more());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_048))]

        #[test]
        fn skip_tail_matches_std(collection in any::<Vec<u8>>(), skip in 0..10usize) {
            let cursor = SkipTail::new(IterCursor::new(collection.iter().copied()), skip);
            let keep = collection.len().saturating_sub(skip);
            prop_assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), &collection[..keep]);
        }

        #[test]
        fn limit_tail_matches_std(collection in any::<Vec<u8>>(), limit in 0..10usize) {
            let cursor = LimitTail::new(IterCursor::new(collection.iter().copied()), limit);
            let from = collection.len().saturating_sub(limit);
            prop_assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), &collection[from..]);
        }
    }
}

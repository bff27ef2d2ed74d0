//! Combining sequences: chaining, interleaving, repetition and delimiting.

use std::rc::Rc;
use crate::{
    cursor::{BoxCursor, Cursor},
    error::{Error, Result},
    sequence::{sized, Factory, Mode, Sequence}
};

/// Each source in turn, each one's cursor created only once the one before it
/// is exhausted.
///
/// A source opened while looking ahead is held apart from the one which
/// served the last [`take`](Cursor::take), so
/// [`remove_current`](Cursor::remove_current) still reaches the element just
/// taken after [`more`](Cursor::more) has moved on.
pub struct Chain<'a, T> {
    sources: Rc<[Sequence<'a, T>]>,
    next: usize,
    current: Option<BoxCursor<'a, T>>,
    ahead: Option<BoxCursor<'a, T>>
}

impl<'a, T: 'a> Chain<'a, T> {
    /// Chain `sources` in order.
    #[inline]
    pub fn new(sources: Rc<[Sequence<'a, T>]>) -> Self {
        Self { sources, next: 0, current: None, ahead: None }
    }

    fn current_has_more(&mut self) -> bool {
        self.current.as_mut().is_some_and(|current| current.more())
    }
}

impl<'a, T: 'a> Cursor for Chain<'a, T> {
    type Item = T;

    fn more(&mut self) -> bool {
        if self.current_has_more() {
            return true;
        }
        loop {
            if let Some(ahead) = &mut self.ahead {
                if ahead.more() {
                    return true;
                }
            }
            match self.sources.get(self.next) {
                Some(source) => {
                    self.ahead = Some(source.cursor());
                    self.next += 1;
                },
                None => return false
            }
        }
    }

    fn take(&mut self) -> Result<T> {
        if !self.more() {
            return Err(Error::Exhausted);
        }
        if !self.current_has_more() {
            self.current = self.ahead.take();
        }
        match &mut self.current {
            Some(current) => current.take(),
            None          => Err(Error::Exhausted)
        }
    }

    #[inline]
    fn remove_current(&mut self) -> Result<()> {
        match &mut self.current {
            Some(current) => current.remove_current(),
            None          => Err(Error::InvalidState("remove_current requires a preceding take"))
        }
    }
}

/// Round-robin over several cursors, passing over exhausted ones.
pub struct Interleave<C> {
    cursors: Vec<C>,
    current: usize
}

impl<C: Cursor> Interleave<C> {
    /// Interleave `cursors`, starting with the first.
    #[inline]
    pub const fn new(cursors: Vec<C>) -> Self {
        Self { cursors, current: 0 }
    }
}

impl<C: Cursor> Cursor for Interleave<C> {
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        self.cursors.iter_mut().any(Cursor::more)
    }

    fn take(&mut self) -> Result<C::Item> {
        let count = self.cursors.len();
        requires!(count == 0 || self.current < count);
        for offset in 0..count {
            let index = (self.current + offset) % count;
            if self.cursors[index].more() {
                self.current = (index + 1) % count;
                return self.cursors[index].take();
            }
        }
        Err(Error::Exhausted)
    }
}

/// A source traversed over and over, a new cursor per pass.
///
/// Stops after `times` passes if given, and always after a pass which yields
/// nothing, so an empty (or spent once-only) source ends the repetition
/// instead of spinning.
pub struct Repeat<'a, T> {
    source: Sequence<'a, T>,
    times: Option<usize>,
    passes: usize,
    current: Option<BoxCursor<'a, T>>,
    yielded: bool,
    done: bool
}

impl<'a, T: 'a> Repeat<'a, T> {
    /// Repeat `source`, forever or a number of `times`.
    #[inline]
    pub fn new(source: Sequence<'a, T>, times: Option<usize>) -> Self {
        Self { source, times, passes: 0, current: None, yielded: false, done: false }
    }
}

impl<'a, T: 'a> Cursor for Repeat<'a, T> {
    type Item = T;

    fn more(&mut self) -> bool {
        while !self.done {
            if let Some(current) = &mut self.current {
                if current.more() {
                    return true;
                }
                if !self.yielded {
                    log::trace!("repeat stopped on an empty pass after {} passes", self.passes);
                    self.done = true;
                    break;
                }
            }
            if self.times.is_some_and(|times| self.passes >= times) {
                self.done = true;
                break;
            }
            self.current = Some(self.source.cursor());
            self.passes += 1;
            self.yielded = false;
        }
        false
    }

    fn take(&mut self) -> Result<T> {
        if !self.more() {
            return Err(Error::Exhausted);
        }
        let elem = match &mut self.current {
            Some(current) => current.take()?,
            None          => return Err(Error::Exhausted)
        };
        self.yielded = true;
        Ok(elem)
    }
}

/// Inserts a delimiter between elements, with an optional prefix before the
/// first and suffix after the last.
///
/// The prefix and suffix are produced even when the parent is empty.
pub struct Delimit<C: Cursor> {
    parent: C,
    prefix: Option<C::Item>,
    delimiter: Option<C::Item>,
    suffix: Option<C::Item>,
    delimit_next: bool
}

impl<C: Cursor> Delimit<C> {
    /// Wrap `parent` with the given decorations.
    #[inline]
    pub const fn new(
        parent: C,
        prefix: Option<C::Item>,
        delimiter: Option<C::Item>,
        suffix: Option<C::Item>
    ) -> Self {
        Self { parent, prefix, delimiter, suffix, delimit_next: false }
    }
}

impl<C> Cursor for Delimit<C>
    where
        C: Cursor,
        C::Item: Clone
{
    type Item = C::Item;

    #[inline]
    fn more(&mut self) -> bool {
        self.prefix.is_some() || self.parent.more() || self.suffix.is_some()
    }

    fn take(&mut self) -> Result<C::Item> {
        if let Some(prefix) = self.prefix.take() {
            return Ok(prefix);
        }
        if !self.parent.more() {
            return self.suffix.take().ok_or(Error::Exhausted);
        }
        match (&self.delimiter, self.delimit_next) {
            (Some(delimiter), true) => {
                self.delimit_next = false;
                Ok(delimiter.clone())
            },
            _ => {
                let elem = self.parent.take()?;
                self.delimit_next = true;
                Ok(elem)
            }
        }
    }
}

impl<'a, T: 'a> Sequence<'a, T> {
    fn combined<C, F>(sources: Rc<[Self]>, build: F) -> Self
        where
            F: Fn(&Rc<[Self]>) -> C + 'a,
            C: Cursor<Item = T> + 'a
    {
        let mode = if sources.iter().any(|source| source.mode() == Mode::Once) { Mode::Once } else { Mode::Reusable };
        let size = sources.iter().all(|source| source.len_hint().is_some()).then(|| {
            let sources = Rc::clone(&sources);
            sized(move || sources.iter().filter_map(Sequence::len_hint).fold(0, usize::saturating_add))
        });
        let factory: Factory<'a, T> = Rc::new(move || -> BoxCursor<'a, T> { Box::new(build(&sources)) });
        Self::with_factory(mode, factory, size)
    }

    /// Every element of each sequence in turn.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let joined = Sequence::concat([Sequence::of([1, 2]), Sequence::empty(), Sequence::of([3])]);
    /// assert_eq!(joined.to_vec(), [1, 2, 3]);
    /// assert_eq!(joined.len_hint(), Some(3));
    /// ```
    pub fn concat<I>(sequences: I) -> Self
        where
            I: IntoIterator<Item = Self>
    {
        Self::combined(sequences.into_iter().collect(), |sources| Chain::new(Rc::clone(sources)))
    }

    /// This sequence followed by `other`.
    pub fn append(&self, other: &Self) -> Self {
        Self::concat([self.clone(), other.clone()])
    }

    /// `items` followed by this sequence.
    pub fn prefix<I>(&self, items: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Clone
    {
        Self::concat([Self::of(items), self.clone()])
    }

    /// This sequence followed by `items`.
    pub fn suffix<I>(&self, items: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Clone
    {
        Self::concat([self.clone(), Self::of(items)])
    }

    /// Alternates between the elements of several sequences, passing over
    /// those which run out.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let mixed = Sequence::interleaving([
    ///     Sequence::of(['a', 'b', 'c']),
    ///     Sequence::of(['1']),
    ///     Sequence::of(['x', 'y'])
    /// ]);
    /// assert_eq!(mixed.to_vec(), ['a', '1', 'x', 'b', 'y', 'c']);
    /// ```
    pub fn interleaving<I>(sequences: I) -> Self
        where
            I: IntoIterator<Item = Self>
    {
        Self::combined(sequences.into_iter().collect(), |sources| {
            Interleave::new(sources.iter().map(Sequence::cursor).collect())
        })
    }

    /// Alternates between this sequence and `other`.
    pub fn interleave(&self, other: &Self) -> Self {
        Self::interleaving([self.clone(), other.clone()])
    }

    /// This sequence over and over.
    ///
    /// Infinite unless this sequence is empty, in which case so is the
    /// repetition. A once-only sequence repeats nothing beyond its first pass.
    pub fn repeat(&self) -> Self {
        let source = self.clone();
        let factory: Factory<'a, T> = Rc::new(move || -> BoxCursor<'a, T> {
            Box::new(Repeat::new(source.clone(), None))
        });
        let size = (self.len_hint() == Some(0)).then(|| sized(|| 0));
        Self::with_factory(self.mode().derived(), factory, size)
    }

    /// This sequence `times` times over.
    pub fn repeat_times(&self, times: usize) -> Self {
        let source = self.clone();
        let factory: Factory<'a, T> = Rc::new(move || -> BoxCursor<'a, T> {
            Box::new(Repeat::new(source.clone(), Some(times)))
        });
        let size = (self.mode() != Mode::Once && self.len_hint().is_some()).then(|| {
            let source = self.clone();
            sized(move || source.len_hint().unwrap_or(0).saturating_mul(times))
        });
        Self::with_factory(self.mode().derived(), factory, size)
    }

    /// `delimiter` between each pair of neighbouring elements.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let list = Sequence::of(["a", "b", "c"]).delimit_with(Some("["), Some(", "), Some("]"));
    /// assert_eq!(list.collect::<String>(), "[a, b, c]");
    /// ```
    pub fn delimit(&self, delimiter: T) -> Self
        where
            T: Clone
    {
        self.delimit_with(None, Some(delimiter), None)
    }

    /// Optional `prefix` before the first element, `delimiter` between
    /// neighbours and `suffix` after the last.
    pub fn delimit_with(&self, prefix: Option<T>, delimiter: Option<T>, suffix: Option<T>) -> Self
        where
            T: Clone
    {
        let decorations = usize::from(prefix.is_some()) + usize::from(suffix.is_some());
        let delimited = delimiter.is_some();
        self.adapt_resized(
            move |len| {
                let delimiters = if delimited { len.saturating_sub(1) } else { 0 };
                len.saturating_add(decorations).saturating_add(delimiters)
            },
            move |parent| Delimit::new(parent, prefix.clone(), delimiter.clone(), suffix.clone())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use crate::store::SharedVec;
    use proptest::prelude::*;

    fn counted(opened: &Cell<usize>, items: Vec<u8>) -> Sequence<'_, u8> {
        Sequence::from_fn(move || {
            opened.set(opened.get() + 1);
            items.clone()
        })
    }

    #[test]
    fn chain_opens_sources_lazily() {
        let opened = Cell::new(0);
        let chain = Sequence::concat([
            counted(&opened, vec![1]),
            counted(&opened, vec![]),
            counted(&opened, vec![2, 3])
        ]);

        assert_eq!(chain.first(), Some(1));
        assert_eq!(opened.get(), 1);
        assert_eq!(chain.to_vec(), [1, 2, 3]);
        assert_eq!(opened.get(), 4);
    }

    #[test]
    fn append_prefix_suffix() {
        let middle = Sequence::of([2, 3]);
        assert_eq!(middle.prefix([0, 1]).suffix([4]).to_vec(), [0, 1, 2, 3, 4]);
        assert_eq!(middle.append(&middle).to_vec(), [2, 3, 2, 3]);
        assert_eq!(middle.prefix([1]).len_hint(), Some(3));
    }

    #[test]
    fn chain_forwards_removal() {
        let first: SharedVec<i32> = (1..=3).collect();
        let second: SharedVec<i32> = (4..=6).collect();
        let both = Sequence::from_store(&first).append(&Sequence::from_store(&second));

        assert_eq!(both.remove_if(|n| n % 2 == 0), Ok(3));
        assert_eq!(first.to_vec(), [1, 3]);
        assert_eq!(second.to_vec(), [5]);
    }

    #[test]
    fn chain_removes_from_source_last_taken() {
        let first: SharedVec<i32> = vec![1, 2].into();
        let second: SharedVec<i32> = vec![3, 4].into();
        let mut cursor = Chain::new(Rc::from(vec![Sequence::from_store(&first), Sequence::from_store(&second)]));

        assert_eq!(cursor.remove_current(), Err(Error::InvalidState("remove_current requires a preceding take")));
        assert_eq!(cursor.take(), Ok(1));
        assert_eq!(cursor.take(), Ok(2));
        assert!(cursor.more());
        assert!(cursor.more());
        assert_eq!(cursor.remove_current(), Ok(()));
        assert_eq!(first.to_vec(), [1]);

        assert_eq!(cursor.take(), Ok(3));
        assert_eq!(cursor.remove_current(), Ok(()));
        assert_eq!(second.to_vec(), [4]);
        assert_eq!(cursor.take(), Ok(4));
        assert!(!cursor.more());
    }

    #[test]
    fn interleave_skips_exhausted() {
        let letters = Sequence::of(['a', 'b', 'c', 'd']);
        let digits = Sequence::of(['1', '2']);
        assert_eq!(letters.interleave(&digits).to_vec(), ['a', '1', 'b', '2', 'c', 'd']);
        assert_eq!(digits.interleave(&letters).to_vec(), ['1', 'a', '2', 'b', 'c', 'd']);
        assert!(Sequence::<u8>::interleaving([]).is_empty());
    }

    #[test]
    fn repeat_passes() {
        let pair = Sequence::of([1, 2]);
        assert_eq!(pair.repeat().limit(5).to_vec(), [1, 2, 1, 2, 1]);
        assert_eq!(pair.repeat_times(3).to_vec(), [1, 2, 1, 2, 1, 2]);
        assert_eq!(pair.repeat_times(3).len_hint(), Some(6));
        assert!(pair.repeat_times(0).to_vec().is_empty());
    }

    #[test]
    fn sizes_saturate() {
        let pair = Sequence::of([1, 2]);
        let endless = pair.repeat_times(usize::MAX);

        assert_eq!(endless.len_hint(), Some(usize::MAX));
        assert_eq!(endless.limit(3).try_to_vec(), Ok(vec![1, 2, 1]));
        assert_eq!(endless.delimit_with(Some(0), Some(0), Some(0)).len_hint(), Some(usize::MAX));
        assert_eq!(Sequence::concat([endless.clone(), pair]).len_hint(), Some(usize::MAX));
    }

    #[test]
    fn repeat_of_empty_is_empty() {
        assert!(Sequence::<u8>::empty().repeat().to_vec().is_empty());
        assert!(Sequence::of([1, 2, 3]).filter(|n| *n > 5).repeat().to_vec().is_empty());
    }

    #[test]
    fn repeat_of_once_is_one_pass() {
        let once = Sequence::once(vec![7, 8]);
        assert_eq!(once.repeat().to_vec(), [7, 8]);
    }

    #[test]
    fn delimiting() {
        let words = Sequence::of(["x", "y", "z"]);
        assert_eq!(words.delimit("-").to_vec(), ["x", "-", "y", "-", "z"]);
        assert_eq!(words.delimit("-").len_hint(), Some(5));

        let empty = Sequence::<&str>::empty().delimit_with(Some("("), Some(","), Some(")"));
        assert_eq!(empty.to_vec(), ["(", ")"]);
        assert_eq!(empty.len_hint(), Some(2));

        let bare = words.delimit_with(Some("<"), None, Some(">"));
        assert_eq!(bare.collect::<String>(), "<xyz>");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_024))]

        #[test]
        fn concat_matches_chain(parts in prop::collection::vec(any::<Vec<u8>>(), 0..6)) {
            let expected: Vec<u8> = parts.iter().flatten().copied().collect();
            let sequence = Sequence::concat(parts.into_iter().map(Sequence::of));

            prop_assert_eq!(sequence.size(), expected.len());
            prop_assert_eq!(sequence.to_vec(), expected);
        }

        #[test]
        fn interleave_preserves_each_source(left in any::<Vec<u8>>(), right in any::<Vec<u8>>()) {
            let mixed = Sequence::of(left.clone()).map(|n| (0u8, n))
                .interleave(&Sequence::of(right.clone()).map(|n| (1u8, n)))
                .to_vec();

            let from = |side: u8| mixed.iter().filter(|(s, _)| *s == side).map(|(_, n)| *n).collect::<Vec<_>>();
            prop_assert_eq!(mixed.len(), left.len() + right.len());
            prop_assert_eq!(from(0), left);
            prop_assert_eq!(from(1), right);
        }
    }
}

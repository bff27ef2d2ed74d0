//! The [`Sequence`] facade: a cursor factory with a fluent adapter API.
//!
//! Every adapter method takes `&self` and returns a new sequence whose
//! factory builds a fresh adapter stack over a fresh parent cursor each time
//! it is traversed. Nothing is cached between traversals except where a
//! sequence explicitly stores its elements ([`Sequence::of`],
//! [`Sequence::cache`]).

use core::{cell::RefCell, cmp::Ordering, fmt, hash::Hash};
use std::{collections::HashSet, rc::Rc};
use crate::{
    adapters::{
        reorder::{self, Order},
        BackPeeking,
        Distinct,
        EndingAt,
        Filter,
        FilterMap,
        FlatMap,
        ForwardPeeking,
        Inspect,
        InspectIndexed,
        Limit,
        LimitTail,
        Map,
        MapIndexed,
        PredicateBatch,
        Skip,
        SkipTail,
        Split,
        StartingFrom,
        Step,
        Until,
        Window
    },
    cursor::{settle, BoxCursor, Cursor, Empty, IterCursor, Traversal},
    error::Result,
    store::{SharedVec, SliceCursor}
};

pub(crate) type Factory<'a, T> = Rc<dyn Fn() -> BoxCursor<'a, T> + 'a>;
pub(crate) type SizeFn<'a> = Rc<dyn Fn() -> usize + 'a>;
type OnceSlot<'a, T> = Rc<RefCell<Option<BoxCursor<'a, T>>>>;

/// How often a sequence can be traversed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Every traversal re-reads the source, observing its current state.
    Reusable,
    /// Wraps a single-pass source. The first traversal consumes it; every
    /// later traversal is empty.
    Once,
    /// A single-pass source drained into shared storage at construction.
    /// Traversable any number of times.
    Cache
}

impl Mode {
    /// The mode of a sequence adapted from one in this mode.
    #[inline]
    pub(crate) const fn derived(self) -> Self {
        match self {
            Self::Once => Self::Once,
            Self::Reusable | Self::Cache => Self::Reusable
        }
    }
}

enum Source<'a, T> {
    Factory(Factory<'a, T>),
    Slot(OnceSlot<'a, T>)
}

impl<T> Clone for Source<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Factory(factory) => Self::Factory(Rc::clone(factory)),
            Self::Slot(slot)       => Self::Slot(Rc::clone(slot))
        }
    }
}

/// A lazy, potentially reusable sequence of elements.
///
/// A `Sequence` is a factory of [`Cursor`]s. Cloning one is cheap and shares
/// the factory. Adapters never pull anything until a terminal operation
/// (`to_vec`, `first`, iteration, ...) creates a cursor and drives it.
///
/// # Example
///
/// ```
/// # use resequence::Sequence;
/// let odds = Sequence::from_iterable(1..).filter(|n| n % 2 == 1);
/// let squares = odds.map(|n| n * n).limit(4);
///
/// assert_eq!(squares.to_vec(), [1, 9, 25, 49]);
/// // reusable: a second traversal starts over
/// assert_eq!(squares.to_vec(), [1, 9, 25, 49]);
/// ```
pub struct Sequence<'a, T> {
    mode: Mode,
    source: Source<'a, T>,
    size: Option<SizeFn<'a>>
}

impl<T> Clone for Sequence<'_, T> {
    fn clone(&self) -> Self {
        Self { mode: self.mode, source: self.source.clone(), size: self.size.clone() }
    }
}

impl<T> fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("mode", &self.mode)
            .field("size", &self.size.as_ref().map(|size| size()))
            .finish()
    }
}

/// A predicate matching values within `tolerance` of `target`.
///
/// ```
/// # use resequence::{near, Sequence};
/// let halving = Sequence::recurse(1.0_f64, |x| x / 2.0).until_where(near(0.0, 1e-3));
/// assert_eq!(halving.count(), 10);
/// ```
pub fn near<T: Copy + Into<f64>>(target: f64, tolerance: f64) -> impl Fn(&T) -> bool {
    move |value: &T| ((*value).into() - target).abs() <= tolerance
}

pub(crate) fn sized<'a>(size: impl Fn() -> usize + 'a) -> SizeFn<'a> {
    Rc::new(size)
}

// construction
impl<'a, T: 'a> Sequence<'a, T> {
    pub(crate) fn with_factory(mode: Mode, factory: Factory<'a, T>, size: Option<SizeFn<'a>>) -> Self {
        Self { mode, source: Source::Factory(factory), size }
    }

    /// A reusable sequence built from a cursor factory, called once per
    /// traversal.
    pub fn from_cursors<C, F>(factory: F) -> Self
        where
            F: Fn() -> C + 'a,
            C: Cursor<Item = T> + 'a
    {
        let factory: Factory<'a, T> = Rc::new(move || -> BoxCursor<'a, T> { Box::new(factory()) });
        Self::with_factory(Mode::Reusable, factory, None)
    }

    /// A reusable sequence built from an iterator supplier, called once per
    /// traversal.
    pub fn from_fn<I, F>(supplier: F) -> Self
        where
            F: Fn() -> I + 'a,
            I: IntoIterator<Item = T>,
            I::IntoIter: 'a
    {
        Self::from_cursors(move || IterCursor::new(supplier().into_iter()))
    }

    /// A reusable sequence over anything that can be iterated repeatedly by
    /// cloning it: ranges, borrowed slices, borrowed collections.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let words = vec!["a", "b", "c"];
    /// let upper = Sequence::from_iterable(&words).map(|w| w.to_uppercase());
    /// assert_eq!(upper.to_vec(), ["A", "B", "C"]);
    /// ```
    pub fn from_iterable<I>(iterable: I) -> Self
        where
            I: IntoIterator<Item = T> + Clone + 'a,
            I::IntoIter: 'a
    {
        Self::from_fn(move || iterable.clone())
    }

    /// A sequence with no elements.
    pub fn empty() -> Self {
        let mut empty = Self::from_cursors(Empty::new);
        empty.size = Some(sized(|| 0));
        empty
    }

    /// A sequence over a single-pass source.
    ///
    /// The first traversal consumes `iterable`; every later traversal is
    /// empty. Use [`cache`](Sequence::cache) to traverse such a source more
    /// than once.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let once = Sequence::once(vec![1, 2, 3]);
    /// assert_eq!(once.to_vec(), [1, 2, 3]);
    /// assert!(once.to_vec().is_empty());
    /// ```
    pub fn once<I>(iterable: I) -> Self
        where
            I: IntoIterator<Item = T>,
            I::IntoIter: 'a
    {
        let cursor: BoxCursor<'a, T> = Box::new(IterCursor::new(iterable.into_iter()));
        Self { mode: Mode::Once, source: Source::Slot(Rc::new(RefCell::new(Some(cursor)))), size: None }
    }

    /// A reusable sequence over a live [`SharedVec`].
    ///
    /// Each traversal sees the store as it is when the traversal starts, and
    /// fails if the store is modified other than through the traversal's own
    /// cursor while it runs.
    pub fn from_store(store: &SharedVec<T>) -> Self
        where
            T: Clone
    {
        let cursors = store.clone();
        let lengths = store.clone();
        let factory: Factory<'a, T> = Rc::new(move || -> BoxCursor<'a, T> {
            Box::new(cursors.cursor())
        });
        Self::with_factory(Mode::Reusable, factory, Some(sized(move || lengths.len())))
    }

    fn stored(mode: Mode, items: Rc<[T]>) -> Self
        where
            T: Clone
    {
        let len = items.len();
        let factory: Factory<'a, T> = Rc::new(move || -> BoxCursor<'a, T> {
            Box::new(SliceCursor::new(Rc::clone(&items)))
        });
        Self::with_factory(mode, factory, Some(sized(move || len)))
    }
}

impl<'a, T: Clone + 'a> Sequence<'a, T> {
    /// A reusable sequence owning `items`.
    pub fn of<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self::stored(Mode::Reusable, items.into_iter().collect())
    }

    /// Drains a single-pass source now, so the result can be traversed any
    /// number of times.
    pub fn cache<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        let items: Rc<[T]> = iterable.into_iter().collect();
        log::debug!("cached {} elements from a single-pass source", items.len());
        Self::stored(Mode::Cache, items)
    }
}

impl<'a, T: Clone + 'a> FromIterator<T> for Sequence<'a, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::cache(iter)
    }
}

impl<'a, T: Clone + 'a> From<Vec<T>> for Sequence<'a, T> {
    fn from(items: Vec<T>) -> Self {
        Self::of(items)
    }
}

// introspection
impl<'a, T: 'a> Sequence<'a, T> {
    /// Start a traversal.
    ///
    /// For a [`Mode::Once`] sequence only the first call returns the wrapped
    /// source; later calls return an empty cursor.
    pub fn cursor(&self) -> BoxCursor<'a, T> {
        match &self.source {
            Source::Factory(factory) => factory(),
            Source::Slot(slot) => slot.borrow_mut().take().unwrap_or_else(|| -> BoxCursor<'a, T> {
                log::debug!("once-only sequence traversed again, yielding nothing");
                Box::new(Empty::new())
            })
        }
    }

    /// How this sequence can be traversed.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The number of elements, if known without traversal.
    #[must_use]
    pub fn len_hint(&self) -> Option<usize> {
        self.size.as_ref().map(|size| size())
    }

    fn derive<U, C, B>(&self, size: Option<SizeFn<'a>>, build: B) -> Sequence<'a, U>
        where
            U: 'a,
            B: Fn(BoxCursor<'a, T>) -> C + 'a,
            C: Cursor<Item = U> + 'a
    {
        let parent = self.clone();
        let factory: Factory<'a, U> = Rc::new(move || -> BoxCursor<'a, U> {
            Box::new(build(parent.cursor()))
        });
        Sequence::with_factory(self.mode.derived(), factory, size)
    }

    /// Adapt without a known size.
    #[inline]
    pub(crate) fn adapt<U, C, B>(&self, build: B) -> Sequence<'a, U>
        where
            U: 'a,
            B: Fn(BoxCursor<'a, T>) -> C + 'a,
            C: Cursor<Item = U> + 'a
    {
        self.derive(None, build)
    }

    /// Adapt preserving the element count.
    #[inline]
    pub(crate) fn adapt_sized<U, C, B>(&self, build: B) -> Sequence<'a, U>
        where
            U: 'a,
            B: Fn(BoxCursor<'a, T>) -> C + 'a,
            C: Cursor<Item = U> + 'a
    {
        self.derive(self.size.clone(), build)
    }

    /// Adapt with a size derived from the parent's, when that is known.
    #[inline]
    pub(crate) fn adapt_resized<U, C, B, S>(&self, resize: S, build: B) -> Sequence<'a, U>
        where
            U: 'a,
            B: Fn(BoxCursor<'a, T>) -> C + 'a,
            C: Cursor<Item = U> + 'a,
            S: Fn(usize) -> usize + 'a
    {
        let size = self.size.clone().map(|size| sized(move || resize(size())));
        self.derive(size, build)
    }
}

// stateless adapters
impl<'a, T: 'a> Sequence<'a, T> {
    /// Transform each element.
    pub fn map<U, F>(&self, mapper: F) -> Sequence<'a, U>
        where
            U: 'a,
            F: Fn(T) -> U + 'a
    {
        let mapper = Rc::new(mapper);
        self.adapt_sized(move |parent| {
            let mapper = Rc::clone(&mapper);
            Map::new(parent, move |elem: T| mapper(elem))
        })
    }

    /// Transform each element together with its zero-based position.
    pub fn map_indexed<U, F>(&self, mapper: F) -> Sequence<'a, U>
        where
            U: 'a,
            F: Fn(T, usize) -> U + 'a
    {
        let mapper = Rc::new(mapper);
        self.adapt_sized(move |parent| {
            let mapper = Rc::clone(&mapper);
            MapIndexed::new(parent, move |elem: T, index: usize| mapper(elem, index))
        })
    }

    /// Run `action` on each element as it passes through.
    pub fn inspect<F>(&self, action: F) -> Self
        where
            F: Fn(&T) + 'a
    {
        let action = Rc::new(action);
        self.adapt_sized(move |parent| {
            let action = Rc::clone(&action);
            Inspect::new(parent, move |elem: &T| action(elem))
        })
    }

    /// Run `action` on each element and its zero-based position as it passes
    /// through.
    pub fn inspect_indexed<F>(&self, action: F) -> Self
        where
            F: Fn(&T, usize) + 'a
    {
        let action = Rc::new(action);
        self.adapt_sized(move |parent| {
            let action = Rc::clone(&action);
            InspectIndexed::new(parent, move |elem: &T, index: usize| action(elem, index))
        })
    }

    /// Keep the elements matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Self
        where
            P: Fn(&T) -> bool + 'a
    {
        let predicate = Rc::new(predicate);
        self.adapt(move |parent| {
            let predicate = Rc::clone(&predicate);
            Filter::new(parent, move |elem: &T| predicate(elem))
        })
    }

    /// Keep the elements matching `predicate`, which also sees each element's
    /// zero-based position in this sequence.
    pub fn filter_indexed<P>(&self, predicate: P) -> Self
        where
            P: Fn(&T, usize) -> bool + 'a
    {
        let predicate = Rc::new(predicate);
        self.adapt(move |parent| {
            let predicate = Rc::clone(&predicate);
            let tagged = MapIndexed::new(parent, move |elem: T, index: usize| {
                predicate(&elem, index).then_some(elem)
            });
            FilterMap::new(tagged, |kept: Option<T>| kept)
        })
    }

    /// Transform each element, dropping those mapped to `None`.
    pub fn filter_map<U, F>(&self, mapper: F) -> Sequence<'a, U>
        where
            U: 'a,
            F: Fn(T) -> Option<U> + 'a
    {
        let mapper = Rc::new(mapper);
        self.adapt(move |parent| {
            let mapper = Rc::clone(&mapper);
            FilterMap::new(parent, move |elem: T| mapper(elem))
        })
    }

    /// Replace each element with the elements of the iterable it maps to.
    ///
    /// Each iterable is made only once the previous one is exhausted.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let repeated = Sequence::of([1, 0, 3]).flat_map(|n| vec![n; n]);
    /// assert_eq!(repeated.to_vec(), [1, 3, 3, 3]);
    /// ```
    pub fn flat_map<U, I, F>(&self, mapper: F) -> Sequence<'a, U>
        where
            U: 'a,
            I: IntoIterator<Item = U>,
            I::IntoIter: 'a,
            F: Fn(T) -> I + 'a
    {
        let mapper = Rc::new(mapper);
        self.adapt(move |parent| {
            let mapper = Rc::clone(&mapper);
            FlatMap::new(parent, move |elem: T| mapper(elem))
        })
    }

    /// The elements of each element in turn.
    pub fn flatten<U>(&self) -> Sequence<'a, U>
        where
            U: 'a,
            T: IntoIterator<Item = U>,
            T::IntoIter: 'a
    {
        self.flat_map(|inner| inner)
    }

    /// Keep the elements contained in `items`.
    pub fn including<I>(&self, items: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Eq + Hash
    {
        let set: HashSet<T> = items.into_iter().collect();
        self.filter(move |elem| set.contains(elem))
    }

    /// Drop the elements contained in `items`.
    pub fn excluding<I>(&self, items: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Eq + Hash
    {
        let set: HashSet<T> = items.into_iter().collect();
        self.filter(move |elem| !set.contains(elem))
    }

    /// At most the first `limit` elements.
    pub fn limit(&self, limit: usize) -> Self {
        self.adapt_resized(move |len| len.min(limit), move |parent| Limit::new(parent, limit))
    }

    /// Everything after the first `skip` elements.
    pub fn skip(&self, skip: usize) -> Self {
        self.adapt_resized(move |len| len.saturating_sub(skip), move |parent| Skip::new(parent, skip))
    }

    /// Every `step`th element, starting with the first.
    ///
    /// # Panics
    ///
    /// If `step` is zero.
    pub fn step(&self, step: usize) -> Self {
        assert!(step > 0, "step must be greater than 0");
        self.adapt_resized(move |len| len.div_ceil(step), move |parent| Step::new(parent, step))
    }

    /// Everything but the last `skip` elements.
    pub fn skip_tail(&self, skip: usize) -> Self {
        self.adapt_resized(move |len| len.saturating_sub(skip), move |parent| SkipTail::new(parent, skip))
    }

    /// At most the last `limit` elements. Drains the parent on first pull.
    pub fn limit_tail(&self, limit: usize) -> Self {
        self.adapt_resized(move |len| len.min(limit), move |parent| LimitTail::new(parent, limit))
    }
}

// neighbour-aware adapters
impl<'a, T: Clone + 'a> Sequence<'a, T> {
    /// Map each element together with the one before it, `first_previous`
    /// standing in before the first.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let deltas = Sequence::of([1, 4, 9, 16]).map_back(0, |prev, cur| cur - prev);
    /// assert_eq!(deltas.to_vec(), [1, 3, 5, 7]);
    /// ```
    pub fn map_back<U, F>(&self, first_previous: T, mapper: F) -> Sequence<'a, U>
        where
            U: 'a,
            F: Fn(&T, &T) -> U + 'a
    {
        let mapper = Rc::new(mapper);
        self.adapt_sized(move |parent| {
            let mapper = Rc::clone(&mapper);
            BackPeeking::new(parent, first_previous.clone(), move |prev: &T, cur: &T| mapper(prev, cur))
        })
    }

    /// Map each element together with the one after it, `last_next` standing
    /// in after the last.
    pub fn map_forward<U, F>(&self, last_next: T, mapper: F) -> Sequence<'a, U>
        where
            U: 'a,
            F: Fn(&T, &T) -> U + 'a
    {
        let mapper = Rc::new(mapper);
        self.adapt_sized(move |parent| {
            let mapper = Rc::clone(&mapper);
            ForwardPeeking::new(parent, last_next.clone(), move |cur: &T, next: &T| mapper(cur, next))
        })
    }

    /// Keep the elements for which `predicate(previous, current)` holds.
    pub fn filter_back<P>(&self, first_previous: T, predicate: P) -> Self
        where
            P: Fn(&T, &T) -> bool + 'a
    {
        self.map_back(first_previous, move |prev, cur| predicate(prev, cur).then(|| cur.clone()))
            .filter_map(|kept| kept)
    }

    /// Keep the elements for which `predicate(current, next)` holds.
    pub fn filter_forward<P>(&self, last_next: T, predicate: P) -> Self
        where
            P: Fn(&T, &T) -> bool + 'a
    {
        self.map_forward(last_next, move |cur, next| predicate(cur, next).then(|| cur.clone()))
            .filter_map(|kept| kept)
    }
}

// grouping adapters
impl<'a, T: 'a> Sequence<'a, T> {
    /// Sliding windows of `size` elements, advancing one element at a time.
    ///
    /// Windows are delivered as vectors; `Sequence::from(window)` turns one
    /// back into a sequence.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn window(&self, size: usize) -> Sequence<'a, Vec<T>>
        where
            T: Clone
    {
        self.window_step(size, 1)
    }

    /// Windows of `size` elements, advancing `step` elements at a time.
    ///
    /// Windows overlap when `step < size`; elements between windows are
    /// skipped when `step > size`. A window is produced only if it holds an
    /// element no earlier window held, so the last one may be short.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let windows = Sequence::from_iterable(1..=5).window_step(3, 2);
    /// assert_eq!(windows.to_vec(), [vec![1, 2, 3], vec![3, 4, 5]]);
    /// ```
    ///
    /// # Panics
    ///
    /// If `size` or `step` is zero.
    pub fn window_step(&self, size: usize, step: usize) -> Sequence<'a, Vec<T>>
        where
            T: Clone
    {
        assert!(size > 0, "window size must be greater than 0");
        assert!(step > 0, "window step must be greater than 0");
        self.adapt(move |parent| Window::new(parent, size, step))
    }

    /// Disjoint batches of `size` elements, the last possibly short.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn batch(&self, size: usize) -> Sequence<'a, Vec<T>>
        where
            T: Clone
    {
        self.window_step(size, size)
    }

    /// Batches of consecutive elements, a new batch starting between `a` and
    /// `b` wherever `boundary(a, b)` holds.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let vowel = |c: &char| "aeiou".contains(*c);
    /// let runs = Sequence::from_iterable("terrain".chars())
    ///     .batch_by(move |a, b| vowel(a) != vowel(b))
    ///     .map(|run| run.into_iter().collect::<String>());
    ///
    /// assert_eq!(runs.to_vec(), ["t", "e", "rr", "ai", "n"]);
    /// ```
    pub fn batch_by<P>(&self, boundary: P) -> Sequence<'a, Vec<T>>
        where
            P: Fn(&T, &T) -> bool + 'a
    {
        let boundary = Rc::new(boundary);
        self.adapt(move |parent| {
            let boundary = Rc::clone(&boundary);
            PredicateBatch::new(parent, move |a: &T, b: &T| boundary(a, b))
        })
    }

    /// The runs between elements equal to `delimiter`, which are dropped.
    pub fn split(&self, delimiter: T) -> Sequence<'a, Vec<T>>
        where
            T: PartialEq
    {
        self.split_by(move |elem| *elem == delimiter)
    }

    /// The runs between elements matching `delimiter`, which are dropped.
    pub fn split_by<P>(&self, delimiter: P) -> Sequence<'a, Vec<T>>
        where
            P: Fn(&T) -> bool + 'a
    {
        let delimiter = Rc::new(delimiter);
        self.adapt(move |parent| {
            let delimiter = Rc::clone(&delimiter);
            Split::new(parent, move |elem: &T| delimiter(elem))
        })
    }

    /// Each element paired with the one after it. Sequences of fewer than two
    /// elements have no pairs.
    pub fn pairs(&self) -> Sequence<'a, (T, T)>
        where
            T: Clone
    {
        self.window(2).filter_map(|window| {
            let [first, second] = <[T; 2]>::try_from(window).ok()?;
            Some((first, second))
        })
    }

    /// Each element the first time it occurs.
    pub fn distinct(&self) -> Self
        where
            T: Eq + Hash + Clone
    {
        self.adapt(Distinct::new)
    }
}

// reordering adapters
impl<'a, T: 'a> Sequence<'a, T> {
    /// The elements in ascending order.
    ///
    /// Not lazy: the first pull drains this sequence entirely.
    pub fn sorted(&self) -> Self
        where
            T: Ord
    {
        self.adapt_sized(|parent| reorder::sorted(parent, Order::Ascending))
    }

    /// The elements in descending order.
    ///
    /// Not lazy: the first pull drains this sequence entirely.
    pub fn sorted_reverse(&self) -> Self
        where
            T: Ord
    {
        self.adapt_sized(|parent| reorder::sorted(parent, Order::Descending))
    }

    /// The elements stably sorted by `comparator`.
    ///
    /// Not lazy: the first pull drains this sequence entirely.
    pub fn sorted_by<F>(&self, comparator: F) -> Self
        where
            F: Fn(&T, &T) -> Ordering + 'a
    {
        let comparator = Rc::new(comparator);
        self.adapt_sized(move |parent| {
            let comparator = Rc::clone(&comparator);
            reorder::sorted_by(parent, move |a: &T, b: &T| comparator(a, b))
        })
    }

    /// The elements stably sorted by a key.
    ///
    /// Not lazy: the first pull drains this sequence entirely.
    pub fn sorted_by_key<K, F>(&self, key: F) -> Self
        where
            K: Ord,
            F: Fn(&T) -> K + 'a
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// The elements last to first.
    ///
    /// Not lazy: the first pull drains this sequence entirely.
    pub fn reverse(&self) -> Self {
        self.adapt_sized(reorder::reversed)
    }
}

// terminal-bound adapters
impl<'a, T: 'a> Sequence<'a, T> {
    /// Ends before the first element equal to `terminal`.
    pub fn until(&self, terminal: T) -> Self
        where
            T: PartialEq
    {
        self.until_where(move |elem| *elem == terminal)
    }

    /// Ends before the first element matching `terminal`.
    pub fn until_where<P>(&self, terminal: P) -> Self
        where
            P: Fn(&T) -> bool + 'a
    {
        let terminal = Rc::new(terminal);
        self.adapt(move |parent| {
            let terminal = Rc::clone(&terminal);
            Until::new(parent, move |elem: &T| terminal(elem))
        })
    }

    /// Ends with the first element equal to `terminal`.
    pub fn ending_at(&self, terminal: T) -> Self
        where
            T: PartialEq
    {
        self.ending_where(move |elem| *elem == terminal)
    }

    /// Ends with the first element matching `terminal`.
    pub fn ending_where<P>(&self, terminal: P) -> Self
        where
            P: Fn(&T) -> bool + 'a
    {
        let terminal = Rc::new(terminal);
        self.adapt(move |parent| {
            let terminal = Rc::clone(&terminal);
            EndingAt::new(parent, move |elem: &T| terminal(elem))
        })
    }

    /// Starts with the first element equal to `start`.
    pub fn starting_from(&self, start: T) -> Self
        where
            T: PartialEq
    {
        self.starting_from_where(move |elem| *elem == start)
    }

    /// Starts with the first element matching `start`.
    pub fn starting_from_where<P>(&self, start: P) -> Self
        where
            P: Fn(&T) -> bool + 'a
    {
        self.starting(start, true)
    }

    /// Starts right after the first element equal to `start`.
    pub fn starting_after(&self, start: T) -> Self
        where
            T: PartialEq
    {
        self.starting_after_where(move |elem| *elem == start)
    }

    /// Starts right after the first element matching `start`.
    pub fn starting_after_where<P>(&self, start: P) -> Self
        where
            P: Fn(&T) -> bool + 'a
    {
        self.starting(start, false)
    }

    fn starting<P>(&self, start: P, inclusive: bool) -> Self
        where
            P: Fn(&T) -> bool + 'a
    {
        let start = Rc::new(start);
        self.adapt(move |parent| {
            let start = Rc::clone(&start);
            StartingFrom::new(parent, move |elem: &T| start(elem), inclusive)
        })
    }
}

// terminal operations
impl<'a, T: 'a> Sequence<'a, T> {
    /// Traverse with a std iterator.
    ///
    /// # Panics
    ///
    /// The iterator panics if a backing store is modified during the
    /// traversal; [`try_to_vec`](Sequence::try_to_vec) and
    /// [`try_for_each`](Sequence::try_for_each) report that as an error.
    #[inline]
    pub fn iter(&self) -> Traversal<BoxCursor<'a, T>> {
        Traversal::new(self.cursor())
    }

    /// Collect every element.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Collect every element, reporting a failed traversal.
    ///
    /// # Errors
    ///
    /// Whatever the cursor stack reports, for example
    /// [`ConcurrentModification`](crate::Error::ConcurrentModification).
    pub fn try_to_vec(&self) -> Result<Vec<T>> {
        let mut traversal = self.iter();
        let mut items = Vec::new();
        // a size hint past what can be allocated is only a hint
        let _ = items.try_reserve(self.len_hint().unwrap_or(0));
        while let Some(elem) = traversal.try_next()? {
            items.push(elem);
        }
        Ok(items)
    }

    /// Run a fallible action on each element, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first error from `action` or from the traversal itself.
    pub fn try_for_each<E, F>(&self, mut action: F) -> Result<(), E>
        where
            E: From<crate::Error>,
            F: FnMut(T) -> Result<(), E>
    {
        let mut traversal = self.iter();
        while let Some(elem) = traversal.try_next()? {
            action(elem)?;
        }
        Ok(())
    }

    /// Run `action` on each element.
    pub fn for_each<F: FnMut(T)>(&self, action: F) {
        self.iter().for_each(action);
    }

    /// Collect into any [`FromIterator`] container.
    pub fn collect<B: FromIterator<T>>(&self) -> B {
        self.iter().collect()
    }

    /// The first element.
    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    /// The second element.
    pub fn second(&self) -> Option<T> {
        self.at(1)
    }

    /// The third element.
    pub fn third(&self) -> Option<T> {
        self.at(2)
    }

    /// The last element.
    pub fn last(&self) -> Option<T> {
        self.iter().last()
    }

    /// The element at zero-based `index`.
    ///
    /// Skips ahead with [`Cursor::skip`], which is constant time over stored
    /// sequences.
    pub fn at(&self, index: usize) -> Option<T> {
        let mut cursor = self.cursor();
        if settle(cursor.skip(index)) < index {
            return None;
        }
        Traversal::new(cursor).next()
    }

    /// The first element matching `predicate`.
    pub fn first_where<P: FnMut(&T) -> bool>(&self, predicate: P) -> Option<T> {
        self.iter().find(predicate)
    }

    /// The last element matching `predicate`.
    pub fn last_where<P: FnMut(&T) -> bool>(&self, predicate: P) -> Option<T> {
        self.iter().filter(predicate).last()
    }

    /// Combine the elements pairwise from the front, or `None` if empty.
    pub fn reduce<F: FnMut(T, T) -> T>(&self, combine: F) -> Option<T> {
        self.iter().reduce(combine)
    }

    /// Combine the elements into an accumulator from the front.
    pub fn fold<A, F: FnMut(A, T) -> A>(&self, init: A, combine: F) -> A {
        self.iter().fold(init, combine)
    }

    /// The smallest element; the first of equals.
    pub fn min(&self) -> Option<T>
        where
            T: Ord
    {
        self.iter().min()
    }

    /// The largest element; the last of equals.
    pub fn max(&self) -> Option<T>
        where
            T: Ord
    {
        self.iter().max()
    }

    /// The element with the smallest key.
    pub fn min_by_key<K: Ord, F: FnMut(&T) -> K>(&self, key: F) -> Option<T> {
        self.iter().min_by_key(key)
    }

    /// The element with the largest key.
    pub fn max_by_key<K: Ord, F: FnMut(&T) -> K>(&self, key: F) -> Option<T> {
        self.iter().max_by_key(key)
    }

    /// Count the elements by traversing them.
    ///
    /// # Panics
    ///
    /// If a backing store is modified while counting.
    pub fn count(&self) -> usize {
        settle(self.cursor().skip(usize::MAX))
    }

    /// The number of elements: known without traversal when this sequence is
    /// stored or sized from its parent, otherwise a live [`count`].
    ///
    /// [`count`]: Sequence::count
    pub fn size(&self) -> usize {
        self.len_hint().unwrap_or_else(|| self.count())
    }

    /// Returns `true` if there are no elements.
    ///
    /// Does not consume the source of a [`Mode::Once`] sequence itself, but
    /// adapters over one may have to pull from it to answer.
    pub fn is_empty(&self) -> bool {
        match &self.source {
            Source::Slot(slot) => slot.borrow_mut().as_mut().map_or(true, |cursor| !cursor.more()),
            Source::Factory(_) => match self.len_hint() {
                Some(len) => len == 0,
                None      => !self.cursor().more()
            }
        }
    }

    /// Returns `true` if any element matches.
    pub fn any<P: FnMut(T) -> bool>(&self, predicate: P) -> bool {
        self.iter().any(predicate)
    }

    /// Returns `true` if every element matches; `true` when empty.
    pub fn all<P: FnMut(T) -> bool>(&self, predicate: P) -> bool {
        self.iter().all(predicate)
    }

    /// Returns `true` if no element matches; `true` when empty.
    pub fn none<P: FnMut(T) -> bool>(&self, mut predicate: P) -> bool {
        !self.iter().any(|elem| predicate(elem))
    }

    /// The elements' display forms separated by `separator`.
    pub fn join(&self, separator: &str) -> String
        where
            T: fmt::Display
    {
        let mut joined = String::new();
        for (index, elem) in self.iter().enumerate() {
            if index > 0 {
                joined.push_str(separator);
            }
            joined.push_str(&elem.to_string());
        }
        joined
    }

    /// Remove the matching elements from the backing store, returning how
    /// many were removed.
    ///
    /// # Errors
    ///
    /// [`Unsupported`](crate::Error::Unsupported) if any adapter in the chain
    /// cannot map elements back to the store, or a traversal failure.
    ///
    /// ```
    /// # use resequence::{Sequence, SharedVec};
    /// let store: SharedVec<i32> = (1..=6).collect();
    /// let removed = Sequence::from_store(&store).remove_if(|n| n % 3 == 0);
    ///
    /// assert_eq!(removed, Ok(2));
    /// assert_eq!(store.to_vec(), [1, 2, 4, 5]);
    /// ```
    pub fn remove_if<P: FnMut(&T) -> bool>(&self, mut predicate: P) -> Result<usize> {
        let mut cursor = self.cursor();
        let mut removed = 0;
        while cursor.more() {
            let elem = cursor.take()?;
            if predicate(&elem) {
                cursor.remove_current()?;
                removed += 1;
            }
        }
        if removed > 0 {
            log::trace!("removed {removed} elements through sequence");
        }
        Ok(removed)
    }

    /// Remove every element reachable through this sequence from the backing
    /// store.
    ///
    /// # Errors
    ///
    /// As for [`remove_if`](Sequence::remove_if).
    pub fn clear(&self) -> Result<usize> {
        self.remove_if(|_| true)
    }
}

impl<'a, T: 'a> IntoIterator for &Sequence<'a, T> {
    type Item = T;
    type IntoIter = Traversal<BoxCursor<'a, T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, T: 'a> IntoIterator for Sequence<'a, T> {
    type Item = T;
    type IntoIter = Traversal<BoxCursor<'a, T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

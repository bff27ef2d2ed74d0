//! Reordering adapters: sorted and reversed views.
//!
//! These are not streaming. The first [`more`](Cursor::more) drains the whole
//! parent before anything is produced, so they never terminate over an
//! infinite parent and hold every element in memory. Natural and reverse
//! natural order sit in a binary heap and are extracted one element at a
//! time, which keeps `sorted().first()` at O(n) rather than a full sort.
//! Arbitrary comparators fall back to a full (stable) sort.

use core::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use crate::{cursor::{pull, Cursor}, error::{Error, Result}};

/// Direction of a natural-order sort.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Order {
    /// Smallest element first.
    Ascending,
    /// Largest element first.
    Descending
}

/// A materialized collection drained one element at a time.
pub trait Drain {
    /// The element type.
    type Item;

    /// Remove the next element in delivery order.
    fn pop_next(&mut self) -> Option<Self::Item>;

    /// Returns `true` when nothing is left.
    fn is_drained(&self) -> bool;
}

/// A heap ordered in either direction.
pub enum Heap<T> {
    /// Min-heap.
    Ascending(BinaryHeap<Reverse<T>>),
    /// Max-heap.
    Descending(BinaryHeap<T>)
}

impl<T: Ord> Drain for Heap<T> {
    type Item = T;

    #[inline]
    fn pop_next(&mut self) -> Option<T> {
        match self {
            Self::Ascending(heap)  => heap.pop().map(|Reverse(elem)| elem),
            Self::Descending(heap) => heap.pop()
        }
    }

    #[inline]
    fn is_drained(&self) -> bool {
        match self {
            Self::Ascending(heap)  => heap.is_empty(),
            Self::Descending(heap) => heap.is_empty()
        }
    }
}

/// Delivers from the back, so it must hold elements in reverse delivery order.
impl<T> Drain for Vec<T> {
    type Item = T;

    #[inline]
    fn pop_next(&mut self) -> Option<T> { self.pop() }

    #[inline]
    fn is_drained(&self) -> bool { self.is_empty() }
}

enum Stage<S> {
    Pending,
    Ready(S),
    Failed(Error),
    Done
}

/// Drains the parent on first use, arranges the elements with `build`, then
/// delivers them one at a time.
pub struct Reorder<C, S, B> {
    parent: C,
    build: Option<B>,
    stage: Stage<S>
}

impl<C, S, B> Reorder<C, S, B>
    where
        C: Cursor,
        S: Drain<Item = C::Item>,
        B: FnOnce(Vec<C::Item>) -> S
{
    /// Wrap `parent`, arranging its drained elements with `build`.
    #[inline]
    pub const fn new(parent: C, build: B) -> Self {
        Self { parent, build: Some(build), stage: Stage::Pending }
    }

    fn materialize(&mut self) -> Result<S> {
        let mut items = Vec::new();
        while let Some(elem) = pull(&mut self.parent) {
            items.push(elem?);
        }
        log::trace!("materialized {} elements for reordering", items.len());

        match self.build.take() {
            Some(build) => Ok(build(items)),
            None => Err(Error::InvalidState("reorder materialized twice"))
        }
    }
}

impl<C, S, B> Cursor for Reorder<C, S, B>
    where
        C: Cursor,
        S: Drain<Item = C::Item>,
        B: FnOnce(Vec<C::Item>) -> S
{
    type Item = C::Item;

    fn more(&mut self) -> bool {
        if matches!(self.stage, Stage::Pending) {
            self.stage = match self.materialize() {
                Ok(ready) => Stage::Ready(ready),
                Err(err) => Stage::Failed(err)
            };
        }
        match &self.stage {
            Stage::Ready(ready) => !ready.is_drained(),
            Stage::Failed(_) => true,
            Stage::Pending | Stage::Done => false
        }
    }

    fn take(&mut self) -> Result<C::Item> {
        self.more();
        match core::mem::replace(&mut self.stage, Stage::Done) {
            Stage::Ready(mut ready) => {
                let next = ready.pop_next().ok_or(Error::Exhausted);
                self.stage = Stage::Ready(ready);
                next
            },
            Stage::Failed(err) => Err(err),
            Stage::Pending | Stage::Done => Err(Error::Exhausted)
        }
    }
}

/// Natural order in the given direction, extracted lazily from a heap.
pub fn sorted<C>(parent: C, order: Order) -> impl Cursor<Item = C::Item>
    where
        C: Cursor,
        C::Item: Ord
{
    Reorder::new(parent, move |items: Vec<C::Item>| match order {
        Order::Ascending  => Heap::Ascending(items.into_iter().map(Reverse).collect()),
        Order::Descending => Heap::Descending(BinaryHeap::from(items))
    })
}

/// A stable sort by `comparator`.
pub fn sorted_by<C, F>(parent: C, mut comparator: F) -> impl Cursor<Item = C::Item>
    where
        C: Cursor,
        F: FnMut(&C::Item, &C::Item) -> Ordering
{
    Reorder::new(parent, move |mut items: Vec<C::Item>| {
        items.sort_by(&mut comparator);
        items.reverse();
        items
    })
}

/// The parent's elements, last first.
pub fn reversed<C: Cursor>(parent: C) -> impl Cursor<Item = C::Item> {
    Reorder::new(parent, |items: Vec<C::Item>| items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{IterCursor, Traversal};
    use proptest::prelude::*;

    #[test]
    fn nothing_pulled_until_first_more() {
        let mut pulled = 0;
        let parent = crate::adapters::Inspect::new(IterCursor::new([3, 1, 2].into_iter()), |_: &i32| pulled += 1);
        let mut cursor = sorted(parent, Order::Ascending);

        assert!(cursor.more());
        assert_eq!(cursor.take(), Ok(1));
        drop(cursor);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn stable_comparator_sort() {
        let words = ["bb", "a", "cc", "d", "ee"];
        let cursor = sorted_by(IterCursor::new(words.into_iter()), |a: &&str, b: &&str| a.len().cmp(&b.len()));
        assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), ["a", "d", "bb", "cc", "ee"]);
    }

    #[test]
    fn reversed_source() {
        let cursor = reversed(IterCursor::new(1..=4));
        assert_eq!(Traversal::new(cursor).collect::<Vec<_>>(), [4, 3, 2, 1]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_048))]

        #[test]
        fn heap_sort_matches_std(mut collection in any::<Vec<u16>>(), descending in any::<bool>()) {
            let order = if descending { Order::Descending } else { Order::Ascending };
            let cursor = sorted(IterCursor::new(collection.clone().into_iter()), order);
            let got: Vec<_> = Traversal::new(cursor).collect();

            collection.sort_unstable();
            if descending {
                collection.reverse();
            }
            prop_assert_eq!(got, collection);
        }
    }
}

//! Backing stores which sequences can traverse repeatedly.
//!
//! [`SliceCursor`] walks immutable shared storage, as built by
//! [`Sequence::of`](crate::Sequence::of) and
//! [`Sequence::cache`](crate::Sequence::cache). [`SharedVec`] is a mutable
//! store whose cursors detect structural modification made behind their back
//! and support in-place removal.

use core::{cell::RefCell, fmt};
use std::rc::Rc;
use crate::{cursor::Cursor, error::{Error, Result}};

/// A cursor over reference-counted immutable storage, cloning out each element.
pub struct SliceCursor<T> {
    items: Rc<[T]>,
    index: usize
}

impl<T> SliceCursor<T> {
    /// Start a traversal at the front of `items`.
    #[inline]
    pub fn new(items: Rc<[T]>) -> Self {
        Self { items, index: 0 }
    }

    /// The number of elements left in this traversal.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len() - self.index
    }
}

impl<T: Clone> Cursor for SliceCursor<T> {
    type Item = T;

    #[inline]
    fn more(&mut self) -> bool {
        self.index < self.items.len()
    }

    #[inline]
    fn take(&mut self) -> Result<T> {
        let elem = self.items.get(self.index).cloned().ok_or(Error::Exhausted)?;
        self.index += 1;
        Ok(elem)
    }

    #[inline]
    fn skip(&mut self, n: usize) -> Result<usize> {
        let skipped = n.min(self.remaining());
        self.index += skipped;
        Ok(skipped)
    }
}

struct Inner<T> {
    items: Vec<T>,
    version: u64
}

/// A single-threaded, shared, growable store with fail-fast traversal.
///
/// Cloning a `SharedVec` clones the handle, not the elements. Every
/// structural change bumps a version stamp; a [`StoreCursor`] captures the
/// stamp when created and fails with [`Error::ConcurrentModification`] on the
/// next pull once the stamp has moved.
///
/// # Example
///
/// ```
/// # use resequence::{Sequence, SharedVec};
/// let store = SharedVec::from(vec![1, 2, 3]);
/// let evens = Sequence::from_store(&store).filter(|n| n % 2 == 0);
///
/// assert_eq!(evens.to_vec(), [2]);
///
/// // sequences observe the store as it is when traversed
/// store.push(4);
/// assert_eq!(evens.to_vec(), [2, 4]);
/// ```
pub struct SharedVec<T> {
    inner: Rc<RefCell<Inner<T>>>
}

impl<T> Clone for SharedVec<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T> Default for SharedVec<T> {
    fn default() -> Self { Self::new() }
}

impl<T> From<Vec<T>> for SharedVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self { inner: Rc::new(RefCell::new(Inner { items, version: 0 })) }
    }
}

impl<T> FromIterator<T> for SharedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SharedVec")
            .field("items", &inner.items)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T> SharedVec<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// The number of elements currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Returns `true` if the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The current version stamp, bumped on every structural change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Append an element.
    pub fn push(&self, elem: T) {
        self.mutate(|items| items.push(elem));
    }

    /// Insert an element at `index`, shifting later elements back.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert(&self, index: usize, elem: T) {
        self.mutate(|items| items.insert(index, elem));
    }

    /// Remove the element at `index`, if there is one.
    pub fn remove(&self, index: usize) -> Option<T> {
        if index < self.len() {
            Some(self.mutate(|items| items.remove(index)))
        } else {
            None
        }
    }

    /// Remove every element.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    #[inline]
    fn mutate<R>(&self, op: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut inner = self.inner.borrow_mut();
        inner.version += 1;
        op(&mut inner.items)
    }

    /// Begin a fail-fast traversal of the store.
    pub fn cursor(&self) -> StoreCursor<T> {
        StoreCursor {
            store: self.clone(),
            index: 0,
            expected: self.version(),
            last: None
        }
    }
}

impl<T: Clone> SharedVec<T> {
    /// A clone of the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// A snapshot of the current contents.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }
}

/// A fail-fast cursor over a [`SharedVec`], supporting
/// [`remove_current`](Cursor::remove_current).
pub struct StoreCursor<T> {
    store: SharedVec<T>,
    index: usize,
    expected: u64,
    /// Position of the element most recently taken, until it is removed.
    last: Option<usize>
}

impl<T> StoreCursor<T> {
    fn check(&self) -> Result<()> {
        let found = self.store.version();
        if found == self.expected {
            Ok(())
        } else {
            log::debug!(
                "store cursor detected modification (expected version {}, found {found})",
                self.expected
            );
            Err(Error::ConcurrentModification { expected: self.expected, found })
        }
    }
}

impl<T: Clone> Cursor for StoreCursor<T> {
    type Item = T;

    /// Reports `true` once the store has been modified, so the following
    /// `take` surfaces the failure rather than silently ending the traversal.
    #[inline]
    fn more(&mut self) -> bool {
        self.check().is_err() || self.index < self.store.len()
    }

    fn take(&mut self) -> Result<T> {
        self.check()?;
        let elem = self.store.get(self.index).ok_or(Error::Exhausted)?;
        self.last = Some(self.index);
        self.index += 1;
        Ok(elem)
    }

    fn skip(&mut self, n: usize) -> Result<usize> {
        self.check()?;
        let skipped = n.min(self.store.len() - self.index);
        self.index += skipped;
        self.last = None;
        Ok(skipped)
    }

    fn remove_current(&mut self) -> Result<()> {
        let last = self.last.ok_or(Error::InvalidState(
            "remove_current requires a preceding take"
        ))?;
        self.check()?;

        self.store.remove(last);
        self.expected = self.store.version();
        self.index = last;
        self.last = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Traversal;

    #[test]
    fn slice_cursor_skip_is_bounded() {
        let mut cursor = SliceCursor::new(Rc::from(vec![1, 2, 3]));
        assert_eq!(cursor.skip(2), Ok(2));
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.skip(5), Ok(1));
        assert!(!cursor.more());
        assert_eq!(cursor.take(), Err(Error::Exhausted));
    }

    #[test]
    fn independent_cursors() {
        let store = SharedVec::from(vec!['a', 'b', 'c']);
        let mut first = store.cursor();
        let mut second = store.cursor();

        assert_eq!(first.take(), Ok('a'));
        assert_eq!(first.take(), Ok('b'));
        assert_eq!(second.take(), Ok('a'));
        assert_eq!(first.take(), Ok('c'));
        assert!(!first.more());
        assert!(second.more());
    }

    #[test]
    fn modification_fails_fast() {
        let store = SharedVec::from(vec![1, 2, 3]);
        let mut cursor = store.cursor();

        assert_eq!(cursor.take(), Ok(1));
        store.push(4);

        assert!(cursor.more());
        assert_eq!(
            cursor.take(),
            Err(Error::ConcurrentModification { expected: 0, found: 1 })
        );
    }

    #[test]
    fn remove_current_in_place() {
        let store = SharedVec::from(vec![1, 2, 3, 4]);
        let mut cursor = store.cursor();

        while cursor.more() {
            if cursor.take().unwrap() % 2 == 0 {
                cursor.remove_current().unwrap();
            }
        }

        assert_eq!(store.to_vec(), [1, 3]);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn remove_current_out_of_sequence() {
        let store = SharedVec::from(vec![1, 2]);
        let mut cursor = store.cursor();

        assert!(matches!(cursor.remove_current(), Err(Error::InvalidState(_))));
        assert_eq!(cursor.take(), Ok(1));
        assert_eq!(cursor.remove_current(), Ok(()));
        assert!(matches!(cursor.remove_current(), Err(Error::InvalidState(_))));
        assert_eq!(cursor.take(), Ok(2));
        assert_eq!(store.to_vec(), [2]);
    }

    #[test]
    fn removal_invalidates_other_cursors() {
        let store = SharedVec::from(vec![1, 2]);
        let mut remover = store.cursor();
        let mut reader = store.cursor();

        assert_eq!(remover.take(), Ok(1));
        remover.remove_current().unwrap();

        assert!(matches!(reader.take(), Err(Error::ConcurrentModification { .. })));
        assert_eq!(Traversal::new(remover).collect::<Vec<_>>(), [2]);
    }
}

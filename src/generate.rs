//! Sequences with no backing store: recursion and suppliers.
//!
//! Every sequence here is infinite. Bound them with
//! [`limit`](Sequence::limit), [`until`](Sequence::until) or
//! [`ending_at`](Sequence::ending_at) before any terminal operation which
//! visits every element.

use core::{cell::RefCell, ops::Add};
use std::rc::Rc;
use crate::{cursor::Cursor, error::{Error, Result}, sequence::Sequence};

/// Yields a seed, then each element's successor.
///
/// Holds the element produced last; the successor of that element is only
/// computed when the next one is taken.
pub struct Recursive<T, F> {
    seed: Option<T>,
    previous: Option<T>,
    successor: F
}

impl<T, F> Recursive<T, F> {
    /// Start at `seed`, stepping with `successor`.
    #[inline]
    pub const fn new(seed: T, successor: F) -> Self {
        Self { seed: Some(seed), previous: None, successor }
    }
}

impl<T, F> Cursor for Recursive<T, F>
    where
        T: Clone,
        F: FnMut(&T) -> T
{
    type Item = T;

    #[inline]
    fn more(&mut self) -> bool { true }

    fn take(&mut self) -> Result<T> {
        let next = match (self.seed.take(), &self.previous) {
            (Some(seed), _)        => seed,
            (None, Some(previous)) => (self.successor)(previous),
            (None, None)           => return Err(Error::InvalidState("recursion has no previous element"))
        };
        self.previous = Some(next.clone());
        Ok(next)
    }
}

/// Yields whatever a supplier returns, forever.
pub struct Generate<F> {
    supplier: F
}

impl<F> Generate<F> {
    /// Wrap `supplier`.
    #[inline]
    pub const fn new(supplier: F) -> Self {
        Self { supplier }
    }
}

impl<F, T> Cursor for Generate<F>
    where
        F: FnMut() -> T
{
    type Item = T;

    #[inline]
    fn more(&mut self) -> bool { true }

    #[inline]
    fn take(&mut self) -> Result<T> { Ok((self.supplier)()) }
}

impl<'a, T: 'a> Sequence<'a, T> {
    /// `seed`, then `successor(seed)`, then its successor, and so on.
    ///
    /// ```
    /// # use resequence::Sequence;
    /// let fibonacci = Sequence::recurse((0u64, 1u64), |&(i, j)| (j, i + j))
    ///     .map(|(i, _)| i)
    ///     .ending_at(34);
    ///
    /// assert_eq!(fibonacci.to_vec(), [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
    /// ```
    pub fn recurse<F>(seed: T, successor: F) -> Self
        where
            T: Clone,
            F: Fn(&T) -> T + 'a
    {
        let successor = Rc::new(successor);
        Self::from_cursors(move || {
            let successor = Rc::clone(&successor);
            Recursive::new(seed.clone(), move |previous: &T| successor(previous))
        })
    }

    /// Recursion through an intermediate type: yields `f(seed)`, then
    /// `f(g(previous))` for each following element.
    pub fn recurse_with<S, F, G>(seed: S, f: F, g: G) -> Self
        where
            T: Clone,
            S: Clone + 'a,
            F: Fn(S) -> T + 'a,
            G: Fn(&T) -> S + 'a
    {
        let f = Rc::new(f);
        let g = Rc::new(g);
        Self::from_cursors(move || {
            let (f, g) = (Rc::clone(&f), Rc::clone(&g));
            Recursive::new(f(seed.clone()), move |previous: &T| f(g(previous)))
        })
    }

    /// Elements drawn from one shared `supplier`.
    ///
    /// Every traversal draws from the same supplier, so a second traversal
    /// continues where the first stopped. Use
    /// [`multi_generate`](Sequence::multi_generate) for independent
    /// traversals.
    pub fn generate<F>(supplier: F) -> Self
        where
            F: FnMut() -> T + 'a
    {
        let supplier = Rc::new(RefCell::new(supplier));
        Self::from_cursors(move || {
            let supplier = Rc::clone(&supplier);
            Generate::new(move || (&mut *supplier.borrow_mut())())
        })
    }

    /// Elements drawn from a fresh supplier per traversal, as made by
    /// `suppliers`.
    pub fn multi_generate<F, G>(suppliers: G) -> Self
        where
            G: Fn() -> F + 'a,
            F: FnMut() -> T + 'a
    {
        Self::from_cursors(move || Generate::new(suppliers()))
    }

    /// `start`, `start + step`, `start + step + step`, and so on.
    pub fn stepping_from(start: T, step: T) -> Self
        where
            T: Add<Output = T> + Clone
    {
        Self::recurse(start, move |previous| previous.clone() + step.clone())
    }
}

#[cfg(feature = "random")]
mod random {
    use std::rc::Rc;
    use rand::{
        distributions::{uniform::SampleUniform, Distribution, Standard, Uniform},
        rngs::StdRng,
        Rng,
        SeedableRng
    };
    use crate::sequence::Sequence;

    impl<'a, T: 'a> Sequence<'a, T> {
        /// Random values from the [`Standard`] distribution (floats in
        /// `[0, 1)`), with a freshly seeded generator per traversal.
        pub fn random() -> Self
            where
                Standard: Distribution<T>
        {
            Self::random_from(StdRng::from_entropy)
        }

        /// Random values from the [`Standard`] distribution, with a generator
        /// made by `rngs` per traversal.
        ///
        /// ```
        /// # use resequence::Sequence;
        /// use rand::{rngs::StdRng, SeedableRng};
        ///
        /// let dice = Sequence::<u32>::random_from(|| StdRng::seed_from_u64(7)).map(|n| n % 6 + 1);
        /// assert_eq!(dice.limit(5).to_vec(), dice.limit(5).to_vec());
        /// ```
        pub fn random_from<R, F>(rngs: F) -> Self
            where
                F: Fn() -> R + 'a,
                R: Rng + 'a,
                Standard: Distribution<T>
        {
            Self::multi_generate(move || {
                let mut rng = rngs();
                move || rng.gen::<T>()
            })
        }

        /// Random values uniformly distributed over `[low, high)`, with a
        /// generator made by `rngs` per traversal.
        ///
        /// # Panics
        ///
        /// If `low >= high`.
        pub fn random_range<R, F>(rngs: F, low: T, high: T) -> Self
            where
                T: SampleUniform + PartialOrd,
                F: Fn() -> R + 'a,
                R: Rng + 'a
        {
            assert!(low < high, "random range must not be empty");
            let uniform = Rc::new(Uniform::new(low, high));
            Self::multi_generate(move || {
                let mut rng = rngs();
                let uniform = Rc::clone(&uniform);
                move || uniform.sample(&mut rng)
            })
        }
    }
}

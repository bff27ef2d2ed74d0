//! Errors raised by cursors and sequence operations.
//!
//! Every failure in this crate is a contract violation surfaced synchronously
//! at the call site. None of them are retried internally.

/// The error type for cursor and sequence operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// [`take`] was called on a cursor whose [`more`] would return `false`.
    ///
    /// Always recoverable by checking [`more`] first.
    ///
    /// [`take`]: crate::Cursor::take
    /// [`more`]: crate::Cursor::more
    #[error("the cursor has no more elements")]
    Exhausted,

    /// A mutating cursor operation was called out of sequence, for example
    /// [`remove_current`] before any [`take`], or twice without a [`take`]
    /// in between.
    ///
    /// [`take`]: crate::Cursor::take
    /// [`remove_current`]: crate::Cursor::remove_current
    #[error("invalid cursor state: {0}")]
    InvalidState(&'static str),

    /// The composed cursor cannot provide the requested capability, such as
    /// removal through an adapter which buffers look-ahead.
    #[error("operation not supported by this cursor: {0}")]
    Unsupported(&'static str),

    /// The backing store was structurally modified by another party while a
    /// cursor over it was active.
    #[error("backing store modified during traversal (expected version {expected}, found {found})")]
    ConcurrentModification {
        /// The store version captured by the cursor.
        expected: u64,
        /// The store version observed on the failing pull.
        found: u64,
    },
}

/// A [`Result`](core::result::Result) defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

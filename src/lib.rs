#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

#[cfg(kani)]
macro_rules! requires {
    ($cond:expr $(, $msg:literal)?) => {
        kani::assert($cond, requires!(@msg $cond $(, $msg)?))
    };
    (@msg $cond:expr, $msg:literal) => {
        $msg
    };
    (@msg $cond:expr) => {
        stringify!($cond)
    };
}

#[cfg(not(kani))]
macro_rules! requires {
    ($cond:expr $(, $msg:literal)?) => {
        debug_assert!($cond $(, $msg)?)
    };
}

pub mod adapters;
pub mod compose;
pub mod cursor;
pub mod error;
pub mod generate;
pub mod sequence;
pub mod store;

pub use cursor::{BoxCursor, Cursor, Empty, IterCursor, Traversal};
pub use error::{Error, Result};
pub use sequence::{near, Mode, Sequence};
pub use store::{SharedVec, SliceCursor, StoreCursor};

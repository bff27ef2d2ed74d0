//! Cursor adapters.
//!
//! Each adapter wraps a parent [`Cursor`](crate::Cursor) obtained fresh for a
//! single traversal. None of them cache parent cursors; a
//! [`Sequence`](crate::Sequence) builds a new adapter stack every time it is
//! traversed.

pub mod distinct;
pub mod flatten;
pub mod peeking;
pub mod reorder;
pub mod stateless;
pub mod tail;
pub mod terminal;
pub mod window;

pub use distinct::Distinct;
pub use flatten::FlatMap;
pub use peeking::{BackPeeking, ForwardPeeking};
pub use reorder::{Order, Reorder};
pub use stateless::{FilterMap, Filter, Inspect, InspectIndexed, Limit, Map, MapIndexed, Skip, Step};
pub use tail::{LimitTail, SkipTail};
pub use terminal::{EndingAt, StartingFrom, Until};
pub use window::{PredicateBatch, Split, Window};

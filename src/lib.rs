// Gap-compressed sparse bitmap over u32 positions: (gap, word) pair
// encoding, merge-driven and skip-driven set algebra, and size-ordered
// multi-way aggregation.

pub mod aggregate;
mod bit_iter;
mod bitmap;
mod error;
mod int_buf;
pub mod intersect;
pub mod merge;
mod skippable;

pub use bit_iter::BitIter;
pub use bitmap::SparseBitmap;
pub use error::{Error, Result};
pub use int_buf::IntBuf;
pub use skippable::{SkippableIterator, WordCursor};

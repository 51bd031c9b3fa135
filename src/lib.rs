//! A double-ended queue stored in a directory of fixed-size blocks.
//!
//! [`Deque`] keeps its elements in blocks of [`BLOCK_CAPACITY`] slots. A directory of block
//! handles plus the position of the first element is enough to find any element in O(1), and
//! both ends push and pop in amortized O(1). When an end runs out of slots the directory is
//! replaced by one [`GROWTH_FACTOR`] times as large and the elements are recentered into its
//! middle third, so the other end keeps its room.
//!
//! ```
//! use blockdeque::{deque, Deque};
//! let mut queue: Deque<i32> = deque![2, 3];
//! queue.push_front(1);
//! queue.push_back(4);
//! assert_eq!(queue, [1, 2, 3, 4][..]);
//! assert!(queue.get_checked(4).is_err());
//! ```
//!
//! Blocks come from an [`Allocator`]; [`Global`] is the default. With the `serde` feature,
//! deques serialize as sequences.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod alloc;
mod deque;
mod directory;
mod error;
mod growth;
mod iter;
pub mod settings;

#[cfg(test)]
mod property_tests;

pub use crate::alloc::{Allocator, Global};
pub use crate::deque::Deque;
pub use crate::error::{AllocError, RangeError};
pub use crate::iter::{Cursor, CursorMut, IntoIter, Iter, IterMut};
pub use crate::settings::{BackToFront, DropBehavior, FrontToBack, BLOCK_CAPACITY, GROWTH_FACTOR};

/// Creates a [`Deque`] containing the arguments, like [`vec!`].
///
/// ```
/// # use blockdeque::{Deque, deque};
/// let empty: Deque<i32> = deque![];
/// assert_eq!(empty.capacity(), 0);
///
/// let filled = deque![7; 12];
/// assert_eq!(filled.len(), 12);
/// assert_eq!(filled.block_count(), 2);
///
/// let listed = deque![1, 2, 3];
/// assert_eq!(listed, [1, 2, 3][..]);
/// ```
#[macro_export]
macro_rules! deque {
    () => {
        $crate::Deque::<_>::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Deque::<_>::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Deque::<_>::from(vec![$($x),+])
    };
}

//! Error types returned by fallible [`Deque`](crate::Deque) operations.

use std::alloc::Layout;
use std::fmt;

/// Checked access was attempted at an index that is not below the deque's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeError {
    /// The index that was requested.
    pub index: usize,
    /// Length of the deque at the time of the request.
    pub len: usize,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} out of range for deque of length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for RangeError {}

/// Storage for the block directory could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested number of slots does not fit in `isize::MAX` bytes.
    CapacityOverflow,
    /// The allocator returned no memory for `layout`.
    OutOfMemory { layout: Layout },
}

impl AllocError {
    /// Diverges the way the infallible operations report allocation failure:
    /// a panic for overflow, [`handle_alloc_error`](std::alloc::handle_alloc_error) otherwise.
    pub(crate) fn handle(self) -> ! {
        match self {
            AllocError::CapacityOverflow => panic!("capacity overflow"),
            AllocError::OutOfMemory { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow => f.write_str("capacity overflow"),
            AllocError::OutOfMemory { layout } => write!(
                f,
                "memory allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl std::error::Error for AllocError {}

//! Block storage: the outer directory of fixed-size blocks, the head descriptor, and the
//! mapping from a logical index to a physical slot.
//!
//! Every block reachable from a directory is allocated with room for [`BLOCK_CAPACITY`]
//! elements. Which of its slots hold live values is never recorded here; the owning deque
//! derives it from its [`Head`] and length.

use crate::settings::BLOCK_CAPACITY;
use crate::{AllocError, Allocator};
use std::alloc::Layout;
use std::ptr::NonNull;

/// A handle to one block of `BLOCK_CAPACITY` slots. Owned by the [`Directory`] that allocated it.
#[repr(transparent)]
pub(crate) struct Block<T> {
    ptr: NonNull<T>,
}

impl<T> Clone for Block<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Block<T> {}

impl<T> Block<T> {
    #[inline]
    fn layout() -> Result<Layout, AllocError> {
        Layout::array::<T>(BLOCK_CAPACITY).map_err(|_| AllocError::CapacityOverflow)
    }

    fn allocate<A: Allocator>(alloc: &A) -> Result<Self, AllocError> {
        if std::mem::size_of::<T>() == 0 {
            return Ok(Block {
                ptr: NonNull::dangling(),
            });
        }
        let layout = Self::layout()?;
        let ptr = alloc.allocate(layout).inspect_err(|_| {
            log::error!("failed to allocate a block of {} bytes", layout.size());
        })?;
        Ok(Block { ptr: ptr.cast() })
    }

    /// # Safety
    /// The block must have come from `alloc` (or an equivalent allocator) and hold no live values.
    unsafe fn deallocate<A: Allocator>(self, alloc: &A) {
        if std::mem::size_of::<T>() == 0 {
            return;
        }
        // the layout was valid when the block was allocated
        if let Ok(layout) = Self::layout() {
            alloc.deallocate(self.ptr.cast(), layout);
        }
    }

    /// Pointer to slot `offset`. The slot may be uninitialized.
    #[inline]
    pub(crate) fn slot(self, offset: usize) -> *mut T {
        debug_assert!(offset < BLOCK_CAPACITY);
        // SAFETY: offset is within the block's allocation
        unsafe { self.ptr.as_ptr().add(offset) }
    }
}

/// Identifies the slot of logical index 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Head {
    /// Index of the first element's block in the directory.
    pub(crate) block: usize,
    /// Slot of the first element within that block.
    pub(crate) offset: usize,
}

impl Head {
    /// The head whose first element sits at absolute slot `position` of a directory.
    #[inline]
    pub(crate) const fn at(position: usize) -> Self {
        Head {
            block: position / BLOCK_CAPACITY,
            offset: position % BLOCK_CAPACITY,
        }
    }

    /// Absolute slot of the first element, counting from the directory's first block.
    #[inline]
    pub(crate) const fn position(self) -> usize {
        self.block * BLOCK_CAPACITY + self.offset
    }

    /// Maps logical `index` to its `(block, offset)` pair.
    /// The offset carries into the following blocks rather than running past the end of the
    /// head's block.
    #[inline]
    pub(crate) const fn locate(self, index: usize) -> (usize, usize) {
        let carried = self.offset + index;
        (
            self.block + carried / BLOCK_CAPACITY,
            carried % BLOCK_CAPACITY,
        )
    }

    /// Moves the head one slot towards the front.
    /// Must not be called on the first slot of the directory.
    #[inline]
    pub(crate) fn retreat(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
        } else {
            debug_assert!(self.block > 0, "head retreated past the directory");
            self.block -= 1;
            self.offset = BLOCK_CAPACITY - 1;
        }
    }

    /// Moves the head one slot towards the back.
    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.offset == BLOCK_CAPACITY - 1 {
            self.block += 1;
            self.offset = 0;
        } else {
            self.offset += 1;
        }
    }
}

/// The outer directory: an ordered collection of owned blocks.
/// Either empty (nothing allocated) or every entry holds an allocated block.
pub(crate) struct Directory<T> {
    blocks: Vec<Block<T>>,
}

impl<T> Directory<T> {
    pub(crate) const fn null() -> Self {
        Directory { blocks: Vec::new() }
    }

    /// Allocates a directory of `outer_size` blocks. Either every block is allocated or,
    /// on failure, the blocks obtained so far are handed back and nothing is held.
    pub(crate) fn allocate<A: Allocator>(outer_size: usize, alloc: &A) -> Result<Self, AllocError> {
        outer_size
            .checked_mul(BLOCK_CAPACITY)
            .filter(|&slots| slots <= isize::MAX as usize)
            .ok_or(AllocError::CapacityOverflow)?;
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(outer_size)
            .map_err(|_| AllocError::CapacityOverflow)?;
        for _ in 0..outer_size {
            match Block::allocate(alloc) {
                Ok(block) => blocks.push(block),
                Err(err) => {
                    for block in blocks.drain(..) {
                        // SAFETY: freshly allocated from `alloc`, holds nothing
                        unsafe { block.deallocate(alloc) };
                    }
                    log::error!("failed to allocate a directory of {outer_size} blocks");
                    return Err(err);
                }
            }
        }
        Ok(Directory { blocks })
    }

    /// Hands every block back to `alloc`, leaving the directory null.
    ///
    /// # Safety
    /// No block may hold a live value, and the blocks must have come from `alloc`
    /// or an equivalent allocator.
    pub(crate) unsafe fn release<A: Allocator>(&mut self, alloc: &A) {
        for block in self.blocks.drain(..) {
            block.deallocate(alloc);
        }
        self.blocks = Vec::new();
    }

    #[inline]
    pub(crate) fn is_null(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub(crate) fn outer_size(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of slots across all blocks.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.blocks.len() * BLOCK_CAPACITY
    }

    #[inline]
    pub(crate) fn blocks(&self) -> &[Block<T>] {
        &self.blocks
    }

    /// Pointer to the slot of logical `index` relative to `head`.
    /// The slot must lie inside the directory; it may be uninitialized.
    #[inline]
    pub(crate) fn slot(&self, head: Head, index: usize) -> *mut T {
        slot_in(&self.blocks, head, index)
    }

    /// Moves `count` values from absolute slot `src` to absolute slot `dst`, one slot at a
    /// time, in the order that never overwrites a value before it has been moved.
    ///
    /// # Safety
    /// Both ranges must lie inside the directory and the source range must be initialized.
    /// Source slots outside the destination range are left logically uninitialized.
    pub(crate) unsafe fn shift(&self, src: usize, dst: usize, count: usize) {
        let (from, to) = (Head::at(src), Head::at(dst));
        let step = |i: usize| {
            std::ptr::copy_nonoverlapping(self.slot(from, i), self.slot(to, i), 1)
        };
        if dst > src {
            (0..count).rev().for_each(step);
        } else if dst < src {
            (0..count).for_each(step);
        }
    }
}

/// Pointer to the slot of logical `index` in `blocks`, relative to `head`.
#[inline]
pub(crate) fn slot_in<T>(blocks: &[Block<T>], head: Head, index: usize) -> *mut T {
    let (block, offset) = head.locate(index);
    debug_assert!(block < blocks.len(), "slot outside of the directory");
    // SAFETY: callers only ask for slots inside the directory
    unsafe { blocks.get_unchecked(block).slot(offset) }
}

/// Moves `len` values from `src` (starting at `src_head`) into `dst` (starting at `dst_head`),
/// one contiguous run at a time.
///
/// # Safety
/// The source range must be initialized, the destination range uninitialized, both inside
/// their directories, and the two directories distinct. The source slots are left logically
/// uninitialized.
pub(crate) unsafe fn relocate<T>(
    src: &Directory<T>,
    src_head: Head,
    dst: &Directory<T>,
    dst_head: Head,
    len: usize,
) {
    let mut moved = 0;
    while moved < len {
        let (_, src_offset) = src_head.locate(moved);
        let (_, dst_offset) = dst_head.locate(moved);
        let run = (BLOCK_CAPACITY - src_offset)
            .min(BLOCK_CAPACITY - dst_offset)
            .min(len - moved);
        std::ptr::copy_nonoverlapping(
            src.slot(src_head, moved),
            dst.slot(dst_head, moved),
            run,
        );
        moved += run;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::test_alloc::Counting;
    use crate::Global;

    #[test]
    fn locate_within_head_block() {
        let head = Head { block: 2, offset: 3 };
        assert_eq!(head.locate(0), (2, 3));
        assert_eq!(head.locate(6), (2, 9));
    }

    #[test]
    fn locate_carries_into_next_block() {
        let head = Head { block: 2, offset: 3 };
        // just past the end of the head's block
        assert_eq!(head.locate(7), (3, 0));
        assert_eq!(head.locate(8), (3, 1));
        // many blocks later
        assert_eq!(head.locate(7 + 5 * BLOCK_CAPACITY), (8, 0));
        assert_eq!(head.locate(6 + 5 * BLOCK_CAPACITY), (7, 9));
    }

    #[test]
    fn locate_from_last_slot() {
        let head = Head {
            block: 0,
            offset: BLOCK_CAPACITY - 1,
        };
        assert_eq!(head.locate(0), (0, BLOCK_CAPACITY - 1));
        assert_eq!(head.locate(1), (1, 0));
        assert_eq!(head.locate(BLOCK_CAPACITY), (1, BLOCK_CAPACITY - 1));
    }

    #[test]
    fn head_position_round_trips() {
        for position in [0, 1, 9, 10, 11, 57, 300] {
            assert_eq!(Head::at(position).position(), position);
        }
    }

    #[test]
    fn head_retreat_and_advance_cross_blocks() {
        let mut head = Head { block: 1, offset: 0 };
        head.retreat();
        assert_eq!(head, Head { block: 0, offset: 9 });
        head.advance();
        assert_eq!(head, Head { block: 1, offset: 0 });
        head.advance();
        assert_eq!(head, Head { block: 1, offset: 1 });
    }

    #[test]
    fn allocate_and_release() {
        let alloc = Counting::new(0);
        let mut directory = Directory::<u32>::allocate(4, &alloc).unwrap();
        assert_eq!(directory.outer_size(), 4);
        assert_eq!(directory.capacity(), 40);
        assert_eq!(alloc.live(), 4);
        unsafe { directory.release(&alloc) };
        assert!(directory.is_null());
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn failed_allocation_holds_nothing() {
        let alloc = Counting::new(0);
        alloc.fail_after(2);
        let result = Directory::<u32>::allocate(5, &alloc);
        assert!(matches!(result, Err(AllocError::OutOfMemory { .. })));
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn zero_sized_blocks_do_not_allocate() {
        let alloc = Counting::new(0);
        let mut directory = Directory::<()>::allocate(3, &alloc).unwrap();
        assert_eq!(alloc.live(), 0);
        unsafe { directory.release(&alloc) };
    }

    #[test]
    fn shift_overlapping_ranges_both_ways() {
        let mut directory = Directory::<usize>::allocate(4, &Global).unwrap();
        unsafe {
            for i in 0..13 {
                directory.slot(Head::at(25), i).write(i);
            }
            // towards the front, overlapping and crossing two block boundaries
            directory.shift(25, 8, 13);
            for i in 0..13 {
                assert_eq!(directory.slot(Head::at(8), i).read(), i);
            }
            // towards the back, overlapping
            directory.shift(8, 14, 13);
            for i in 0..13 {
                assert_eq!(directory.slot(Head::at(14), i).read(), i);
            }
            directory.release(&Global);
        }
    }

    #[test]
    fn relocate_across_misaligned_heads() {
        let src = Directory::<usize>::allocate(3, &Global).unwrap();
        let dst = Directory::<usize>::allocate(4, &Global).unwrap();
        let src_head = Head { block: 0, offset: 7 };
        let dst_head = Head { block: 1, offset: 2 };
        let len = 21;
        unsafe {
            for i in 0..len {
                src.slot(src_head, i).write(i * 3);
            }
            relocate(&src, src_head, &dst, dst_head, len);
            for i in 0..len {
                assert_eq!(dst.slot(dst_head, i).read(), i * 3);
            }
        }
        let (mut src, mut dst) = (src, dst);
        unsafe {
            src.release(&Global);
            dst.release(&Global);
        }
    }
}

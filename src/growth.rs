//! Directory growth for [`Deque`].
//!
//! When an end has no free slot left, the live elements are recentered into the middle third
//! of a directory sized for them: [`GROWTH_FACTOR`] times the blocks needed to hold the live
//! elements (more, if a large reservation asks for it). The end that ran out gets the free
//! slots of the middle third plus its outer third; the other end keeps a full third, so
//! turning around right after a growth does not immediately grow again.
//!
//! If the current directory is already at least that large, the elements are shifted within
//! it and nothing is allocated. A deque used as a rotating queue therefore keeps a directory
//! proportional to its length, not to the number of operations it has seen.

use crate::directory::{relocate, Directory, Head};
use crate::settings::{blocks_for, End, BLOCK_CAPACITY, GROWTH_FACTOR};
use crate::{AllocError, Allocator, Deque, DropBehavior};

impl<T, A, D> Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    /// Makes room for at least `additional` more elements at `end`.
    ///
    /// A new directory is fully allocated before anything is moved, so on error the deque is
    /// left exactly as it was. The old blocks are released only once every element has been
    /// moved out of them.
    pub(crate) fn grow(&mut self, end: End, additional: usize) -> Result<(), AllocError> {
        let old_outer = self.directory.outer_size();
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        // a third holds the live elements, and two thirds hold everything that is needed
        let span = blocks_for(self.len).max(blocks_for(needed.div_ceil(2))).max(1);
        let new_outer = span
            .checked_mul(GROWTH_FACTOR)
            .ok_or(AllocError::CapacityOverflow)?;

        if new_outer <= old_outer {
            let start = self.recentered_start(end, old_outer);
            // SAFETY: both ranges lie inside the directory and only the live range is initialized
            unsafe { self.directory.shift(self.head.position(), start, self.len) };
            self.head = Head::at(start);
            log::trace!(
                "deque recentered within {old_outer} blocks for {additional} more at the {end:?}"
            );
            return Ok(());
        }

        let fresh = Directory::allocate(new_outer, &self.alloc)?;
        let head = Head::at(self.recentered_start(end, new_outer));
        // SAFETY: the live range fits in the middle third of `fresh`, which holds nothing yet
        unsafe { relocate(&self.directory, self.head, &fresh, head, self.len) };
        let mut old = std::mem::replace(&mut self.directory, fresh);
        // SAFETY: every element has been moved out of the old blocks
        unsafe { old.release(&self.alloc) };
        self.head = head;

        log::trace!(
            "deque directory grew from {old_outer} to {new_outer} blocks \
             for {additional} more at the {end:?}"
        );
        Ok(())
    }

    /// Where the first element goes when recentering into a directory of `outer` blocks.
    /// Under back pressure the elements start where the middle third starts; under front
    /// pressure they end where it ends.
    fn recentered_start(&self, end: End, outer: usize) -> usize {
        let third = outer * BLOCK_CAPACITY / GROWTH_FACTOR;
        match end {
            End::Back => third,
            End::Front => 2 * third - self.len,
        }
    }

    /// Replaces the storage of an empty deque with exactly enough blocks for `len` elements,
    /// starting at the first slot.
    pub(crate) fn allocate_exact(&mut self, len: usize) -> Result<(), AllocError> {
        debug_assert_eq!(self.len, 0);
        let fresh = Directory::allocate(blocks_for(len), &self.alloc)?;
        let mut old = std::mem::replace(&mut self.directory, fresh);
        // SAFETY: the deque is empty
        unsafe { old.release(&self.alloc) };
        self.head = Head::default();
        Ok(())
    }

    /// Makes sure at least `additional` elements can be pushed to the back without growing.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the larger directory cannot be allocated; the deque is
    /// unchanged in that case.
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::from_elem(4, 0);
    /// deque.try_reserve_back(100).unwrap();
    /// assert!(deque.space_back() >= 100);
    /// assert_eq!(deque, [0, 0, 0, 0][..]);
    /// ```
    #[inline]
    pub fn try_reserve_back(&mut self, additional: usize) -> Result<(), AllocError> {
        if self.space_back() >= additional {
            return Ok(());
        }
        self.grow(End::Back, additional)
    }

    /// Makes sure at least `additional` elements can be pushed to the front without growing.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the larger directory cannot be allocated; the deque is
    /// unchanged in that case.
    #[inline]
    pub fn try_reserve_front(&mut self, additional: usize) -> Result<(), AllocError> {
        if self.space_front() >= additional {
            return Ok(());
        }
        self.grow(End::Front, additional)
    }

    /// Makes sure at least `additional` elements can be pushed to the back without growing.
    ///
    /// # Panics
    /// Panics if the capacity overflows; aborts through
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) if allocation fails.
    #[inline]
    pub fn reserve_back(&mut self, additional: usize) {
        self.try_reserve_back(additional)
            .unwrap_or_else(|err| err.handle());
    }

    /// Makes sure at least `additional` elements can be pushed to the front without growing.
    ///
    /// # Panics
    /// Panics if the capacity overflows; aborts through
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::from_elem(2, 'x');
    /// deque.reserve_front(15);
    /// assert!(deque.space_front() >= 15);
    /// ```
    #[inline]
    pub fn reserve_front(&mut self, additional: usize) {
        self.try_reserve_front(additional)
            .unwrap_or_else(|err| err.handle());
    }
}

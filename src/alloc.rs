//! The allocation capability a [`Deque`](crate::Deque) draws its blocks from.

use crate::AllocError;
use std::alloc::Layout;
use std::ptr::NonNull;

/// A source of raw memory for blocks.
///
/// Only the element blocks come from this allocator. The directory's vector of block
/// pointers is small (one pointer per block) and is kept in a `Vec` on the global allocator.
///
/// # Safety
/// `allocate` must return memory that is valid for `layout` until it is passed back to
/// `deallocate` on this allocator or on one it [considers equivalent](Allocator::is_equivalent).
/// Layouts passed in always have a non-zero size.
pub unsafe trait Allocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// # Safety
    /// `ptr` must have been returned by `allocate` with the same `layout`, and not freed since.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Returns true if memory allocated by `self` may be freed by `other` and vice versa.
    /// Deques whose allocators are equivalent can swap their storage in constant time.
    fn is_equivalent(&self, other: &Self) -> bool;
}

/// The global allocator, as used by `Vec` and `Box`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::OutOfMemory { layout })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout);
    }

    #[inline]
    fn is_equivalent(&self, _other: &Self) -> bool {
        true
    }
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    #[inline]
    fn is_equivalent(&self, other: &Self) -> bool {
        (**self).is_equivalent(*other)
    }
}

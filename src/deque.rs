//! A [`Deque`] is a double-ended queue stored in a directory of fixed-size blocks.
//! Its API is similar to [`VecDeque`](std::collections::VecDeque), but the elements never move
//! as a whole when one end fills up: the directory of block handles is regrown instead, and the
//! live elements are recentered so that both ends keep room to grow.

use crate::directory::{Directory, Head};
use crate::iter::{Cursor, CursorMut, IntoIter, Iter, IterMut};
use crate::settings::End;
use crate::{Allocator, BackToFront, DropBehavior, FrontToBack, Global, RangeError};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Index, IndexMut};

/// A double-ended queue with O(1) indexing and amortized O(1) pushes and pops at both ends.
///
/// Elements live in blocks of [`BLOCK_CAPACITY`](crate::BLOCK_CAPACITY) slots. A directory
/// of block handles, plus the block and offset of the first element, locates every element.
/// When an end runs out of slots the directory is replaced by one three times as large and the
/// elements are moved into its middle third, leaving the end that ran out with the most room.
/// Popping never gives blocks back; the freed slots are reused by later pushes.
///
/// # Examples
/// ```
/// use blockdeque::Deque;
/// let mut deque = Deque::new();
/// deque.push_back(2);
/// deque.push_front(1);
/// deque.push_back(3);
/// assert_eq!(deque, [1, 2, 3][..]);
/// ```
///
/// # Drop Order
/// The default drop order is front-to-back, meaning that elements are dropped in the same
/// order as iteration would happen. This can be changed to back-to-front by using the
/// [`BackToFront`] drop order.
pub struct Deque<T, A = Global, D = FrontToBack>
where
    A: Allocator,
    D: DropBehavior,
{
    pub(crate) directory: Directory<T>,
    pub(crate) head: Head,
    pub(crate) len: usize,
    pub(crate) alloc: A,
    pub(crate) drop_order: D,
    _owns: PhantomData<T>,
}

unsafe impl<T: Send, A, D> Send for Deque<T, A, D>
where
    A: Allocator + Send,
    D: DropBehavior,
{
}
unsafe impl<T: Sync, A, D> Sync for Deque<T, A, D>
where
    A: Allocator + Sync,
    D: DropBehavior,
{
}

impl<T: Debug, A, D> Debug for Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Deque<T> {
    /// Creates a new, empty `Deque`. No storage is allocated until the first element arrives.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let deque: Deque<i32> = Deque::new();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), 0);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Deque {
            directory: Directory::null(),
            head: Head { block: 0, offset: 0 },
            len: 0,
            alloc: Global,
            drop_order: FrontToBack,
            _owns: PhantomData,
        }
    }

    /// Creates a `Deque` holding `len` clones of `value`, in exactly as many blocks as needed.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let deque = Deque::from_elem(34, 2);
    /// assert_eq!(deque.len(), 34);
    /// assert_eq!(deque.block_count(), 4);
    /// assert_eq!(deque[33], 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Deque::from_elem_in(len, value, Global)
    }

    /// Creates a `Deque` holding `len` default values.
    #[inline]
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut deque = Deque::new();
        deque.resize_default(len);
        deque
    }

    /// Inverts the drop order of the `Deque` to back-to-front.
    #[inline]
    #[must_use = "This Deque's drop order has been changed. \
                  Please make sure to use the new Deque or drop it explicitly."]
    pub fn as_back_to_front(self) -> Deque<T, Global, BackToFront> {
        self.with_drop_order()
    }
}

impl<T, A, D> Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    /// Creates a new, empty `Deque` that draws its blocks from `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Deque {
            directory: Directory::null(),
            head: Head::default(),
            len: 0,
            alloc,
            drop_order: D::default(),
            _owns: PhantomData,
        }
    }

    /// Creates a `Deque` holding `len` clones of `value`, drawing its blocks from `alloc`.
    ///
    /// If a clone panics, the clones made so far are dropped and the blocks are released
    /// before the panic continues.
    #[must_use]
    pub fn from_elem_in(len: usize, value: T, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut deque = Deque::new_in(alloc);
        deque.resize(len, value);
        deque
    }

    pub(crate) fn from_vec_in(values: Vec<T>, alloc: A) -> Self {
        let mut deque = Deque::new_in(alloc);
        if !values.is_empty() {
            deque
                .allocate_exact(values.len())
                .unwrap_or_else(|err| err.handle());
            deque.fill_back(values.into_iter());
        }
        deque
    }

    /// Changes the drop order of the `Deque` without touching its storage.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// use blockdeque::BackToFront;
    /// let mut deque = Deque::new();
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// let deque = deque.with_drop_order::<BackToFront>();
    /// assert_eq!(deque, [1, 2][..]);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_drop_order<D2>(self) -> Deque<T, A, D2>
    where
        D2: DropBehavior,
    {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the directory and allocator move exactly once
        unsafe {
            Deque {
                directory: std::ptr::read(&this.directory),
                head: this.head,
                len: this.len,
                alloc: std::ptr::read(&this.alloc),
                drop_order: D2::default(),
                _owns: PhantomData,
            }
        }
    }

    /// Returns the allocator the blocks are drawn from.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of elements in the `Deque`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the `Deque` contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::new();
    /// assert!(deque.is_empty());
    ///
    /// deque.push_back(1);
    /// assert!(!deque.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total number of slots across all blocks, occupied or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.directory.capacity()
    }

    /// Returns the number of blocks in the directory.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.directory.outer_size()
    }

    /// Returns the number of elements that can be pushed to the front without growing.
    #[inline]
    pub fn space_front(&self) -> usize {
        self.head.position()
    }

    /// Returns the number of elements that can be pushed to the back without growing.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let deque = Deque::from_elem(3, 1);
    /// assert_eq!(deque.space_front(), 0);
    /// assert_eq!(deque.space_back(), 7);
    /// ```
    #[inline]
    pub fn space_back(&self) -> usize {
        self.directory.capacity() - self.head.position() - self.len
    }

    /// Returns a reference to the element at `index`, or `None` if it is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            // SAFETY: index is in bounds
            Some(unsafe { self.get_unchecked(index) })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at `index`, or `None` if it is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            // SAFETY: index is in bounds
            Some(unsafe { self.get_unchecked_mut(index) })
        } else {
            None
        }
    }

    /// Returns a reference to the element at `index`, or a [`RangeError`] if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::{Deque, RangeError};
    /// let mut deque = Deque::from_elem(3, 7);
    /// assert_eq!(deque.get_checked(2), Ok(&7));
    /// assert_eq!(deque.get_checked(3), Err(RangeError { index: 3, len: 3 }));
    /// ```
    #[inline]
    pub fn get_checked(&self, index: usize) -> Result<&T, RangeError> {
        self.get(index).ok_or(RangeError {
            index,
            len: self.len,
        })
    }

    /// Mutable form of [`get_checked`](Deque::get_checked).
    #[inline]
    pub fn get_checked_mut(&mut self, index: usize) -> Result<&mut T, RangeError> {
        let len = self.len;
        self.get_mut(index).ok_or(RangeError { index, len })
    }

    /// Returns a reference to the element at `index` without any bounds check.
    ///
    /// # Safety
    /// `index` must be less than `len()`. An index past the end is undefined behavior even
    /// when it lands inside an allocated block; debug builds assert on it.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index out of bounds");
        &*self.directory.slot(self.head, index)
    }

    /// Mutable form of [`get_unchecked`](Deque::get_unchecked).
    ///
    /// # Safety
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index out of bounds");
        &mut *self.directory.slot(self.head, index)
    }

    /// Returns the first element, or `None` if the `Deque` is empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns the last element, or `None` if the `Deque` is empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        let last = self.len.checked_sub(1)?;
        self.get(last)
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let last = self.len.checked_sub(1)?;
        self.get_mut(last)
    }

    /// Appends an element to the back of the `Deque`.
    ///
    /// An empty `Deque` without storage gets a single block. Otherwise the element goes into
    /// the free slot after the last element, growing the directory first if there is none.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::from_elem(3, 1);
    /// deque.push_back(4);
    /// deque.push_back(5);
    /// assert_eq!(deque.len(), 5);
    /// assert_eq!(deque[3], 4);
    /// assert_eq!(deque[4], 5);
    /// ```
    #[inline]
    pub fn push_back(&mut self, value: T) {
        if self.directory.is_null() {
            self.allocate_exact(1).unwrap_or_else(|err| err.handle());
        } else if self.space_back() == 0 {
            self.grow(End::Back, 1).unwrap_or_else(|err| err.handle());
        }
        // SAFETY: the slot after the last element is allocated and free
        unsafe { self.directory.slot(self.head, self.len).write(value) };
        self.len += 1;
    }

    /// Prepends an element to the front of the `Deque`.
    ///
    /// The head moves back one slot within its block, or to the last slot of the previous
    /// block. Only when the head is on the first slot of the directory does it grow.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::new();
    /// deque.push_front(4);
    /// deque.push_front(5);
    /// assert_eq!(deque[0], 5);
    /// assert_eq!(deque[1], 4);
    /// ```
    #[inline]
    pub fn push_front(&mut self, value: T) {
        if self.len == 0 {
            // with nothing stored, both ends are the same slot
            self.push_back(value);
            return;
        }
        if self.space_front() == 0 {
            self.grow(End::Front, 1).unwrap_or_else(|err| err.handle());
        }
        self.head.retreat();
        // SAFETY: the slot before the old first element is allocated and free
        unsafe { self.directory.slot(self.head, 0).write(value) };
        self.len += 1;
    }

    /// Removes the last element and returns it, or `None` if the `Deque` is empty.
    /// The vacated slot stays allocated.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque: Deque<i32> = Deque::from([42, 10]);
    /// assert_eq!(deque.pop_back(), Some(10));
    /// assert_eq!(deque.pop_back(), Some(42));
    /// assert_eq!(deque.pop_back(), None);
    /// ```
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot held the last live element
        Some(unsafe { self.directory.slot(self.head, self.len).read() })
    }

    /// Removes the first element and returns it, or `None` if the `Deque` is empty.
    /// The head moves to the next slot, or to the start of the next block; no block is released.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque: Deque<i32> = Deque::from([42, 10]);
    /// assert_eq!(deque.pop_front(), Some(42));
    /// assert_eq!(deque.pop_front(), Some(10));
    /// assert_eq!(deque.pop_front(), None);
    /// ```
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: the slot held the first live element
        let value = unsafe { self.directory.slot(self.head, 0).read() };
        self.len -= 1;
        self.head.advance();
        if self.head.block == self.directory.outer_size() {
            // the very last slot was vacated; keep the head inside the directory
            self.head = Head::at(self.directory.capacity() / 2);
        }
        Some(value)
    }

    /// Removes all elements, dropping them in the order given by the drop order.
    /// The blocks stay allocated.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::from_elem(23, 23);
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.block_count(), 3);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        while (if D::IS_INVERTED {
            self.pop_back()
        } else {
            self.pop_front()
        })
        .is_some()
        {
            // drop the element
        }
    }

    /// Shortens the `Deque` to `len` elements, dropping the rest from the back.
    /// Has no effect if `len` is not less than the current length.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            drop(self.pop_back());
        }
    }

    /// Resizes the `Deque` to `new_len`, filling new slots at the back with clones of `value`.
    ///
    /// Shrinking drops trailing elements and keeps the blocks. Resizing an empty `Deque` replaces
    /// its storage with exactly enough blocks for `new_len` elements, even if it had more. Growing
    /// a non-empty `Deque` uses the free slots at the back when there are enough; otherwise the
    /// directory grows first.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque = Deque::from_elem(5, 0);
    /// deque.resize(25, 0);
    /// assert_eq!(deque.len(), 25);
    /// assert_eq!(deque[24], 0);
    /// deque.resize(2, 0);
    /// assert_eq!(deque, [0, 0][..]);
    /// ```
    #[inline]
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone())
    }

    /// Resizes the `Deque` to `new_len`, filling new slots with `T::default()`.
    #[inline]
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Resizes the `Deque` to `new_len`, filling new slots with values returned by `f`.
    ///
    /// If `f` panics, the values it produced during this call are dropped and the length is
    /// restored before the panic continues.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if new_len == self.len {
            return;
        }
        if new_len == 0 {
            self.clear();
            return;
        }
        if self.len == 0 {
            self.allocate_exact(new_len)
                .unwrap_or_else(|err| err.handle());
            self.fill_back(std::iter::repeat_with(f).take(new_len));
            return;
        }
        if new_len < self.len {
            self.truncate(new_len);
            return;
        }
        let additional = new_len - self.len;
        if additional <= self.space_back() {
            self.fill_back(std::iter::repeat_with(f).take(additional));
        } else {
            self.grow(End::Back, additional)
                .unwrap_or_else(|err| err.handle());
            // the back now has room, so this call fills in place
            self.resize_with(new_len, f);
        }
    }

    /// Inserts an element at position `index`, shifting the elements on the shorter side of
    /// `index` by one slot.
    ///
    /// # Panics
    /// Panics if `index > len`.
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque: Deque<i32> = Deque::from([1, 2, 4, 5]);
    /// deque.insert(2, 3);
    /// assert_eq!(deque, [1, 2, 3, 4, 5][..]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        assert!(index <= self.len, "index out of bounds");
        if index == self.len {
            self.push_back(value);
            return;
        }
        if index == 0 {
            self.push_front(value);
            return;
        }
        if index >= self.len / 2 {
            if self.space_back() == 0 {
                self.grow(End::Back, 1).unwrap_or_else(|err| err.handle());
            }
            // SAFETY: one free slot exists after the last element
            unsafe {
                self.shift(index, index + 1, self.len - index);
                self.directory.slot(self.head, index).write(value);
            }
        } else {
            if self.space_front() == 0 {
                self.grow(End::Front, 1).unwrap_or_else(|err| err.handle());
            }
            self.head.retreat();
            // SAFETY: the new first slot is free; the old prefix now sits at 1..=index
            unsafe {
                self.shift(1, 0, index);
                self.directory.slot(self.head, index).write(value);
            }
        }
        self.len += 1;
    }

    /// Removes and returns the element at `index`, closing the gap from the shorter side.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut deque: Deque<i32> = Deque::from([1, 2, 3]);
    /// assert_eq!(deque.remove(1), 2);
    /// assert_eq!(deque, [1, 3][..]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "index out of bounds");
        // SAFETY: index is in bounds; the value is read out before its slot is overwritten
        unsafe {
            let value = self.directory.slot(self.head, index).read();
            if index < self.len / 2 {
                self.shift(0, 1, index);
                self.head.advance();
            } else {
                self.shift(index + 1, index, self.len - index - 1);
            }
            self.len -= 1;
            value
        }
    }

    /// Moves `count` values from logical index `src` to logical index `dst`.
    ///
    /// # Safety
    /// Both ranges must lie inside the directory and the source range must be initialized.
    unsafe fn shift(&mut self, src: usize, dst: usize, count: usize) {
        let base = self.head.position();
        self.directory.shift(base + src, base + dst, count);
    }

    /// Swaps the contents of two deques.
    ///
    /// When the allocators are [equivalent](Allocator::is_equivalent) only the storage handles
    /// are exchanged, in O(1). Otherwise each deque must keep the blocks of its own allocator,
    /// so the elements are moved three ways (`self` into a temporary, `other` into `self`, the
    /// temporary into `other`), which is O(n) in both lengths.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let mut a = Deque::from_elem(2, 1);
    /// let mut b = Deque::from_elem(3, 2);
    /// a.swap(&mut b);
    /// assert_eq!(a, [2, 2, 2][..]);
    /// assert_eq!(b, [1, 1][..]);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        if self.alloc.is_equivalent(&other.alloc) {
            std::mem::swap(&mut self.directory, &mut other.directory);
            std::mem::swap(&mut self.head, &mut other.head);
            std::mem::swap(&mut self.len, &mut other.len);
        } else {
            let temporary = self.take_all();
            let theirs = other.take_all();
            self.refill(theirs);
            other.refill(temporary);
        }
    }

    /// Moves every element out, front to back, keeping the blocks.
    fn take_all(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        while let Some(value) = self.pop_front() {
            values.push(value);
        }
        values
    }

    /// Moves `values` into an empty `Deque`, keeping its blocks if they are enough.
    fn refill(&mut self, values: Vec<T>) {
        debug_assert!(self.is_empty());
        if values.is_empty() {
            return;
        }
        if self.capacity() < values.len() {
            self.allocate_exact(values.len())
                .unwrap_or_else(|err| err.handle());
        } else {
            self.head = Head::default();
        }
        self.fill_back(values.into_iter());
    }

    /// Replaces the contents with clones of `source`, reusing storage where it can. A source
    /// that is no longer overwrites and truncates. A longer one overwrites and appends into the
    /// free back slots if they suffice; otherwise the storage is replaced by exactly enough.
    fn assign<'s, I>(&mut self, source_len: usize, mut source: I)
    where
        T: Clone + 's,
        I: Iterator<Item = &'s T>,
    {
        if source_len <= self.len {
            for (dst, src) in self.iter_mut().zip(source.by_ref()) {
                dst.clone_from(src);
            }
            self.truncate(source_len);
        } else if source_len <= self.len + self.space_back() {
            for (dst, src) in self.iter_mut().zip(source.by_ref()) {
                dst.clone_from(src);
            }
            self.fill_back(source.cloned());
        } else {
            self.clear();
            self.allocate_exact(source_len)
                .unwrap_or_else(|err| err.handle());
            self.fill_back(source.cloned());
        }
    }

    /// Writes `values` into the free slots after the last element.
    /// The caller guarantees there are enough free slots. If producing a value panics, the
    /// values written by this call are dropped and the length is restored.
    pub(crate) fn fill_back<I>(&mut self, values: I)
    where
        I: Iterator<Item = T>,
    {
        let mut guard = FillGuard {
            restore_len: self.len,
            deque: self,
        };
        for value in values {
            debug_assert!(guard.deque.space_back() > 0);
            let deque = &mut *guard.deque;
            // SAFETY: the slot is free and allocated
            unsafe { deque.directory.slot(deque.head, deque.len).write(value) };
            deque.len += 1;
        }
        std::mem::forget(guard);
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    /// ```
    /// # use blockdeque::Deque;
    /// let deque: Deque<i32> = (0..25).collect();
    /// assert!(deque.iter().copied().eq(0..25));
    /// assert_eq!(deque.iter().rev().next(), Some(&24));
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.directory.blocks(), self.head, self.len)
    }

    /// Returns a front-to-back iterator that allows modifying each element.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.directory.blocks(), self.head, self.len)
    }

    /// Returns a cursor at the first element (or at the end, if empty).
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T, A, D> {
        Cursor::new(self, 0)
    }

    /// Returns a cursor one past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T, A, D> {
        Cursor::new(self, self.len)
    }

    /// Returns a cursor at logical `index`. The index is not checked.
    #[inline]
    pub fn cursor(&self, index: usize) -> Cursor<'_, T, A, D> {
        Cursor::new(self, index)
    }

    /// Returns a mutable cursor at the first element (or at the end, if empty).
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, A, D> {
        CursorMut::new(self, 0)
    }

    /// Returns a mutable cursor one past the last element.
    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T, A, D> {
        let len = self.len;
        CursorMut::new(self, len)
    }

    /// Returns a mutable cursor at logical `index`. The index is not checked.
    #[inline]
    pub fn cursor_mut(&mut self, index: usize) -> CursorMut<'_, T, A, D> {
        CursorMut::new(self, index)
    }
}

/// Drops the values a bulk fill wrote if the fill unwinds, restoring the length it started at.
struct FillGuard<'a, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    deque: &'a mut Deque<T, A, D>,
    restore_len: usize,
}

impl<T, A, D> Drop for FillGuard<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    fn drop(&mut self) {
        while self.deque.len > self.restore_len {
            self.deque.len -= 1;
            // SAFETY: the slot was written by the fill and is dropped exactly once
            let slot = self.deque.directory.slot(self.deque.head, self.deque.len);
            unsafe { std::ptr::drop_in_place(slot) };
        }
    }
}

impl<T, A, D> Default for Deque<T, A, D>
where
    A: Allocator + Default,
    D: DropBehavior,
{
    #[inline]
    fn default() -> Self {
        Deque::new_in(A::default())
    }
}

impl<T, A, D> Drop for Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    fn drop(&mut self) {
        self.clear();
        // SAFETY: every element has been dropped and the blocks came from `self.alloc`
        unsafe { self.directory.release(&self.alloc) };
    }
}

impl<T, A, D> Clone for Deque<T, A, D>
where
    T: Clone,
    A: Allocator + Clone,
    D: DropBehavior,
{
    /// Copies every element into storage sized exactly for them; the source's free slots are
    /// not kept. If a clone panics, the copies made so far are dropped and the new blocks are
    /// released.
    fn clone(&self) -> Self {
        let mut new = Deque::new_in(self.alloc.clone());
        if self.len > 0 {
            new.allocate_exact(self.len)
                .unwrap_or_else(|err| err.handle());
            new.fill_back(self.iter().cloned());
        }
        new
    }

    /// Assigns clones of `source`'s elements, reusing this deque's blocks where possible.
    fn clone_from(&mut self, source: &Self) {
        if std::ptr::eq(self, source) {
            return;
        }
        self.assign(source.len, source.iter());
    }
}

impl<T, A, D> Index<usize> for Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len
            ),
        }
    }
}

impl<T, A, D> IndexMut<usize> for Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T, A, D> IntoIterator for Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    type Item = T;
    type IntoIter = IntoIter<T, A, D>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A, D> IntoIterator for &'a Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A, D> IntoIterator for &'a mut Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A, D> FromIterator<T> for Deque<T, A, D>
where
    A: Allocator + Default,
    D: DropBehavior,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Deque::from_vec_in(iter.into_iter().collect(), A::default())
    }
}

impl<T, A, D> Extend<T> for Deque<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_back(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T, A, D> Extend<&'a T> for Deque<T, A, D>
where
    T: Copy + 'a,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> From<Vec<T>> for Deque<T> {
    #[inline]
    fn from(vec: Vec<T>) -> Self {
        Deque::from_vec_in(vec, Global)
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    #[inline]
    fn from(array: [T; N]) -> Self {
        From::from(Vec::from(array))
    }
}

// partialeq, eq, partialord, ord, and hash implementations
impl<T, A, D> PartialEq for Deque<T, A, D>
where
    T: PartialEq,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, A, D> PartialEq<[T]> for Deque<T, A, D>
where
    T: PartialEq,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, A, D> PartialEq<Vec<T>> for Deque<T, A, D>
where
    T: PartialEq,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl<T, A, D> Eq for Deque<T, A, D>
where
    T: Eq,
    A: Allocator,
    D: DropBehavior,
{
}

impl<T, A, D> PartialOrd for Deque<T, A, D>
where
    T: PartialOrd,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T, A, D> Ord for Deque<T, A, D>
where
    T: Ord,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T, A, D> std::hash::Hash for Deque<T, A, D>
where
    T: std::hash::Hash,
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[doc(hidden)]
pub(crate) mod serde_impls {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    impl<T, A, D> Serialize for Deque<T, A, D>
    where
        T: Serialize,
        A: Allocator,
        D: DropBehavior,
    {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.iter())
        }
    }

    impl<'src, T, A, D> Deserialize<'src> for Deque<T, A, D>
    where
        T: Deserialize<'src>,
        A: Allocator + Default,
        D: DropBehavior,
    {
        #[inline]
        fn deserialize<De: Deserializer<'src>>(deserializer: De) -> Result<Self, De::Error> {
            let vec = <Vec<T> as Deserialize<'src>>::deserialize(deserializer)?;
            Ok(Deque::from_vec_in(vec, A::default()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json;
        #[test]
        fn test_serde() {
            let input_sequences = [(0..37).collect::<Vec<i32>>(), vec![3, 2, 1], vec![]];
            for sequence in input_sequences.iter() {
                let deque = Deque::from(sequence.clone());
                let serialized = serde_json::to_string(&deque).unwrap();
                assert_eq!(serialized, serde_json::to_string(sequence).unwrap());
                let deserialized: Deque<i32> = serde_json::from_str(&serialized).unwrap();
                assert_eq!(deque, deserialized);
            }
        }
    }
}

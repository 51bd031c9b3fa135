//! Iteration over a [`Deque`]: borrowing and owning iterators, and index-based cursors.
//!
//! The iterators walk the blocks directly. The cursors hold a reference to the deque plus a
//! logical index and go through the deque's indexed access on every read, so they behave like
//! random-access positions rather than streams.

use crate::directory::{slot_in, Block, Head};
use crate::{Allocator, Deque, DropBehavior, FrontToBack, Global};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A front-to-back iterator over references to the elements of a [`Deque`].
///
/// Created by [`Deque::iter`].
pub struct Iter<'a, T> {
    blocks: &'a [Block<T>],
    head: Head,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(blocks: &'a [Block<T>], head: Head, len: usize) -> Self {
        Iter {
            blocks,
            head,
            front: 0,
            back: len,
        }
    }
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Iter {
            blocks: self.blocks,
            head: self.head,
            front: self.front,
            back: self.back,
        }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let slot = slot_in(self.blocks, self.head, self.front);
        self.front += 1;
        // SAFETY: every index in front..back is a live element borrowed for 'a
        Some(unsafe { &*slot })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: see `next`
        Some(unsafe { &*slot_in(self.blocks, self.head, self.back) })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// A front-to-back iterator over mutable references to the elements of a [`Deque`].
///
/// Created by [`Deque::iter_mut`].
pub struct IterMut<'a, T> {
    blocks: &'a [Block<T>],
    head: Head,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(blocks: &'a [Block<T>], head: Head, len: usize) -> Self {
        IterMut {
            blocks,
            head,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }
}

unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<T: Debug> Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let remaining = Iter {
            blocks: self.blocks,
            head: self.head,
            front: self.front,
            back: self.back,
        };
        f.debug_tuple("IterMut").field(&remaining.collect::<Vec<_>>()).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let slot = slot_in(self.blocks, self.head, self.front);
        self.front += 1;
        // SAFETY: the deque is mutably borrowed for 'a and each index is yielded once
        Some(unsafe { &mut *slot })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: see `next`
        Some(unsafe { &mut *slot_in(self.blocks, self.head, self.back) })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// An iterator over the elements owned by a [`Deque`]. It pops them from the appropriate side
/// as it goes, and the elements it never reached are dropped along with it.
pub struct IntoIter<T, A = Global, D = FrontToBack>
where
    A: Allocator,
    D: DropBehavior,
{
    deque: Deque<T, A, D>,
}

impl<T, A, D> IntoIter<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    pub(crate) fn new(deque: Deque<T, A, D>) -> Self {
        IntoIter { deque }
    }
}

impl<T: Debug, A, D> Debug for IntoIter<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.deque).finish()
    }
}

impl<T, A, D> Iterator for IntoIter<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len(), Some(self.deque.len()))
    }
}

impl<T, A, D> DoubleEndedIterator for IntoIter<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back()
    }
}

impl<T, A, D> ExactSizeIterator for IntoIter<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn len(&self) -> usize {
        self.deque.len()
    }
}

impl<T, A, D> FusedIterator for IntoIter<T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
}

/// A read-only position in a [`Deque`]: the deque plus a logical index.
///
/// Arithmetic only moves the index and never checks it; a cursor may point anywhere, including
/// one past the last element (see [`Deque::end`]). Reads go through the deque's indexed access,
/// so [`current`](Cursor::current) returns `None` off the ends. Two cursors are equal when they
/// point into the same deque at the same index.
///
/// # Examples
/// ```
/// # use blockdeque::Deque;
/// let deque: Deque<i32> = (0..30).collect();
/// let mut cursor = deque.begin() + 12;
/// assert_eq!(cursor.current(), Some(&12));
/// cursor -= 2;
/// assert_eq!(cursor.current(), Some(&10));
/// assert_eq!(deque.end() - cursor, 20);
/// ```
pub struct Cursor<'a, T, A = Global, D = FrontToBack>
where
    A: Allocator,
    D: DropBehavior,
{
    deque: &'a Deque<T, A, D>,
    index: usize,
}

impl<'a, T, A, D> Cursor<'a, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    pub(crate) fn new(deque: &'a Deque<T, A, D>, index: usize) -> Self {
        Cursor { deque, index }
    }

    /// The logical index the cursor points at.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The element under the cursor, or `None` if the cursor is outside `0..len`.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        self.deque.get(self.index)
    }

    /// The element under the cursor, without checking the index.
    ///
    /// # Safety
    /// The cursor must point at a live element: `index() < len()` of its deque.
    #[inline]
    pub unsafe fn current_unchecked(&self) -> &'a T {
        self.deque.get_unchecked(self.index)
    }

    #[inline]
    pub fn move_next(&mut self) {
        self.index += 1;
    }

    #[inline]
    pub fn move_prev(&mut self) {
        self.index -= 1;
    }
}

impl<T, A, D> Clone for Cursor<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A, D> Copy for Cursor<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
}

impl<T, A, D> Debug for Cursor<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("len", &self.deque.len())
            .finish()
    }
}

impl<T, A, D> PartialEq for Cursor<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.deque, other.deque) && self.index == other.index
    }
}

impl<T, A, D> Eq for Cursor<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
}

/// Cursors into different deques are unordered.
impl<T, A, D> PartialOrd for Cursor<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if std::ptr::eq(self.deque, other.deque) {
            Some(self.index.cmp(&other.index))
        } else {
            None
        }
    }
}

/// The signed distance between two cursors into the same deque.
impl<'a, T, A, D> Sub for Cursor<'a, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    type Output = isize;

    #[inline]
    fn sub(self, rhs: Self) -> isize {
        debug_assert!(std::ptr::eq(self.deque, rhs.deque), "cursors into different deques");
        self.index as isize - rhs.index as isize
    }
}

/// A position in a [`Deque`] that can modify it: read and write the current element, insert
/// before it, or erase it.
///
/// Like [`Cursor`], the index is never checked by arithmetic.
///
/// # Examples
/// ```
/// # use blockdeque::Deque;
/// let mut deque: Deque<i32> = Deque::from([1, 2, 4, 5]);
/// let mut cursor = deque.cursor_mut(2);
/// cursor.insert(3);
/// assert_eq!(cursor.current(), Some(&3));
/// cursor += 1;
/// assert_eq!(cursor.erase(), Some(4));
/// assert_eq!(cursor.current(), Some(&5));
/// assert_eq!(deque, [1, 2, 3, 5][..]);
/// ```
pub struct CursorMut<'a, T, A = Global, D = FrontToBack>
where
    A: Allocator,
    D: DropBehavior,
{
    deque: &'a mut Deque<T, A, D>,
    index: usize,
}

impl<'a, T, A, D> CursorMut<'a, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    pub(crate) fn new(deque: &'a mut Deque<T, A, D>, index: usize) -> Self {
        CursorMut { deque, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The element under the cursor, or `None` if the cursor is outside `0..len`.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.deque.get(self.index)
    }

    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.deque.get_mut(self.index)
    }

    #[inline]
    pub fn move_next(&mut self) {
        self.index += 1;
    }

    #[inline]
    pub fn move_prev(&mut self) {
        self.index -= 1;
    }

    /// Inserts `value` at the cursor's index. The cursor stays on the index, which now holds
    /// the inserted value.
    ///
    /// # Panics
    /// Panics if the cursor is past the end of the deque.
    #[inline]
    pub fn insert(&mut self, value: T) {
        self.deque.insert(self.index, value);
    }

    /// Removes the element under the cursor and returns it. The cursor stays on the index,
    /// which now holds the following element (or is the end). Returns `None` and changes
    /// nothing if the cursor is not on an element.
    #[inline]
    pub fn erase(&mut self) -> Option<T> {
        if self.index < self.deque.len() {
            Some(self.deque.remove(self.index))
        } else {
            None
        }
    }

    /// A read-only cursor at the same position, borrowing from this one.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T, A, D> {
        Cursor::new(&*self.deque, self.index)
    }
}

impl<T, A, D> Debug for CursorMut<'_, T, A, D>
where
    A: Allocator,
    D: DropBehavior,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index)
            .field("len", &self.deque.len())
            .finish()
    }
}

// moves a cursor by an unchecked offset
macro_rules! cursor_arithmetic {
    ($cursor:ident) => {
        impl<T, A, D> AddAssign<usize> for $cursor<'_, T, A, D>
        where
            A: Allocator,
            D: DropBehavior,
        {
            #[inline]
            fn add_assign(&mut self, rhs: usize) {
                self.index += rhs;
            }
        }

        impl<T, A, D> SubAssign<usize> for $cursor<'_, T, A, D>
        where
            A: Allocator,
            D: DropBehavior,
        {
            #[inline]
            fn sub_assign(&mut self, rhs: usize) {
                self.index -= rhs;
            }
        }

        impl<T, A, D> Add<usize> for $cursor<'_, T, A, D>
        where
            A: Allocator,
            D: DropBehavior,
        {
            type Output = Self;

            #[inline]
            fn add(mut self, rhs: usize) -> Self {
                self += rhs;
                self
            }
        }

        impl<T, A, D> Sub<usize> for $cursor<'_, T, A, D>
        where
            A: Allocator,
            D: DropBehavior,
        {
            type Output = Self;

            #[inline]
            fn sub(mut self, rhs: usize) -> Self {
                self -= rhs;
                self
            }
        }
    };
}

cursor_arithmetic!(Cursor);
cursor_arithmetic!(CursorMut);

#[cfg(test)]
mod iter_tests {
    use crate::{BackToFront, Deque, BLOCK_CAPACITY};
    use std::cell::Cell;

    // a deque whose head sits in the middle of a block, so that iteration crosses boundaries
    fn offset_deque(len: usize) -> Deque<usize> {
        let mut deque = Deque::new();
        for i in (0..len).rev() {
            deque.push_front(i);
        }
        deque
    }

    #[test]
    fn iter_crosses_block_boundaries() {
        let deque = offset_deque(3 * BLOCK_CAPACITY + 4);
        assert_ne!(deque.space_front() % BLOCK_CAPACITY, 0);
        assert!(deque.iter().copied().eq(0..3 * BLOCK_CAPACITY + 4));
        assert!(deque.iter().rev().copied().eq((0..3 * BLOCK_CAPACITY + 4).rev()));
    }

    #[test]
    fn iter_ends_meet() {
        let deque = offset_deque(5);
        let mut iter = deque.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_nth_and_last() {
        let deque = offset_deque(25);
        let mut iter = deque.iter();
        assert_eq!(iter.nth(12), Some(&12));
        assert_eq!(iter.len(), 12);
        assert_eq!(iter.clone().last(), Some(&24));
        assert_eq!(iter.nth(100), None);
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn empty_deque_iterates_nothing() {
        let deque: Deque<u8> = Deque::new();
        assert_eq!(deque.iter().next(), None);
        let mut deque = deque;
        assert_eq!(deque.iter_mut().next_back(), None);
    }

    #[test]
    fn iter_mut_writes_through() {
        let mut deque = offset_deque(23);
        for value in deque.iter_mut() {
            *value *= 2;
        }
        for value in deque.iter_mut().rev().take(3) {
            *value += 1;
        }
        let expected: Vec<usize> = (0..23)
            .map(|i| if i >= 20 { i * 2 + 1 } else { i * 2 })
            .collect();
        assert_eq!(deque, expected);
    }

    #[test]
    fn into_iter_from_both_ends() {
        let deque: Deque<i32> = (0..15).collect();
        let mut iter = deque.into_iter();
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(14));
        assert_eq!(iter.len(), 13);
        assert!(iter.eq(1..14));
    }

    #[test]
    fn into_iter_drops_the_rest() {
        struct Counted<'a>(&'a Cell<usize>);
        impl Drop for Counted<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }
        let drops = Cell::new(0);
        let deque: Deque<Counted<'_>> = (0..12).map(|_| Counted(&drops)).collect();
        let mut iter = deque.into_iter();
        drop(iter.next());
        assert_eq!(drops.get(), 1);
        drop(iter);
        assert_eq!(drops.get(), 12);
    }

    #[test]
    fn iter_debug() {
        let deque: Deque<i32> = Deque::from([1, 2, 3]);
        let mut iter = deque.iter();
        iter.next();
        assert_eq!(format!("{iter:?}"), "Iter([2, 3])");
    }

    #[test]
    fn cursor_arithmetic() {
        let deque = offset_deque(30);
        let begin = deque.begin();
        let end = deque.end();
        assert_eq!(end - begin, 30);
        assert_eq!(begin - end, -30);
        let mut cursor = begin + 9;
        assert_eq!(cursor.current(), Some(&9));
        cursor.move_next();
        assert_eq!(cursor.current(), Some(&10));
        cursor += 5;
        assert_eq!(cursor.index(), 15);
        cursor -= 15;
        assert_eq!(cursor, begin);
        cursor.move_next();
        cursor.move_prev();
        assert_eq!(cursor, begin);
        assert_eq!(end.current(), None);
        assert_eq!((end - 1).current(), Some(&29));
        assert!(begin < end);
    }

    #[test]
    fn cursor_walk_matches_iter() {
        let deque = offset_deque(21);
        let mut cursor = deque.begin();
        let mut seen = Vec::new();
        while cursor != deque.end() {
            seen.push(*cursor.current().unwrap());
            cursor.move_next();
        }
        assert!(seen.iter().eq(deque.iter()));
        assert_eq!(unsafe { *deque.cursor(20).current_unchecked() }, 20);
    }

    #[test]
    fn cursors_compare_by_identity_and_index() {
        let a = Deque::from_elem(4, 1);
        let b = a.clone();
        assert_eq!(a.cursor(2), a.begin() + 2);
        assert_ne!(a.cursor(2), b.cursor(2));
        assert_eq!(a.cursor(2).partial_cmp(&b.cursor(2)), None);
    }

    #[test]
    fn cursor_mut_insert_returns_inserted_position() {
        let mut deque: Deque<i32> = (0..25).collect();
        let mut cursor = deque.cursor_mut(20);
        cursor.insert(-1);
        assert_eq!(cursor.index(), 20);
        assert_eq!(cursor.current(), Some(&-1));
        cursor -= 17;
        cursor.insert(-2);
        assert_eq!(cursor.current(), Some(&-2));
        assert_eq!(deque.len(), 27);
        assert_eq!(deque[3], -2);
        assert_eq!(deque[4], 3);
        assert_eq!(deque[21], -1);
        assert_eq!(deque[22], 20);
    }

    #[test]
    fn cursor_mut_erase_moves_to_following() {
        let mut deque: Deque<i32> = (0..12).collect();
        let mut cursor = deque.cursor_mut(10);
        assert_eq!(cursor.erase(), Some(10));
        assert_eq!(cursor.current(), Some(&11));
        assert_eq!(cursor.erase(), Some(11));
        // erasing the last element leaves the cursor at the end
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.erase(), None);
        assert_eq!(cursor.as_cursor().index(), 10);
        assert!(deque.iter().copied().eq(0..10));
    }

    #[test]
    fn both_cursor_kinds_move_alike() {
        let mut deque = offset_deque(26);
        let moved = ((deque.begin() + 24) - 3).index();
        let mut cursor = deque.begin_mut();
        cursor += 24;
        cursor -= 3;
        assert_eq!(cursor.index(), moved);
        let cursor = (cursor + 2) - 1;
        assert_eq!(cursor.current(), Some(&22));
    }

    #[test]
    fn cursor_mut_writes() {
        let mut deque = Deque::from_elem(3, 0).as_back_to_front();
        let mut cursor = deque.begin_mut() + 1;
        *cursor.current_mut().unwrap() = 7;
        let cursor = deque.end_mut() - 1;
        assert_eq!(cursor.current(), Some(&0));
        let deque: Deque<i32, _, BackToFront> = deque;
        assert_eq!(deque, [0, 7, 0][..]);
    }
}

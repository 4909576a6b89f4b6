//! A [`SpareVec`] is a double-ended dynamic array: one contiguous block laid out as
//! `[left spare][live elements][right spare]`.
//! Pushing or popping at either end only touches the spare on that side, so both ends are amortized O(1).
//! When a side runs out, only that side is topped up unless the other side is nearly exhausted too,
//! in which case both are reset around the live band. Spare that grows past
//! [`Settings::shrink_threshold`] is handed back on the next pop.
//!
//! Inserting or removing in the middle always moves the whole live band into a freshly sized block,
//! so those operations are O(len), not amortized.

use crate::buffer::RawBuffer;
use crate::controller::{self, Spares};
use crate::error::{Error, Result};
use crate::position::Position;
use crate::settings::Settings;
use std::fmt::{self, Debug, Display};
use std::ops::{Add, AddAssign, Deref, DerefMut};
use std::ptr;

/// A double-ended dynamic array with spare capacity kept at both ends of one contiguous block.
///
/// # Examples
/// ```
/// use sparevec::SpareVec;
/// let mut vec = SpareVec::new();
/// vec.push_back(2);
/// vec.push_front(1);
/// vec.push_back(3);
/// assert_eq!(&*vec, &[1, 2, 3]);
/// assert_eq!(vec.allocated(), vec.left_spare() + vec.len() + vec.right_spare());
/// ```
pub struct SpareVec<T> {
    buf: RawBuffer<T>,
    left: usize,
    len: usize,
    settings: Settings,
}

/// Snapshot of how a [`SpareVec`]'s block is split up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpareLayout {
    pub allocated: usize,
    pub left_spare: usize,
    pub len: usize,
    pub right_spare: usize,
    pub step: usize,
}

impl<T> SpareVec<T> {
    /// Creates an empty `SpareVec` with the default step of 10.
    /// The block starts with `step` spare slots on each side.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let vec: SpareVec<i32> = SpareVec::new();
    /// assert_eq!(vec.left_spare(), 10);
    /// assert_eq!(vec.right_spare(), 10);
    /// ```
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates an empty `SpareVec` that grows by `step` slots at a time.
    /// Fails with [`Error::InvalidSize`] when `step` is zero.
    pub fn with_step(step: usize) -> Result<Self> {
        Ok(Self::with_settings(Settings::new(step)?))
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::with_room(0, settings)
    }

    /// Empty container whose block can take `room` elements at the back before the usual `step` of spare.
    fn with_room(room: usize, settings: Settings) -> Self {
        let step = settings.step();
        let spares = Spares {
            left: step,
            right: step,
        };
        SpareVec {
            buf: RawBuffer::allocate(spares.allocation_for(room)),
            left: step,
            len: 0,
            settings,
        }
    }

    /// Creates a `SpareVec` holding `len` clones of `fill`.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let vec = SpareVec::with_len(3, 'x');
    /// assert_eq!(&*vec, &['x', 'x', 'x']);
    /// assert_eq!(vec.allocated(), 3 + 2 * 10);
    /// ```
    pub fn with_len(len: usize, fill: T) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::with_room(len, Settings::default());
        for _ in 0..len {
            unsafe { vec.write_back(fill.clone()) }
        }
        vec
    }

    /// Creates a `SpareVec` holding copies of the first `count` elements of `data`.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::{Error, SpareVec};
    /// let vec = SpareVec::from_buffer(Some(&[1, 2, 3, 4]), 3).unwrap();
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// assert!(matches!(SpareVec::<i32>::from_buffer(None, 3), Err(Error::NullReference { .. })));
    /// ```
    pub fn from_buffer(data: Option<&[T]>, count: usize) -> Result<Self>
    where
        T: Clone,
    {
        let source = source_range(data, 0, count)?;
        let mut vec = Self::with_room(count, Settings::default());
        vec.append_cloned(source);
        Ok(vec)
    }

    /// Creates a `SpareVec` from any forward-traversable sequence.
    /// `count`, when given, sizes the block up front instead of trusting the iterator's size hint;
    /// it must be positive.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let list: std::collections::LinkedList<u8> = (1..=4).collect();
    /// let vec = SpareVec::from_range(list.iter().copied(), Some(4)).unwrap();
    /// assert_eq!(&*vec, &[1, 2, 3, 4]);
    /// ```
    pub fn from_range<I>(items: I, count: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        let room = match count {
            Some(0) => return Err(Error::InvalidSize { requested: 0 }),
            Some(count) => count,
            None => items.size_hint().0,
        };
        let mut vec = Self::with_room(room, Settings::default());
        vec.extend(items);
        Ok(vec)
    }

    /// Creates a `SpareVec` holding the elements of `first` followed by those of `second`.
    /// `count` is the combined length when it is cheaper to know it than to measure it.
    pub fn from_ranges<A, B>(first: A, second: B, count: Option<usize>) -> Result<Self>
    where
        A: IntoIterator<Item = T>,
        B: IntoIterator<Item = T>,
    {
        Self::from_range(first.into_iter().chain(second), count)
    }

    /// Creates a `SpareVec` from the elements between two positions, `to` excluded.
    /// The positions may belong to any container, not only the one being built.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::{sparevec, SpareVec};
    /// let source = sparevec![1, 2, 3, 4, 5];
    /// let from = source.begin().offset(1).unwrap();
    /// let to = source.end().offset(-1).unwrap();
    /// let middle = SpareVec::from_positions(from, to).unwrap();
    /// assert_eq!(&*middle, &[2, 3, 4]);
    /// ```
    pub fn from_positions(from: Position<'_, T>, to: Position<'_, T>) -> Result<Self>
    where
        T: Clone,
    {
        let range = from.until(to)?;
        let count = range.len();
        let mut vec = Self::with_room(count, Settings::default());
        vec.extend(range.cloned());
        Ok(vec)
    }

    // ---- layout ----

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total number of slots in the block, spare included.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns how many elements can be pushed to the front without relocating.
    #[inline]
    pub fn left_spare(&self) -> usize {
        self.left
    }

    /// Returns how many elements can be pushed to the back without relocating.
    #[inline]
    pub fn right_spare(&self) -> usize {
        self.buf.capacity() - self.left - self.len
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.settings.step()
    }

    #[inline]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn layout(&self) -> SpareLayout {
        SpareLayout {
            allocated: self.allocated(),
            left_spare: self.left_spare(),
            len: self.len,
            right_spare: self.right_spare(),
            step: self.step(),
        }
    }

    /// Changes the step used by future growth, then trims any side holding more than one new step of spare.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec: SpareVec<i32> = SpareVec::new();
    /// vec.set_step(4).unwrap();
    /// assert_eq!((vec.left_spare(), vec.right_spare()), (4, 4));
    /// assert!(vec.set_step(0).is_err());
    /// ```
    pub fn set_step(&mut self, step: usize) -> Result<()> {
        self.settings.set_step(step)?;
        self.shrink_past(step);
        Ok(())
    }

    #[inline]
    fn spares(&self) -> Spares {
        Spares {
            left: self.left,
            right: self.right_spare(),
        }
    }

    // ---- capacity control ----

    /// Moves the live band into a new block laid out as `target`, releasing the current block.
    fn relocate(&mut self, target: Spares) {
        let fresh = RawBuffer::allocate(target.allocation_for(self.len));
        unsafe {
            ptr::copy_nonoverlapping(self.buf.slot(self.left), fresh.slot(target.left), self.len);
        }
        // the old block's slots were moved out bitwise, dropping it only frees memory
        self.buf = fresh;
        self.left = target.left;
    }

    /// Like [`relocate`](Self::relocate), but opens a hole at `index` and moves `items` into it.
    fn relocate_with_gap(&mut self, index: usize, mut items: Vec<T>, target: Spares) {
        debug_assert!(index <= self.len);
        let count = items.len();
        let new_len = self.len + count;
        let fresh = RawBuffer::allocate(target.allocation_for(new_len));
        unsafe {
            let src = self.buf.slot(self.left);
            let dst = fresh.slot(target.left);
            ptr::copy_nonoverlapping(src, dst, index);
            ptr::copy_nonoverlapping(items.as_ptr(), dst.add(index), count);
            ptr::copy_nonoverlapping(src.add(index), dst.add(index + count), self.len - index);
            items.set_len(0);
        }
        self.buf = fresh;
        self.left = target.left;
        self.len = new_len;
    }

    fn grow_left(&mut self, need: usize) {
        if let Some(plan) = controller::grow_left(self.spares(), self.step(), need) {
            self.relocate(plan);
        }
    }

    fn grow_right(&mut self, need: usize) {
        if let Some(plan) = controller::grow_right(self.spares(), self.step(), need) {
            self.relocate(plan);
        }
    }

    fn shrink_past(&mut self, threshold: usize) {
        if let Some(plan) = controller::shrink(self.spares(), self.step(), threshold) {
            self.relocate(plan);
        }
    }

    fn shrink_check(&mut self) {
        self.shrink_past(self.settings.shrink_threshold());
    }

    /// Makes sure at least `additional` elements can be pushed to the front without relocating.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec: SpareVec<i32> = SpareVec::new();
    /// vec.reserve_front(25);
    /// assert!(vec.left_spare() >= 25);
    /// ```
    pub fn reserve_front(&mut self, additional: usize) {
        self.grow_left(additional);
    }

    /// Makes sure at least `additional` elements can be pushed to the back without relocating.
    pub fn reserve_back(&mut self, additional: usize) {
        self.grow_right(additional);
    }

    /// Resets both spare regions to exactly one step around the live band.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec: SpareVec<i32> = (0..30).collect();
    /// vec.rebalance();
    /// assert_eq!((vec.left_spare(), vec.len(), vec.right_spare()), (10, 30, 10));
    /// ```
    pub fn rebalance(&mut self) {
        let step = self.step();
        let target = Spares {
            left: step,
            right: step,
        };
        if self.spares() != target {
            self.relocate(target);
        }
    }

    // ---- unchecked element moves ----

    /// Caller guarantees `right_spare() >= 1`.
    #[inline]
    unsafe fn write_back(&mut self, value: T) {
        debug_assert!(self.right_spare() >= 1);
        ptr::write(self.buf.slot(self.left + self.len), value);
        self.len += 1;
    }

    /// Caller guarantees `left_spare() >= 1`.
    #[inline]
    unsafe fn write_front(&mut self, value: T) {
        debug_assert!(self.left >= 1);
        self.left -= 1;
        ptr::write(self.buf.slot(self.left), value);
        self.len += 1;
    }

    /// Caller guarantees `len() >= 1`.
    #[inline]
    unsafe fn take_back(&mut self) -> T {
        self.len -= 1;
        ptr::read(self.buf.slot(self.left + self.len))
    }

    /// Caller guarantees `len() >= 1`.
    #[inline]
    unsafe fn take_front(&mut self) -> T {
        let value = ptr::read(self.buf.slot(self.left));
        self.left += 1;
        self.len -= 1;
        value
    }

    fn append_cloned(&mut self, source: &[T])
    where
        T: Clone,
    {
        self.grow_right(source.len());
        for value in source {
            unsafe { self.write_back(value.clone()) }
        }
    }

    fn prepend_cloned(&mut self, source: &[T])
    where
        T: Clone,
    {
        self.grow_left(source.len());
        for value in source.iter().rev() {
            unsafe { self.write_front(value.clone()) }
        }
    }

    // ---- validation ----

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    fn check_insert_index(&self, index: usize) -> Result<()> {
        if index <= self.len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    fn check_pop_count(&self, count: usize) -> Result<()> {
        if count == 0 || count > self.len {
            Err(Error::InvalidSize { requested: count })
        } else {
            Ok(())
        }
    }

    // ---- push / pop ----

    /// Appends an element to the back.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([42, 10]);
    /// vec.push_back(100);
    /// assert_eq!(vec.pop_back(), Ok(100));
    /// ```
    pub fn push_back(&mut self, value: T) {
        self.grow_right(1);
        unsafe { self.write_back(value) }
    }

    /// Prepends an element to the front.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([42, 10]);
    /// vec.push_front(100);
    /// assert_eq!(vec.pop_front(), Ok(100));
    /// ```
    pub fn push_front(&mut self, value: T) {
        self.grow_left(1);
        unsafe { self.write_front(value) }
    }

    /// Appends copies of the first `count` elements of `data`.
    /// If the right spare cannot take them, it is grown so that exactly `step` slots remain afterwards.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::{Error, SpareVec};
    /// let mut vec = SpareVec::from([1]);
    /// vec.push_back_from(Some(&[2, 3, 4]), 2).unwrap();
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// assert_eq!(vec.push_back_from(None, 2), Err(Error::NullReference { required: 2, available: 0 }));
    /// ```
    pub fn push_back_from(&mut self, data: Option<&[T]>, count: usize) -> Result<()>
    where
        T: Clone,
    {
        let source = source_range(data, 0, count)?;
        self.append_cloned(source);
        Ok(())
    }

    /// Prepends copies of the first `count` elements of `data`, keeping their order.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([3]);
    /// vec.push_front_from(Some(&[1, 2]), 2).unwrap();
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// ```
    pub fn push_front_from(&mut self, data: Option<&[T]>, count: usize) -> Result<()>
    where
        T: Clone,
    {
        let source = source_range(data, 0, count)?;
        self.prepend_cloned(source);
        Ok(())
    }

    /// Removes and returns the last element, or fails with [`Error::IndexOutOfRange`] when empty.
    /// Trims wasteful spare afterwards.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([42, 10]);
    /// assert_eq!(vec.pop_back(), Ok(10));
    /// assert_eq!(vec.pop_back(), Ok(42));
    /// assert!(vec.pop_back().is_err());
    /// ```
    pub fn pop_back(&mut self) -> Result<T> {
        self.check_index(0)?;
        let value = unsafe { self.take_back() };
        self.shrink_check();
        Ok(value)
    }

    /// Removes and returns the first element, or fails with [`Error::IndexOutOfRange`] when empty.
    pub fn pop_front(&mut self) -> Result<T> {
        self.check_index(0)?;
        let value = unsafe { self.take_front() };
        self.shrink_check();
        Ok(value)
    }

    /// Removes the last `count` elements and returns them in container order.
    /// Runs the same spare trimming as [`pop_back`](Self::pop_back).
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2, 3, 4]);
    /// assert_eq!(vec.pop_back_n(3), Ok(vec![2, 3, 4]));
    /// assert!(vec.pop_back_n(2).is_err());
    /// ```
    pub fn pop_back_n(&mut self, count: usize) -> Result<Vec<T>> {
        self.check_pop_count(count)?;
        let mut popped = Vec::with_capacity(count);
        self.len -= count;
        unsafe {
            ptr::copy_nonoverlapping(
                self.buf.slot(self.left + self.len),
                popped.as_mut_ptr(),
                count,
            );
            popped.set_len(count);
        }
        self.shrink_check();
        Ok(popped)
    }

    /// Removes the first `count` elements and returns them in container order.
    pub fn pop_front_n(&mut self, count: usize) -> Result<Vec<T>> {
        self.check_pop_count(count)?;
        let mut popped = Vec::with_capacity(count);
        unsafe {
            ptr::copy_nonoverlapping(self.buf.slot(self.left), popped.as_mut_ptr(), count);
            popped.set_len(count);
        }
        self.left += count;
        self.len -= count;
        self.shrink_check();
        Ok(popped)
    }

    // ---- element access ----

    pub fn get(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        Ok(&self.as_slice()[index])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.check_index(index)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Overwrites the element at `index`.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2, 3]);
    /// vec.set(1, 20).unwrap();
    /// assert_eq!(&*vec, &[1, 20, 3]);
    /// assert!(vec.set(3, 0).is_err());
    /// ```
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Overwrites `count` elements starting at `index` with copies from `data`.
    pub fn set_from(&mut self, index: usize, data: Option<&[T]>, count: usize) -> Result<()>
    where
        T: Clone,
    {
        let source = source_range(data, 0, count)?;
        self.check_index(index)?;
        let end = index.saturating_add(count);
        if end > self.len {
            return Err(Error::IndexOutOfRange {
                index: end - 1,
                len: self.len,
            });
        }
        self.as_mut_slice()[index..end].clone_from_slice(source);
        Ok(())
    }

    pub fn front(&self) -> Result<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Result<&T> {
        match self.len.checked_sub(1) {
            Some(last) => self.get(last),
            None => Err(Error::IndexOutOfRange { index: 0, len: 0 }),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    // ---- positions ----

    /// Position of the first element (equal to [`end`](Self::end) when empty).
    pub fn begin(&self) -> Position<'_, T> {
        Position::new(self, 0)
    }

    /// Sentinel position one past the last element. It can be moved back from but never read.
    pub fn end(&self) -> Position<'_, T> {
        Position::new(self, self.len)
    }

    /// Position of the element at `index`; `index == len()` gives [`end`](Self::end).
    pub fn position(&self, index: usize) -> Result<Position<'_, T>> {
        self.check_insert_index(index)?;
        Ok(Position::new(self, index))
    }

    // ---- middle insertion / removal ----

    /// Inserts `value` before the element at `index`.
    /// The ends behave like [`push_front`](Self::push_front) and [`push_back`](Self::push_back);
    /// anywhere else the live band is moved to a block one slot larger, which is O(len).
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2]);
    /// vec.insert(1, 3).unwrap();
    /// assert_eq!(&*vec, &[1, 3, 2]);
    /// assert!(vec.insert(4, 0).is_err());
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.check_insert_index(index)?;
        if index == 0 {
            self.push_front(value);
        } else if index == self.len {
            self.push_back(value);
        } else {
            let target = self.spares();
            self.relocate_with_gap(index, vec![value], target);
        }
        Ok(())
    }

    /// Inserts copies of the first `count` elements of `data` before the element at `index`.
    pub fn insert_from(&mut self, index: usize, data: Option<&[T]>, count: usize) -> Result<()>
    where
        T: Clone,
    {
        self.check_insert_index(index)?;
        let source = source_range(data, 0, count)?;
        if index == 0 {
            self.prepend_cloned(source);
        } else if index == self.len {
            self.append_cloned(source);
        } else {
            let target = self.spares();
            self.relocate_with_gap(index, source.to_vec(), target);
        }
        Ok(())
    }

    /// Copies `count` elements of `data`, starting at `from`, into the container.
    /// With `at == None` they are appended like [`push_back_from`](Self::push_back_from).
    /// Otherwise they are inserted before `at` and the container always moves to a new block
    /// whose right spare is reset to `step`.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 5]);
    /// vec.copy_from(Some(&[0, 2, 3, 4]), 3, Some(1), 1).unwrap();
    /// assert_eq!(&*vec, &[1, 2, 3, 4, 5]);
    /// assert_eq!(vec.right_spare(), vec.step());
    /// ```
    pub fn copy_from(
        &mut self,
        data: Option<&[T]>,
        count: usize,
        at: Option<usize>,
        from: usize,
    ) -> Result<()>
    where
        T: Clone,
    {
        let Some(at) = at else {
            let source = source_range(data, from, count)?;
            self.append_cloned(source);
            return Ok(());
        };
        self.check_insert_index(at)?;
        let source = source_range(data, from, count)?;
        let target = Spares {
            left: self.left,
            right: self.step(),
        };
        self.relocate_with_gap(at, source.to_vec(), target);
        Ok(())
    }

    /// Removes and returns the element at `index`.
    /// The ends behave like the pops; anywhere else the live band moves to a block one slot smaller.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2, 3]);
    /// assert_eq!(vec.remove_index(1), Ok(2));
    /// assert_eq!(&*vec, &[1, 3]);
    /// ```
    pub fn remove_index(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        if index == 0 {
            return self.pop_front();
        }
        if index == self.len - 1 {
            return self.pop_back();
        }
        let target = self.spares();
        let new_len = self.len - 1;
        let fresh = RawBuffer::allocate(target.allocation_for(new_len));
        let value = unsafe {
            let src = self.buf.slot(self.left);
            let dst = fresh.slot(target.left);
            let value = ptr::read(src.add(index));
            ptr::copy_nonoverlapping(src, dst, index);
            ptr::copy_nonoverlapping(src.add(index + 1), dst.add(index), new_len - index);
            value
        };
        self.buf = fresh;
        self.left = target.left;
        self.len = new_len;
        Ok(value)
    }

    /// Keeps only the elements for which `keep` returns true, preserving order.
    /// Returns how many were removed.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2, 3, 4, 5]);
    /// assert_eq!(vec.retain(|x| x % 2 == 0), 3);
    /// assert_eq!(&*vec, &[2, 4]);
    /// ```
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let original_len = self.len;
        // a panicking predicate leaks the band instead of letting Drop see moved-out slots
        self.len = 0;
        let base = self.buf.slot(self.left);
        let mut kept = 0;
        for i in 0..original_len {
            unsafe {
                let current = base.add(i);
                if keep(&*current) {
                    if kept != i {
                        ptr::copy_nonoverlapping(current, base.add(kept), 1);
                    }
                    kept += 1;
                } else {
                    ptr::drop_in_place(current);
                }
            }
        }
        self.len = kept;
        let removed = original_len - kept;
        if removed > 0 {
            self.shrink_check();
        }
        removed
    }

    /// Drops every element and starts over with a fresh block of `2 * step` slots.
    pub fn clear(&mut self) {
        *self = Self::with_settings(self.settings);
    }

    /// Grows or shrinks the container at the back to `new_len` elements, cloning `fill` for new slots.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2]);
    /// vec.resize(4, 0).unwrap();
    /// assert_eq!(&*vec, &[1, 2, 0, 0]);
    /// vec.resize(1, 0).unwrap();
    /// assert_eq!(&*vec, &[1]);
    /// ```
    pub fn resize(&mut self, new_len: usize, fill: T) -> Result<()>
    where
        T: Clone,
    {
        if new_len == 0 {
            return Err(Error::InvalidSize { requested: 0 });
        }
        if new_len > self.len {
            let extra = new_len - self.len;
            self.grow_right(extra);
            for _ in 0..extra {
                unsafe { self.write_back(fill.clone()) }
            }
        } else if new_len < self.len {
            self.pop_back_n(self.len - new_len)?;
        }
        Ok(())
    }

    /// Moves the contents out, leaving `self` empty with a fresh block and the same settings.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut source = SpareVec::from([1, 2, 3]);
    /// let moved = source.take();
    /// assert_eq!(&*moved, &[1, 2, 3]);
    /// assert!(source.is_empty());
    /// assert_eq!(source.allocated(), 2 * source.step());
    /// ```
    pub fn take(&mut self) -> Self {
        let empty = Self::with_settings(self.settings);
        std::mem::replace(self, empty)
    }

    // ---- search ----

    /// Index of the first element equal to `value`.
    pub fn find_index(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|x| x == value)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find_index(value).is_some()
    }

    /// Position of the first element equal to `value`, or [`end`](Self::end).
    pub fn find_position(&self, value: &T) -> Position<'_, T>
    where
        T: PartialEq,
    {
        match self.find_index(value) {
            Some(index) => Position::new(self, index),
            None => self.end(),
        }
    }

    /// Removes the first element equal to `value`. Returns whether one was found.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut vec = SpareVec::from([1, 2, 1, 3]);
    /// assert!(vec.remove(&1));
    /// assert_eq!(&*vec, &[2, 1, 3]);
    /// assert!(!vec.remove(&7));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find_index(value) {
            Some(index) => self.remove_index(index).is_ok(),
            None => false,
        }
    }

    /// Removes every element equal to `value` and returns how many there were.
    pub fn remove_all(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.retain(|x| x != value)
    }

    // ---- concatenation / slicing ----

    /// Appends copies of `other`'s elements.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let mut a = SpareVec::from([1, 2]);
    /// a.concatenate(&SpareVec::from([3, 4]));
    /// assert_eq!(&*a, &[1, 2, 3, 4]);
    /// ```
    pub fn concatenate(&mut self, other: &SpareVec<T>)
    where
        T: Clone,
    {
        if !other.is_empty() {
            self.append_cloned(other);
        }
    }

    /// Returns a new container holding `self`'s elements followed by `other`'s. Neither operand changes.
    pub fn get_concatenated(&self, other: &SpareVec<T>) -> SpareVec<T>
    where
        T: Clone,
    {
        let mut joined = Self::with_room(self.len + other.len, self.settings);
        joined.append_cloned(self);
        joined.append_cloned(other);
        joined
    }

    /// Returns a copy of the elements in `[from, to)`.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::SpareVec;
    /// let vec = SpareVec::from([0, 1, 2, 3, 4]);
    /// assert_eq!(&*vec.subarray(1, 4).unwrap(), &[1, 2, 3]);
    /// assert!(vec.subarray(3, 3).is_err());
    /// assert!(vec.subarray(3, 6).is_err());
    /// ```
    pub fn subarray(&self, from: usize, to: usize) -> Result<SpareVec<T>>
    where
        T: Clone,
    {
        if from >= to {
            return Err(Error::InvalidSize {
                requested: to.saturating_sub(from),
            });
        }
        if to > self.len {
            return Err(Error::IndexOutOfRange {
                index: to,
                len: self.len,
            });
        }
        let mut part = Self::with_room(to - from, self.settings);
        part.append_cloned(&self[from..to]);
        Ok(part)
    }
}

/// Validates a counted copy-in source and returns the `count` elements starting at `from`.
fn source_range<T>(data: Option<&[T]>, from: usize, count: usize) -> Result<&[T]> {
    if count == 0 {
        return Err(Error::InvalidSize { requested: count });
    }
    let required = from.saturating_add(count);
    match data {
        None => Err(Error::NullReference {
            required,
            available: 0,
        }),
        Some(data) if data.len() < required => Err(Error::NullReference {
            required,
            available: data.len(),
        }),
        Some(data) => Ok(&data[from..required]),
    }
}

impl<T> Default for SpareVec<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SpareVec<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.slot(self.left),
                self.len,
            ));
        }
        // `buf` releases the block right after this
    }
}

impl<T: Clone> Clone for SpareVec<T> {
    /// Copies only the live band, into a fresh block with one step of spare on each side.
    fn clone(&self) -> Self {
        let mut copy = Self::with_room(self.len, self.settings);
        copy.append_cloned(self);
        copy
    }
}

impl<T> Deref for SpareVec<T> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buf.slot(self.left), self.len) }
    }
}

impl<T> DerefMut for SpareVec<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.buf.slot(self.left), self.len) }
    }
}

impl<T> AsRef<[T]> for SpareVec<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for SpareVec<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> std::borrow::Borrow<[T]> for SpareVec<T> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> std::borrow::BorrowMut<[T]> for SpareVec<T> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Debug> Debug for SpareVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.as_slice(), f)
    }
}

/// Renders as `[ 1, 2, 3 ]`, or `[ ]` when empty.
impl<T: Display> Display for SpareVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, " {value}")?;
        }
        f.write_str(" ]")
    }
}

/// An iterator that moves elements out of a [`SpareVec`], dropping whatever is left when it is dropped.
pub struct IntoIter<T> {
    vec: SpareVec<T>,
}

impl<T> IntoIterator for SpareVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { vec: self }
    }
}

impl<'a, T> IntoIterator for &'a SpareVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SpareVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    // Moving out never trims spare; the whole block goes away with the iterator.
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.vec.is_empty() {
            None
        } else {
            Some(unsafe { self.vec.take_front() })
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.vec.len(), Some(self.vec.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.vec.is_empty() {
            None
        } else {
            Some(unsafe { self.vec.take_back() })
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    #[inline]
    fn len(&self) -> usize {
        self.vec.len()
    }
}

impl<T> std::iter::FusedIterator for IntoIter<T> {}

impl<T> FromIterator<T> for SpareVec<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = SpareVec::new();
        vec.extend(iter);
        vec
    }
}

impl<T> Extend<T> for SpareVec<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_back(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> From<Vec<T>> for SpareVec<T> {
    fn from(mut vec: Vec<T>) -> Self {
        let count = vec.len();
        let mut spare = Self::with_room(count, Settings::default());
        unsafe {
            ptr::copy_nonoverlapping(vec.as_ptr(), spare.buf.slot(spare.left), count);
            vec.set_len(0);
        }
        spare.len = count;
        spare
    }
}

impl<T, const N: usize> From<[T; N]> for SpareVec<T> {
    #[inline]
    fn from(array: [T; N]) -> Self {
        let mut vec = Self::with_room(N, Settings::default());
        vec.extend(array);
        vec
    }
}

impl<T: Clone> Add<&SpareVec<T>> for &SpareVec<T> {
    type Output = SpareVec<T>;

    fn add(self, other: &SpareVec<T>) -> SpareVec<T> {
        self.get_concatenated(other)
    }
}

impl<T: Clone> AddAssign<&SpareVec<T>> for SpareVec<T> {
    fn add_assign(&mut self, other: &SpareVec<T>) {
        self.concatenate(other);
    }
}

// equality, ordering, and hashing all look at the live band only

impl<T: PartialEq> PartialEq for SpareVec<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other) || self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<[T]> for SpareVec<T> {
    #[inline]
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for SpareVec<T> {
    #[inline]
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for SpareVec<T> {}

impl<T: PartialOrd> PartialOrd for SpareVec<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for SpareVec<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: std::hash::Hash> std::hash::Hash for SpareVec<T> {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

#[cfg(test)]
mod sparevec_test_from {
    use super::*;

    #[test]
    fn test_from_vec() {
        let vec = vec![1, 2, 3, 4, 5];
        let spare: SpareVec<i32> = SpareVec::from(vec);
        assert_eq!(spare.len(), 5);
        assert_eq!(spare.allocated(), 5 + 20);
        assert_eq!(spare.left_spare(), 10);
        assert_eq!(&*spare, &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_from_vec2() {
        let vec = vec![2, 3, 5];
        let mut spare: SpareVec<i32> = SpareVec::from(vec);
        assert_eq!(spare.len(), 3);

        spare.pop_back().unwrap();
        spare.push_front(1);
        spare.push_back(6);
        assert_eq!(spare.len(), 4);
        assert_eq!(&spare, &[1, 2, 3, 6][..]);
    }

    #[test]
    fn test_from_ranges() {
        let joined = SpareVec::from_ranges(vec![1, 2], [3, 4, 5], None).unwrap();
        assert_eq!(joined, [1, 2, 3, 4, 5]);
        assert_eq!(joined.right_spare(), 10);

        let counted = SpareVec::from_ranges(0..2, 2..3, Some(3)).unwrap();
        assert_eq!(counted, [0, 1, 2]);
        assert_eq!(
            SpareVec::from_ranges(0..2, 2..3, Some(0)),
            Err(Error::InvalidSize { requested: 0 })
        );
    }

    #[test]
    fn test_from_buffer_checks_source() {
        assert_eq!(
            SpareVec::from_buffer(Some(&[1, 2]), 3),
            Err(Error::NullReference {
                required: 3,
                available: 2
            })
        );
        assert_eq!(
            SpareVec::<i32>::from_buffer(Some(&[]), 0),
            Err(Error::InvalidSize { requested: 0 })
        );
    }
}

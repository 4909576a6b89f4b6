//! Positions are bidirectional cursors into a [`SpareVec`].
//!
//! A [`Position`] borrows its container, so the borrow checker rules out using one after the
//! container has been mutated or relocated. The index it holds is relative to the live band and
//! ranges over `[0, len]`, where `len` is the one-past-the-end sentinel.

use crate::error::{Error, Result};
use crate::spare_vec::SpareVec;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

/// A cursor at one element of a [`SpareVec`], or at its end.
///
/// # Examples
/// ```
/// # use sparevec::sparevec;
/// let vec = sparevec![10, 20, 30];
/// let mut pos = vec.begin();
/// pos.advance().unwrap();
/// assert_eq!(pos.get(), Ok(&20));
/// assert_eq!(pos.distance_to(&vec.end()), Ok(2));
/// assert!(vec.end().get().is_err());
/// ```
pub struct Position<'a, T> {
    vec: &'a SpareVec<T>,
    index: usize,
}

impl<'a, T> Position<'a, T> {
    pub(crate) fn new(vec: &'a SpareVec<T>, index: usize) -> Self {
        debug_assert!(index <= vec.len());
        Position { vec, index }
    }

    /// Index of this position within the live band.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.index == self.vec.len()
    }

    /// The element at this position. Fails at the end sentinel.
    pub fn get(&self) -> Result<&'a T> {
        self.vec
            .as_slice()
            .get(self.index)
            .ok_or_else(|| self.invalid(self.index as isize))
    }

    /// Moves one element toward the end. Fails when already at the end sentinel.
    pub fn advance(&mut self) -> Result<()> {
        *self = self.offset(1)?;
        Ok(())
    }

    /// Moves one element toward the front. Fails when already at the first element.
    pub fn retreat(&mut self) -> Result<()> {
        *self = self.offset(-1)?;
        Ok(())
    }

    /// The position `delta` elements away. The result must stay within `[0, len]`.
    ///
    /// # Examples
    /// ```
    /// # use sparevec::sparevec;
    /// let vec = sparevec![1, 2, 3];
    /// assert_eq!(vec.begin().offset(3).map(|p| p.is_end()), Ok(true));
    /// assert!(vec.begin().offset(-1).is_err());
    /// assert!(vec.begin().offset(4).is_err());
    /// ```
    pub fn offset(&self, delta: isize) -> Result<Self> {
        let len = self.vec.len();
        let target = (self.index as isize).checked_add(delta);
        match target {
            Some(t) if t >= 0 && t as usize <= len => Ok(Position::new(self.vec, t as usize)),
            Some(t) => Err(self.invalid(t)),
            None => Err(self.invalid(isize::MAX)),
        }
    }

    /// Number of steps from `self` to `other`, negative when `other` comes first.
    /// Both positions must belong to the same container.
    pub fn distance_to(&self, other: &Position<'_, T>) -> Result<isize> {
        if !ptr::eq(self.vec, other.vec) {
            return Err(self.invalid(other.index as isize));
        }
        Ok(other.index as isize - self.index as isize)
    }

    /// Iterator over the elements from `self` up to, not including, `end`.
    pub fn until(self, end: Position<'_, T>) -> Result<PositionRange<'a, T>> {
        let distance = self.distance_to(&end)?;
        if distance < 0 {
            return Err(self.invalid(end.index as isize));
        }
        Ok(PositionRange {
            vec: self.vec,
            front: self.index,
            back: end.index,
        })
    }

    fn invalid(&self, index: isize) -> Error {
        Error::InvalidPosition {
            index,
            len: self.vec.len(),
        }
    }
}

impl<T> Clone for Position<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<'_, T> {}

impl<T> PartialEq for Position<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.vec, other.vec) && self.index == other.index
    }
}

impl<T> Eq for Position<'_, T> {}

impl<T> fmt::Debug for Position<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("index", &self.index)
            .field("len", &self.vec.len())
            .finish()
    }
}

/// Elements between two positions of the same container, see [`Position::until`].
pub struct PositionRange<'a, T> {
    vec: &'a SpareVec<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for PositionRange<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.vec.as_slice().get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for PositionRange<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.vec.as_slice().get(self.back)
    }
}

impl<T> ExactSizeIterator for PositionRange<'_, T> {}

impl<T> FusedIterator for PositionRange<'_, T> {}

//! The owned storage block behind a [`SpareVec`](crate::SpareVec).
//!
//! A [`RawBuffer`] owns one allocation of `capacity` uninitialized slots and releases it when
//! dropped. It never reads, writes, or drops the values stored in it; tracking which slots are
//! live is the container's job.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Allocates a block of `cap` uninitialized slots.
    /// Zero-sized element types and zero capacities never touch the allocator.
    pub(crate) fn allocate(cap: usize) -> Self {
        let ptr = if cap == 0 || mem::size_of::<T>() == 0 {
            NonNull::dangling()
        } else {
            let layout = match Layout::array::<T>(cap) {
                Ok(layout) => layout,
                Err(_) => panic!("capacity overflow"),
            };
            // `Layout::array` already rejects sizes above isize::MAX.
            let raw = unsafe { alloc::alloc(layout) };
            match NonNull::new(raw as *mut T) {
                Some(p) => p,
                None => alloc::handle_alloc_error(layout),
            }
        };
        #[cfg(test)]
        ledger::record_allocation();
        RawBuffer {
            ptr,
            cap,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Pointer to slot `index`. `index == capacity` is allowed and yields the one-past-the-end pointer.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.cap);
        unsafe { self.ptr.as_ptr().add(index) }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.cap != 0 && mem::size_of::<T>() != 0 {
            unsafe {
                alloc::dealloc(
                    self.ptr.as_ptr() as *mut u8,
                    Layout::array::<T>(self.cap).unwrap_unchecked(),
                );
            }
        }
        #[cfg(test)]
        ledger::record_release();
    }
}

/// Per-thread count of blocks handed out and released, so tests can check that every relocation
/// acquires exactly one block and gives the old one back.
#[cfg(test)]
pub(crate) mod ledger {
    use std::cell::Cell;

    thread_local! {
        static ALLOCATED: Cell<usize> = const { Cell::new(0) };
        static RELEASED: Cell<usize> = const { Cell::new(0) };
    }

    pub(crate) fn record_allocation() {
        ALLOCATED.with(|c| c.set(c.get() + 1));
    }

    pub(crate) fn record_release() {
        RELEASED.with(|c| c.set(c.get() + 1));
    }

    /// `(allocated, released)` since the thread started.
    pub(crate) fn snapshot() -> (usize, usize) {
        (ALLOCATED.with(Cell::get), RELEASED.with(Cell::get))
    }

    /// Blocks allocated but not yet released.
    pub(crate) fn live() -> usize {
        let (allocated, released) = snapshot();
        allocated - released
    }
}

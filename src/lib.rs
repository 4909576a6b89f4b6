//! A double-ended dynamic array that keeps spare capacity at both ends of one contiguous block.
//!
//! [`SpareVec`] offers amortized O(1) pushes and pops at the front and the back, O(1) indexing,
//! and derefs to a plain slice. Growth is controlled per container through [`Settings`]: every
//! time a side runs dry it is topped up by `step` slots, and a side that accumulates more than
//! `shrink_factor * step` spare slots is trimmed on the next pop.
//!
//! ```
//! use sparevec::{sparevec, SpareVec};
//!
//! let mut vec: SpareVec<i32> = SpareVec::with_step(4).unwrap();
//! vec.push_back(2);
//! vec.push_front(1);
//! vec.push_back_from(Some(&[3, 4, 5]), 3).unwrap();
//! assert_eq!(vec, sparevec![1, 2, 3, 4, 5]);
//! assert_eq!(vec.to_string(), "[ 1, 2, 3, 4, 5 ]");
//! ```
//!
//! Every fallible operation reports an [`Error`] and leaves the container untouched.

mod buffer;
mod controller;
mod error;
mod position;
mod settings;
mod spare_vec;


pub use error::{Error, Result};
pub use position::{Position, PositionRange};
pub use settings::Settings;
pub use spare_vec::{IntoIter, SpareLayout, SpareVec};

/// Creates a [`SpareVec`] the way `vec!` creates a `Vec`.
///
/// # Examples
/// ```
/// # use sparevec::sparevec;
/// let empty: sparevec::SpareVec<u8> = sparevec![];
/// assert!(empty.is_empty());
/// assert_eq!(sparevec![0; 3], [0, 0, 0]);
/// assert_eq!(sparevec![1, 2, 3].len(), 3);
/// ```
#[macro_export]
macro_rules! sparevec {
    () => {
        $crate::SpareVec::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::SpareVec::with_len($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::SpareVec::from([$($x),+])
    };
}

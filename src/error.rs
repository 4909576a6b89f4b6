//! Error types reported by [`SpareVec`](crate::SpareVec) and its positions.

use std::error;
use std::fmt;

/// Errors that can occur when a [`SpareVec`](crate::SpareVec) operation rejects its arguments.
///
/// Every check runs before the container is touched, so receiving one of these
/// means the container is exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A size, count, or step was zero where a positive value is required,
    /// or asked for more elements than the container holds.
    InvalidSize {
        /// The rejected value.
        requested: usize,
    },
    /// An index fell outside `[0, len)` for reads and writes,
    /// or outside `[0, len]` for insertions.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// Source data was absent, or shorter than the range the call asked to copy.
    NullReference {
        /// Number of source elements the call needed.
        required: usize,
        /// Number of source elements that were supplied.
        available: usize,
    },
    /// A position was read, moved, or measured outside its container's live band.
    InvalidPosition {
        /// Index the position was at, or would have moved to.
        index: isize,
        /// Number of live elements in the position's container.
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { requested } => {
                write!(f, "invalid size: {requested}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::NullReference {
                required,
                available,
            } => {
                write!(
                    f,
                    "missing source data: required {required} elements, {available} available"
                )
            }
            Self::InvalidPosition { index, len } => {
                write!(f, "invalid position {index} for length {len}")
            }
        }
    }
}

impl error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

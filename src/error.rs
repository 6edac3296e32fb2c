//! Errors reported by [`Deque`](crate::Deque) operations.

use std::fmt;

/// Error returned when a deque operation cannot be carried out.
///
/// A failed operation never modifies the deque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DequeError {
    /// An index or cursor offset addresses a position outside the deque.
    IndexOutOfBound,
    /// The operation needs an element, but there is none at that position.
    EmptyContainer,
    /// The cursor belongs to another deque, or no longer matches this one.
    InvalidCursor,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DequeError>;

impl fmt::Display for DequeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DequeError::IndexOutOfBound => write!(f, "index out of bound"),
            DequeError::EmptyContainer => write!(f, "container is empty"),
            DequeError::InvalidCursor => write!(f, "invalid cursor"),
        }
    }
}

impl std::error::Error for DequeError {}

//! Blockdeque - a double-ended sequence with O(sqrt(n)) edits anywhere.
//!
//! Elements are stored in a doubly-linked chain of circular-buffer blocks.
//! Each block holds on the order of sqrt(n) elements, so pushing and popping
//! at either end stays cheap while random access, insertion and removal in the
//! middle cost O(sqrt(n)) instead of O(n).
//!
//! # Quick Start
//!
//! ```
//! use blockdeque::Deque;
//!
//! let mut deque = Deque::new();
//! deque.push_back(2);
//! deque.push_front(1);
//! deque.push_back(3);
//! assert_eq!(deque.at(1), Ok(&2));
//!
//! // Cursors name positions and survive edits made behind them.
//! let second = deque.cursor_at(1)?;
//! let inserted = deque.insert(second, 10)?;
//! assert_eq!(deque.get_at(&inserted), Ok(&10));
//! assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![1, 10, 2, 3]);
//!
//! assert_eq!(deque.pop_front(), Ok(1));
//! assert_eq!(deque.end().distance(&deque.begin())?, 3);
//! # Ok::<(), blockdeque::DequeError>(())
//! ```

pub mod deque;
pub mod error;

pub use deque::{Cursor, Deque, IntoIter, Iter, IterMut, ideal_capacity};
pub use error::{DequeError, Result};

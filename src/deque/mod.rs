//! Block Deque
//!
//! A double-ended sequence stored as a doubly-linked chain of circular-buffer
//! blocks. Blocks are kept around `ideal_capacity(n) = max(2 * ceil(sqrt(n)), 128)`
//! elements, so there are O(sqrt(n)) of them and each holds O(sqrt(n)) elements:
//!
//! - `at`, `insert`, `erase`: O(sqrt(n)) to find the block + O(sqrt(n)) to shift
//!   within it
//! - `push_*`, `pop_*`: O(1) local work + an O(sqrt(n)) rebalancing sweep
//! - `front`, `back`, cursor comparison and distance: O(1)
//!
//! Every mutation ends with a rebalancing sweep, which splits oversized blocks and
//! merges undersized neighbours. See `rebalance.rs` for the exact thresholds.

mod block;
mod chain;
mod cursor;
mod iter;
mod rebalance;

use std::fmt;
use std::ops::{Index, IndexMut};

#[cfg(debug_assertions)]
use rustc_hash::FxHashSet;

use crate::error::{DequeError, Result};

pub use block::DEFAULT_BLOCK_CAPACITY;
pub use cursor::Cursor;
pub use iter::{IntoIter, Iter, IterMut};

use block::Block;
use chain::Chain;
#[cfg(debug_assertions)]
use chain::NULL;
use cursor::DequeId;
#[cfg(debug_assertions)]
use rebalance::MERGE_DIVISOR;
use rebalance::OVERSIZE_FACTOR;

/// Lower bound for the ideal block capacity.
pub const MIN_IDEAL_CAPACITY: usize = 128;

/// Target block size for a deque of `len` elements:
/// `max(2 * ceil(sqrt(len)), 128)`.
pub fn ideal_capacity(len: usize) -> usize {
    let root = len.isqrt();
    let ceil = if root * root < len { root + 1 } else { root };
    (2 * ceil).max(MIN_IDEAL_CAPACITY)
}

/// A double-ended queue with O(sqrt(n)) insertion and removal anywhere.
///
/// Elements are boxed individually, so `T` needs neither `Default` nor
/// `Clone` for the core operations. Positions are described by [`Cursor`]s,
/// which stay valid across mutations that happen after them.
pub struct Deque<T> {
    chain: Chain<T>,
    len: usize,
    id: DequeId,
}

impl<T> Deque<T> {
    pub fn new() -> Self {
        Deque {
            chain: Chain::new(),
            len: 0,
            id: DequeId::fresh(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of blocks in the chain.
    pub fn block_count(&self) -> usize {
        self.chain.count()
    }

    /// The ideal block capacity for the current length.
    pub fn ideal_capacity(&self) -> usize {
        ideal_capacity(self.len)
    }

    /// `(size, capacity)` of every block, in order.
    pub fn block_sizes(&self) -> Vec<(usize, usize)> {
        self.chain
            .order()
            .iter()
            .map(|&idx| {
                let block = self.chain.block(idx);
                (block.len(), block.capacity())
            })
            .collect()
    }

    // --- Element access ---

    /// Element at `pos`, or `IndexOutOfBound` if `pos >= len`.
    pub fn at(&self, pos: usize) -> Result<&T> {
        self.get(pos).ok_or(DequeError::IndexOutOfBound)
    }

    pub fn at_mut(&mut self, pos: usize) -> Result<&mut T> {
        self.get_mut(pos).ok_or(DequeError::IndexOutOfBound)
    }

    pub fn get(&self, pos: usize) -> Option<&T> {
        let found = self.chain.locate(pos)?;
        self.chain.block(found.block).get(found.offset)
    }

    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        let found = self.chain.locate(pos)?;
        self.chain.block_mut(found.block).get_mut(found.offset)
    }

    pub fn front(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        self.chain
            .block(self.chain.head())
            .get(0)
            .ok_or(DequeError::EmptyContainer)
    }

    pub fn back(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        let tail = self.chain.block(self.chain.tail());
        tail.get(tail.len() - 1).ok_or(DequeError::EmptyContainer)
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        let head = self.chain.head();
        self.chain
            .block_mut(head)
            .get_mut(0)
            .ok_or(DequeError::EmptyContainer)
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        let tail = self.chain.block_mut(self.chain.tail());
        let last = tail.len() - 1;
        tail.get_mut(last).ok_or(DequeError::EmptyContainer)
    }

    // --- End operations ---

    pub fn push_back(&mut self, value: T) {
        let ideal = self.ideal_capacity();
        if self.chain.is_empty() {
            self.chain.init(Block::with_capacity(ideal));
        }

        let tail = self.chain.tail();
        if self.chain.block(tail).len() > OVERSIZE_FACTOR * ideal {
            self.chain.split(tail, None);
        }
        self.chain.make_room(self.chain.tail(), ideal, None);

        let tail = self.chain.tail();
        self.chain.block_mut(tail).push_back(Box::new(value));
        self.len += 1;

        self.chain.sweep(self.ideal_capacity(), None);
        self.check_invariants();
    }

    pub fn push_front(&mut self, value: T) {
        let ideal = self.ideal_capacity();
        if self.chain.is_empty() {
            self.chain.init(Block::with_capacity(ideal));
        }

        let head = self.chain.head();
        if self.chain.block(head).len() > OVERSIZE_FACTOR * ideal {
            self.chain.split(head, None);
        }
        self.chain.make_room(self.chain.head(), ideal, None);

        let head = self.chain.head();
        self.chain.block_mut(head).push_front(Box::new(value));
        self.len += 1;

        self.chain.sweep(self.ideal_capacity(), None);
        self.check_invariants();
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        let tail = self.chain.tail();
        let value = self
            .chain
            .block_mut(tail)
            .pop_back()
            .ok_or(DequeError::EmptyContainer)?;
        self.len -= 1;

        self.chain.merge_underflow(tail, None);
        self.finish_removal();
        Ok(*value)
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        let head = self.chain.head();
        let value = self
            .chain
            .block_mut(head)
            .pop_front()
            .ok_or(DequeError::EmptyContainer)?;
        self.len -= 1;

        self.chain.merge_underflow(head, None);
        self.finish_removal();
        Ok(*value)
    }

    /// Tear the chain down once the last element is gone, otherwise rebalance.
    fn finish_removal(&mut self) {
        if self.len == 0 {
            self.clear();
        } else {
            self.chain.sweep(self.ideal_capacity(), None);
        }
        self.check_invariants();
    }

    /// Drop every element and block.
    pub fn clear(&mut self) {
        if !self.chain.is_empty() {
            tracing::trace!(blocks = self.chain.count(), len = self.len, "clear deque");
        }
        self.chain.clear();
        self.len = 0;
    }

    // --- Iteration ---

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.chain, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.chain, self.len)
    }

    // --- Invariant checking ---

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let ideal = self.ideal_capacity();
        let mut seen = FxHashSet::default();
        let mut total = 0usize;
        let mut count = 0usize;
        let mut prev = NULL;
        let mut prev_len = None;
        let mut current = self.chain.head();

        while current != NULL {
            assert!(
                seen.insert(current),
                "INVARIANT VIOLATED: block {} linked twice",
                current
            );
            let block = self.chain.block(current);
            assert_eq!(
                block.prev, prev,
                "INVARIANT VIOLATED: block {} has prev={} but follows {}",
                current, block.prev, prev
            );
            assert!(block.len() > 0, "INVARIANT VIOLATED: block {} is empty", current);
            assert!(block.len() <= block.capacity());
            assert!(
                block.run_is_bounded(),
                "INVARIANT VIOLATED: block {} has slots out of step with head/size",
                current
            );
            assert!(
                block.len() <= OVERSIZE_FACTOR * ideal,
                "INVARIANT VIOLATED: block {} holds {} > {}",
                current,
                block.len(),
                OVERSIZE_FACTOR * ideal
            );
            if let Some(prev_len) = prev_len {
                assert!(
                    prev_len + block.len() >= ideal / MERGE_DIVISOR,
                    "INVARIANT VIOLATED: blocks {} and {} hold {} < {} together",
                    prev,
                    current,
                    prev_len + block.len(),
                    ideal / MERGE_DIVISOR
                );
            }
            total += block.len();
            count += 1;
            prev = current;
            prev_len = Some(block.len());
            current = block.next;
        }

        assert_eq!(prev, self.chain.tail(), "INVARIANT VIOLATED: tail mismatch");
        assert_eq!(
            total, self.len,
            "INVARIANT VIOLATED: block sizes sum to {} != len()={}",
            total, self.len
        );
        assert_eq!(
            count,
            self.chain.count(),
            "INVARIANT VIOLATED: {} linked blocks != block_count()={}",
            count,
            self.chain.count()
        );
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Deque<T> {
    /// Deep copy with its own identity: cursors of `self` do not apply to it.
    fn clone(&self) -> Self {
        let mut copy = Deque::new();
        copy.extend(self.iter().cloned());
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T: fmt::Debug> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Deque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Deque<T> {}

impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Deque::new();
        deque.extend(iter);
        deque
    }
}

impl<T> Index<usize> for Deque<T> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        let len = self.len;
        match self.get(pos) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, pos),
        }
    }
}

impl<T> IndexMut<usize> for Deque<T> {
    fn index_mut(&mut self, pos: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(pos) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, pos),
        }
    }
}

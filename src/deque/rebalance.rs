//! Block rebalancing: split, grow, merge, and the sweep that restores the
//! size invariants after every mutation.
//!
//! With `ideal = ideal_capacity(n)`:
//!
//! - no block holds more than `OVERSIZE_FACTOR * ideal` elements
//! - no two neighbouring blocks hold fewer than `ideal / 2` elements together
//!
//! Split, grow and merge replace or create blocks, so any position into an
//! affected block has to move with it. Each operation takes an optional
//! `&mut Position` and translates it in the same step that moves the
//! elements.

use super::block::Block;
use super::chain::{Chain, Idx, NULL, Position};

/// A block larger than `OVERSIZE_FACTOR * ideal` gets split.
pub(crate) const OVERSIZE_FACTOR: usize = 4;

/// Neighbours holding fewer than `ideal / MERGE_DIVISOR` elements together
/// get merged.
pub(crate) const MERGE_DIVISOR: usize = 2;

impl<T> Chain<T> {
    /// Move the upper half of `idx` into a new block linked right after it.
    /// With an odd size the new block receives the larger half.
    ///
    /// Returns the new block.
    pub(crate) fn split(&mut self, idx: Idx, track: Option<&mut Position>) -> Idx {
        let (size, capacity) = {
            let block = self.block(idx);
            (block.len(), block.capacity())
        };
        let mid = size / 2;
        let mut upper = Block::with_capacity(capacity);
        self.block_mut(idx).split_off(mid, &mut upper);
        let new = self.alloc(upper);
        self.link_after(idx, new);

        if let Some(pos) = track {
            if pos.block == idx && pos.offset >= mid {
                pos.block = new;
                pos.offset -= mid;
            }
        }

        tracing::trace!(block = idx, new, size, capacity, "split block");
        new
    }

    /// Replace `idx` with a block of twice the capacity holding the same
    /// elements. Returns the replacement.
    pub(crate) fn grow(&mut self, idx: Idx, track: Option<&mut Position>) -> Idx {
        let capacity = self.block(idx).capacity() * 2;
        let mut grown = Block::with_capacity(capacity);
        self.block_mut(idx).split_off(0, &mut grown);
        let new = self.alloc(grown);
        self.replace_run(idx, idx, new);

        if let Some(pos) = track {
            if pos.block == idx {
                pos.block = new;
            }
        }

        tracing::trace!(block = idx, new, capacity, "grow block");
        new
    }

    /// Replace the neighbours `left` and `right` with one block holding all
    /// of their elements. Its capacity is the smallest power of two strictly
    /// greater than the combined size. Returns the merged block.
    pub(crate) fn merge(&mut self, left: Idx, right: Idx, track: Option<&mut Position>) -> Idx {
        debug_assert_eq!(self.block(left).next, right);
        let left_size = self.block(left).len();
        let size = left_size + self.block(right).len();
        let capacity = (size + 1).next_power_of_two();
        let mut merged = Block::with_capacity(capacity);
        self.block_mut(left).split_off(0, &mut merged);
        self.block_mut(right).split_off(0, &mut merged);
        let new = self.alloc(merged);
        self.replace_run(left, right, new);

        if let Some(pos) = track {
            if pos.block == left {
                pos.block = new;
            } else if pos.block == right {
                pos.block = new;
                pos.offset += left_size;
            }
        }

        tracing::trace!(left, right, new, size, capacity, "merge blocks");
        new
    }

    /// Make sure `idx` has a free slot: a full block grows while its capacity
    /// is below `ideal`, and splits once it has reached it.
    pub(crate) fn make_room(&mut self, idx: Idx, ideal: usize, track: Option<&mut Position>) {
        let block = self.block(idx);
        if !block.is_full() {
            return;
        }
        if block.capacity() < ideal {
            self.grow(idx, track);
        } else {
            self.split(idx, track);
        }
    }

    /// Merge an underflowing block into its predecessor, or into its
    /// successor when it is the head. Does nothing for a lone block.
    pub(crate) fn merge_underflow(&mut self, idx: Idx, track: Option<&mut Position>) {
        let block = self.block(idx);
        if !block.is_underflow() || self.count() < 2 {
            return;
        }
        let (prev, next) = (block.prev, block.next);
        if prev != NULL {
            self.merge(prev, idx, track);
        } else {
            self.merge(idx, next, track);
        }
    }

    /// One left-to-right pass restoring the size invariants.
    ///
    /// Each block is first merged into its predecessor if the pair is below
    /// the merge threshold, then split while it is oversized. A merge only
    /// grows the block behind the sweep and a split only produces halves
    /// above the threshold, so nothing behind the current block can be
    /// left in violation.
    pub(crate) fn sweep(&mut self, ideal: usize, mut track: Option<&mut Position>) {
        let oversize = OVERSIZE_FACTOR * ideal;
        let threshold = ideal / MERGE_DIVISOR;

        let mut current = self.head();
        while current != NULL {
            let prev = self.block(current).prev;
            if prev != NULL && self.block(prev).len() + self.block(current).len() < threshold {
                current = self.merge(prev, current, track.as_deref_mut());
            }
            while self.block(current).len() > oversize {
                self.split(current, track.as_deref_mut());
            }
            current = self.block(current).next;
        }
    }
}

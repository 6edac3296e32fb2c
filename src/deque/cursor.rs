//! Cursors: positions into a deque with O(1) comparison and distance.
//!
//! A [`Cursor`] is a detached, copyable position. It remembers the block and
//! in-block offset it points at, plus the global index of that element, so
//! comparing two cursors or measuring the distance between them never walks
//! the chain. Moving a cursor by `k` only walks block boundaries it crosses.
//!
//! Because a cursor does not borrow its deque, the deque stays mutable while
//! cursors exist. Each deque carries a unique id which every cursor records,
//! so a cursor handed to the wrong deque is rejected with `InvalidCursor`.
//!
//! # Validity
//!
//! A cursor stays usable while the block it points into is left alone and
//! nothing is inserted or removed before it. `insert` and `erase` return
//! cursors re-derived after any split, merge or grow they caused. Any other
//! cursor into a restructured block is stale: `insert` and `erase` reject it
//! with `InvalidCursor`.

use std::sync::atomic::{AtomicU64, Ordering};

use super::chain::{Idx, NULL, Position};
use super::Deque;
use crate::error::{DequeError, Result};

/// Identity of one deque instance. Clones get a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct DequeId(u64);

impl DequeId {
    pub(crate) fn fresh() -> DequeId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        DequeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position in a [`Deque`]: an element, or the past-the-end position.
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    pub(super) owner: DequeId,
    pub(super) block: Idx,
    /// Generation of `block` when the cursor was taken.
    pub(super) generation: u64,
    pub(super) offset: usize,
    /// Global index, `len()` for the past-the-end cursor.
    pub(super) index: usize,
    pub(super) is_end: bool,
}

impl Cursor {
    /// Global index of the element, or the deque length for past-the-end.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    /// `self - other`, in elements.
    ///
    /// Fails with `InvalidCursor` if the cursors come from different deques.
    pub fn distance(&self, other: &Cursor) -> Result<isize> {
        if self.owner != other.owner {
            return Err(DequeError::InvalidCursor);
        }
        Ok(self.index as isize - other.index as isize)
    }

    fn position(&self) -> Position {
        Position {
            block: self.block,
            offset: self.offset,
        }
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Cursor) -> bool {
        if self.owner != other.owner {
            return false;
        }
        if self.is_end || other.is_end {
            return self.is_end == other.is_end;
        }
        self.block == other.block
            && self.generation == other.generation
            && self.offset == other.offset
    }
}

impl Eq for Cursor {}

impl<T> Deque<T> {
    fn cursor(&self, pos: Position, index: usize) -> Cursor {
        Cursor {
            owner: self.id,
            block: pos.block,
            generation: self.chain.block(pos.block).generation,
            offset: pos.offset,
            index,
            is_end: false,
        }
    }

    /// Cursor to the first element, or `end()` if the deque is empty.
    pub fn begin(&self) -> Cursor {
        if self.is_empty() {
            return self.end();
        }
        self.cursor(
            Position {
                block: self.chain.head(),
                offset: 0,
            },
            0,
        )
    }

    /// The past-the-end cursor.
    pub fn end(&self) -> Cursor {
        let tail = self.chain.tail();
        let (generation, offset) = if tail == NULL {
            (0, 0)
        } else {
            let block = self.chain.block(tail);
            (block.generation, block.len())
        };
        Cursor {
            owner: self.id,
            block: tail,
            generation,
            offset,
            index: self.len,
            is_end: true,
        }
    }

    /// Cursor to index `index`, where `index == len()` gives `end()`.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor> {
        if index == self.len {
            return Ok(self.end());
        }
        let pos = self
            .chain
            .locate(index)
            .ok_or(DequeError::IndexOutOfBound)?;
        Ok(self.cursor(pos, index))
    }

    /// Cheap structural check: the cursor belongs to this deque and names a
    /// live slot. Does not walk the chain.
    fn validate(&self, cursor: &Cursor) -> Result<()> {
        if cursor.owner != self.id || cursor.index > self.len {
            return Err(DequeError::InvalidCursor);
        }
        if cursor.is_end {
            return if cursor.index == self.len {
                Ok(())
            } else {
                Err(DequeError::InvalidCursor)
            };
        }
        if cursor.index == self.len
            || !self.chain.is_live(cursor.block, cursor.generation)
            || cursor.offset >= self.chain.block(cursor.block).len()
        {
            return Err(DequeError::InvalidCursor);
        }
        Ok(())
    }

    /// Full check used before mutating at a cursor: the cursor's block and
    /// offset must be exactly where its index lives now.
    fn resolve(&self, cursor: &Cursor) -> Result<Position> {
        self.validate(cursor)?;
        if cursor.is_end {
            let end = self.end();
            return Ok(end.position());
        }
        match self.chain.locate(cursor.index) {
            Some(pos) if pos == cursor.position() => Ok(pos),
            _ => Err(DequeError::InvalidCursor),
        }
    }

    /// Move `cursor` by `k` elements (negative moves backward).
    ///
    /// Fails with `IndexOutOfBound` if the result would leave `[0, len()]`.
    pub fn advance(&self, cursor: Cursor, k: isize) -> Result<Cursor> {
        self.validate(&cursor)?;
        let target = cursor
            .index
            .checked_add_signed(k)
            .filter(|&target| target <= self.len)
            .ok_or(DequeError::IndexOutOfBound)?;
        if target == self.len {
            return Ok(self.end());
        }
        if k == 0 {
            return Ok(cursor);
        }
        // The end cursor may predate a restructuring of the tail.
        let cursor = if cursor.is_end { self.end() } else { cursor };

        let mut block = cursor.block;
        let mut offset;
        if k > 0 {
            offset = cursor.offset + k.unsigned_abs();
            loop {
                let current = self.chain.block(block);
                if offset < current.len() {
                    break;
                }
                offset -= current.len();
                block = current.next;
                if block == NULL {
                    return Err(DequeError::InvalidCursor);
                }
            }
        } else {
            let mut back = k.unsigned_abs();
            offset = cursor.offset;
            while back > offset {
                back -= offset;
                block = self.chain.block(block).prev;
                if block == NULL {
                    return Err(DequeError::InvalidCursor);
                }
                // One past the last element, so stepping once more lands on it.
                offset = self.chain.block(block).len();
            }
            offset -= back;
        }
        Ok(self.cursor(Position { block, offset }, target))
    }

    /// The cursor one element further (`++`).
    pub fn next_cursor(&self, cursor: Cursor) -> Result<Cursor> {
        self.advance(cursor, 1)
    }

    /// The cursor one element back (`--`).
    pub fn prev_cursor(&self, cursor: Cursor) -> Result<Cursor> {
        self.advance(cursor, -1)
    }

    /// The element `cursor` points at.
    ///
    /// Fails with `EmptyContainer` for the past-the-end cursor, a block that
    /// has since been merged or grown away, or an offset that no longer holds
    /// an element.
    pub fn get_at(&self, cursor: &Cursor) -> Result<&T> {
        let pos = self.dereferenceable(cursor)?;
        self.chain
            .block(pos.block)
            .get(pos.offset)
            .ok_or(DequeError::EmptyContainer)
    }

    pub fn get_at_mut(&mut self, cursor: &Cursor) -> Result<&mut T> {
        let pos = self.dereferenceable(cursor)?;
        self.chain
            .block_mut(pos.block)
            .get_mut(pos.offset)
            .ok_or(DequeError::EmptyContainer)
    }

    fn dereferenceable(&self, cursor: &Cursor) -> Result<Position> {
        if cursor.owner != self.id {
            return Err(DequeError::InvalidCursor);
        }
        if cursor.is_end || !self.chain.is_live(cursor.block, cursor.generation) {
            return Err(DequeError::EmptyContainer);
        }
        Ok(cursor.position())
    }

    /// Insert `value` before `cursor` and return a cursor to it.
    ///
    /// Inserting at `begin()` or `end()` is `push_front` or `push_back`.
    pub fn insert(&mut self, cursor: Cursor, value: T) -> Result<Cursor> {
        let mut pos = self.resolve(&cursor)?;
        if cursor.is_end {
            self.push_back(value);
            return self.cursor_at(self.len - 1);
        }
        if cursor.index == 0 {
            self.push_front(value);
            return Ok(self.begin());
        }

        self.chain.make_room(pos.block, self.ideal_capacity(), Some(&mut pos));
        self.chain
            .block_mut(pos.block)
            .insert(pos.offset, Box::new(value));
        self.len += 1;

        self.chain.sweep(self.ideal_capacity(), Some(&mut pos));
        self.check_invariants();
        Ok(self.cursor(pos, cursor.index))
    }

    /// Remove the element at `cursor` and return a cursor to the element
    /// that takes its place, or `end()` if it was the last one.
    ///
    /// Past-the-end and out-of-range cursors fail with `InvalidCursor`, which
    /// covers every cursor of an empty deque.
    pub fn erase(&mut self, cursor: Cursor) -> Result<Cursor> {
        if cursor.owner != self.id || cursor.is_end || cursor.index >= self.len {
            return Err(DequeError::InvalidCursor);
        }
        let mut pos = self.resolve(&cursor)?;
        if cursor.index == self.len - 1 {
            self.pop_back()?;
            return Ok(self.end());
        }

        drop(self.chain.block_mut(pos.block).remove(pos.offset));
        self.len -= 1;

        self.chain.merge_underflow(pos.block, Some(&mut pos));
        if self.len == 0 {
            self.clear();
            return Ok(self.end());
        }
        let block = self.chain.block(pos.block);
        if pos.offset == block.len() {
            pos = Position {
                block: block.next,
                offset: 0,
            };
        }
        debug_assert_ne!(pos.block, NULL);

        self.chain.sweep(self.ideal_capacity(), Some(&mut pos));
        self.check_invariants();
        Ok(self.cursor(pos, cursor.index))
    }
}

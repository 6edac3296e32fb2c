//! Fixed-capacity circular buffer holding one run of the deque.
//!
//! Every live element sits in its own heap allocation (`Box<T>`), so a block
//! never needs a default or placeholder value for its unused slots: an empty
//! slot is simply `None`. Moving elements between blocks moves the boxes.
//!
//! Logical offset `i` lives in physical slot `(head + i) % capacity`.

use std::iter::{self, FilterMap};
use std::slice;

use super::chain::{Idx, NULL};

/// Capacity of a freshly created block.
pub const DEFAULT_BLOCK_CAPACITY: usize = 128;

/// A block is in underflow once `UNDERFLOW_FACTOR * size <= capacity`.
const UNDERFLOW_FACTOR: usize = 4;

/// One storage cell of a block.
pub(crate) type Slot<T> = Option<Box<T>>;

/// Live elements of a block in logical order, mutably.
pub(crate) type SlotsMut<'a, T> = FilterMap<
    iter::Chain<slice::IterMut<'a, Slot<T>>, slice::IterMut<'a, Slot<T>>>,
    fn(&'a mut Slot<T>) -> Option<&'a mut T>,
>;

fn live_mut<T>(slot: &mut Slot<T>) -> Option<&mut T> {
    slot.as_deref_mut()
}

/// A circular buffer of owned element slots, linked into the chain.
pub(crate) struct Block<T> {
    slots: Vec<Slot<T>>,
    /// Physical slot of logical offset 0.
    head: usize,
    /// Number of live elements.
    size: usize,
    /// Previous block in the chain, or `NULL`.
    pub(crate) prev: Idx,
    /// Next block in the chain, or `NULL`.
    pub(crate) next: Idx,
    /// Set by the arena on allocation and never reused, so a cursor can tell
    /// a recycled slot from the block it was taken from. Zero when vacant.
    pub(crate) generation: u64,
}

impl<T> Block<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "blocks need at least one slot");
        Block {
            slots: iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            size: 0,
            prev: NULL,
            next: NULL,
            generation: 0,
        }
    }

    /// A placeholder occupying a released arena slot. Owns no storage.
    pub(crate) fn vacant() -> Self {
        Block {
            slots: Vec::new(),
            head: 0,
            size: 0,
            prev: NULL,
            next: NULL,
            generation: 0,
        }
    }

    pub(crate) fn is_vacant(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    pub(crate) fn is_underflow(&self) -> bool {
        UNDERFLOW_FACTOR * self.size <= self.capacity()
    }

    /// The live run is bounded by the slots around it: the first and last live
    /// slots are occupied and, unless the block is full, the slots just
    /// outside the run are empty. Constant time.
    pub(crate) fn run_is_bounded(&self) -> bool {
        if self.size == 0 {
            return true;
        }
        let first = self.slots[self.head].is_some();
        let last = self.slots[self.physical(self.size - 1)].is_some();
        if self.is_full() {
            return first && last;
        }
        let before = self.slots[self.physical(self.capacity() - 1)].is_none();
        let after = self.slots[self.tail()].is_none();
        first && last && before && after
    }

    /// Physical slot one past the last live element.
    pub(crate) fn tail(&self) -> usize {
        self.physical(self.size)
    }

    #[inline]
    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }

    pub(crate) fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.size {
            return None;
        }
        self.slots[self.physical(offset)].as_deref()
    }

    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        if offset >= self.size {
            return None;
        }
        let slot = self.physical(offset);
        self.slots[slot].as_deref_mut()
    }

    pub(crate) fn push_back(&mut self, value: Box<T>) {
        debug_assert!(!self.is_full());
        let slot = self.tail();
        self.slots[slot] = Some(value);
        self.size += 1;
    }

    pub(crate) fn push_front(&mut self, value: Box<T>) {
        debug_assert!(!self.is_full());
        self.head = self.physical(self.capacity() - 1);
        self.slots[self.head] = Some(value);
        self.size += 1;
    }

    pub(crate) fn pop_back(&mut self) -> Option<Box<T>> {
        if self.size == 0 {
            return None;
        }
        let slot = self.physical(self.size - 1);
        self.size -= 1;
        self.slots[slot].take()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Box<T>> {
        if self.size == 0 {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = self.physical(1);
        self.size -= 1;
        value
    }

    /// Insert `value` so that it ends up at logical `offset`.
    ///
    /// Shifts whichever side of `offset` is shorter, so at most `size / 2`
    /// boxes move. The block must not be full.
    pub(crate) fn insert(&mut self, offset: usize, value: Box<T>) {
        debug_assert!(!self.is_full());
        debug_assert!(offset <= self.size);
        if offset < self.size / 2 {
            // Open a slot before the head and walk it forward to `offset`.
            self.head = self.physical(self.capacity() - 1);
            for i in 0..offset {
                let (a, b) = (self.physical(i), self.physical(i + 1));
                self.slots.swap(a, b);
            }
        } else {
            // Walk the empty tail slot backward to `offset`.
            for i in (offset..self.size).rev() {
                let (a, b) = (self.physical(i), self.physical(i + 1));
                self.slots.swap(a, b);
            }
        }
        let slot = self.physical(offset);
        self.slots[slot] = Some(value);
        self.size += 1;
    }

    /// Remove the element at logical `offset`, closing the gap.
    pub(crate) fn remove(&mut self, offset: usize) -> Option<Box<T>> {
        if offset >= self.size {
            return None;
        }
        let slot = self.physical(offset);
        let value = self.slots[slot].take();
        if offset < self.size / 2 {
            for i in (0..offset).rev() {
                let (a, b) = (self.physical(i), self.physical(i + 1));
                self.slots.swap(a, b);
            }
            self.head = self.physical(1);
        } else {
            for i in offset..self.size - 1 {
                let (a, b) = (self.physical(i), self.physical(i + 1));
                self.slots.swap(a, b);
            }
        }
        self.size -= 1;
        value
    }

    /// Move logical `[at, size)` to the back of `into`, preserving order.
    ///
    /// `split_off(0, ..)` drains the whole block.
    pub(crate) fn split_off(&mut self, at: usize, into: &mut Block<T>) {
        debug_assert!(at <= self.size);
        debug_assert!(into.capacity() - into.len() >= self.size - at);
        for offset in at..self.size {
            let slot = self.physical(offset);
            if let Some(value) = self.slots[slot].take() {
                into.push_back(value);
            }
        }
        self.size = at;
        if at == 0 {
            self.head = 0;
        }
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        (0..self.size).filter_map(move |offset| self.get(offset))
    }

    /// Live elements in logical order. Empty slots are skipped, and the live
    /// run starts at `head`, so `[head..]` followed by `[..head]` is in order.
    pub(crate) fn iter_mut<'a>(&'a mut self) -> SlotsMut<'a, T> {
        let (wrapped, leading) = self.slots.split_at_mut(self.head);
        leading
            .iter_mut()
            .chain(wrapped.iter_mut())
            .filter_map(live_mut::<T> as fn(&'a mut Slot<T>) -> Option<&'a mut T>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(block: &Block<u32>) -> Vec<u32> {
        block.iter().copied().collect()
    }

    fn filled(capacity: usize, values: &[u32]) -> Block<u32> {
        let mut block = Block::with_capacity(capacity);
        for &v in values {
            block.push_back(Box::new(v));
        }
        block
    }

    #[test]
    fn empty_block() {
        let block: Block<u32> = Block::with_capacity(DEFAULT_BLOCK_CAPACITY);
        assert_eq!(block.len(), 0);
        assert_eq!(block.capacity(), 128);
        assert!(!block.is_full());
        assert!(block.is_underflow());
        assert_eq!(block.get(0), None);
    }

    #[test]
    fn push_both_ends_wraps_around() {
        let mut block = Block::with_capacity(4);
        block.push_back(Box::new(2));
        block.push_front(Box::new(1));
        block.push_back(Box::new(3));
        block.push_front(Box::new(0));
        assert!(block.is_full());
        assert_eq!(contents(&block), vec![0, 1, 2, 3]);
        // head wrapped to the last physical slot and back
        assert_eq!(block.head, 2);
        assert_eq!(block.tail(), 2);
    }

    #[test]
    fn pop_both_ends() {
        let mut block = filled(4, &[1, 2, 3]);
        assert_eq!(block.pop_front().map(|b| *b), Some(1));
        assert_eq!(block.pop_back().map(|b| *b), Some(3));
        assert_eq!(contents(&block), vec![2]);
        assert_eq!(block.pop_back().map(|b| *b), Some(2));
        assert_eq!(block.pop_back(), None);
        assert_eq!(block.pop_front(), None);
    }

    #[test]
    fn underflow_at_quarter() {
        let block = filled(8, &[1, 2]);
        assert!(block.is_underflow());
        let block = filled(8, &[1, 2, 3]);
        assert!(!block.is_underflow());
    }

    #[test]
    fn insert_near_front_and_back() {
        let mut block = filled(8, &[0, 1, 2, 3, 4, 5]);
        block.insert(1, Box::new(10));
        assert_eq!(contents(&block), vec![0, 10, 1, 2, 3, 4, 5]);
        block.insert(6, Box::new(20));
        assert_eq!(contents(&block), vec![0, 10, 1, 2, 3, 4, 20, 5]);
        assert!(block.is_full());
    }

    #[test]
    fn insert_at_ends() {
        let mut block = filled(4, &[1]);
        block.insert(0, Box::new(0));
        block.insert(2, Box::new(2));
        assert_eq!(contents(&block), vec![0, 1, 2]);
    }

    #[test]
    fn insert_after_wrap() {
        let mut block = Block::with_capacity(5);
        for v in [3, 2, 1] {
            block.push_front(Box::new(v));
        }
        block.push_back(Box::new(5));
        block.insert(3, Box::new(4));
        assert_eq!(contents(&block), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn remove_near_front_and_back() {
        let mut block = filled(8, &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(block.remove(1).map(|b| *b), Some(1));
        assert_eq!(contents(&block), vec![0, 2, 3, 4, 5, 6]);
        assert_eq!(block.remove(4).map(|b| *b), Some(5));
        assert_eq!(contents(&block), vec![0, 2, 3, 4, 6]);
        assert_eq!(block.remove(5), None);
        // freed slots are reusable from both ends
        block.push_front(Box::new(9));
        block.push_back(Box::new(7));
        assert_eq!(contents(&block), vec![9, 0, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn split_off_upper_half() {
        let mut block = filled(8, &[0, 1, 2, 3, 4]);
        let mut upper = Block::with_capacity(8);
        block.split_off(2, &mut upper);
        assert_eq!(contents(&block), vec![0, 1]);
        assert_eq!(contents(&upper), vec![2, 3, 4]);
    }

    #[test]
    fn split_off_zero_drains() {
        let mut block = Block::with_capacity(4);
        block.push_back(Box::new(2));
        block.push_front(Box::new(1));
        let mut into = filled(8, &[0]);
        block.split_off(0, &mut into);
        assert_eq!(block.len(), 0);
        assert_eq!(contents(&into), vec![0, 1, 2]);
    }

    #[test]
    fn iter_mut_follows_logical_order() {
        let mut block = Block::with_capacity(4);
        block.push_back(Box::new(3));
        block.push_front(Box::new(2));
        block.push_front(Box::new(1));
        for v in block.iter_mut() {
            *v *= 10;
        }
        assert_eq!(contents(&block), vec![10, 20, 30]);
        let reversed: Vec<u32> = block.iter_mut().rev().map(|v| *v).collect();
        assert_eq!(reversed, vec![30, 20, 10]);
    }

    #[test]
    fn bounded_run_after_edits() {
        let mut block = Block::with_capacity(8);
        assert!(block.run_is_bounded());
        for v in [3, 2, 1] {
            block.push_front(Box::new(v));
        }
        block.push_back(Box::new(4));
        block.insert(2, Box::new(9));
        assert!(block.run_is_bounded());
        block.remove(0);
        block.remove(3);
        assert!(block.run_is_bounded());
        for v in 0..5 {
            block.push_back(Box::new(v));
        }
        assert!(block.is_full());
        assert!(block.run_is_bounded());
    }

    #[test]
    fn stray_slot_outside_run_is_detected() {
        let mut block = filled(8, &[1, 2, 3]);
        let outside = block.tail();
        block.slots[outside] = Some(Box::new(99));
        assert!(!block.run_is_bounded());

        let mut block = filled(8, &[1, 2, 3]);
        let last = block.physical(2);
        block.slots[last] = None;
        assert!(!block.run_is_bounded());
    }

    #[test]
    fn vacant_block() {
        let block: Block<u32> = Block::vacant();
        assert!(block.is_vacant());
        assert_eq!(block.len(), 0);
    }
}

//! Iterators over a deque: borrowed, mutably borrowed, and owning.

use std::iter::FusedIterator;

use super::block::{Block, SlotsMut};
use super::chain::{Chain, NULL, Position};
use super::Deque;

/// Borrowing iterator, front to back. Created by [`Deque::iter`].
pub struct Iter<'a, T> {
    chain: &'a Chain<T>,
    front: Position,
    /// One past the next element from the back.
    back: Position,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(chain: &'a Chain<T>, len: usize) -> Self {
        let tail = chain.tail();
        let back_offset = if tail == NULL { 0 } else { chain.block(tail).len() };
        Iter {
            chain,
            front: Position {
                block: chain.head(),
                offset: 0,
            },
            back: Position {
                block: tail,
                offset: back_offset,
            },
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let chain: &'a Chain<T> = self.chain;
        let mut block = chain.block(self.front.block);
        while self.front.offset >= block.len() {
            self.front = Position {
                block: block.next,
                offset: 0,
            };
            block = chain.block(self.front.block);
        }
        let value = block.get(self.front.offset)?;
        self.front.offset += 1;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let chain: &'a Chain<T> = self.chain;
        while self.back.offset == 0 {
            let prev = chain.block(self.back.block).prev;
            self.back = Position {
                block: prev,
                offset: chain.block(prev).len(),
            };
        }
        self.back.offset -= 1;
        self.remaining -= 1;
        chain.block(self.back.block).get(self.back.offset)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// Mutably borrowing iterator, front to back. Created by [`Deque::iter_mut`].
pub struct IterMut<'a, T> {
    /// Blocks in chain order that have not been entered yet.
    blocks: std::vec::IntoIter<&'a mut Block<T>>,
    front: Option<SlotsMut<'a, T>>,
    back: Option<SlotsMut<'a, T>>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(chain: &'a mut Chain<T>, len: usize) -> Self {
        let order = chain.order();
        let mut by_index: Vec<Option<&'a mut Block<T>>> = chain.blocks_mut().map(Some).collect();
        let linked: Vec<&'a mut Block<T>> = order
            .iter()
            .filter_map(|&idx| by_index[idx as usize].take())
            .collect();
        IterMut {
            blocks: linked.into_iter(),
            front: None,
            back: None,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(value) = self.front.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(value);
            }
            match self.blocks.next() {
                Some(block) => self.front = Some(block.iter_mut()),
                None => break,
            }
        }
        // Everything left was already opened from the back.
        let value = self.back.as_mut().and_then(Iterator::next)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(value) = self.back.as_mut().and_then(DoubleEndedIterator::next_back) {
                self.remaining -= 1;
                return Some(value);
            }
            match self.blocks.next_back() {
                Some(block) => self.back = Some(block.iter_mut()),
                None => break,
            }
        }
        let value = self.front.as_mut().and_then(DoubleEndedIterator::next_back)?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator. Created by `Deque::into_iter`.
pub struct IntoIter<T> {
    deque: Deque<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.deque.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len(), Some(self.deque.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Deque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { deque: self }
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Deque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_iterators() {
        let mut deque: Deque<u32> = Deque::new();
        assert_eq!(deque.iter().next(), None);
        assert_eq!(deque.iter().next_back(), None);
        assert_eq!(deque.iter_mut().next(), None);
        assert_eq!(deque.into_iter().next(), None);
    }

    #[test]
    fn iter_crosses_blocks_both_ways() {
        let deque: Deque<u32> = (0..1000).collect();
        assert!(deque.block_count() > 1);
        assert!(deque.iter().copied().eq(0..1000));
        assert!(deque.iter().rev().copied().eq((0..1000).rev()));
        assert_eq!(deque.iter().len(), 1000);
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let deque: Deque<u32> = (0..301).collect();
        let mut iter = deque.iter();
        let mut seen = Vec::new();
        loop {
            match (iter.next(), iter.next_back()) {
                (Some(a), Some(b)) => {
                    seen.push(*a);
                    seen.push(*b);
                }
                (Some(a), None) => {
                    seen.push(*a);
                    break;
                }
                (None, _) => break,
            }
        }
        seen.sort_unstable();
        assert!(seen.into_iter().eq(0..301));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_after_front_pushes() {
        let mut deque = Deque::new();
        for i in 0..500u32 {
            deque.push_front(i);
        }
        assert!(deque.iter().copied().eq((0..500).rev()));
    }

    #[test]
    fn iter_mut_writes_every_element() {
        let mut deque: Deque<u32> = (0..700).collect();
        for v in deque.iter_mut() {
            *v *= 2;
        }
        assert!(deque.iter().copied().eq((0..700).map(|v| v * 2)));
        for v in &mut deque {
            *v += 1;
        }
        assert_eq!(deque.at(699), Ok(&1399));
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut deque: Deque<u32> = (0..400).collect();
        let mut iter = deque.iter_mut();
        let mut count = 0;
        while let Some(v) = iter.next() {
            *v = 0;
            count += 1;
            if let Some(w) = iter.next_back() {
                *w = 1;
                count += 1;
            }
        }
        assert_eq!(count, 400);
        assert_eq!(deque.iter().filter(|&&v| v == 0).count(), 200);
        assert_eq!(deque.front(), Ok(&0));
        assert_eq!(deque.back(), Ok(&1));
    }

    #[test]
    fn into_iter_drains_in_order() {
        let deque: Deque<String> = (0..300).map(|i| i.to_string()).collect();
        let mut iter = deque.into_iter();
        assert_eq!(iter.len(), 300);
        assert_eq!(iter.next().as_deref(), Some("0"));
        assert_eq!(iter.next_back().as_deref(), Some("299"));
        assert_eq!(iter.count(), 298);
    }

    #[test]
    fn borrowed_into_iterator() {
        let deque: Deque<u32> = (1..=4).collect();
        let mut sum = 0;
        for v in &deque {
            sum += v;
        }
        assert_eq!(sum, 10);
    }
}

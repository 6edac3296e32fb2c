//! The chain of blocks backing a deque.
//!
//! Blocks live in an arena (`Vec<Block<T>>`) and refer to each other by
//! index, so the doubly-linked chain has no owning cycles: the arena owns
//! every block, and `prev`/`next` are plain indices used for navigation.
//! Released slots are recycled through a free list.
//!
//! ```text
//! head                                     tail
//!  |                                         |
//!  v                                         v
//! [B3] <-> [B0] <-> [B5] <-> ... <-> [B1]
//! ```

use smallvec::SmallVec;

use super::block::Block;

/// Index of a block in the arena.
pub(crate) type Idx = u32;

/// Marker for "no block".
pub(crate) const NULL: Idx = Idx::MAX;

/// A location inside the chain: a block and a logical offset in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) block: Idx,
    pub(crate) offset: usize,
}

/// Arena of blocks plus the links that order them.
pub(crate) struct Chain<T> {
    blocks: Vec<Block<T>>,
    free_list: Vec<Idx>,
    head: Idx,
    tail: Idx,
    /// Number of linked blocks.
    count: usize,
    /// Generation handed to the next allocated block. Survives `clear`.
    next_generation: u64,
}

impl<T> Chain<T> {
    pub(crate) fn new() -> Self {
        Chain {
            blocks: Vec::new(),
            free_list: Vec::new(),
            head: NULL,
            tail: NULL,
            count: 0,
            next_generation: 1,
        }
    }

    pub(crate) fn head(&self) -> Idx {
        self.head
    }

    pub(crate) fn tail(&self) -> Idx {
        self.tail
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head == NULL
    }

    // --- Block access ---

    pub(crate) fn block(&self, idx: Idx) -> &Block<T> {
        &self.blocks[idx as usize]
    }

    pub(crate) fn block_mut(&mut self, idx: Idx) -> &mut Block<T> {
        &mut self.blocks[idx as usize]
    }

    /// Whether `idx` still names the block that was allocated as `generation`.
    pub(crate) fn is_live(&self, idx: Idx, generation: u64) -> bool {
        self.blocks
            .get(idx as usize)
            .is_some_and(|block| !block.is_vacant() && block.generation == generation)
    }

    pub(crate) fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block<T>> {
        self.blocks.iter_mut()
    }

    // --- Allocation ---

    /// Place `block` in the arena, reusing a released slot if there is one.
    /// The block is not linked yet.
    pub(crate) fn alloc(&mut self, mut block: Block<T>) -> Idx {
        block.generation = self.next_generation;
        self.next_generation += 1;
        if let Some(idx) = self.free_list.pop() {
            self.blocks[idx as usize] = block;
            idx
        } else {
            let idx = self.blocks.len() as Idx;
            self.blocks.push(block);
            idx
        }
    }

    /// Drop the block at `idx` (and anything still in it) and recycle the slot.
    fn release(&mut self, idx: Idx) {
        self.blocks[idx as usize] = Block::vacant();
        self.free_list.push(idx);
    }

    // --- Linking ---

    /// Start a chain consisting of a single block.
    pub(crate) fn init(&mut self, block: Block<T>) -> Idx {
        debug_assert!(self.is_empty());
        let idx = self.alloc(block);
        self.head = idx;
        self.tail = idx;
        self.count = 1;
        idx
    }

    /// Splice the unlinked block `new` in right after `at`.
    pub(crate) fn link_after(&mut self, at: Idx, new: Idx) {
        let next = self.block(at).next;
        {
            let block = self.block_mut(new);
            block.prev = at;
            block.next = next;
        }
        self.block_mut(at).next = new;
        if next == NULL {
            self.tail = new;
        } else {
            self.block_mut(next).prev = new;
        }
        self.count += 1;
    }

    /// Put the unlinked block `new` where the run `first..=last` is, then
    /// release every block of that run.
    ///
    /// `first == last` replaces a single block.
    pub(crate) fn replace_run(&mut self, first: Idx, last: Idx, new: Idx) {
        let prev = self.block(first).prev;
        let next = self.block(last).next;
        {
            let block = self.block_mut(new);
            block.prev = prev;
            block.next = next;
        }
        if prev == NULL {
            self.head = new;
        } else {
            self.block_mut(prev).next = new;
        }
        if next == NULL {
            self.tail = new;
        } else {
            self.block_mut(next).prev = new;
        }

        let mut current = first;
        loop {
            let following = self.block(current).next;
            self.release(current);
            self.count -= 1;
            if current == last {
                break;
            }
            current = following;
        }
        self.count += 1;
    }

    /// Release every block.
    pub(crate) fn clear(&mut self) {
        self.blocks.clear();
        self.free_list.clear();
        self.head = NULL;
        self.tail = NULL;
        self.count = 0;
    }

    // --- Traversal ---

    /// Block indices in chain order.
    pub(crate) fn order(&self) -> SmallVec<[Idx; 16]> {
        let mut order = SmallVec::with_capacity(self.count);
        let mut current = self.head;
        while current != NULL {
            order.push(current);
            current = self.block(current).next;
        }
        order
    }

    /// Find the block holding global index `index` by walking from the head.
    /// Returns `None` if `index` is past the last element.
    pub(crate) fn locate(&self, index: usize) -> Option<Position> {
        let mut current = self.head;
        let mut before = 0usize;
        while current != NULL {
            let block = self.block(current);
            if before + block.len() > index {
                return Some(Position {
                    block: current,
                    offset: index - before,
                });
            }
            before += block.len();
            current = block.next;
        }
        None
    }
}

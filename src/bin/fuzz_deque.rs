//! AFL fuzz harness for the block deque.
//!
//! Every operation is applied both to a `Deque` and to a `VecDeque` model;
//! after each step the two must agree on length, ends, and the middle element.
//! Debug builds additionally run the deque's internal invariant checks on
//! every mutation.

use std::collections::VecDeque;

use afl::fuzz;
use blockdeque::{Deque, DequeError};

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    PushBack { value: u8 },
    PushFront { value: u8 },
    PopBack,
    PopFront,
    /// Insert before the element at `pos_frac / 256` of the length
    Insert { pos_frac: u8, value: u8 },
    /// Erase the element at `pos_frac / 256` of the length
    Erase { pos_frac: u8 },
    /// Push `count * 16` elements at the back, to force splits
    Bulk { count: u8 },
    Clear,
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        match tag % 8 {
            0 if !rest.is_empty() => Some((FuzzOp::PushBack { value: rest[0] }, &rest[1..])),
            1 if !rest.is_empty() => Some((FuzzOp::PushFront { value: rest[0] }, &rest[1..])),
            2 => Some((FuzzOp::PopBack, rest)),
            3 => Some((FuzzOp::PopFront, rest)),
            4 if rest.len() >= 2 => {
                let op = FuzzOp::Insert {
                    pos_frac: rest[0],
                    value: rest[1],
                };
                Some((op, &rest[2..]))
            }
            5 if !rest.is_empty() => Some((FuzzOp::Erase { pos_frac: rest[0] }, &rest[1..])),
            6 if !rest.is_empty() => Some((FuzzOp::Bulk { count: rest[0] % 64 }, &rest[1..])),
            // Rare, so runs build up enough elements to matter
            7 if rest.first() == Some(&0xff) => Some((FuzzOp::Clear, &rest[1..])),
            7 => Some((FuzzOp::PopFront, rest)),
            _ => None,
        }
    }
}

fn scaled(pos_frac: u8, len: usize) -> usize {
    pos_frac as usize * len / 256
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut deque: Deque<u8> = Deque::new();
        let mut model: VecDeque<u8> = VecDeque::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            match op {
                FuzzOp::PushBack { value } => {
                    deque.push_back(value);
                    model.push_back(value);
                }
                FuzzOp::PushFront { value } => {
                    deque.push_front(value);
                    model.push_front(value);
                }
                FuzzOp::PopBack => {
                    assert_eq!(deque.pop_back().ok(), model.pop_back());
                }
                FuzzOp::PopFront => {
                    assert_eq!(deque.pop_front().ok(), model.pop_front());
                }
                FuzzOp::Insert { pos_frac, value } => {
                    let pos = scaled(pos_frac, model.len() + 1);
                    let cursor = deque.cursor_at(pos).expect("position within bounds");
                    let inserted = deque.insert(cursor, value).expect("fresh cursor");
                    model.insert(pos, value);
                    assert_eq!(inserted.index(), pos);
                    assert_eq!(deque.get_at(&inserted), Ok(&value));
                }
                FuzzOp::Erase { pos_frac } => {
                    if model.is_empty() {
                        assert_eq!(deque.erase(deque.end()), Err(DequeError::InvalidCursor));
                        continue;
                    }
                    let pos = scaled(pos_frac, model.len());
                    let cursor = deque.cursor_at(pos).expect("position within bounds");
                    let next = deque.erase(cursor).expect("fresh cursor");
                    model.remove(pos);
                    assert_eq!(next.index(), pos);
                    assert_eq!(deque.get_at(&next).ok(), model.get(pos));
                }
                FuzzOp::Bulk { count } => {
                    for i in 0..count as usize * 16 {
                        deque.push_back(i as u8);
                        model.push_back(i as u8);
                    }
                }
                FuzzOp::Clear => {
                    deque.clear();
                    model.clear();
                }
            }

            assert_eq!(deque.len(), model.len());
            assert_eq!(deque.front().ok(), model.front());
            assert_eq!(deque.back().ok(), model.back());
            if !model.is_empty() {
                let middle = model.len() / 2;
                assert_eq!(deque.at(middle).ok(), model.get(middle));
            }
        }

        assert!(deque.iter().eq(model.iter()));
    });
}

//! Non-recursive in-order completion traversal.
//!
//! `Cursor` implements the walk described in `spec.md` §4.3: a byte stack
//! (the key assembled so far) and a state stack, stepping via
//! [`Guide::child`]/[`Guide::sibling`] instead of re-scanning a state's
//! transitions or recursing. Every public iterator in `src/variants/` is a
//! thin wrapper around one `Cursor`; it's also exposed directly for
//! `no_std` callers enumerating an already-built [`Dictionary`]/[`Guide`]
//! pair without the `std`-only `variants` façades.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::dictionary::{Dictionary, State};
use crate::guide::Guide;

/// Walks every terminal state in a subtree, in byte-lexicographic key
/// order, without recursion.
pub struct Cursor<'a> {
    dict: &'a Dictionary,
    guide: &'a Guide,
    key: Vec<u8>,
    stack: Vec<State>,
    started: bool,
}

impl<'a> Cursor<'a> {
    /// Start a cursor rooted at `start` (typically the state reached after
    /// walking some prefix), with `prefix` as the key bytes already
    /// consumed to get there.
    pub fn new(dict: &'a Dictionary, guide: &'a Guide, prefix: &[u8], start: State) -> Self {
        let mut key = Vec::with_capacity(prefix.len() + 8);
        key.extend_from_slice(prefix);
        Self {
            dict,
            guide,
            key,
            stack: {
                let mut s = Vec::with_capacity(8);
                s.push(start);
                s
            },
            started: false,
        }
    }

    /// The full key bytes for the state most recently reached by
    /// [`advance`](Cursor::advance).
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The dictionary state most recently reached by
    /// [`advance`](Cursor::advance).
    pub fn state(&self) -> State {
        *self.stack.last().expect("advance always leaves a state on the stack while live")
    }

    /// Advance to the next terminal state in key order. Returns `false`
    /// once the subtree is exhausted; the cursor is then dead and further
    /// calls keep returning `false`.
    pub fn advance(&mut self) -> bool {
        if self.stack.is_empty() {
            return false;
        }
        if !self.started {
            self.started = true;
            if self.dict.is_terminal(self.state()) {
                return true;
            }
        }
        loop {
            let cur = self.state();
            if let Some(label) = self.guide.child(cur) {
                match self.dict.step(cur, label) {
                    Some(next) => {
                        self.key.push(label);
                        self.stack.push(next);
                    }
                    None => {
                        self.stack.clear();
                        return false;
                    }
                }
            } else {
                loop {
                    let popped = self.stack.pop().unwrap();
                    let sibling = self.guide.sibling(popped);
                    if self.stack.is_empty() {
                        return false;
                    }
                    self.key.pop();
                    if let Some(label) = sibling {
                        let parent = self.state();
                        match self.dict.step(parent, label) {
                            Some(next) => {
                                self.key.push(label);
                                self.stack.push(next);
                                break;
                            }
                            None => {
                                self.stack.clear();
                                return false;
                            }
                        }
                    }
                }
            }
            if self.dict.is_terminal(self.state()) {
                return true;
            }
        }
    }
}

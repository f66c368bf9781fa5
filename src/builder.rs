//! Incremental minimization (Daciuk et al.) over a node arena.
//!
//! This module is the low-level engine shared by every public variant: it
//! consumes `(key, optional u31 value)` pairs in byte-lexicographic order
//! and produces a minimal automaton as a node arena plus a root id. Public
//! variants (`KeySet`, `IntMap`, `BytesMap`, ...) are thin callers that
//! shape their input into this form — see `src/variants/`.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::node::{Arena, Node, NodeId, ROOT};
use crate::register::Register;

/// Maximum value an `IntMap`-style accepting transition may carry.
pub(crate) const MAX_VALUE: u32 = (1 << 31) - 1;

/// Checks a key contains no `0x00` byte. `0x00` is reserved: it is used
/// internally as the pseudo-label leading to an `IntMap` value unit (see
/// `src/unit.rs`), so it can never appear in a real key.
pub(crate) fn validate_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Ok(());
    }
    if key.contains(&0) {
        return Err(Error::InvalidKey {
            reason: "key contains a 0x00 byte, which is reserved",
        });
    }
    Ok(())
}

/// Incremental builder: the engine behind every public variant.
///
/// Feed keys (optionally with a `u31` value, for `IntMap`) via [`insert`],
/// in byte-lexicographic order, then call [`finish`] to freeze the
/// remaining path and obtain the minimal automaton's arena and root.
///
/// [`insert`]: Builder::insert
/// [`finish`]: Builder::finish
pub(crate) struct Builder {
    arena: Arena,
    register: Register,
    /// `stack[i]` is the node reached after consuming `previous_key[..i]`
    /// bytes; `stack[0]` is always `ROOT`.
    stack: Vec<NodeId>,
    previous_key: Vec<u8>,
    has_previous: bool,
    count: usize,
}

impl Builder {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            arena: Arena::with_capacity(config.initial_capacity_hint),
            register: Register::new(),
            stack: alloc_vec_with(ROOT),
            previous_key: Vec::new(),
            has_previous: false,
            count: 0,
        }
    }

    /// Insert one key (already validated by the caller), optionally with a
    /// value attached to its accepting state.
    ///
    /// Keys must arrive in non-decreasing byte-lexicographic order (equal
    /// consecutive keys are fine — that's how `KeySet`'s silent dedup and
    /// `IntMap`'s duplicate-value check both fall out of one code path).
    /// The caller (`Builder::from_sorted_*`) is responsible for enforcing
    /// or establishing that order.
    pub fn insert(&mut self, key: &[u8], value: Option<u32>) -> Result<()> {
        if let Some(v) = value {
            if v > MAX_VALUE {
                return Err(Error::ValueRange { value: v as i64 });
            }
        }

        let prefix_len = if self.has_previous {
            common_prefix_len(&self.previous_key, key)
        } else {
            0
        };

        if self.has_previous && key < self.previous_key.as_slice() {
            // Caller asserted sorted order; this is only reachable when it
            // lied. We still fail cleanly rather than corrupt the arena.
            return Err(Error::OrderError { at: self.count });
        }

        self.freeze_to_depth(prefix_len);

        // Extend the stack for the new suffix.
        for &b in &key[prefix_len..] {
            let mut node = Node::new();
            node.terminal = false;
            let new_id = self.arena.push(node);
            let parent = *self.stack.last().unwrap();
            self.arena.get_mut(parent).push_transition(b, new_id);
            self.stack.push(new_id);
        }

        // Mark the accepting state, checking for IntMap value conflicts.
        let accepting = *self.stack.last().unwrap();
        let node = self.arena.get_mut(accepting);
        if node.terminal {
            if let (Some(existing), Some(new_value)) = (node.value, value) {
                if existing != new_value {
                    return Err(Error::DuplicateValue {
                        first: existing,
                        second: new_value,
                    });
                }
            }
        } else {
            node.terminal = true;
            node.value = value;
        }

        self.previous_key.clear();
        self.previous_key.extend_from_slice(key);
        self.has_previous = true;
        self.count += 1;
        Ok(())
    }

    /// Freeze every node on the stack strictly deeper than `depth`,
    /// canonicalizing each one and rewriting its parent's transition to
    /// point at the canonical id. Leaves `self.stack.len() == depth + 1`.
    fn freeze_to_depth(&mut self, depth: usize) {
        while self.stack.len() > depth + 1 {
            let child = self.stack.pop().unwrap();
            let parent = *self.stack.last().unwrap();
            let label = self.previous_key[self.stack.len() - 1];

            let canonical = self.register.canonicalize(&self.arena, child);
            if canonical != child {
                self.arena.get_mut(parent).retarget(label, canonical);
            }
        }
    }

    /// Freeze everything remaining on the stack and return the arena and
    /// root id for the encoder.
    pub fn finish(mut self) -> (Arena, NodeId) {
        self.freeze_to_depth(0);
        (self.arena, ROOT)
    }

    /// Number of canonical (deduplicated) states registered so far,
    /// excluding the root. Exposed for tests checking minimality.
    #[cfg(test)]
    pub fn registered_len(&self) -> usize {
        self.register.len()
    }
}

fn alloc_vec_with(id: NodeId) -> Vec<NodeId> {
    let mut v = Vec::with_capacity(16);
    v.push(id);
    v
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_keyset(keys: &[&str]) -> (Arena, NodeId) {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        for k in keys {
            builder.insert(k.as_bytes(), None).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn minimizes_shared_suffixes() {
        // "f", "bar", "foo", "foobar" — "bar"-suffix shape repeats in
        // "foobar" and the root's "bar", so minimization should collapse
        // at least one pair of states.
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        for k in ["bar", "f", "foo", "foobar"] {
            builder.insert(k.as_bytes(), None).unwrap();
        }
        let registered = builder.registered_len();
        let (_arena, _root) = builder.finish();
        // 4 keys, non-trivial shared structure: strictly fewer canonical
        // states were registered than bytes across all keys.
        let total_bytes: usize = ["bar", "f", "foo", "foobar"].iter().map(|s| s.len()).sum();
        assert!(registered > 0);
        assert!(registered < total_bytes);
    }

    #[test]
    fn rejects_embedded_nul() {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        assert!(validate_key(b"foo\x00bar").is_err());
        // Builder itself doesn't re-validate (callers validate first), but
        // confirm it otherwise accepts zero-free keys fine.
        assert!(builder.insert(b"bar", None).is_ok());
    }

    #[test]
    fn intmap_duplicate_value_conflict() {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        builder.insert(b"foo", Some(1)).unwrap();
        let err = builder.insert(b"foo", Some(2)).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateValue {
                first: 1,
                second: 2
            }
        );
    }

    #[test]
    fn intmap_same_duplicate_value_ok() {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        builder.insert(b"foo", Some(1)).unwrap();
        assert!(builder.insert(b"foo", Some(1)).is_ok());
    }

    #[test]
    fn value_range_rejected() {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        let err = builder.insert(b"foo", Some(MAX_VALUE + 1)).unwrap_err();
        assert_eq!(
            err,
            Error::ValueRange {
                value: (MAX_VALUE + 1) as i64
            }
        );
    }

    #[test]
    fn empty_key_terminal_root() {
        let (arena, root) = build_keyset(&[""]);
        assert!(arena.get(root).terminal);
    }
}

//! Equivalence register for incremental minimization.
//!
//! Two build-time nodes are equivalent iff they have the same terminal
//! flag, the same ordered list of `(label, canonical-child-id)` outgoing
//! transitions, and (for `IntMap`) the same value. The register maps that
//! structural signature to the single canonical node id standing in for
//! every node with that signature — this is what makes the resulting
//! automaton minimal.

#[cfg(not(test))]
use alloc::vec::Vec;
use std::collections::HashMap;

use crate::node::{Arena, NodeId};

/// A node's structural signature, used as the equivalence register's key.
///
/// Built from the node's *current* content, which by construction time
/// already has every child rewritten to its canonical id (nodes are
/// frozen bottom-up, so by the time a node's signature is computed, all of
/// its descendants are already canonical).
#[derive(Clone, PartialEq, Eq, Hash)]
struct Signature {
    terminal: bool,
    value: Option<u32>,
    transitions: Vec<(u8, NodeId)>,
}

/// Maps structural signatures to their canonical node id.
///
/// Caching the signature's hash isn't done explicitly here: `HashMap`
/// already caches nothing between calls, but since a node's signature is
/// only computed once per freeze (immediately before the node is either
/// discarded in favor of an existing canonical id or registered as the
/// new canonical id), there is no repeated recomputation to cache against.
#[derive(Default)]
pub(crate) struct Register {
    table: HashMap<Signature, NodeId>,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze `node_id`: if an equivalent node is already canonical, return
    /// its id (the caller should discard `node_id`, which becomes
    /// unreachable garbage in the arena). Otherwise register `node_id` as
    /// the canonical representative of its signature and return it
    /// unchanged.
    pub fn canonicalize(&mut self, arena: &Arena, node_id: NodeId) -> NodeId {
        let node = arena.get(node_id);
        let signature = Signature {
            terminal: node.terminal,
            value: node.value,
            transitions: node.transitions.iter().map(|t| (t.label, t.target)).collect(),
        };

        if let Some(&canonical) = self.table.get(&signature) {
            return canonical;
        }

        self.table.insert(signature, node_id);
        node_id
    }

    /// Number of distinct canonical states registered so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

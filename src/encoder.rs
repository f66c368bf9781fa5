//! Walks a minimal node arena and lays it out as a dictionary (and,
//! optionally, a guide).
//!
//! # Placement
//!
//! For each state being emitted, a `base` is chosen such that every one of
//! its outgoing labels `c_i` lands on a free slot `base ^ c_i`. Free slots
//! are tracked by a doubly linked free list threaded through parallel
//! `next`/`prev` side arrays (see [`FreeList`]) rather than by overloading
//! the `Unit` bits of unused slots themselves — construction only ever
//! claims slots, never releases them, so a side structure is simpler than
//! reusing bit patterns that would otherwise need a sentinel
//! indistinguishable from a valid used unit.
//!
//! # Structural sharing vs. the `check` byte
//!
//! A `Unit`'s `check` byte records the single label used to transition
//! into it. Two arena nodes the equivalence register merged into one
//! canonical id can, in general, be reached by *different* incoming
//! labels from different parents (this is exactly what lets a DAWG be
//! smaller than a trie — states merge by future behavior, not by history).
//! When that happens, the shared canonical node cannot occupy one physical
//! unit for every parent (each unit's `check` only remembers one label),
//! so placement memoizes not by node id alone but by
//! `(node id, arriving label, next-sibling label)`: parents agreeing on
//! all three reuse the exact same slot (the common case — e.g. two keys
//! sharing a literal trailing substring always agree, since the shared
//! substring's own bytes fix both the arriving label and the internal
//! branching shape at every step); parents that don't agree place their
//! own copy. This costs a little of the theoretical node-count minimum in
//! the rare case where two *different* remaining suffixes happen to be
//! structurally isomorphic but diverge only in how they were reached, and
//! never costs correctness.

#[cfg(not(test))]
use alloc::vec::Vec;
use std::collections::HashMap;

use crate::dictionary::Dictionary;
use crate::guide::Guide;
use crate::node::{Arena, NodeId};
use crate::unit::{GuideEntry, Unit, MAX_BASE};

type EdgeKey = (NodeId, u8, u8); // (target, arriving label, next-sibling label)

struct FreeList {
    next: Vec<u32>,
    prev: Vec<u32>,
    head: Option<u32>,
}

impl FreeList {
    fn new() -> Self {
        Self {
            next: Vec::new(),
            prev: Vec::new(),
            head: None,
        }
    }

    fn grow_to(&mut self, len: usize) {
        let old = self.next.len();
        if len <= old {
            return;
        }
        self.next.resize(len, 0);
        self.prev.resize(len, 0);
        for i in old..len {
            self.push(i as u32);
        }
    }

    fn push(&mut self, i: u32) {
        match self.head {
            None => {
                self.next[i as usize] = i;
                self.prev[i as usize] = i;
                self.head = Some(i);
            }
            Some(h) => {
                let tail = self.prev[h as usize];
                self.next[tail as usize] = i;
                self.prev[i as usize] = tail;
                self.next[i as usize] = h;
                self.prev[h as usize] = i;
            }
        }
    }

    fn remove(&mut self, i: u32) {
        let n = self.next[i as usize];
        let p = self.prev[i as usize];
        if n == i {
            self.head = None;
        } else {
            self.next[p as usize] = n;
            self.prev[n as usize] = p;
            if self.head == Some(i) {
                self.head = Some(n);
            }
        }
    }

    /// Iterate free slots once around the list, starting at `hint` if it's
    /// currently free, else at the list head.
    fn iter_from(&self, hint: u32) -> FreeIter<'_> {
        let start = if (hint as usize) < self.next.len() && self.is_marked_free_via_head(hint) {
            Some(hint)
        } else {
            self.head
        };
        FreeIter {
            list: self,
            start,
            current: start,
            done: start.is_none(),
        }
    }

    // A slot is "free" iff it's reachable from `head` — cheap membership
    // isn't tracked separately; callers only ever iterate actual free
    // slots via `iter_from`, so this just guards `hint` being stale (e.g.
    // already claimed) by falling back to `head` in that case. We detect
    // staleness the simple way: a claimed slot's `next`/`prev` still point
    // into the list structurally but it's unlinked from `head`'s cycle, so
    // a direct check would require an O(n) walk. Instead, `Encoder` clears
    // a claimed slot's self-loop (next[i] = i, prev[i] = i) so a stale
    // hint simply degenerates to a harmless single-element cycle rather
    // than aliasing a live free slot.
    fn is_marked_free_via_head(&self, i: u32) -> bool {
        self.next[i as usize] != i || self.head == Some(i)
    }
}

struct FreeIter<'a> {
    list: &'a FreeList,
    start: Option<u32>,
    current: Option<u32>,
    done: bool,
}

impl<'a> Iterator for FreeIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.done {
            return None;
        }
        let cur = self.current?;
        let nxt = self.list.next[cur as usize];
        if Some(nxt) == self.start || nxt == cur {
            self.done = true;
        } else {
            self.current = Some(nxt);
        }
        Some(cur)
    }
}

struct Encoder {
    units: Vec<Unit>,
    guide: Vec<GuideEntry>,
    used: Vec<bool>,
    free: FreeList,
    memo: HashMap<EdgeKey, u32>,
    hint: u32,
    want_guide: bool,
}

impl Encoder {
    fn new(want_guide: bool) -> Self {
        let mut enc = Self {
            units: Vec::new(),
            guide: Vec::new(),
            used: Vec::new(),
            free: FreeList::new(),
            memo: HashMap::new(),
            hint: 1,
            want_guide,
        };
        enc.grow_to(1);
        enc.claim(0); // root is always state 0
        enc
    }

    fn grow_to(&mut self, len: usize) {
        if len <= self.units.len() {
            return;
        }
        self.units.resize(len, Unit::default());
        self.guide.resize(len, GuideEntry::NONE);
        self.used.resize(len, false);
        self.free.grow_to(len);
    }

    fn is_free(&self, slot: u32) -> bool {
        (slot as usize) < self.used.len() && !self.used[slot as usize]
    }

    fn claim(&mut self, slot: u32) {
        self.grow_to(slot as usize + 1);
        if self.used[slot as usize] {
            return;
        }
        self.used[slot as usize] = true;
        self.free.remove(slot);
        // Degenerate the slot into a harmless self-loop so a stale rolling
        // hint never aliases it as free (see `FreeList::iter_from`).
        self.free.next[slot as usize] = slot;
        self.free.prev[slot as usize] = slot;
    }

    /// Does every slot required by `labels` (plus a value slot at `base`
    /// if `needs_value`) satisfy: free, OR already correctly claimed for
    /// this exact edge (`already_ok`)?
    fn base_fits(&self, base: u32, labels: &[(u8, bool)], needs_value: bool) -> bool {
        if needs_value && !self.fits_one(base, 0, false) {
            return false;
        }
        labels.iter().all(|&(label, already_claimed_here)| {
            self.fits_one(base, label, already_claimed_here)
        })
    }

    fn fits_one(&self, base: u32, label: u8, already_claimed_here: bool) -> bool {
        if already_claimed_here {
            return true;
        }
        let slot = base ^ label as u32;
        slot <= MAX_BASE && self.is_free(slot)
    }

    /// Find a base that fits every required label, given which labels
    /// already have a forced (pre-existing) target. `forced` entries are
    /// `(label, target_slot)`; everything else is free to place fresh.
    fn find_base(&mut self, forced: &[(u8, u32)], free_labels: &[u8], needs_value: bool) -> u32 {
        if let Some(&(label0, target0)) = forced.first() {
            let base = target0 ^ label0 as u32;
            let all_forced_consistent = forced.iter().all(|&(l, t)| base ^ l as u32 == t);
            if all_forced_consistent {
                let labels: Vec<(u8, bool)> = forced
                    .iter()
                    .map(|&(l, _)| (l, true))
                    .chain(free_labels.iter().map(|&l| (l, false)))
                    .collect();
                if self.base_fits(base, &labels, needs_value) {
                    return base;
                }
            }
        }

        // Fresh scan: ignore any forced placements, find any base that
        // fits every label as a brand-new claim.
        let mut all_labels: Vec<u8> = forced.iter().map(|&(l, _)| l).collect();
        all_labels.extend_from_slice(free_labels);
        self.scan_free_base(&all_labels, needs_value)
    }

    fn scan_free_base(&mut self, labels: &[u8], needs_value: bool) -> u32 {
        self.grow_to(self.units.len() + labels.len() + 2);
        let anchor = labels.first().copied().unwrap_or(0);
        let candidates: Vec<u32> = self.free.iter_from(self.hint).collect();
        for free_slot in candidates {
            let base = free_slot ^ anchor as u32;
            if base == 0 || base > MAX_BASE {
                continue;
            }
            let plain: Vec<(u8, bool)> = labels.iter().map(|&l| (l, false)).collect();
            if self.base_fits(base, &plain, needs_value) {
                self.hint = free_slot;
                return base;
            }
        }
        // Ran out of room in the current array: grow and retry from a
        // fresh region.
        let grown_from = self.units.len();
        self.grow_to(grown_from * 2 + labels.len() + 2);
        self.hint = grown_from as u32;
        self.scan_free_base(labels, needs_value)
    }

    fn place_subtree(&mut self, arena: &Arena, state: u32, check: u8, node_id: NodeId) {
        let node = arena.get(node_id);
        let needs_value = node.terminal && node.value.is_some();

        if node.transitions.is_empty() {
            self.units[state as usize] = Unit::new(node.terminal, 0, check);
            if needs_value {
                let vbase = self.scan_free_base(&[], true);
                self.units[state as usize] = Unit::new(true, vbase, check);
                self.claim(vbase);
                self.units[vbase as usize] = Unit::from_value(node.value.unwrap());
            }
            return;
        }

        let mut forced = Vec::new();
        let mut free_labels = Vec::new();
        for (i, t) in node.transitions.iter().enumerate() {
            let sibling = node.transitions.get(i + 1).map(|s| s.label).unwrap_or(0);
            if let Some(&slot) = self.memo.get(&(t.target, t.label, sibling)) {
                forced.push((t.label, slot));
            } else {
                free_labels.push(t.label);
            }
        }

        let base = self.find_base(&forced, &free_labels, needs_value);
        self.units[state as usize] = Unit::new(node.terminal, base, check);

        if self.want_guide {
            let first_label = node.transitions[0].label;
            self.guide[state as usize].child = first_label;
        }

        if needs_value {
            let vslot = base; // base ^ 0
            if self.is_free(vslot) {
                self.claim(vslot);
                self.units[vslot as usize] = Unit::from_value(node.value.unwrap());
            }
        }

        // Claim every one of this node's transition slots before recursing
        // into any of them: a child's own placement scans for free slots,
        // and a not-yet-claimed sibling slot looks free to that scan even
        // though `base` already reserves it.
        let mut to_recurse = Vec::new();
        for (i, t) in node.transitions.iter().enumerate() {
            let sibling = node.transitions.get(i + 1).map(|s| s.label).unwrap_or(0);
            let key = (t.target, t.label, sibling);
            let slot = base ^ t.label as u32;

            if let Some(&existing) = self.memo.get(&key) {
                if existing == slot {
                    continue; // already fully placed and reused
                }
            }

            self.claim(slot);
            self.memo.insert(key, slot);
            if self.want_guide {
                self.guide[slot as usize].sibling = sibling;
            }
            to_recurse.push((slot, t.label, t.target));
        }

        for (slot, label, target) in to_recurse {
            self.place_subtree(arena, slot, label, target);
        }
    }

    fn finish(self) -> (Vec<Unit>, Vec<GuideEntry>) {
        (self.units, self.guide)
    }
}

/// Encode a minimal node arena into a [`Dictionary`] and, if `want_guide`,
/// a [`Guide`].
pub(crate) fn encode(arena: &Arena, root: NodeId, want_guide: bool) -> (Dictionary, Option<Guide>) {
    let mut enc = Encoder::new(want_guide);
    enc.place_subtree(arena, 0, 0, root);
    let (units, guide_units) = enc.finish();
    let guide = if want_guide {
        Some(Guide::from_entries(guide_units))
    } else {
        None
    };
    (Dictionary::from_units(units), guide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::config::BuildConfig;

    fn build(keys: &[&str]) -> (Dictionary, Option<Guide>) {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        let mut sorted: Vec<&&str> = keys.iter().collect();
        sorted.sort();
        for k in sorted {
            builder.insert(k.as_bytes(), None).unwrap();
        }
        let (arena, root) = builder.finish();
        encode(&arena, root, true)
    }

    #[test]
    fn s1_shape_queries_succeed() {
        let (dict, _guide) = build(&["f", "bar", "foo", "foobar"]);
        assert!(dict.contains(b"foo"));
        assert!(!dict.contains(b"fo"));
        assert!(dict.contains(b"f"));
        assert!(dict.contains(b"bar"));
        assert!(dict.contains(b"foobar"));
    }

    #[test]
    fn single_key_roundtrip() {
        let (dict, _guide) = build(&["hello"]);
        assert!(dict.contains(b"hello"));
        assert!(!dict.contains(b"hell"));
        assert!(!dict.contains(b"helloo"));
    }

    #[test]
    fn many_keys_all_present() {
        let keys = [
            "apple", "app", "apply", "application", "banana", "band", "bandana", "can", "cane",
            "cant", "z",
        ];
        let (dict, _guide) = build(&keys);
        for k in keys {
            assert!(dict.contains(k.as_bytes()), "missing {k}");
        }
        assert!(!dict.contains(b"appl"));
        assert!(!dict.contains(b"ban"));
    }

    #[test]
    fn intmap_values_survive_encoding() {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        for (k, v) in [("bar", 5u32), ("foo", 1), ("foobar", 3)] {
            builder.insert(k.as_bytes(), Some(v)).unwrap();
        }
        let (arena, root) = builder.finish();
        let (dict, _guide) = encode(&arena, root, false);
        for (k, v) in [("bar", 5u32), ("foo", 1), ("foobar", 3)] {
            let state = dict.walk(k.as_bytes()).unwrap();
            assert!(dict.is_terminal(state));
            assert_eq!(dict.int_value(state), Some(v));
        }
    }
}

//! The dictionary: a double-array-like transition table.
//!
//! `Dictionary` owns (or borrows, via `mmap`) the flat `Unit` array and
//! implements the primitive traversal every query builds on: `step`,
//! `contains`, `walk`, and `int_value`. No heap allocation happens per
//! query beyond what the caller asks for (output buffers); stepping
//! through the array is pure index arithmetic.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::binary::{parse_dictionary_segment, write_dictionary_segment};
use crate::error::{Error, Result};
use crate::unit::Unit;

/// State index into the dictionary. The root is always state `0`.
pub type State = u32;

/// Root state of every dictionary.
pub const ROOT: State = 0;

enum Storage {
    Owned(Vec<Unit>),
    #[cfg(feature = "mmap")]
    Mapped {
        mmap: memmap2::Mmap,
        byte_range: core::ops::Range<usize>,
    },
}

/// The flat transition table produced by `Encoder` and consumed by every
/// query path.
///
/// Immutable and `Send + Sync` once built: every query method takes `&self`
/// and performs only reads.
pub struct Dictionary {
    storage: Storage,
}

impl core::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dictionary").field("len", &self.len()).finish()
    }
}

impl Dictionary {
    pub(crate) fn from_units(units: Vec<Unit>) -> Self {
        Self {
            storage: Storage::Owned(units),
        }
    }

    #[inline]
    fn units(&self) -> &[Unit] {
        match &self.storage {
            Storage::Owned(v) => v.as_slice(),
            #[cfg(feature = "mmap")]
            Storage::Mapped { mmap, byte_range } => {
                bytemuck::cast_slice(&mmap[byte_range.clone()])
            }
        }
    }

    /// Number of units (states) in the dictionary.
    pub fn len(&self) -> usize {
        self.units().len()
    }

    pub fn is_empty(&self) -> bool {
        false // a valid dictionary always has at least the root unit
    }

    #[inline]
    fn unit(&self, state: State) -> Option<Unit> {
        self.units().get(state as usize).copied()
    }

    /// Is `state` an accepting (terminal) state?
    #[inline]
    pub fn is_terminal(&self, state: State) -> bool {
        self.unit(state).map(|u| u.has_leaf()).unwrap_or(false)
    }

    /// Step from `state` on byte `label`. Returns `None` if `label` is
    /// `0x00` (reserved, never a valid transition byte from user input), if
    /// `state` has no outgoing transitions at all (`base == 0`, a value the
    /// encoder never assigns to a real placement — see `encoder::place_subtree`),
    /// or if the transition is absent or fails the `check` invariant.
    #[inline]
    pub fn step(&self, state: State, label: u8) -> Option<State> {
        if label == 0 {
            return None;
        }
        let unit = self.unit(state)?;
        if unit.base() == 0 {
            return None;
        }
        let target = unit.base() ^ label as u32;
        let target_unit = self.unit(target)?;
        if target_unit.check() == label {
            Some(target)
        } else {
            None
        }
    }

    /// Walk `key` from `state`, returning the state reached after
    /// consuming every byte, or `None` if the walk fails partway (a `0x00`
    /// byte, an absent transition, or a depth exceeding the dictionary's
    /// own size — which bounds any possible valid walk and guards against
    /// a corrupted file describing a cycle).
    pub fn walk_from(&self, state: State, key: &[u8]) -> Option<State> {
        if key.len() > self.len() {
            return None;
        }
        let mut s = state;
        for &b in key {
            s = self.step(s, b)?;
        }
        Some(s)
    }

    /// Walk `key` from the root.
    #[inline]
    pub fn walk(&self, key: &[u8]) -> Option<State> {
        self.walk_from(ROOT, key)
    }

    /// Exact membership test.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.walk(key).map(|s| self.is_terminal(s)).unwrap_or(false)
    }

    /// `true` if some key in the automaton starts with `prefix` (the
    /// automaton doesn't have to accept `prefix` itself).
    pub fn has_keys_with_prefix(&self, prefix: &[u8]) -> bool {
        self.walk(prefix).is_some()
    }

    /// Byte-depths of every terminal state reached while walking `key`
    /// from the root, in increasing order — i.e. the lengths of every key
    /// in the automaton that is a prefix of `key`.
    pub fn prefix_depths(&self, key: &[u8]) -> Vec<usize> {
        let mut depths = Vec::new();
        if self.is_terminal(ROOT) {
            depths.push(0);
        }
        let mut s = ROOT;
        for (i, &b) in key.iter().enumerate() {
            match self.step(s, b) {
                Some(next) => {
                    s = next;
                    if self.is_terminal(s) {
                        depths.push(i + 1);
                    }
                }
                None => break,
            }
        }
        depths
    }

    /// Read the `IntMap` value attached to terminal state `state`, via the
    /// implicit `0x00` pseudo-transition to its value unit (see
    /// `src/unit.rs`). Returns `None` if `state` isn't terminal or carries
    /// no value.
    pub fn int_value(&self, state: State) -> Option<u32> {
        let unit = self.unit(state)?;
        if !unit.has_leaf() {
            return None;
        }
        // base(s) ^ 0x00 == base(s): the pseudo-transition on the reserved
        // label always lands exactly at the state's own base offset.
        let value_unit = self.unit(unit.base())?;
        Some(value_unit.value_payload())
    }

    /// Serialize just the dictionary segment.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_dictionary_segment(self.units())
    }

    /// Deserialize a dictionary segment from the front of `bytes`.
    /// Returns the dictionary and the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        let (units, consumed) = parse_dictionary_segment(bytes)?;
        validate_structure(units)?;
        Ok((Self::from_units(units.to_vec()), consumed))
    }

    /// Write just the dictionary segment to `w`.
    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Read just the dictionary segment from `r`. `r` must contain exactly
    /// the dictionary segment (use the variant-level `read` to read a
    /// dictionary followed by a guide from one stream).
    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(r: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)
            .map_err(|_| Error::InvalidFile { reason: "I/O error reading dictionary" })?;
        let (dict, _) = Self::from_bytes(&bytes)?;
        Ok(dict)
    }

    /// Memory-map a file previously written by [`write`](Dictionary::write)
    /// or [`to_bytes`](Dictionary::to_bytes), validating it exactly as
    /// `read`/`from_bytes` would, then serve every query directly from the
    /// mapped pages.
    #[cfg(feature = "mmap")]
    pub fn open_mmap(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|_| Error::InvalidFile { reason: "could not open file" })?;
        let mmap = unsafe {
            memmap2::Mmap::map(&file).map_err(|_| Error::InvalidFile { reason: "mmap failed" })?
        };
        let (units, consumed) = parse_dictionary_segment(&mmap)?;
        validate_structure(units)?;
        let byte_range = (consumed - units.len() * core::mem::size_of::<Unit>())..consumed;
        Ok(Self {
            storage: Storage::Mapped { mmap, byte_range },
        })
    }
}

/// Structural validation beyond the length checks `binary.rs` already did:
/// unit `0` (the root) must exist, which `parse_dictionary_segment` already
/// guarantees by rejecting `N == 0`.
fn validate_structure(units: &[Unit]) -> Result<()> {
    if units.is_empty() {
        return Err(Error::InvalidFile {
            reason: "dictionary must have at least one unit (the root)",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::config::BuildConfig;
    use crate::encoder::encode;

    fn build(keys: &[&str]) -> Dictionary {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        let mut sorted: Vec<&&str> = keys.iter().collect();
        sorted.sort();
        for k in sorted {
            builder.insert(k.as_bytes(), None).unwrap();
        }
        let (arena, root) = builder.finish();
        encode(&arena, root, false).0
    }

    #[test]
    fn contains_s1_shape() {
        let dict = build(&["f", "bar", "foo", "foobar"]);
        assert!(dict.contains(b"foo"));
        assert!(!dict.contains(b"fo"));
        assert!(dict.contains(b"f"));
        assert!(dict.contains(b"bar"));
        assert!(dict.contains(b"foobar"));
        assert!(!dict.contains(b"x"));
    }

    #[test]
    fn null_byte_short_circuits() {
        let dict = build(&["f", "bar", "foo", "foobar"]);
        assert!(!dict.contains(b"fo\x00o"));
        assert!(!dict.contains(b"\x00"));
    }

    #[test]
    fn empty_key_contains_iff_root_terminal() {
        let dict = build(&["f", "bar"]);
        assert!(!dict.contains(b""));
        let dict2 = build(&["", "bar"]);
        assert!(dict2.contains(b""));
    }

    #[test]
    fn prefix_depths_match_s1() {
        let dict = build(&["f", "bar", "foo", "foobar"]);
        let depths = dict.prefix_depths(b"foobarz");
        assert_eq!(depths, vec![1, 3, 6]); // "f", "foo", "foobar"
    }

    #[test]
    fn roundtrip_through_bytes() {
        let dict = build(&["f", "bar", "foo", "foobar"]);
        let bytes = dict.to_bytes();
        let (dict2, consumed) = Dictionary::from_bytes(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        for k in ["f", "bar", "foo", "foobar"] {
            assert!(dict2.contains(k.as_bytes()));
        }
        assert!(!dict2.contains(b"fo"));
    }

    #[test]
    fn truncated_file_is_invalid_not_a_crash() {
        let err = Dictionary::from_bytes(b"foo").unwrap_err();
        assert!(matches!(err, Error::InvalidFile { .. }));
    }

    #[test]
    fn leaf_state_rejects_further_steps_even_on_base_zero_alias() {
        // Hand-built to exercise the base == 0 ("no outgoing transitions")
        // sentinel directly: state 1 is a childless terminal leaf (base 0),
        // and state 2 happens to sit at the exact index `0 ^ b'x'` would
        // alias to, with a check byte that would otherwise "match". Without
        // the base == 0 guard in `step`, `contains(b"ax")` would walk into
        // state 2 and report a spurious match.
        let target = b'x' as usize;
        let mut units = vec![Unit::default(); target + 1];
        units[0] = Unit::new(false, 1 ^ b'a' as u32, 0); // root --'a'--> state 1
        units[1] = Unit::new(true, 0, b'a'); // "a" is terminal, no children
        units[target] = Unit::new(true, 0, b'x'); // looks like a real match for label 'x'
        let dict = Dictionary::from_units(units);

        assert!(dict.contains(b"a"));
        assert!(!dict.contains(b"ax"));
        assert_eq!(dict.step(1, b'x'), None);
    }
}

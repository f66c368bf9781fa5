//! `IntMap`: keys mapped to `u31` integer values, stored directly on the
//! automaton's accepting transitions via the reserved `0x00`
//! pseudo-transition (see `src/unit.rs`) rather than synthesized into the
//! key bytes. No separator, no base64 — this is the cheapest payload
//! variant.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::config::BuildConfig;
use crate::dictionary::Dictionary;
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::guide::Guide;
use crate::similar::{search, Replaces};
use crate::variants::{build, collect_with_state};

/// A minimized, immutable map from byte-string keys to `u31` integers.
#[derive(Debug)]
pub struct IntMap {
    dict: Dictionary,
    guide: Guide,
    len: usize,
}

impl IntMap {
    /// Build from `(key, value)` pairs. Fails with
    /// [`Error::DuplicateValue`] if the same key appears twice with two
    /// different values, and with [`Error::ValueRange`] if any value
    /// exceeds `2^31 - 1`.
    pub fn new<I, K>(pairs: I, input_is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<Vec<u8>>,
    {
        let config = BuildConfig::default().with_sorted_input(input_is_sorted);
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v)))
            .collect();
        let (arena, root, len) = build(&config, pairs)?;
        let (dict, guide) = encode(&arena, root, true);
        Ok(Self {
            dict,
            guide: guide.expect("encode(.., want_guide = true) always returns a guide"),
            len,
        })
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.dict.contains(key)
    }

    /// The value stored for `key`. Fails with [`Error::KeyNotFound`] if
    /// `key` was never stored.
    pub fn get(&self, key: &[u8]) -> Result<u32> {
        let state = self.dict.walk(key).ok_or(Error::KeyNotFound)?;
        self.dict.int_value(state).ok_or(Error::KeyNotFound)
    }

    pub fn has_keys_with_prefix(&self, prefix: &[u8]) -> bool {
        self.dict.has_keys_with_prefix(prefix)
    }

    /// Every key starting with `prefix`, in byte-lexicographic order.
    pub fn keys(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        crate::variants::collect_keys(&self.dict, &self.guide, prefix)
    }

    /// Every `(key, value)` pair starting with `prefix`, in
    /// byte-lexicographic key order.
    pub fn items(&self, prefix: &[u8]) -> Vec<(Vec<u8>, u32)> {
        collect_with_state(&self.dict, &self.guide, prefix)
            .into_iter()
            .filter_map(|(key, state)| self.dict.int_value(state).map(|v| (key, v)))
            .collect()
    }

    /// Keys `word` fuzzily expands to, paired with their stored value.
    pub fn similar_items(&self, word: &[u8], replaces: &Replaces) -> Vec<(Vec<u8>, u32)> {
        search(&self.dict, word, replaces)
            .into_iter()
            .filter_map(|(key, state)| self.dict.int_value(state).map(|v| (key, v)))
            .collect()
    }

    /// Just the values `similar_items` would have paired with each match.
    pub fn similar_item_values(&self, word: &[u8], replaces: &Replaces) -> Vec<u32> {
        self.similar_items(word, replaces)
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }

    /// Number of distinct keys in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.dict.to_bytes();
        out.extend_from_slice(&self.guide.to_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (dict, consumed) = Dictionary::from_bytes(bytes)?;
        let (guide, _) = Guide::from_bytes(&bytes[consumed..], dict.len())?;
        let len = collect_with_state(&dict, &guide, b"").len();
        Ok(Self { dict, guide, len })
    }

    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.dict.write(w)?;
        self.guide.write(w)
    }

    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(r: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(r, &mut bytes)
            .map_err(|_| Error::InvalidFile { reason: "I/O error reading int map" })?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_get_roundtrips_values() {
        let map = IntMap::new([("foo", 7u32), ("bar", 3), ("foobar", 11)], false).unwrap();
        assert_eq!(map.get(b"foo"), Ok(7));
        assert_eq!(map.get(b"bar"), Ok(3));
        assert_eq!(map.get(b"foobar"), Ok(11));
        assert_eq!(map.get(b"fo"), Err(Error::KeyNotFound));
        assert_eq!(map.get(b"missing"), Err(Error::KeyNotFound));
    }

    #[test]
    fn duplicate_key_same_value_ok() {
        let map = IntMap::new([("foo", 7u32), ("foo", 7)], false).unwrap();
        assert_eq!(map.get(b"foo"), Ok(7));
    }

    #[test]
    fn duplicate_key_conflicting_value_errors() {
        let err = IntMap::new([("foo", 7u32), ("foo", 8)], false).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateValue {
                first: 7,
                second: 8
            }
        );
    }

    #[test]
    fn value_out_of_range_errors() {
        let err = IntMap::new([("foo", 1u32 << 31)], false).unwrap_err();
        assert!(matches!(err, Error::ValueRange { .. }));
    }

    #[test]
    fn len_counts_distinct_keys() {
        let map = IntMap::new([("foo", 1u32), ("foo", 1), ("bar", 2)], false).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn items_and_keys_under_prefix() {
        let map = IntMap::new([("foo", 1u32), ("foobar", 2), ("bar", 3)], false).unwrap();
        assert_eq!(
            map.items(b"fo"),
            vec![(b"foo".to_vec(), 1), (b"foobar".to_vec(), 2)]
        );
        assert_eq!(map.keys(b"fo"), vec![b"foo".to_vec(), b"foobar".to_vec()]);
    }

    #[test]
    fn roundtrips_through_bytes() {
        let map = IntMap::new([("foo", 7u32), ("bar", 3)], false).unwrap();
        let bytes = map.to_bytes();
        let map2 = IntMap::from_bytes(&bytes).unwrap();
        assert_eq!(map2.get(b"foo"), Ok(7));
        assert_eq!(map2.get(b"bar"), Ok(3));
    }
}

//! `KeySet`: an immutable set of byte-string keys with no payload and no
//! key-enumeration support — just membership and prefix queries over the
//! bare [`Dictionary`]. [`CompletionSet`](crate::variants::CompletionSet)
//! is the sibling variant that pays for a [`Guide`](crate::guide::Guide)
//! to additionally enumerate keys.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::config::BuildConfig;
use crate::dictionary::Dictionary;
use crate::encoder::encode;
use crate::error::Result;
use crate::similar::{search, Replaces};
use crate::variants::build;

/// A minimized, immutable set of byte-string keys.
#[derive(Debug)]
pub struct KeySet {
    dict: Dictionary,
    len: usize,
}

impl KeySet {
    /// Build from an arbitrary (not necessarily deduplicated) collection of
    /// keys. If `input_is_sorted`, the caller asserts `keys` already arrives
    /// in non-decreasing byte-lexicographic order — construction skips its
    /// own sort pass but fails with [`Error::OrderError`](crate::error::Error::OrderError)
    /// if that turns out to be false.
    pub fn new<I, K>(keys: I, input_is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<Vec<u8>>,
    {
        let config = BuildConfig::default().with_sorted_input(input_is_sorted);
        let pairs = keys.into_iter().map(|k| (k.into(), None)).collect();
        let (arena, root, len) = build(&config, pairs)?;
        let (dict, _) = encode(&arena, root, false);
        Ok(Self { dict, len })
    }

    /// Exact membership test.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.dict.contains(key)
    }

    /// `true` if some member key starts with `prefix`.
    pub fn has_keys_with_prefix(&self, prefix: &[u8]) -> bool {
        self.dict.has_keys_with_prefix(prefix)
    }

    /// Every member key that is itself a prefix of `key`, shortest first.
    pub fn prefixes(&self, key: &[u8]) -> Vec<Vec<u8>> {
        self.dict
            .prefix_depths(key)
            .into_iter()
            .map(|depth| key[..depth].to_vec())
            .collect()
    }

    /// Member keys `word` fuzzily expands to under `replaces`, see
    /// [`crate::similar`].
    pub fn similar_keys(&self, word: &[u8], replaces: &Replaces) -> Vec<Vec<u8>> {
        search(&self.dict, word, replaces)
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// Number of distinct keys in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.dict.to_bytes()
    }

    /// Deserialize. `len()` after this reflects every key actually
    /// reachable in the stored automaton (an empty-string key counts as
    /// one), recovered by walking it rather than stored separately.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (dict, _) = Dictionary::from_bytes(bytes)?;
        let len = count_keys(&dict);
        Ok(Self { dict, len })
    }

    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.dict.write(w)
    }

    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(r: &mut R) -> Result<Self> {
        let dict = Dictionary::read(r)?;
        let len = count_keys(&dict);
        Ok(Self { dict, len })
    }
}

/// Count terminal states reachable from the root by brute-force label
/// probing (`KeySet` carries no guide, so there's no `child`/`sibling`
/// shortcut). Only paid at deserialization time, never during lookup.
fn count_keys(dict: &Dictionary) -> usize {
    fn visit(dict: &Dictionary, state: crate::dictionary::State, count: &mut usize) {
        if dict.is_terminal(state) {
            *count += 1;
        }
        for label in 1u16..=255 {
            if let Some(next) = dict.step(state, label as u8) {
                visit(dict, next, count);
            }
        }
    }
    let mut count = 0;
    visit(dict, crate::dictionary::ROOT, &mut count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::similar::compile_replaces;

    #[test]
    fn s1_contains_and_prefixes() {
        let set = KeySet::new(["f", "bar", "foo", "foobar"], false).unwrap();
        assert!(set.contains(b"foo"));
        assert!(!set.contains(b"fo"));
        assert_eq!(
            set.prefixes(b"foobarz"),
            vec![b"f".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
        );
    }

    #[test]
    fn len_counts_distinct_keys() {
        let set = KeySet::new(["foo", "foo", "bar"], false).unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        let empty = KeySet::new(Vec::<Vec<u8>>::new(), false).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn accepts_unsorted_input() {
        let set = KeySet::new(["zebra", "apple", "mango"], false).unwrap();
        assert!(set.contains(b"apple"));
        assert!(set.contains(b"zebra"));
        assert!(!set.contains(b"kiwi"));
    }

    #[test]
    fn sorted_input_fast_path() {
        let set = KeySet::new(["apple", "mango", "zebra"], true).unwrap();
        assert!(set.contains(b"apple"));
        assert!(set.contains(b"zebra"));
        assert!(!set.contains(b"kiwi"));
    }

    #[test]
    fn asserted_sorted_input_that_is_not_errors() {
        let err = KeySet::new(["zebra", "apple"], true).unwrap_err();
        assert!(matches!(err, Error::OrderError { at: 1 }));
    }

    #[test]
    fn roundtrips_through_bytes() {
        let set = KeySet::new(["bar", "foo"], false).unwrap();
        let bytes = set.to_bytes();
        let set2 = KeySet::from_bytes(&bytes).unwrap();
        assert!(set2.contains(b"bar"));
        assert!(!set2.contains(b"baz"));
    }

    #[test]
    fn similar_keys_cyrillic_e() {
        let set = KeySet::new(["ДЕРЕВНЯ", "ДЕРЁВНЯ"], false).unwrap();
        let replaces = compile_replaces(&[([0xD0u8, 0x95], [0xD0u8, 0x81])]);
        let hits = set.similar_keys("ДЕРЕВНЯ".as_bytes(), &replaces);
        assert_eq!(hits.len(), 2);
    }
}

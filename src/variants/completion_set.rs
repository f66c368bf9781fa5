//! `CompletionSet`: a [`KeySet`](crate::variants::KeySet) that additionally
//! carries a [`Guide`], trading a bit more memory for the ability to
//! enumerate every member key under a prefix in byte-lexicographic order
//! without recursion — the classic dictionary "type-ahead" query.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::config::BuildConfig;
use crate::dictionary::Dictionary;
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::guide::Guide;
use crate::similar::{search, Replaces};
use crate::variants::{build, collect_keys};

/// A minimized, immutable set of byte-string keys supporting ordered
/// enumeration.
#[derive(Debug)]
pub struct CompletionSet {
    dict: Dictionary,
    guide: Guide,
    len: usize,
}

impl CompletionSet {
    /// Build from an arbitrary (not necessarily deduplicated) collection of
    /// keys. If `input_is_sorted`, the caller asserts `keys` already arrives
    /// in non-decreasing byte-lexicographic order; construction fails with
    /// [`Error::OrderError`] if that turns out to be false.
    pub fn new<I, K>(keys: I, input_is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<Vec<u8>>,
    {
        let config = BuildConfig::default().with_sorted_input(input_is_sorted);
        let pairs = keys.into_iter().map(|k| (k.into(), None)).collect();
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

    pub fn has_keys_with_prefix(&self, prefix: &[u8]) -> bool {
        self.dict.has_keys_with_prefix(prefix)
    }

    pub fn prefixes(&self, key: &[u8]) -> Vec<Vec<u8>> {
        self.dict
            .prefix_depths(key)
            .into_iter()
            .map(|depth| key[..depth].to_vec())
            .collect()
    }

    /// Every member key starting with `prefix`, in byte-lexicographic
    /// order.
    pub fn keys(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        collect_keys(&self.dict, &self.guide, prefix)
    }

    /// Lazily enumerate keys starting with `prefix`.
    pub fn iter_keys<'a>(&'a self, prefix: &[u8]) -> KeysIter<'a> {
        KeysIter {
            cursor: self.dict.walk(prefix).map(|start| {
                crate::cursor::Cursor::new(&self.dict, &self.guide, prefix, start)
            }),
        }
    }

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
        let mut out = self.dict.to_bytes();
        out.extend_from_slice(&self.guide.to_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (dict, consumed) = Dictionary::from_bytes(bytes)?;
        let (guide, _) = Guide::from_bytes(&bytes[consumed..], dict.len())?;
        let len = collect_keys(&dict, &guide, b"").len();
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
            .map_err(|_| Error::InvalidFile { reason: "I/O error reading completion set" })?;
        Self::from_bytes(&bytes)
    }
}

/// Borrowing iterator returned by [`CompletionSet::iter_keys`].
pub struct KeysIter<'a> {
    cursor: Option<crate::cursor::Cursor<'a>>,
}

impl<'a> Iterator for KeysIter<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let cursor = self.cursor.as_mut()?;
        if cursor.advance() {
            Some(cursor.key().to_vec())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_keys_under_prefix() {
        let set = CompletionSet::new(["foo", "bar", "foobar", "f"], false).unwrap();
        assert_eq!(
            set.keys(b"fo"),
            vec![b"foo".to_vec(), b"foobar".to_vec()]
        );
    }

    #[test]
    fn iter_keys_matches_vec_version() {
        let set = CompletionSet::new(["foo", "bar", "foobar", "f"], false).unwrap();
        let collected: Vec<Vec<u8>> = set.iter_keys(b"").collect();
        assert_eq!(collected, set.keys(b""));
    }

    #[test]
    fn iter_keys_on_absent_prefix_is_empty() {
        let set = CompletionSet::new(["foo"], false).unwrap();
        assert_eq!(set.iter_keys(b"zzz").count(), 0);
    }

    #[test]
    fn len_counts_distinct_keys() {
        let set = CompletionSet::new(["foo", "foo", "bar"], false).unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn asserted_sorted_input_that_is_not_errors() {
        let err = CompletionSet::new(["foo", "bar"], true).unwrap_err();
        assert!(matches!(err, Error::OrderError { at: 1 }));
    }

    #[test]
    fn roundtrips_through_bytes() {
        let set = CompletionSet::new(["foo", "bar", "foobar"], false).unwrap();
        let bytes = set.to_bytes();
        let set2 = CompletionSet::from_bytes(&bytes).unwrap();
        assert_eq!(set2.keys(b""), set.keys(b""));
    }
}

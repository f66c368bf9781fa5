//! `BytesMap`: keys mapped to arbitrary byte-string payloads, stored by
//! synthesizing `key ∥ separator ∥ base64(payload)` as the automaton's
//! actual key (`spec.md` §4.4, S3/S5). Supports multiple payloads per key:
//! each distinct payload produces a distinct synthesized key, so they all
//! coexist as siblings under the same `key ∥ separator` prefix.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::config::{BuildConfig, DEFAULT_SEPARATOR};
use crate::dictionary::Dictionary;
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::guide::Guide;
use crate::similar::Replaces;
use crate::variants::payload;
use crate::variants::build;

/// A minimized, immutable multi-map from byte-string keys to byte-string
/// payloads.
#[derive(Debug)]
pub struct BytesMap {
    dict: Dictionary,
    guide: Guide,
    separator: u8,
    len: usize,
}

impl BytesMap {
    /// Build using the default payload separator
    /// ([`DEFAULT_SEPARATOR`]).
    pub fn new<I, K, V>(pairs: I, input_is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        Self::with_separator(pairs, DEFAULT_SEPARATOR, input_is_sorted)
    }

    /// Build using an explicit payload separator. Fails with
    /// [`Error::BadSeparator`] if `separator` is `0x00` or a base64
    /// alphabet character, and with [`Error::InvalidKey`] if any raw key
    /// contains `separator` (it would be indistinguishable from the
    /// synthesized `key ∥ separator ∥ base64(payload)` boundary on lookup).
    /// If `input_is_sorted`, the caller asserts the synthesized keys already
    /// arrive in non-decreasing byte-lexicographic order.
    pub fn with_separator<I, K, V>(pairs: I, separator: u8, input_is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        payload::validate_separator(separator)?;
        let config = BuildConfig::default().with_sorted_input(input_is_sorted);
        let synthesized: Vec<(Vec<u8>, Option<u32>)> = pairs
            .into_iter()
            .map(|(k, v)| {
                let key = k.into();
                if key.contains(&separator) {
                    return Err(Error::InvalidKey {
                        reason: "key contains the payload separator byte",
                    });
                }
                let value = v.into();
                Ok((payload::synthesize(&key, &value, separator), None))
            })
            .collect::<Result<_>>()?;
        let (arena, root, _) = build(&config, synthesized)?;
        let (dict, guide) = encode(&arena, root, true);
        let guide = guide.expect("encode(.., want_guide = true) always returns a guide");
        let len = payload::keys_under(&dict, &guide, b"", separator).len();
        Ok(Self {
            dict,
            guide,
            separator,
            len,
        })
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        !self.get(key).unwrap_or_default().is_empty()
    }

    /// Every payload stored for `key`.
    pub fn get(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        payload::payloads_for(&self.dict, &self.guide, key, self.separator)
    }

    pub fn has_keys_with_prefix(&self, prefix: &[u8]) -> bool {
        self.dict.has_keys_with_prefix(prefix)
    }

    /// Distinct keys starting with `prefix`.
    pub fn keys(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        payload::keys_under(&self.dict, &self.guide, prefix, self.separator)
    }

    /// Every `(key, payload)` pair starting with `prefix`.
    pub fn items(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        payload::items_under(&self.dict, &self.guide, prefix, self.separator)
    }

    /// Keys `word` fuzzily expands to under `replaces`.
    pub fn similar_keys(&self, word: &[u8], replaces: &Replaces) -> Result<Vec<Vec<u8>>> {
        let mut out: Vec<Vec<u8>> = Vec::new();
        for (key, _) in self.similar_items(word, replaces)? {
            if out.last() != Some(&key) {
                out.push(key);
            }
        }
        Ok(out)
    }

    /// `(key, payload)` pairs `word` fuzzily expands to under `replaces`.
    pub fn similar_items(&self, word: &[u8], replaces: &Replaces) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        payload::similar_matches(&self.dict, &self.guide, word, replaces, self.separator)
    }

    /// Just the payloads `similar_items` would have paired with each
    /// match.
    pub fn similar_item_values(&self, word: &[u8], replaces: &Replaces) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .similar_items(word, replaces)?
            .into_iter()
            .map(|(_, v)| v)
            .collect())
    }

    /// Number of distinct keys in the map (a key with multiple payloads
    /// still counts once).
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

    /// Deserialize, with the payload separator the map was built with
    /// (not itself stored in the file — the caller must remember it, the
    /// same way they must remember which variant a file holds).
    pub fn from_bytes(bytes: &[u8], separator: u8) -> Result<Self> {
        payload::validate_separator(separator)?;
        let (dict, consumed) = Dictionary::from_bytes(bytes)?;
        let (guide, _) = Guide::from_bytes(&bytes[consumed..], dict.len())?;
        let len = payload::keys_under(&dict, &guide, b"", separator).len();
        Ok(Self { dict, guide, separator, len })
    }

    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.dict.write(w)?;
        self.guide.write(w)
    }

    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(r: &mut R, separator: u8) -> Result<Self> {
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(r, &mut bytes)
            .map_err(|_| Error::InvalidFile { reason: "I/O error reading bytes map" })?;
        Self::from_bytes(&bytes, separator)
    }
}

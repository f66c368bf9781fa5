//! `RecordMap`: keys mapped to a fixed tuple of unsigned integers, packed
//! per a [`RecordFormat`] and stored the same way `BytesMap` stores any
//! other payload — `key ∥ separator ∥ base64(packed record)`.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::config::{BuildConfig, DEFAULT_SEPARATOR};
use crate::dictionary::Dictionary;
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::format::RecordFormat;
use crate::guide::Guide;
use crate::similar::Replaces;
use crate::variants::build;
use crate::variants::payload;

/// A minimized, immutable multi-map from byte-string keys to fixed-width
/// integer tuples.
#[derive(Debug)]
pub struct RecordMap {
    dict: Dictionary,
    guide: Guide,
    format: RecordFormat,
    separator: u8,
    len: usize,
}

impl RecordMap {
    /// Build from a format string (e.g. `"<HI"`) and `(key, values)`
    /// pairs, using the default payload separator.
    pub fn new<I, K>(format_spec: &str, pairs: I, input_is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<u64>)>,
        K: Into<Vec<u8>>,
    {
        Self::with_separator(format_spec, pairs, DEFAULT_SEPARATOR, input_is_sorted)
    }

    /// Build with an explicit payload separator. Fails with
    /// [`Error::InvalidKey`] if any raw key contains `separator`. If
    /// `input_is_sorted`, the caller asserts the synthesized keys already
    /// arrive in non-decreasing byte-lexicographic order.
    pub fn with_separator<I, K>(
        format_spec: &str,
        pairs: I,
        separator: u8,
        input_is_sorted: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<u64>)>,
        K: Into<Vec<u8>>,
    {
        payload::validate_separator(separator)?;
        let format = RecordFormat::parse(format_spec)?;
        let config = BuildConfig::default().with_sorted_input(input_is_sorted);

        let mut synthesized = Vec::new();
        for (key, values) in pairs {
            let key = key.into();
            if key.contains(&separator) {
                return Err(Error::InvalidKey {
                    reason: "key contains the payload separator byte",
                });
            }
            let packed = format.encode(&values)?;
            synthesized.push((payload::synthesize(&key, &packed, separator), None));
        }
        let (arena, root, _) = build(&config, synthesized)?;
        let (dict, guide) = encode(&arena, root, true);
        let guide = guide.expect("encode(.., want_guide = true) always returns a guide");
        let len = payload::keys_under(&dict, &guide, b"", separator).len();
        Ok(Self {
            dict,
            guide,
            format,
            separator,
            len,
        })
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        !self.get(key).unwrap_or_default().is_empty()
    }

    /// Every record stored for `key`, each decoded into its tuple of
    /// values.
    pub fn get(&self, key: &[u8]) -> Result<Vec<Vec<u64>>> {
        payload::payloads_for(&self.dict, &self.guide, key, self.separator)?
            .into_iter()
            .map(|bytes| self.format.decode(&bytes))
            .collect()
    }

    pub fn has_keys_with_prefix(&self, prefix: &[u8]) -> bool {
        self.dict.has_keys_with_prefix(prefix)
    }

    pub fn keys(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        payload::keys_under(&self.dict, &self.guide, prefix, self.separator)
    }

    /// Every `(key, record)` pair starting with `prefix`.
    pub fn items(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u64>)>> {
        payload::items_under(&self.dict, &self.guide, prefix, self.separator)?
            .into_iter()
            .map(|(key, bytes)| Ok((key, self.format.decode(&bytes)?)))
            .collect()
    }

    pub fn similar_keys(&self, word: &[u8], replaces: &Replaces) -> Result<Vec<Vec<u8>>> {
        let mut out: Vec<Vec<u8>> = Vec::new();
        for (key, _) in self.similar_items(word, replaces)? {
            if out.last() != Some(&key) {
                out.push(key);
            }
        }
        Ok(out)
    }

    /// `(key, record)` pairs `word` fuzzily expands to under `replaces`.
    pub fn similar_items(&self, word: &[u8], replaces: &Replaces) -> Result<Vec<(Vec<u8>, Vec<u64>)>> {
        payload::similar_matches(&self.dict, &self.guide, word, replaces, self.separator)?
            .into_iter()
            .map(|(key, bytes)| Ok((key, self.format.decode(&bytes)?)))
            .collect()
    }

    /// Just the records `similar_items` would have paired with each
    /// match.
    pub fn similar_item_values(&self, word: &[u8], replaces: &Replaces) -> Result<Vec<Vec<u64>>> {
        Ok(self
            .similar_items(word, replaces)?
            .into_iter()
            .map(|(_, v)| v)
            .collect())
    }

    /// The format this map was built with — `false` from
    /// [`RecordFormat::is_portable`] flags a native-endianness file.
    pub fn format(&self) -> &RecordFormat {
        &self.format
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

    /// Deserialize, given the format string and separator the map was
    /// built with (neither is stored in the file itself).
    pub fn from_bytes(bytes: &[u8], format_spec: &str, separator: u8) -> Result<Self> {
        payload::validate_separator(separator)?;
        let format = RecordFormat::parse(format_spec)?;
        let (dict, consumed) = Dictionary::from_bytes(bytes)?;
        let (guide, _) = Guide::from_bytes(&bytes[consumed..], dict.len())?;
        let len = payload::keys_under(&dict, &guide, b"", separator).len();
        Ok(Self { dict, guide, format, separator, len })
    }

    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.dict.write(w)?;
        self.guide.write(w)
    }

    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(r: &mut R, format_spec: &str, separator: u8) -> Result<Self> {
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(r, &mut bytes)
            .map_err(|_| Error::InvalidFile { reason: "I/O error reading record map" })?;
        Self::from_bytes(&bytes, format_spec, separator)
    }
}

//! Public façades over `Builder` + `Encoder` + `Dictionary` + `Guide`.
//!
//! Each type here shapes its constructor input into `(key, Option<u31
//! value>)` pairs for [`Builder`](crate::builder::Builder), hands the
//! frozen arena to [`encoder::encode`](crate::encoder::encode), and wraps
//! the resulting `Dictionary`/`Guide` pair with the query surface that
//! variant promises. None of them hold any state `Builder` didn't already
//! produce — they're readonly, `Send + Sync` views over the automaton.

#[cfg(not(test))]
use alloc::vec::Vec;

mod payload;

pub mod bytes_map;
pub mod completion_set;
pub mod int_map;
pub mod keyset;
pub mod record_map;

pub use bytes_map::BytesMap;
pub use completion_set::CompletionSet;
pub use int_map::IntMap;
pub use keyset::KeySet;
pub use record_map::RecordMap;

use crate::builder::{validate_key, Builder};
use crate::config::BuildConfig;
use crate::cursor::Cursor;
use crate::dictionary::{Dictionary, State};
use crate::error::Result;
use crate::guide::Guide;
use crate::node::{Arena, NodeId};

/// Validate, order (sorting if `config.input_is_sorted` is `false`), and
/// feed `pairs` through a fresh [`Builder`], returning the frozen arena
/// alongside the number of *distinct* keys seen (each variant's public
/// `len`/`is_empty` report this, not the automaton's state count).
pub(crate) fn build(config: &BuildConfig, mut pairs: Vec<(Vec<u8>, Option<u32>)>) -> Result<(Arena, NodeId, usize)> {
    for (key, _) in &pairs {
        validate_key(key)?;
    }
    if !config.input_is_sorted {
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    let mut distinct_keys = 0usize;
    for i in 0..pairs.len() {
        if i == 0 || pairs[i].0 != pairs[i - 1].0 {
            distinct_keys += 1;
        }
    }
    let mut builder = Builder::new(config);
    for (key, value) in pairs {
        builder.insert(&key, value)?;
    }
    let (arena, root) = builder.finish();
    Ok((arena, root, distinct_keys))
}

/// Every key reachable under `prefix`, in byte-lexicographic order.
pub(crate) fn collect_keys(dict: &Dictionary, guide: &Guide, prefix: &[u8]) -> Vec<Vec<u8>> {
    let start = match dict.walk(prefix) {
        Some(s) => s,
        None => return Vec::new(),
    };
    let mut cursor = Cursor::new(dict, guide, prefix, start);
    let mut out = Vec::new();
    while cursor.advance() {
        out.push(cursor.key().to_vec());
    }
    out
}

/// Every `(key, terminal state)` reachable under `prefix`, in
/// byte-lexicographic order — the building block `IntMap`/`CompletionSet`
/// use to pull values out once a key is located.
pub(crate) fn collect_with_state(dict: &Dictionary, guide: &Guide, prefix: &[u8]) -> Vec<(Vec<u8>, State)> {
    let start = match dict.walk(prefix) {
        Some(s) => s,
        None => return Vec::new(),
    };
    let mut cursor = Cursor::new(dict, guide, prefix, start);
    let mut out = Vec::new();
    while cursor.advance() {
        out.push((cursor.key().to_vec(), cursor.state()));
    }
    out
}

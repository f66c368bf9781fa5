//! Shared machinery for the payload variants that embed a value in the
//! key itself: `key ∥ separator ∥ base64(payload)` (`spec.md` §4.4).
//!
//! `BytesMap` stores the raw payload bytes directly; `RecordMap` layers a
//! [`RecordFormat`](crate::format::RecordFormat) on top to pack/unpack a
//! fixed tuple of integers into those same bytes. Both share key
//! synthesis, separator validation, and completion-based value lookup.

#[cfg(not(test))]
use alloc::vec::Vec;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::cursor::Cursor;
use crate::dictionary::{Dictionary, State, ROOT};
use crate::error::{Error, Result};
use crate::guide::Guide;
use crate::similar::Replaces;

/// Reject separators that are `0x00` or fall inside the base64 alphabet
/// (`A–Za–z0–9+/=`) — either would make `key ∥ sep ∥ base64(payload)`
/// ambiguous to split back apart.
pub(crate) fn validate_separator(sep: u8) -> Result<()> {
    if sep == 0 {
        return Err(Error::BadSeparator {
            reason: "separator cannot be 0x00",
        });
    }
    let in_base64_alphabet = sep.is_ascii_alphanumeric() || sep == b'+' || sep == b'/' || sep == b'=';
    if in_base64_alphabet {
        return Err(Error::BadSeparator {
            reason: "separator collides with the base64 alphabet",
        });
    }
    Ok(())
}

/// Synthesize the automaton key for `(key, payload)`: `key ∥ sep ∥
/// base64(payload)`.
pub(crate) fn synthesize(key: &[u8], payload: &[u8], sep: u8) -> Vec<u8> {
    let encoded = BASE64.encode(payload);
    let mut out = Vec::with_capacity(key.len() + 1 + encoded.len());
    out.extend_from_slice(key);
    out.push(sep);
    out.extend_from_slice(encoded.as_bytes());
    out
}

/// Every payload for `key`, in the automaton's natural (ascending
/// base64-suffix) order, decoded back from base64. Fails with
/// [`Error::KeyNotFound`] if `key` was never stored.
pub(crate) fn payloads_for(
    dict: &Dictionary,
    guide: &Guide,
    key: &[u8],
    sep: u8,
) -> Result<Vec<Vec<u8>>> {
    let mut prefix = Vec::with_capacity(key.len() + 1);
    prefix.extend_from_slice(key);
    prefix.push(sep);

    let start = match dict.walk(&prefix) {
        Some(s) => s,
        None => return Err(Error::KeyNotFound),
    };

    let mut out = Vec::new();
    let mut cursor = Cursor::new(dict, guide, &prefix, start);
    while cursor.advance() {
        let suffix = &cursor.key()[prefix.len()..];
        let decoded = BASE64.decode(suffix).map_err(|_| Error::InvalidFile {
            reason: "stored payload suffix is not valid base64",
        })?;
        out.push(decoded);
    }
    Ok(out)
}

/// Every `(key, payload)` pair reachable under `prefix`, split back into
/// the user key and the decoded payload.
pub(crate) fn items_under(
    dict: &Dictionary,
    guide: &Guide,
    prefix: &[u8],
    sep: u8,
) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let start = match dict.walk(prefix) {
        Some(s) => s,
        None => return Ok(Vec::new()),
    };
    let mut out = Vec::new();
    let mut cursor = Cursor::new(dict, guide, prefix, start);
    while cursor.advance() {
        let full = cursor.key();
        let sep_pos = full
            .iter()
            .position(|&b| b == sep)
            .ok_or(Error::InvalidFile {
                reason: "stored key is missing its payload separator",
            })?;
        let user_key = full[..sep_pos].to_vec();
        let decoded = BASE64.decode(&full[sep_pos + 1..]).map_err(|_| Error::InvalidFile {
            reason: "stored payload suffix is not valid base64",
        })?;
        out.push((user_key, decoded));
    }
    Ok(out)
}

/// Distinct user keys reachable under `prefix` (payload suffixes
/// stripped), each listed once.
pub(crate) fn keys_under(dict: &Dictionary, guide: &Guide, prefix: &[u8], sep: u8) -> Vec<Vec<u8>> {
    let start = match dict.walk(prefix) {
        Some(s) => s,
        None => return Vec::new(),
    };
    let mut out: Vec<Vec<u8>> = Vec::new();
    let mut cursor = Cursor::new(dict, guide, prefix, start);
    while cursor.advance() {
        let full = cursor.key();
        if let Some(sep_pos) = full.iter().position(|&b| b == sep) {
            let user_key = full[..sep_pos].to_vec();
            if out.last() != Some(&user_key) {
                out.push(user_key);
            }
        }
    }
    out
}

/// Fuzzy expansion of `word` against the user-key portion of every stored
/// record, paired with the decoded payload of every match. Mirrors
/// [`crate::similar::search`]'s replacement-aware walk, but a "match" is
/// reaching a state from which the separator transitions (a record
/// actually starts there) rather than reaching a terminal state directly.
pub(crate) fn similar_matches(
    dict: &Dictionary,
    guide: &Guide,
    word: &[u8],
    replaces: &Replaces,
    sep: u8,
) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut results = Vec::new();
    if word.contains(&0) {
        return Ok(results);
    }
    let mut key_buf = Vec::with_capacity(word.len() + 4);
    walk_similar(dict, guide, word, 0, ROOT, &mut key_buf, replaces, sep, &mut results)?;
    Ok(results)
}

#[allow(clippy::too_many_arguments)]
fn walk_similar(
    dict: &Dictionary,
    guide: &Guide,
    word: &[u8],
    pos: usize,
    state: State,
    key_buf: &mut Vec<u8>,
    replaces: &Replaces,
    sep: u8,
    results: &mut Vec<(Vec<u8>, Vec<u8>)>,
) -> Result<()> {
    if pos == word.len() {
        if let Some(record_start) = dict.step(state, sep) {
            let mut prefix = key_buf.clone();
            prefix.push(sep);
            let mut cursor = Cursor::new(dict, guide, &prefix, record_start);
            while cursor.advance() {
                let suffix = &cursor.key()[prefix.len()..];
                let decoded = BASE64.decode(suffix).map_err(|_| Error::InvalidFile {
                    reason: "stored payload suffix is not valid base64",
                })?;
                results.push((key_buf.clone(), decoded));
            }
        }
        return Ok(());
    }

    if let Some((candidates, src_len)) = replaces.candidates_at(word, pos) {
        for candidate in candidates {
            if let Some(next) = step_all(dict, state, candidate) {
                let added = key_buf.len();
                key_buf.extend_from_slice(candidate);
                walk_similar(dict, guide, word, pos + src_len, next, key_buf, replaces, sep, results)?;
                key_buf.truncate(added);
            }
        }
        return Ok(());
    }

    let b = word[pos];
    if let Some(next) = dict.step(state, b) {
        key_buf.push(b);
        walk_similar(dict, guide, word, pos + 1, next, key_buf, replaces, sep, results)?;
        key_buf.pop();
    }
    Ok(())
}

fn step_all(dict: &Dictionary, state: State, bytes: &[u8]) -> Option<State> {
    let mut s = state;
    for &b in bytes {
        s = dict.step(s, b)?;
    }
    Some(s)
}

//! Similar-key search: bounded fuzzy expansion via a pre-compiled table of
//! byte-sequence alternatives (`spec.md` §4.3).
//!
//! [`compile_replaces`] takes `(source, alternative)` byte-sequence pairs
//! (the shipped use case maps single UTF-8-encoded characters, e.g. the
//! two bytes of Cyrillic 'Е' to the two bytes of 'Ё') and groups them by
//! source into a sorted `{src, alt1, alt2, …}` candidate list, literal
//! first. [`search`] then walks the automaton depth-first: at each
//! position it tries the literal byte(s) first, then every declared
//! alternative, pruning as soon as a candidate fails to match a
//! transition, and de-duplicates results while preserving
//! first-occurrence order.

#[cfg(not(test))]
use alloc::{string::String, vec::Vec};
use alloc::collections::{BTreeMap, BTreeSet};

use crate::dictionary::{Dictionary, State};

/// A compiled substitution table for [`search`].
#[derive(Clone, Debug, Default)]
pub struct Replaces {
    by_source: BTreeMap<Vec<u8>, Vec<Vec<u8>>>,
    source_lengths: Vec<usize>,
}

impl Replaces {
    /// The candidate byte-sequences (literal first) that could stand at
    /// `word[pos..]`, and how many source bytes they replace. Used by
    /// [`search`] and by the payload variants that run their own
    /// replacement-aware walk (`src/variants/payload.rs`).
    pub(crate) fn candidates_at<'a>(&'a self, word: &[u8], pos: usize) -> Option<(&'a [Vec<u8>], usize)> {
        for &len in &self.source_lengths {
            if pos + len > word.len() {
                continue;
            }
            if let Some(candidates) = self.by_source.get(&word[pos..pos + len]) {
                return Some((candidates.as_slice(), len));
            }
        }
        None
    }
}

/// Compile `(source, alternative)` byte-sequence pairs into a [`Replaces`]
/// table. Pairs sharing the same source accumulate into one candidate
/// list, literal source first, duplicate alternatives dropped.
pub fn compile_replaces<S, A>(pairs: &[(S, A)]) -> Replaces
where
    S: AsRef<[u8]>,
    A: AsRef<[u8]>,
{
    let mut by_source: BTreeMap<Vec<u8>, Vec<Vec<u8>>> = BTreeMap::new();
    for (src, alt) in pairs {
        let src = src.as_ref().to_vec();
        let alt = alt.as_ref().to_vec();
        let entry = by_source.entry(src.clone()).or_insert_with(|| alloc_vec(src));
        if !entry.contains(&alt) {
            entry.push(alt);
        }
    }
    let mut source_lengths: Vec<usize> = by_source.keys().map(|k| k.len()).collect();
    source_lengths.sort_unstable();
    source_lengths.dedup();
    Replaces {
        by_source,
        source_lengths,
    }
}

fn alloc_vec(src: Vec<u8>) -> Vec<Vec<u8>> {
    let mut v = Vec::with_capacity(2);
    v.push(src);
    v
}

/// Depth-first similar-key search over `word`. Returns every `(key,
/// terminal state)` the automaton accepts that `word` expands to under
/// `replaces`, in first-occurrence order (literal match first, then
/// results ordered by the position of their earliest substitution).
pub(crate) fn search(dict: &Dictionary, word: &[u8], replaces: &Replaces) -> Vec<(Vec<u8>, State)> {
    let mut results = Vec::new();
    let mut seen = BTreeSet::new();
    if word.contains(&0) {
        return results;
    }
    let mut key_buf = Vec::with_capacity(word.len() + 4);
    walk(dict, word, 0, crate::dictionary::ROOT, &mut key_buf, replaces, &mut results, &mut seen);
    results
}

fn walk(
    dict: &Dictionary,
    word: &[u8],
    pos: usize,
    state: State,
    key_buf: &mut Vec<u8>,
    replaces: &Replaces,
    results: &mut Vec<(Vec<u8>, State)>,
    seen: &mut BTreeSet<Vec<u8>>,
) {
    if pos == word.len() {
        if dict.is_terminal(state) && seen.insert(key_buf.clone()) {
            results.push((key_buf.clone(), state));
        }
        return;
    }

    if let Some((candidates, src_len)) = replaces.candidates_at(word, pos) {
        for candidate in candidates {
            if let Some(next) = step_all(dict, state, candidate) {
                let added = key_buf.len();
                key_buf.extend_from_slice(candidate);
                walk(dict, word, pos + src_len, next, key_buf, replaces, results, seen);
                key_buf.truncate(added);
            }
        }
        return;
    }

    let b = word[pos];
    if let Some(next) = dict.step(state, b) {
        key_buf.push(b);
        walk(dict, word, pos + 1, next, key_buf, replaces, results, seen);
        key_buf.pop();
    }
}

fn step_all(dict: &Dictionary, state: State, bytes: &[u8]) -> Option<State> {
    let mut s = state;
    for &b in bytes {
        s = dict.step(s, b)?;
    }
    Some(s)
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

    // 'Е' = D0 95, 'Ё' = D0 81 in UTF-8.
    #[test]
    fn s6_similar_keys_cyrillic_e() {
        let dict = build(&["ДЕРЕВНЯ", "ДЕРЁВНЯ"]);
        let replaces = compile_replaces(&[([0xD0u8, 0x95], [0xD0u8, 0x81])]);

        let hits = search(&dict, "ДЕРЕВНЯ".as_bytes(), &replaces);
        let keys: Vec<String> = hits
            .into_iter()
            .map(|(k, _)| String::from_utf8(k).unwrap())
            .collect();
        assert_eq!(keys, vec!["ДЕРЕВНЯ".to_string(), "ДЕРЁВНЯ".to_string()]);

        let hits2 = search(&dict, "ДЕРЁВНЯ".as_bytes(), &replaces);
        let keys2: Vec<String> = hits2
            .into_iter()
            .map(|(k, _)| String::from_utf8(k).unwrap())
            .collect();
        assert_eq!(keys2, vec!["ДЕРЁВНЯ".to_string()]);
    }

    #[test]
    fn no_replacements_behaves_like_contains() {
        let dict = build(&["foo", "bar"]);
        let replaces = compile_replaces::<&[u8], &[u8]>(&[]);
        assert_eq!(search(&dict, b"foo", &replaces).len(), 1);
        assert_eq!(search(&dict, b"baz", &replaces).len(), 0);
    }

    #[test]
    fn null_byte_in_query_short_circuits() {
        let dict = build(&["foo"]);
        let replaces = compile_replaces::<&[u8], &[u8]>(&[]);
        assert!(search(&dict, b"fo\x00", &replaces).is_empty());
    }
}

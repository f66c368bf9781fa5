//! Integration tests for the concrete scenarios.

use dafsa::error::Error;
use dafsa::similar::compile_replaces;
use dafsa::variants::{BytesMap, CompletionSet, IntMap, KeySet};

#[test]
fn s1_keyset_and_completion_set() {
    let keys = ["f", "bar", "foo", "foobar"];

    let set = KeySet::new(keys, false).unwrap();
    assert!(set.contains(b"foo"));
    assert!(!set.contains(b"fo"));
    assert_eq!(
        set.prefixes(b"foobarz"),
        vec![b"f".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
    );

    let completion = CompletionSet::new(keys, false).unwrap();
    assert_eq!(
        completion.keys(b""),
        vec![
            b"bar".to_vec(),
            b"f".to_vec(),
            b"foo".to_vec(),
            b"foobar".to_vec(),
        ]
    );
    assert_eq!(
        completion.keys(b"foo"),
        vec![b"foo".to_vec(), b"foobar".to_vec()]
    );
}

#[test]
fn s2_int_map_get_and_value_range() {
    let map = IntMap::new([("foo", 1u32), ("bar", 5), ("foobar", 3)], false).unwrap();
    assert_eq!(map.get(b"foo"), Ok(1));
    assert_eq!(map.get(b"fo"), Err(Error::KeyNotFound));

    let err = IntMap::new([("foo", 1u32 << 31)], false).unwrap_err();
    assert!(matches!(err, Error::ValueRange { .. }));
}

#[test]
fn s3_bytes_map_multi_value() {
    let map = BytesMap::new([
        ("foo", b"data1".to_vec()),
        ("bar", b"data2".to_vec()),
        ("foo", b"data3".to_vec()),
        ("foobar", b"data4".to_vec()),
    ], false)
    .unwrap();

    assert_eq!(
        map.get(b"foo").unwrap(),
        vec![b"data1".to_vec(), b"data3".to_vec()]
    );
    assert!(matches!(map.get(b"food").unwrap_err(), Error::KeyNotFound));

    let mut keys = map.keys(b"");
    keys.sort();
    assert_eq!(
        keys,
        vec![b"bar".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
    );
}

#[test]
fn s4_nul_byte_in_key_rejected() {
    let err = KeySet::new(["foo\x00bar", "bar"], false).unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
}

#[test]
fn s5_separator_colliding_with_base64_alphabet_rejected() {
    let err = BytesMap::with_separator([("foo", b"bar".to_vec())], b'f', false).unwrap_err();
    assert!(matches!(err, Error::BadSeparator { .. }));
}

#[test]
fn s6_similar_keys_cyrillic_e() {
    let set = KeySet::new(["ДЕРЕВНЯ", "ДЕРЁВНЯ"], false).unwrap();
    let replaces = compile_replaces(&[([0xD0u8, 0x95], [0xD0u8, 0x81])]);

    let mut hits = set.similar_keys("ДЕРЕВНЯ".as_bytes(), &replaces);
    hits.sort();
    let mut expected = vec!["ДЕРЕВНЯ".as_bytes().to_vec(), "ДЕРЁВНЯ".as_bytes().to_vec()];
    expected.sort();
    assert_eq!(hits, expected);

    let hits = set.similar_keys("ДЕРЁВНЯ".as_bytes(), &replaces);
    assert_eq!(hits, vec!["ДЕРЁВНЯ".as_bytes().to_vec()]);
}

#[test]
fn s7_truncated_file_is_rejected_without_crash() {
    let err = KeySet::from_bytes(b"foo").unwrap_err();
    assert!(matches!(err, Error::InvalidFile { .. }));

    // A fresh object built after a failed load behaves normally; there is
    // no object left dangling from the failed attempt to misuse.
    let set = KeySet::new(["anything"], false).unwrap();
    assert!(!set.contains(b"random-key"));
}

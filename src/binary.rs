//! Length-prefixed flat-array (de)serialization.
//!
//! The on-disk format (`spec.md` §6) is two concatenated segments:
//!
//! 1. Dictionary: `u32` unit count `N` (little-endian), then `N` 32-bit
//!    units.
//! 2. Guide (only for completion-capable variants): `u32` unit count `M`
//!    (must equal `N`), then `M` 2-byte `(child, sibling)` pairs.
//!
//! All multi-byte integers are little-endian. This module provides the
//! shared segment-level read/write primitives; `Dictionary` and `Guide`
//! each expose the public `read`/`write`/`to_bytes`/`from_bytes` API on top
//! of them.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::unit::{GuideEntry, Unit};

/// Read a `u32` length prefix from the front of `bytes`.
///
/// Returns the parsed count and the remaining bytes after the prefix.
fn read_count<'a>(bytes: &'a [u8], what: &'static str) -> Result<(u32, &'a [u8])> {
    if bytes.len() < 4 {
        return Err(Error::InvalidFile { reason: what });
    }
    let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    Ok((count, &bytes[4..]))
}

/// Parse the dictionary segment at the front of `bytes`.
///
/// Returns the unit slice (bytemuck-cast, zero-copy) and the number of
/// bytes the segment occupied (so a caller can find the guide segment, if
/// any, right after it).
pub(crate) fn parse_dictionary_segment(bytes: &[u8]) -> Result<(&[Unit], usize)> {
    let (count, rest) = read_count(bytes, "truncated dictionary unit count")?;
    if count == 0 {
        return Err(Error::InvalidFile {
            reason: "dictionary must have at least one unit (the root)",
        });
    }
    let byte_len = count as usize * core::mem::size_of::<Unit>();
    if rest.len() < byte_len {
        return Err(Error::InvalidFile {
            reason: "truncated dictionary segment",
        });
    }
    let units: &[Unit] = bytemuck::try_cast_slice(&rest[..byte_len]).map_err(|_| Error::InvalidFile {
        reason: "misaligned dictionary segment",
    })?;
    Ok((units, 4 + byte_len))
}

/// Parse the guide segment at the front of `bytes`, requiring its count to
/// equal `expected_len` (the dictionary's unit count).
pub(crate) fn parse_guide_segment(bytes: &[u8], expected_len: usize) -> Result<(&[GuideEntry], usize)> {
    let (count, rest) = read_count(bytes, "truncated guide unit count")?;
    if count as usize != expected_len {
        return Err(Error::InvalidFile {
            reason: "guide segment length does not match dictionary length",
        });
    }
    let byte_len = count as usize * core::mem::size_of::<GuideEntry>();
    if rest.len() < byte_len {
        return Err(Error::InvalidFile {
            reason: "truncated guide segment",
        });
    }
    let entries: &[GuideEntry] =
        bytemuck::try_cast_slice(&rest[..byte_len]).map_err(|_| Error::InvalidFile {
            reason: "misaligned guide segment",
        })?;
    Ok((entries, 4 + byte_len))
}

/// Serialize a dictionary segment: length prefix then raw little-endian
/// unit bytes.
pub(crate) fn write_dictionary_segment(units: &[Unit]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + units.len() * core::mem::size_of::<Unit>());
    out.extend_from_slice(&(units.len() as u32).to_le_bytes());
    out.extend_from_slice(bytemuck::cast_slice(units));
    out
}

/// Serialize a guide segment: length prefix then raw `(child, sibling)`
/// bytes.
pub(crate) fn write_guide_segment(entries: &[GuideEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + entries.len() * core::mem::size_of::<GuideEntry>());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    out.extend_from_slice(bytemuck::cast_slice(entries));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_segment_roundtrip() {
        let units = vec![Unit::new(true, 1, 0), Unit::new(false, 0, b'a')];
        let bytes = write_dictionary_segment(&units);
        let (parsed, consumed) = parse_dictionary_segment(&bytes).unwrap();
        assert_eq!(parsed, units.as_slice());
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn rejects_zero_units() {
        let bytes = 0u32.to_le_bytes();
        assert!(parse_dictionary_segment(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_segment() {
        let bytes = [3, 0, 0, 0, 1, 2]; // claims 3 units, has none
        assert!(parse_dictionary_segment(&bytes).is_err());
    }

    #[test]
    fn guide_segment_must_match_dictionary_length() {
        let entries = vec![GuideEntry { child: 1, sibling: 2 }];
        let bytes = write_guide_segment(&entries);
        assert!(parse_guide_segment(&bytes, 2).is_err());
        assert!(parse_guide_segment(&bytes, 1).is_ok());
    }
}

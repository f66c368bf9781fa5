//! The guide: a parallel array enabling non-recursive in-order key
//! enumeration over a [`Dictionary`](crate::dictionary::Dictionary).
//!
//! One [`GuideEntry`] per dictionary unit. `child(s)` is the smallest
//! outgoing label from `s`; `sibling(s)` is the next-greater label at the
//! *parent* that reached `s`, or `0` if `s` was its parent's last
//! transition. Together they let a [`Cursor`](crate::cursor::Cursor) walk
//! an entire subtree depth-first without ever re-scanning a state's
//! transitions or recursing.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::binary::{parse_guide_segment, write_guide_segment};
use crate::dictionary::State;
use crate::error::{Error, Result};
use crate::unit::GuideEntry;

enum Storage {
    Owned(Vec<GuideEntry>),
    #[cfg(feature = "mmap")]
    Mapped {
        mmap: memmap2::Mmap,
        byte_range: core::ops::Range<usize>,
    },
}

/// Parallel array of `(child, sibling)` hints, one per dictionary state.
pub struct Guide {
    storage: Storage,
}

impl core::fmt::Debug for Guide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Guide").field("len", &self.entries().len()).finish()
    }
}

impl Guide {
    pub(crate) fn from_entries(entries: Vec<GuideEntry>) -> Self {
        Self {
            storage: Storage::Owned(entries),
        }
    }

    #[inline]
    fn entries(&self) -> &[GuideEntry] {
        match &self.storage {
            Storage::Owned(v) => v.as_slice(),
            #[cfg(feature = "mmap")]
            Storage::Mapped { mmap, byte_range } => {
                bytemuck::cast_slice(&mmap[byte_range.clone()])
            }
        }
    }

    /// Number of entries (must equal the dictionary's `len()`).
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Smallest outgoing label from `state`, or `None` if it has no
    /// children.
    pub fn child(&self, state: State) -> Option<u8> {
        self.entries().get(state as usize).and_then(|e| {
            if e.child == 0 {
                None
            } else {
                Some(e.child)
            }
        })
    }

    /// The next-greater label at `state`'s parent after the one used to
    /// reach `state`, or `None` if `state` was the last transition.
    pub fn sibling(&self, state: State) -> Option<u8> {
        self.entries().get(state as usize).and_then(|e| {
            if e.sibling == 0 {
                None
            } else {
                Some(e.sibling)
            }
        })
    }

    /// Serialize just the guide segment.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_guide_segment(self.entries())
    }

    /// Deserialize a guide segment from the front of `bytes`, which must
    /// describe exactly `expected_len` entries (the owning dictionary's
    /// unit count). Returns the guide and the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8], expected_len: usize) -> Result<(Self, usize)> {
        let (entries, consumed) = parse_guide_segment(bytes, expected_len)?;
        Ok((Self::from_entries(entries.to_vec()), consumed))
    }

    /// Write just the guide segment to `w`.
    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Read just the guide segment from `r`, which must contain exactly
    /// the guide segment for a dictionary of `expected_len` units.
    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read>(r: &mut R, expected_len: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)
            .map_err(|_| Error::InvalidFile { reason: "I/O error reading guide" })?;
        let (guide, _) = Self::from_bytes(&bytes, expected_len)?;
        Ok(guide)
    }

    /// Memory-map a guide segment directly out of `bytes` (typically the
    /// tail of a larger mapped file, right after the dictionary segment).
    #[cfg(feature = "mmap")]
    pub(crate) fn open_mmap_segment(
        mmap: memmap2::Mmap,
        offset: usize,
        expected_len: usize,
    ) -> Result<Self> {
        let (entries, consumed) = parse_guide_segment(&mmap[offset..], expected_len)?;
        let byte_range = (offset + 4)..(offset + consumed);
        let _ = entries;
        Ok(Self {
            storage: Storage::Mapped { mmap, byte_range },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::config::BuildConfig;
    use crate::encoder::encode;

    fn build_with_guide(keys: &[&str]) -> (crate::dictionary::Dictionary, Guide) {
        let config = BuildConfig::default();
        let mut builder = Builder::new(&config);
        let mut sorted: Vec<&&str> = keys.iter().collect();
        sorted.sort();
        for k in sorted {
            builder.insert(k.as_bytes(), None).unwrap();
        }
        let (arena, root) = builder.finish();
        let (dict, guide) = encode(&arena, root, true);
        (dict, guide.unwrap())
    }

    #[test]
    fn root_child_is_smallest_label() {
        let (dict, guide) = build_with_guide(&["bar", "foo"]);
        assert_eq!(guide.child(crate::dictionary::ROOT), Some(b'b'));
        let _ = dict;
    }

    #[test]
    fn guide_and_dictionary_lengths_match() {
        let (dict, guide) = build_with_guide(&["f", "bar", "foo", "foobar"]);
        assert_eq!(dict.len(), guide.len());
    }

    #[test]
    fn sibling_reports_next_label_or_none() {
        let (_dict, guide) = build_with_guide(&["bar", "baz"]);
        // root -> 'b' -> 'a' -> {'r','z'}: at the 'a' state, child is 'r',
        // and 'r''s guide entry should report sibling 'z'.
        let r_state = _dict.walk(b"ba").unwrap();
        let child_label = guide.child(r_state).unwrap();
        assert_eq!(child_label, b'r');
        let r_child = _dict.step(r_state, b'r').unwrap();
        assert_eq!(guide.sibling(r_child), Some(b'z'));
        let z_child = _dict.step(r_state, b'z').unwrap();
        assert_eq!(guide.sibling(z_child), None);
    }
}

//! `RecordMap`'s binary format mini-language (`spec.md` §6): strings like
//! `"=3H"` or `"<H"` describing a tuple of fixed-width unsigned integers.
//!
//! Grammar: one endianness prefix (`<` little, `>` big, `=` native),
//! followed by one or more field specs, each an optional decimal repeat
//! count and a field code (`B`=u8, `H`=u16, `I`=u32, `Q`=u64).

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Byte order selected by a format string's prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
    /// `=`: whatever the host happens to be. Carried through so a reader
    /// can flag it (see [`RecordFormat::is_portable`]) — a file written
    /// with `=` on one architecture may decode incorrectly on another.
    Native,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    U8,
    U16,
    U32,
    U64,
}

impl FieldKind {
    fn size(self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::U64 => 8,
        }
    }

    fn from_code(c: u8) -> Option<Self> {
        match c {
            b'B' => Some(FieldKind::U8),
            b'H' => Some(FieldKind::U16),
            b'I' => Some(FieldKind::U32),
            b'Q' => Some(FieldKind::U64),
            _ => None,
        }
    }
}

/// A parsed `RecordMap` format string: an endianness and a flattened list
/// of fields (repeat counts already expanded).
#[derive(Clone, Debug)]
pub struct RecordFormat {
    endian: Endian,
    fields: Vec<FieldKind>,
}

impl RecordFormat {
    /// Parse a format string such as `"=3H"` or `"<BHI"`.
    pub fn parse(spec: &str) -> Result<Self> {
        let bytes = spec.as_bytes();
        let (endian, mut rest) = match bytes.first() {
            Some(b'<') => (Endian::Little, &bytes[1..]),
            Some(b'>') => (Endian::Big, &bytes[1..]),
            Some(b'=') => (Endian::Native, &bytes[1..]),
            _ => {
                return Err(Error::BadFormat {
                    reason: "format string must start with '<', '>', or '='".into(),
                })
            }
        };

        if rest.is_empty() {
            return Err(Error::BadFormat {
                reason: "format string has no fields".into(),
            });
        }

        let mut fields = Vec::new();
        while !rest.is_empty() {
            let mut count = 0usize;
            let mut saw_digit = false;
            while let Some(&d) = rest.first() {
                if d.is_ascii_digit() {
                    saw_digit = true;
                    count = count * 10 + (d - b'0') as usize;
                    rest = &rest[1..];
                } else {
                    break;
                }
            }
            let count = if saw_digit { count } else { 1 };
            if count == 0 {
                return Err(Error::BadFormat {
                    reason: "repeat count must be at least 1".into(),
                });
            }
            let code = *rest.first().ok_or(Error::BadFormat {
                reason: "repeat count with no following field code".into(),
            })?;
            let kind = FieldKind::from_code(code).ok_or_else(|| Error::BadFormat {
                reason: "unknown field code (expected one of B, H, I, Q)".into(),
            })?;
            rest = &rest[1..];
            for _ in 0..count {
                fields.push(kind);
            }
        }

        Ok(Self { endian, fields })
    }

    /// `false` for `=` (native byte order): a file written this way is
    /// only safely readable on a host with the same endianness.
    pub fn is_portable(&self) -> bool {
        self.endian != Endian::Native
    }

    /// Number of values a record holds.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total encoded byte length of one record.
    pub fn byte_len(&self) -> usize {
        self.fields.iter().map(|f| f.size()).sum()
    }

    /// Pack `values` (one per field, widened to `u64`) into bytes.
    pub(crate) fn encode(&self, values: &[u64]) -> Result<Vec<u8>> {
        if values.len() != self.fields.len() {
            return Err(Error::BadFormat {
                reason: "value count does not match format field count".into(),
            });
        }
        let mut out = Vec::with_capacity(self.byte_len());
        for (&kind, &value) in self.fields.iter().zip(values) {
            self.push_field(&mut out, kind, value);
        }
        Ok(out)
    }

    fn push_field(&self, out: &mut Vec<u8>, kind: FieldKind, value: u64) {
        match (kind, self.endian) {
            (FieldKind::U8, _) => out.push(value as u8),
            (FieldKind::U16, Endian::Little) => out.extend_from_slice(&(value as u16).to_le_bytes()),
            (FieldKind::U16, Endian::Big) => out.extend_from_slice(&(value as u16).to_be_bytes()),
            (FieldKind::U16, Endian::Native) => out.extend_from_slice(&(value as u16).to_ne_bytes()),
            (FieldKind::U32, Endian::Little) => out.extend_from_slice(&(value as u32).to_le_bytes()),
            (FieldKind::U32, Endian::Big) => out.extend_from_slice(&(value as u32).to_be_bytes()),
            (FieldKind::U32, Endian::Native) => out.extend_from_slice(&(value as u32).to_ne_bytes()),
            (FieldKind::U64, Endian::Little) => out.extend_from_slice(&value.to_le_bytes()),
            (FieldKind::U64, Endian::Big) => out.extend_from_slice(&value.to_be_bytes()),
            (FieldKind::U64, Endian::Native) => out.extend_from_slice(&value.to_ne_bytes()),
        }
    }

    /// Unpack `bytes` into an ordered tuple of values, widened to `u64`.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<Vec<u64>> {
        if bytes.len() != self.byte_len() {
            return Err(Error::BadFormat {
                reason: "record byte length does not match format".into(),
            });
        }
        let mut out = Vec::with_capacity(self.fields.len());
        let mut offset = 0;
        for &kind in &self.fields {
            let size = kind.size();
            let chunk = &bytes[offset..offset + size];
            out.push(self.read_field(kind, chunk));
            offset += size;
        }
        Ok(out)
    }

    fn read_field(&self, kind: FieldKind, chunk: &[u8]) -> u64 {
        match (kind, self.endian) {
            (FieldKind::U8, _) => chunk[0] as u64,
            (FieldKind::U16, Endian::Little) => u16::from_le_bytes([chunk[0], chunk[1]]) as u64,
            (FieldKind::U16, Endian::Big) => u16::from_be_bytes([chunk[0], chunk[1]]) as u64,
            (FieldKind::U16, Endian::Native) => u16::from_ne_bytes([chunk[0], chunk[1]]) as u64,
            (FieldKind::U32, endian) => {
                let arr = [chunk[0], chunk[1], chunk[2], chunk[3]];
                match endian {
                    Endian::Little => u32::from_le_bytes(arr) as u64,
                    Endian::Big => u32::from_be_bytes(arr) as u64,
                    Endian::Native => u32::from_ne_bytes(arr) as u64,
                }
            }
            (FieldKind::U64, endian) => {
                let arr: [u8; 8] = chunk.try_into().unwrap();
                match endian {
                    Endian::Little => u64::from_le_bytes(arr),
                    Endian::Big => u64::from_be_bytes(arr),
                    Endian::Native => u64::from_ne_bytes(arr),
                }
            }
        }
    }
}

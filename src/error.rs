//! Crate-wide error type.
//!
//! A single hand-rolled enum covers every failure mode from construction
//! through serialization through query. There is no dependency on
//! `thiserror`/`anyhow` here (those stay in dev-dependencies): the `Display`
//! impl is `core::fmt`-only so the type works under `no_std`, and
//! `std::error::Error` is implemented separately behind the `std` feature.

#[cfg(not(test))]
use alloc::string::String;
use core::fmt;

/// Everything that can go wrong building, loading, or querying an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key contained byte `0x00`, or collided with a reserved payload
    /// separator.
    InvalidKey {
        /// Human-readable reason (no key bytes are echoed back, since they
        /// may not be valid UTF-8).
        reason: &'static str,
    },
    /// `input_is_sorted` was asserted but the input was not strictly
    /// increasing in byte-lexicographic order.
    OrderError {
        /// 0-indexed position of the first out-of-order key.
        at: usize,
    },
    /// An `IntMap` value fell outside `[0, 2^31 - 1]`.
    ValueRange {
        /// The rejected value.
        value: i64,
    },
    /// `IntMap` saw the same key twice with two different values.
    DuplicateValue {
        /// First value seen for the key.
        first: u32,
        /// Second, conflicting value.
        second: u32,
    },
    /// A `RecordMap` format string was malformed.
    BadFormat {
        /// Human-readable reason.
        reason: String,
    },
    /// The chosen payload separator byte is unusable.
    BadSeparator {
        /// Human-readable reason.
        reason: &'static str,
    },
    /// Serialized data is corrupt, truncated, or structurally impossible.
    InvalidFile {
        /// Human-readable reason.
        reason: &'static str,
    },
    /// `get`/indexing found no such key.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey { reason } => write!(f, "invalid key: {}", reason),
            Self::OrderError { at } => {
                write!(f, "input_is_sorted was set but key at index {} is out of order", at)
            }
            Self::ValueRange { value } => {
                write!(f, "value {} is out of range [0, 2^31 - 1]", value)
            }
            Self::DuplicateValue { first, second } => write!(
                f,
                "conflicting values for the same key: {} vs {}",
                first, second
            ),
            Self::BadFormat { reason } => write!(f, "malformed record format string: {}", reason),
            Self::BadSeparator { reason } => write!(f, "bad payload separator: {}", reason),
            Self::InvalidFile { reason } => write!(f, "invalid serialized automaton: {}", reason),
            Self::KeyNotFound => write!(f, "key not found"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

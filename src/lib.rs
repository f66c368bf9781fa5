//! # dafsa
//!
//! An immutable, memory-compact associative container over byte-string
//! keys, built on a minimized deterministic acyclic finite-state automaton
//! (a DAFSA, also called a DAWG) encoded as a double array.
//!
//! Construction happens once, via incremental minimization over
//! lexicographically sorted input (Daciuk et al.); the result is a flat
//! array of 32-bit transition units that every query walks with pure index
//! arithmetic, no heap allocation beyond the caller's own output buffers.
//!
//! ## Module organization
//!
//! - `builder` / `node` / `register` (internal, `std`-only) — the
//!   minimization engine: incremental construction over a node arena with
//!   structural-equivalence deduplication.
//! - `encoder` (internal, `std`-only) / [`unit`] — placement of the
//!   minimized automaton into a double array (`Unit`), including the
//!   reserved `0x00` pseudo-transition used to attach `IntMap` values.
//! - [`dictionary`] — the immutable, queryable transition table.
//! - [`guide`] / [`cursor`] — the optional parallel array and non-recursive
//!   walk that let ordered key enumeration skip recursion entirely,
//!   available to `no_std` callers who already have a built automaton.
//! - [`similar`] — bounded fuzzy key expansion via a compiled substitution
//!   table.
//! - [`format`] — `RecordMap`'s fixed-width binary record mini-language.
//! - `binary` (internal) — the on-disk container format shared by every
//!   variant.
//! - [`variants`] (`std`-only) — the public façades: [`KeySet`],
//!   [`CompletionSet`], [`IntMap`], [`BytesMap`], [`RecordMap`].
//!
//! ## Quick start
//!
//! ```
//! use dafsa::KeySet;
//!
//! let set = KeySet::new(["foo", "bar", "foobar"], false).unwrap();
//! assert!(set.contains(b"foo"));
//! assert!(!set.contains(b"fo"));
//! ```
//!
//! ## Features
//!
//! - `std` (default) — file I/O (`write`/`read`), `std::error::Error`, and
//!   the whole construction/façade surface (`builder`, `encoder`,
//!   `variants` — the minimizer's register and encoder's edge memo are
//!   hash-map-based). Disable for `no_std` + `alloc` use: a build without
//!   `std` still compiles and exposes `Dictionary`, `Guide`, `Cursor`, and
//!   `similar` for querying an automaton built elsewhere, just not the
//!   means to build one.
//! - `serde` — `Serialize`/`Deserialize` for [`config::BuildConfig`].
//! - `mmap` — memory-map a serialized automaton instead of loading it into
//!   owned buffers.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

pub mod config;
pub mod cursor;
pub mod dictionary;
pub mod error;
pub mod format;
pub mod guide;
pub mod similar;
pub mod unit;

#[cfg(feature = "std")]
pub mod variants;

pub(crate) mod binary;

#[cfg(feature = "std")]
pub(crate) mod builder;
#[cfg(feature = "std")]
pub(crate) mod encoder;
#[cfg(feature = "std")]
pub(crate) mod node;
#[cfg(feature = "std")]
pub(crate) mod register;

pub use config::{BuildConfig, DEFAULT_SEPARATOR};
pub use cursor::Cursor;
pub use dictionary::{Dictionary, State, ROOT};
pub use error::{Error, Result};
pub use format::{Endian, RecordFormat};
pub use guide::Guide;
pub use similar::{compile_replaces, Replaces};

#[cfg(feature = "std")]
pub use variants::{BytesMap, CompletionSet, IntMap, KeySet, RecordMap};

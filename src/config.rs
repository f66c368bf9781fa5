//! Configuration for building an automaton.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default payload separator byte used by `BytesMap`/`RecordMap` when the
/// caller doesn't pick one explicitly. Any separator, including this one,
/// must not be `0x00` and must not fall inside the base64 alphabet
/// (`A`-`Z`, `a`-`z`, `0`-`9`, `+`, `/`, `=`) — see
/// `variants::payload::validate_separator`.
pub const DEFAULT_SEPARATOR: u8 = 0x01;

/// Configuration for `Builder`.
///
/// Controls how the incremental-minimization construction allocates and
/// searches for free slots during encoding. The defaults are tuned for the
/// common case (sorted or near-sorted input, moderate fan-out); callers
/// building very large or very bushy automatons may want to raise
/// `initial_capacity_hint` to avoid repeated reallocation of the unit array.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildConfig {
    /// Whether the builder should assume the input is already sorted in
    /// byte-lexicographic order. If `true` and the input turns out not to
    /// be sorted, construction fails with `Error::OrderError` instead of
    /// silently sorting. If `false`, the builder buffers and sorts the
    /// input itself.
    pub input_is_sorted: bool,
    /// Initial capacity hint (in units) for the dictionary array, to avoid
    /// repeated reallocation while encoding large key sets.
    pub initial_capacity_hint: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_is_sorted: false,
            initial_capacity_hint: 1024,
        }
    }
}

impl BuildConfig {
    /// Assume the input stream is already sorted in byte-lexicographic
    /// order; construction fails fast if that turns out to be false.
    pub fn with_sorted_input(mut self, sorted: bool) -> Self {
        self.input_is_sorted = sorted;
        self
    }

    /// Pre-size the dictionary array's backing storage.
    pub fn with_initial_capacity_hint(mut self, hint: usize) -> Self {
        self.initial_capacity_hint = hint;
        self
    }
}

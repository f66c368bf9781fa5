//! The 32-bit dictionary unit and the 16-bit guide entry.
//!
//! Both derive `bytemuck::Pod`/`Zeroable` so a byte buffer — owned, borrowed,
//! or `mmap`-ed — can be reinterpreted as `&[Unit]`/`&[GuideEntry]` with no
//! copy (`spec.md` §5: "the decoder must tolerate pointer-to-array layout").
//!
//! # Bit layout
//!
//! An ordinary unit addressed as dictionary state `s`:
//!
//! ```text
//! bit31      bits 30..8          bits 7..0
//! has_leaf   base (23 bits)      check (arriving label)
//! ```
//!
//! A transition `s --c--> s'` is valid iff `s' = base(s) ^ c` and
//! `check(s') == c`.
//!
//! `IntMap` needs a 31-bit value per accepting state, which doesn't fit in
//! the 23-bit base field above. Byte `0x00` is reserved and can't appear in
//! a key, so every terminal state gets an implicit pseudo-transition on
//! label `0x00` to a *value unit* at `base(s) ^ 0`. A value unit is never
//! further stepped into (it has no children of its own), so it reuses its
//! entire 31 low bits as a plain value rather than a base/check split:
//!
//! ```text
//! bit31   bits 30..0
//! unused  value (31 bits)
//! ```

/// Number of bits available to a state's `base` field.
const BASE_BITS: u32 = 23;
/// Largest base offset an ordinary unit can address.
pub(crate) const MAX_BASE: u32 = (1 << BASE_BITS) - 1;

const HAS_LEAF_BIT: u32 = 1 << 31;
const BASE_SHIFT: u32 = 8;
const BASE_MASK: u32 = MAX_BASE << BASE_SHIFT;
const CHECK_MASK: u32 = 0xFF;
const VALUE_MASK: u32 = (1 << 31) - 1;

/// One 32-bit dictionary record.
///
/// Stored internally pre-conditioned to little-endian (`self.0 ==
/// bits.to_le()` for the unit's semantic bits): on a little-endian host
/// this is a no-op, so the in-memory representation and the on-disk bytes
/// (`binary.rs`, `spec.md` §6: "all multi-byte integers are little-endian")
/// coincide exactly, letting `bytemuck::cast_slice` move between the two
/// with no copy. On a big-endian host the same invariant makes a raw
/// `bytemuck`-cast of on-disk bytes land directly in this pre-conditioned
/// form too, so the zero-copy `mmap` path (`Dictionary::open_mmap`) never
/// needs to touch the bytes it maps — only [`bits`](Unit::bits) normalizes,
/// on read, right before a field is actually extracted.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Unit(u32);

impl Unit {
    /// Build an ordinary unit for state `s`: `has_leaf` marks `s` itself as
    /// terminal, `base` is the BASE offset used to address `s`'s children,
    /// `check` is the label that was used to transition into `s`.
    pub(crate) fn new(has_leaf: bool, base: u32, check: u8) -> Self {
        debug_assert!(base <= MAX_BASE, "base offset exceeds 23-bit field");
        let mut bits = (base << BASE_SHIFT) & BASE_MASK | check as u32;
        if has_leaf {
            bits |= HAS_LEAF_BIT;
        }
        Unit(bits.to_le())
    }

    /// Build a value unit (see module docs): the full low 31 bits hold a
    /// raw `IntMap` value, reachable only via a terminal state's implicit
    /// `0x00` pseudo-transition.
    pub(crate) fn from_value(value: u32) -> Self {
        debug_assert!(value <= VALUE_MASK);
        Unit((value & VALUE_MASK).to_le())
    }

    /// This unit's semantic bits, normalized to native order. A no-op on
    /// little-endian hosts; undoes the little-endian preconditioning
    /// described on [`Unit`] everywhere else.
    #[inline]
    fn bits(self) -> u32 {
        self.0.to_le()
    }

    #[inline]
    pub(crate) fn has_leaf(self) -> bool {
        self.bits() & HAS_LEAF_BIT != 0
    }

    #[inline]
    pub(crate) fn base(self) -> u32 {
        (self.bits() & BASE_MASK) >> BASE_SHIFT
    }

    #[inline]
    pub(crate) fn check(self) -> u8 {
        (self.bits() & CHECK_MASK) as u8
    }

    #[inline]
    pub(crate) fn value_payload(self) -> u32 {
        self.bits() & VALUE_MASK
    }
}

/// One guide record: the smallest outgoing label from this state
/// (`child`), and the next-greater outgoing label at the *parent's* state
/// after the one used to reach this unit (`sibling`). `0` in either field
/// means "none" (byte `0x00` can't be a real label).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GuideEntry {
    pub child: u8,
    pub sibling: u8,
}

impl GuideEntry {
    pub(crate) const NONE: GuideEntry = GuideEntry { child: 0, sibling: 0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_ordinary_unit() {
        let u = Unit::new(true, 12345, 0x7A);
        assert!(u.has_leaf());
        assert_eq!(u.base(), 12345);
        assert_eq!(u.check(), 0x7A);
    }

    #[test]
    fn roundtrip_non_leaf_unit() {
        let u = Unit::new(false, MAX_BASE, 0x00);
        assert!(!u.has_leaf());
        assert_eq!(u.base(), MAX_BASE);
        assert_eq!(u.check(), 0);
    }

    #[test]
    fn roundtrip_value_unit() {
        let u = Unit::from_value((1 << 31) - 1);
        assert_eq!(u.value_payload(), (1 << 31) - 1);
        let u = Unit::from_value(0);
        assert_eq!(u.value_payload(), 0);
    }

    #[test]
    fn pod_size_is_four_bytes() {
        assert_eq!(core::mem::size_of::<Unit>(), 4);
        assert_eq!(core::mem::size_of::<GuideEntry>(), 2);
    }
}

//! Typed bit-flag sets.
//!
//! MDF blocks store option bits in plain integer fields. [`BitFlags`] wraps
//! such a field together with the enum `E` naming its bits, so that the
//! flags of a channel group cannot be tested against a header flag by
//! accident.
//!
//! ```
//! use mdf4_blocks::flags::{BitFlags, ChannelGroupFlag};
//!
//! let flags = BitFlags::<ChannelGroupFlag>::from_raw(0b11);
//! assert!(flags.contains(ChannelGroupFlag::VlsdChannelGroup));
//! assert!(flags.test(ChannelGroupFlag::VlsdChannelGroup | ChannelGroupFlag::BusEvent));
//! assert!(!flags.contains(ChannelGroupFlag::RemoteMaster));
//! ```

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::BitOr;

/// An enum whose variants name bit masks of one flags field.
pub trait Flag: Copy + fmt::Debug + 'static {
    /// Every named flag, in bit order.
    const ALL: &'static [Self];

    /// Mask of this flag. May cover several bits.
    fn bits(self) -> u32;
}

/// Immutable set of flags of kind `E`.
///
/// Construction from a raw value keeps every bit, including bits `E` does
/// not name; use [`unknown_bits`](Self::unknown_bits) to apply a stricter
/// policy.
pub struct BitFlags<E> {
    raw: u32,
    _flags: PhantomData<E>,
}

impl<E> BitFlags<E> {
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _flags: PhantomData,
        }
    }

    pub const fn empty() -> Self {
        Self::from_raw(0)
    }

    pub const fn raw(&self) -> u32 {
        self.raw
    }

    /// Union of both sets.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self::from_raw(self.raw | other.raw)
    }

    /// `true` if every bit of `mask` is set in `self`.
    pub const fn test(&self, mask: Self) -> bool {
        self.raw & mask.raw == mask.raw
    }

    pub const fn is_empty(&self) -> bool {
        self.raw == 0
    }
}

impl<E: Flag> BitFlags<E> {
    /// `true` if the bits of `flag` are all set.
    pub fn contains(&self, flag: E) -> bool {
        self.test(flag.into())
    }

    /// Bits set in this value that no variant of `E` covers.
    pub fn unknown_bits(&self) -> u32 {
        let known = E::ALL.iter().fold(0, |acc, f| acc | f.bits());
        self.raw & !known
    }

    /// Named flags contained in this set.
    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        E::ALL.iter().copied().filter(move |f| self.contains(*f))
    }
}

impl<E: Flag> From<E> for BitFlags<E> {
    fn from(flag: E) -> Self {
        Self::from_raw(flag.bits())
    }
}

impl<E> BitOr for BitFlags<E> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.merge(rhs)
    }
}

impl<E> Clone for BitFlags<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for BitFlags<E> {}

impl<E> PartialEq for BitFlags<E> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<E> Eq for BitFlags<E> {}

impl<E> Hash for BitFlags<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<E> Default for BitFlags<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: Flag> fmt::Debug for BitFlags<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        set.entries(self.iter());
        let unknown = self.unknown_bits();
        if unknown != 0 {
            set.entry(&format_args!("{unknown:#x}"));
        }
        set.finish()
    }
}

#[cfg(feature = "serde")]
impl<E> serde::Serialize for BitFlags<E> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw)
    }
}

#[cfg(feature = "serde")]
impl<'de, E> serde::Deserialize<'de> for BitFlags<E> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_raw)
    }
}

/// Channel group flags (`cg_flags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelGroupFlag {
    /// Variable length signal data channel group.
    VlsdChannelGroup,
    BusEvent,
    PlainBusEvent,
    RemoteMaster,
    EventSignal,
}

impl Flag for ChannelGroupFlag {
    const ALL: &'static [Self] = &[
        ChannelGroupFlag::VlsdChannelGroup,
        ChannelGroupFlag::BusEvent,
        ChannelGroupFlag::PlainBusEvent,
        ChannelGroupFlag::RemoteMaster,
        ChannelGroupFlag::EventSignal,
    ];

    fn bits(self) -> u32 {
        match self {
            ChannelGroupFlag::VlsdChannelGroup => 1 << 0,
            ChannelGroupFlag::BusEvent => 1 << 1,
            ChannelGroupFlag::PlainBusEvent => 1 << 2,
            ChannelGroupFlag::RemoteMaster => 1 << 3,
            ChannelGroupFlag::EventSignal => 1 << 4,
        }
    }
}

impl BitOr for ChannelGroupFlag {
    type Output = BitFlags<ChannelGroupFlag>;

    fn bitor(self, rhs: Self) -> Self::Output {
        BitFlags::from(self).merge(rhs.into())
    }
}

/// Header block flags (`hd_flags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFlag {
    StartAngleValid,
    StartDistanceValid,
}

impl Flag for HeaderFlag {
    const ALL: &'static [Self] = &[HeaderFlag::StartAngleValid, HeaderFlag::StartDistanceValid];

    fn bits(self) -> u32 {
        match self {
            HeaderFlag::StartAngleValid => 1 << 0,
            HeaderFlag::StartDistanceValid => 1 << 1,
        }
    }
}

/// Header block time flags (`hd_time_flags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFlag {
    /// Start time is local time rather than UTC.
    LocalTime,
    /// Time zone and DST offsets are valid.
    OffsetsValid,
}

impl Flag for TimeFlag {
    const ALL: &'static [Self] = &[TimeFlag::LocalTime, TimeFlag::OffsetsValid];

    fn bits(self) -> u32 {
        match self {
            TimeFlag::LocalTime => 1 << 0,
            TimeFlag::OffsetsValid => 1 << 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    type Cg = BitFlags<ChannelGroupFlag>;

    #[test]
    fn empty_and_raw() {
        assert!(Cg::empty().is_empty());
        assert!(Cg::default().is_empty());
        assert!(!Cg::from_raw(4).is_empty());
        assert_eq!(Cg::from(ChannelGroupFlag::RemoteMaster).raw(), 8);
    }

    #[test]
    fn test_combined_mask() {
        let flags = Cg::from_raw(0b101);
        assert!(flags.test(Cg::from_raw(0b001)));
        assert!(flags.test(Cg::from_raw(0b101)));
        assert!(!flags.test(Cg::from_raw(0b011)));
        assert!(flags.test(Cg::empty()));
    }

    #[test]
    fn unknown_bits_are_kept() {
        let flags = Cg::from_raw(0x8001);
        assert_eq!(flags.raw(), 0x8001);
        assert_eq!(flags.unknown_bits(), 0x8000);
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            [ChannelGroupFlag::VlsdChannelGroup]
        );
        assert_eq!(format!("{flags:?}"), "{VlsdChannelGroup, 0x8000}");
    }

    #[test]
    fn operators() {
        let flags = ChannelGroupFlag::BusEvent | ChannelGroupFlag::PlainBusEvent;
        assert_eq!(flags.raw(), 0b110);
        let flags = flags | ChannelGroupFlag::EventSignal.into();
        assert!(flags.contains(ChannelGroupFlag::EventSignal));
    }

    proptest! {
        #[test]
        fn merge_contains_both(a: u32, b: u32) {
            let (a, b) = (Cg::from_raw(a), Cg::from_raw(b));
            let merged = a.merge(b);
            prop_assert!(merged.test(a));
            prop_assert!(merged.test(b));
        }

        #[test]
        fn merge_is_commutative_and_associative(a: u32, b: u32, c: u32) {
            let (a, b, c) = (Cg::from_raw(a), Cg::from_raw(b), Cg::from_raw(c));
            prop_assert_eq!(a.merge(b), b.merge(a));
            prop_assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
        }

        #[test]
        fn test_is_reflexive(a: u32) {
            let a = Cg::from_raw(a);
            prop_assert!(a.test(a));
            prop_assert_eq!(a.is_empty(), a.raw() == 0);
        }
    }
}

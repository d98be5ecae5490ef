//! Typed forward references between blocks.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::{Result, blocks::BlockParse, io::ByteSource};

/// Absolute file offset of a block expected to be of kind `T`.
///
/// An address of 0 is the nil link. A link is only a number: nothing is
/// read until [`resolve`](Self::resolve) is called, and every call reads the
/// block again. Callers that need repeated access cache the result
/// themselves, keyed by [`address`](Self::address).
pub struct Link<T> {
    address: u64,
    _target: PhantomData<fn() -> T>,
}

impl<T> Link<T> {
    pub const fn new(address: u64) -> Self {
        Self {
            address,
            _target: PhantomData,
        }
    }

    pub const fn nil() -> Self {
        Self::new(0)
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        self.address == 0
    }

    #[inline]
    pub const fn address(&self) -> u64 {
        self.address
    }

    /// Reinterprets the link as pointing at a different block kind.
    pub const fn cast<U>(self) -> Link<U> {
        Link::new(self.address)
    }

    /// Seeks to the target and parses it with `parse_one`.
    ///
    /// A nil link returns `Ok(None)` without touching `source` or calling
    /// `parse_one`.
    pub fn resolve_with<S, F>(&self, source: &mut S, parse_one: F) -> Result<Option<T>>
    where
        S: ByteSource + ?Sized,
        F: FnOnce(&mut S) -> Result<T>,
    {
        if self.is_nil() {
            return Ok(None);
        }
        log::trace!(
            "resolving {} at {:#x}",
            core::any::type_name::<T>(),
            self.address
        );
        source.seek(self.address)?;
        parse_one(source).map(Some)
    }
}

impl<T: BlockParse> Link<T> {
    /// Seeks to the target and parses it with `T`'s own parser.
    ///
    /// A tag mismatch at the target is reported as
    /// [`Error::BlockIDError`](crate::Error::BlockIDError).
    pub fn resolve<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Option<T>> {
        self.resolve_with(source, |s| T::parse(s))
    }
}

// Manual impls: a link is copyable and comparable whatever `T` is.

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Link<T> {}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<T> Eq for Link<T> {}

impl<T> Hash for Link<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self::nil()
    }
}

impl<T> From<u64> for Link<T> {
    fn from(address: u64) -> Self {
        Self::new(address)
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("Link(nil)")
        } else {
            write!(f, "Link({:#x})", self.address)
        }
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for Link<T> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> core::result::Result<Ser::Ok, Ser::Error> {
        serializer.serialize_u64(self.address)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Link<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Link::new)
    }
}

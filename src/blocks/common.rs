// blocks/common.rs
//! Common types and traits for MDF block parsing.
//!
//! This module provides:
//! - [`BlockId`]: the 4-byte type tag at the start of every block
//! - [`BlockHeader`]: the generic framing shared by all blocks
//! - [`BlockParse`]: trait implemented by every parsed block kind

use core::fmt;

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::{Error, Result, blocks::Link, io::ByteSource};

/// Size of the fixed header part: id, reserved, length and link count.
pub const HEADER_SIZE: u64 = 24;

/// Size of one link table entry.
pub const LINK_SIZE: u64 = 8;

/// 4-byte ASCII block type identifier, e.g. `##DG`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockId(pub [u8; 4]);

impl BlockId {
    pub const HD: BlockId = BlockId(*b"##HD");
    pub const DG: BlockId = BlockId(*b"##DG");
    pub const CG: BlockId = BlockId(*b"##CG");
    pub const CN: BlockId = BlockId(*b"##CN");
    pub const TX: BlockId = BlockId(*b"##TX");
    pub const MD: BlockId = BlockId(*b"##MD");
    pub const DT: BlockId = BlockId(*b"##DT");
    pub const DL: BlockId = BlockId(*b"##DL");
    pub const DZ: BlockId = BlockId(*b"##DZ");
    pub const HL: BlockId = BlockId(*b"##HL");
    pub const SI: BlockId = BlockId(*b"##SI");
    pub const CC: BlockId = BlockId(*b"##CC");
    pub const FH: BlockId = BlockId(*b"##FH");
    pub const EV: BlockId = BlockId(*b"##EV");
    pub const AT: BlockId = BlockId(*b"##AT");
    pub const SD: BlockId = BlockId(*b"##SD");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The tag as text; non-UTF-8 bytes are replaced for display.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Reads a tag at the current position.
    pub fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        source.read_array().map(BlockId)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({:?})", self.to_string_lossy())
    }
}

/// Generic block framing.
///
/// ```text
/// offset  0   id[4]
/// offset  4   reserved[4]
/// offset  8   length: u64      total block size, header included
/// offset 16   link_count: u64
/// offset 24   links[link_count]: u64, 0 = nil
/// offset 24 + 8 * link_count   payload of data_length() bytes
/// ```
///
/// Every header returned by a parse function satisfies
/// `length >= 24 + 8 * links.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockHeader {
    /// 4-byte block type identifier.
    pub id: BlockId,
    /// Total length of the block in bytes, including this header.
    pub length: u64,
    /// Absolute file offsets of the referenced blocks, 0 for none.
    pub links: Vec<u64>,
}

impl BlockHeader {
    /// Builds a header for a block with the given links and payload size.
    ///
    /// A length that does not fit in a `u64` saturates at `u64::MAX`.
    pub fn new(id: BlockId, links: Vec<u64>, data_length: u64) -> Self {
        let length = Self::framing_size(links.len()).saturating_add(data_length);
        Self { id, length, links }
    }

    /// Bytes taken by the fixed header plus `link_count` links.
    fn framing_size(link_count: usize) -> u64 {
        LINK_SIZE
            .saturating_mul(link_count as u64)
            .saturating_add(HEADER_SIZE)
    }

    /// Parses a header at the current position and checks its tag.
    ///
    /// The tag is compared before anything else is read. On success the
    /// source is positioned at the first payload byte.
    pub fn parse<S: ByteSource + ?Sized>(expected: BlockId, source: &mut S) -> Result<Self> {
        let id = BlockId::parse(source)?;
        if id != expected {
            return Err(Error::BlockIDError {
                actual: id,
                expected: expected.to_string(),
            });
        }
        Self::parse_body(id, source)
    }

    /// Like [`parse`](Self::parse), and additionally requires at least
    /// `min_links` links and `min_data_bytes` payload bytes.
    pub fn parse_expecting<S: ByteSource + ?Sized>(
        expected: BlockId,
        source: &mut S,
        min_links: usize,
        min_data_bytes: u64,
    ) -> Result<Self> {
        let header = Self::parse(expected, source)?;
        if header.links.len() < min_links {
            return Err(Error::TooFewLinks {
                id: expected,
                expected: min_links,
                actual: header.links.len(),
            });
        }
        if header.data_length() < min_data_bytes {
            return Err(Error::TooFewDataBytes {
                id: expected,
                expected: min_data_bytes,
                actual: header.data_length(),
            });
        }
        Ok(header)
    }

    /// Parses a header of any block kind.
    ///
    /// Used where a link may point at one of several kinds and the caller
    /// dispatches on [`id`](Self::id).
    pub fn parse_any<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let id = BlockId::parse(source)?;
        Self::parse_body(id, source)
    }

    fn parse_body<S: ByteSource + ?Sized>(id: BlockId, source: &mut S) -> Result<Self> {
        source.skip(4)?; // reserved
        let length = source.read_u64()?;
        let link_count = source.read_u64()?;

        let invalid = || Error::InvalidBlockLength {
            id,
            length,
            link_count,
        };
        let min_length = link_count
            .checked_mul(LINK_SIZE)
            .and_then(|l| l.checked_add(HEADER_SIZE))
            .ok_or_else(invalid)?;
        if length < min_length {
            return Err(invalid());
        }

        // The count is untrusted; grow the table as links are actually read.
        let mut links = Vec::with_capacity(link_count.min(64) as usize);
        for _ in 0..link_count {
            links.push(source.read_u64()?);
        }
        Ok(Self { id, length, links })
    }

    /// Number of payload bytes following the link table.
    ///
    /// Zero for a hand-built header whose `length` is shorter than its own
    /// framing.
    pub fn data_length(&self) -> u64 {
        self.length.saturating_sub(Self::framing_size(self.links.len()))
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Typed view of link `index`; links past the end of the table are nil.
    pub fn link<T>(&self, index: usize) -> Link<T> {
        Link::new(self.links.get(index).copied().unwrap_or(0))
    }

    /// Serializes the framing: header and link table, without payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer =
            Vec::with_capacity(HEADER_SIZE as usize + LINK_SIZE as usize * self.links.len());
        buffer.extend_from_slice(&self.id.0);
        buffer.extend_from_slice(&[0u8; 4]);
        buffer.extend_from_slice(&self.length.to_le_bytes());
        buffer.extend_from_slice(&(self.links.len() as u64).to_le_bytes());
        for link in &self.links {
            buffer.extend_from_slice(&link.to_le_bytes());
        }
        buffer
    }
}

/// A block kind that can be parsed from a [`ByteSource`].
///
/// `parse` starts at the first byte of the block (its tag), validates the
/// framing with [`BlockHeader::parse`] or
/// [`BlockHeader::parse_expecting`], and returns a fully populated value.
pub trait BlockParse: Sized {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, io::SliceSource};
    use alloc::vec;

    fn block(id: BlockId, length: u64, links: &[u64], payload: &[u8]) -> Vec<u8> {
        let mut bytes = BlockHeader {
            id,
            length,
            links: links.to_vec(),
        }
        .to_bytes();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parses_data_group_framing() -> Result<()> {
        let bytes = block(BlockId::DG, 57, &[100, 200, 0, 300], &[0x01]);
        let mut src = SliceSource::new(&bytes);
        let header = BlockHeader::parse(BlockId::DG, &mut src)?;
        assert_eq!(header.length, 57);
        assert_eq!(header.links, vec![100, 200, 0, 300]);
        assert_eq!(header.data_length(), 1);
        assert_eq!(src.position(), 56);
        Ok(())
    }

    #[test]
    fn tag_mismatch() {
        let bytes = block(BlockId::CG, 24, &[], &[]);
        let err = BlockHeader::parse(BlockId::DG, &mut SliceSource::new(&bytes)).unwrap_err();
        match err {
            Error::BlockIDError { actual, expected } => {
                assert_eq!(actual, BlockId::CG);
                assert_eq!(expected, "##DG");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn length_shorter_than_link_table() {
        let bytes = block(BlockId::TX, 24 + 8, &[1, 2], &[]);
        let err = BlockHeader::parse(BlockId::TX, &mut SliceSource::new(&bytes)).unwrap_err();
        assert!(matches!(err, Error::InvalidBlockLength { link_count: 2, .. }));
    }

    #[test]
    fn hand_built_short_header_has_no_payload() {
        let header = BlockHeader {
            id: BlockId::TX,
            length: 10,
            links: vec![1],
        };
        assert_eq!(header.data_length(), 0);
        assert_eq!(BlockHeader::new(BlockId::TX, vec![1], 3).data_length(), 3);
    }

    #[test]
    fn new_saturates_huge_payloads() {
        let header = BlockHeader::new(BlockId::DT, vec![0, 0], u64::MAX - 8);
        assert_eq!(header.length, u64::MAX);
        assert_eq!(header.data_length(), u64::MAX - 40);
    }

    #[test]
    fn huge_link_count_does_not_overflow() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"##TX\0\0\0\0");
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(&(u64::MAX / 4).to_le_bytes());
        let err = BlockHeader::parse(BlockId::TX, &mut SliceSource::new(&bytes)).unwrap_err();
        assert!(matches!(err, Error::InvalidBlockLength { .. }));
    }

    #[test]
    fn truncated_link_table_is_io_error() {
        let mut bytes = block(BlockId::DG, 64, &[1, 2, 3, 4], &[]);
        bytes.truncate(40);
        let err = BlockHeader::parse(BlockId::DG, &mut SliceSource::new(&bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn expecting_boundaries_are_inclusive() -> Result<()> {
        let bytes = block(BlockId::DG, 57, &[0, 0, 0, 0], &[7]);
        BlockHeader::parse_expecting(BlockId::DG, &mut SliceSource::new(&bytes), 4, 1)?;

        let err = BlockHeader::parse_expecting(BlockId::DG, &mut SliceSource::new(&bytes), 5, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooFewLinks {
                expected: 5,
                actual: 4,
                ..
            }
        ));

        let err = BlockHeader::parse_expecting(BlockId::DG, &mut SliceSource::new(&bytes), 4, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooFewDataBytes {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn missing_links_read_as_nil() {
        let header = BlockHeader::new(BlockId::CG, vec![8], 0);
        assert_eq!(header.length, 32);
        assert_eq!(header.link::<()>(0).address(), 8);
        assert!(header.link::<()>(3).is_nil());
    }

    #[test]
    fn block_id_display() {
        assert_eq!(BlockId::HD.to_string(), "##HD");
        assert_eq!(alloc::format!("{:?}", BlockId::DG), "BlockId(\"##DG\")");
    }
}

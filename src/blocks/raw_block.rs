use alloc::vec::Vec;

use crate::{
    Result,
    blocks::common::{BlockHeader, BlockParse, HEADER_SIZE, LINK_SIZE},
    io::ByteSource,
};

/// Framing-only view of a block of any kind.
///
/// Used as link target for kinds this crate does not decode (data blocks,
/// channels, sources, attachments ...). The payload is not read until
/// [`read_payload`](Self::read_payload) is called, so resolving a link to a
/// multi-gigabyte data block stays cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Absolute offset of the block.
    pub address: u64,
    pub header: BlockHeader,
}

impl BlockParse for RawBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let address = source.position();
        let header = BlockHeader::parse_any(source)?;
        Ok(Self { address, header })
    }
}

impl RawBlock {
    /// Absolute offset of the first payload byte.
    pub fn payload_offset(&self) -> u64 {
        let links = LINK_SIZE.saturating_mul(self.header.links.len() as u64);
        self.address
            .saturating_add(HEADER_SIZE)
            .saturating_add(links)
    }

    /// Reads the type-specific payload.
    pub fn read_payload<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Vec<u8>> {
        source.read_at(self.payload_offset(), self.header.data_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blocks::{BlockId, Link},
        io::SliceSource,
    };
    use alloc::vec;

    #[test]
    fn payload_is_read_on_demand() -> Result<()> {
        let mut bytes = vec![0u8; 8];
        bytes.extend(BlockHeader::new(BlockId::DT, vec![0x99], 4).to_bytes());
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        let mut src = SliceSource::new(&bytes);

        let raw = Link::<RawBlock>::new(8).resolve(&mut src)?.unwrap();
        assert_eq!(raw.header.id, BlockId::DT);
        assert_eq!(raw.payload_offset(), 8 + 24 + 8);
        assert_eq!(src.position(), raw.payload_offset());
        assert_eq!(raw.read_payload(&mut src)?, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn oversized_payload_is_io_error() -> Result<()> {
        let header = BlockHeader {
            id: BlockId::DT,
            length: 1 << 62,
            links: vec![],
        };
        let bytes = header.to_bytes();
        let mut src = SliceSource::new(&bytes);
        let raw = RawBlock::parse(&mut src)?;
        let err = raw.read_payload(&mut src).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        Ok(())
    }

    #[test]
    fn short_hand_built_header_has_empty_payload() -> Result<()> {
        let raw = RawBlock {
            address: 0,
            header: BlockHeader {
                id: BlockId::DT,
                length: 10,
                links: vec![1],
            },
        };
        assert_eq!(raw.read_payload(&mut SliceSource::new(&[]))?, Vec::<u8>::new());
        Ok(())
    }
}

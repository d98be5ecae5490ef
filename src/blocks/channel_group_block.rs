use crate::{
    Result,
    blocks::{
        LazyChain, Link, RawBlock, TextBasedBlock, TextBlock,
        chain::ChainElement,
        common::{BlockHeader, BlockId, BlockParse},
    },
    datatypes::TextEncoding,
    flags::{BitFlags, ChannelGroupFlag},
    io::ByteSource,
};

/// Channel Group Block (##CG) - channels sharing one record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGroupBlock {
    pub header: BlockHeader,
    pub next_channel_group: Link<ChannelGroupBlock>,
    /// First channel block (##CN).
    pub first_channel: Link<RawBlock>,
    pub acquisition_name: Link<TextBlock>,
    /// Source information block (##SI).
    pub acquisition_source: Link<RawBlock>,
    /// First sample reduction block (##SR).
    pub first_sample_reduction: Link<RawBlock>,
    pub comment: Link<TextBasedBlock>,
    pub record_id: u64,
    /// Number of records of this group in the data block.
    pub cycle_count: u64,
    pub flags: BitFlags<ChannelGroupFlag>,
    /// Separator for source and channel path names, if any.
    pub path_separator: Option<char>,
    /// Bytes of data per record, excluding record id and invalidation bytes.
    pub data_bytes: u32,
    pub invalidation_bytes: u32,
}

impl BlockParse for ChannelGroupBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let header = BlockHeader::parse_expecting(BlockId::CG, source, 6, 32)?;

        let record_id = source.read_u64()?;
        let cycle_count = source.read_u64()?;
        let flags = BitFlags::from_raw(u32::from(source.read_u16()?));
        let path_separator = source
            .read_string(2, TextEncoding::Utf16LE)?
            .chars()
            .next()
            .filter(|c| *c != '\0');
        source.skip(4)?; // reserved
        let data_bytes = source.read_u32()?;
        let invalidation_bytes = source.read_u32()?;

        Ok(Self {
            next_channel_group: header.link(0),
            first_channel: header.link(1),
            acquisition_name: header.link(2),
            acquisition_source: header.link(3),
            first_sample_reduction: header.link(4),
            comment: header.link(5),
            header,
            record_id,
            cycle_count,
            flags,
            path_separator,
            data_bytes,
            invalidation_bytes,
        })
    }
}

impl ChainElement for ChannelGroupBlock {
    fn next_link(&self) -> Link<Self> {
        self.next_channel_group
    }
}

impl ChannelGroupBlock {
    /// Total record size: record id, data and invalidation bytes.
    pub fn record_size(&self, record_id_size: u8) -> u64 {
        u64::from(record_id_size) + u64::from(self.data_bytes) + u64::from(self.invalidation_bytes)
    }

    /// Whether this group stores variable length signal data.
    pub fn is_vlsd(&self) -> bool {
        self.flags.contains(ChannelGroupFlag::VlsdChannelGroup)
    }

    pub fn read_acquisition_name<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Option<TextBlock>> {
        self.acquisition_name.resolve(source)
    }

    /// Lazy list of the sibling channel groups following this one.
    pub fn following(&self) -> LazyChain<ChannelGroupBlock> {
        LazyChain::new(self.next_channel_group)
    }
}

use crate::{
    Result,
    blocks::{
        ChannelGroupBlock, LazyChain, Link, RawBlock, TextBasedBlock,
        chain::ChainElement,
        common::{BlockHeader, BlockId, BlockParse},
    },
    io::ByteSource,
};

/// Data Group Block (##DG) - groups channel groups that share a data block.
///
/// A data group typically corresponds to one acquisition device. It contains
/// links to channel groups and the actual measurement data block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataGroupBlock {
    pub header: BlockHeader,
    /// Next data group block (nil if last).
    pub next_data_group: Link<DataGroupBlock>,
    /// First channel group block.
    pub first_channel_group: Link<ChannelGroupBlock>,
    /// Data root block (DT, DV, DZ, DL, LD or HL).
    pub data: Link<RawBlock>,
    /// Comment text/metadata block.
    pub comment: Link<TextBasedBlock>,
    /// Size of record ID in bytes (0, 1, 2, 4, or 8).
    pub record_id_size: u8,
}

impl BlockParse for DataGroupBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let header = BlockHeader::parse_expecting(BlockId::DG, source, 4, 1)?;
        let record_id_size = source.read_u8()?;
        // 7 reserved bytes follow; not required by older writers.

        Ok(Self {
            next_data_group: header.link(0),
            first_channel_group: header.link(1),
            data: header.link(2),
            comment: header.link(3),
            record_id_size,
            header,
        })
    }
}

impl ChainElement for DataGroupBlock {
    fn next_link(&self) -> Link<Self> {
        self.next_data_group
    }
}

impl DataGroupBlock {
    /// Lazy list of the channel groups in this data group.
    pub fn channel_groups(&self) -> LazyChain<ChannelGroupBlock> {
        LazyChain::new(self.first_channel_group)
    }

    pub fn read_comment<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Option<TextBasedBlock>> {
        self.comment.resolve(source)
    }
}

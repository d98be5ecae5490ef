// src/blocks/header_block.rs
use crate::{
    Result,
    blocks::{
        DataGroupBlock, LazyChain, Link, RawBlock, TextBasedBlock,
        common::{BlockHeader, BlockId, BlockParse},
    },
    flags::{BitFlags, HeaderFlag, TimeFlag},
    io::ByteSource,
};

/// Header Block (##HD) - file-level metadata, always at offset 64.
///
/// The start time is kept as stored: nanoseconds since the Unix epoch, in
/// UTC unless [`TimeFlag::LocalTime`] is set. Calendar conversion is left to
/// the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBlock {
    pub header: BlockHeader,
    pub first_data_group: Link<DataGroupBlock>,
    /// File history block (##FH).
    pub file_history: Link<RawBlock>,
    /// Channel hierarchy block (##CH).
    pub channel_hierarchy: Link<RawBlock>,
    /// Attachment block (##AT).
    pub first_attachment: Link<RawBlock>,
    /// Event block (##EV).
    pub first_event: Link<RawBlock>,
    pub comment: Link<TextBasedBlock>,
    pub start_time_ns: u64,
    /// Time zone offset in minutes; present only when the offsets are valid.
    pub tz_offset_min: Option<i16>,
    /// Daylight saving offset in minutes; present only when the offsets are valid.
    pub dst_offset_min: Option<i16>,
    pub time_flags: BitFlags<TimeFlag>,
    pub time_class: u8,
    pub flags: BitFlags<HeaderFlag>,
    pub start_angle_rad: f64,
    pub start_distance_m: f64,
}

impl HeaderBlock {
    /// File offset of the header block, right after the identification block.
    pub const OFFSET: u64 = 64;

    /// Link to the header block of a file.
    pub const fn link() -> Link<HeaderBlock> {
        Link::new(Self::OFFSET)
    }

    /// Lazy list of the file's data groups.
    pub fn data_groups(&self) -> LazyChain<DataGroupBlock> {
        LazyChain::new(self.first_data_group)
    }

    pub fn read_comment<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Option<TextBasedBlock>> {
        self.comment.resolve(source)
    }
}

impl BlockParse for HeaderBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let header = BlockHeader::parse_expecting(BlockId::HD, source, 6, 32)?;

        let start_time_ns = source.read_u64()?;
        let tz_offset_min = source.read_i16()?;
        let dst_offset_min = source.read_i16()?;
        let time_flags = BitFlags::<TimeFlag>::from_raw(u32::from(source.read_u8()?));
        let time_class = source.read_u8()?;
        let flags = BitFlags::from_raw(u32::from(source.read_u8()?));
        source.skip(1)?; // reserved
        let start_angle_rad = source.read_f64()?;
        let start_distance_m = source.read_f64()?;

        let offsets_valid = time_flags.contains(TimeFlag::OffsetsValid);
        Ok(Self {
            first_data_group: header.link(0),
            file_history: header.link(1),
            channel_hierarchy: header.link(2),
            first_attachment: header.link(3),
            first_event: header.link(4),
            comment: header.link(5),
            header,
            start_time_ns,
            tz_offset_min: offsets_valid.then_some(tz_offset_min),
            dst_offset_min: offsets_valid.then_some(dst_offset_min),
            time_flags,
            time_class,
            flags,
            start_angle_rad,
            start_distance_m,
        })
    }
}

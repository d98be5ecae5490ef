use alloc::string::{String, ToString};

use crate::{
    Error, Result,
    blocks::common::{BlockHeader, BlockId, BlockParse},
    datatypes::TextEncoding,
    io::ByteSource,
};

/// Text Block (##TX) - zero-terminated UTF-8 text, e.g. names and units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub header: BlockHeader,
    pub text: String,
}

impl BlockParse for TextBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let header = BlockHeader::parse(BlockId::TX, source)?;
        Self::with_header(header, source)
    }
}

impl TextBlock {
    pub(crate) fn with_header<S: ByteSource + ?Sized>(
        header: BlockHeader,
        source: &mut S,
    ) -> Result<Self> {
        let text = read_text(&header, source)?;
        Ok(Self { header, text })
    }
}

/// Reads the payload as UTF-8 and drops the terminator and padding.
pub(crate) fn read_text<S: ByteSource + ?Sized>(
    header: &BlockHeader,
    source: &mut S,
) -> Result<String> {
    let raw = source.read_string(header.data_length(), TextEncoding::Utf8)?;
    Ok(raw.trim_end_matches('\0').to_string())
}

/// Metadata Block (##MD) - XML payload, same framing as [`TextBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    pub header: BlockHeader,
    pub xml: String,
}

impl BlockParse for MetadataBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let header = BlockHeader::parse(BlockId::MD, source)?;
        Self::with_header(header, source)
    }
}

impl MetadataBlock {
    pub(crate) fn with_header<S: ByteSource + ?Sized>(
        header: BlockHeader,
        source: &mut S,
    ) -> Result<Self> {
        let xml = read_text(&header, source)?;
        Ok(Self { header, xml })
    }
}

/// Target of comment links: either a plain text or an XML metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBasedBlock {
    Text(TextBlock),
    Metadata(MetadataBlock),
}

impl BlockParse for TextBasedBlock {
    fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let header = BlockHeader::parse_any(source)?;
        match header.id {
            BlockId::TX => TextBlock::with_header(header, source).map(TextBasedBlock::Text),
            BlockId::MD => MetadataBlock::with_header(header, source).map(TextBasedBlock::Metadata),
            actual => Err(Error::BlockIDError {
                actual,
                expected: String::from("##TX or ##MD"),
            }),
        }
    }
}

impl TextBasedBlock {
    /// The text, or the raw XML for metadata blocks.
    pub fn text(&self) -> &str {
        match self {
            TextBasedBlock::Text(tx) => &tx.text,
            TextBasedBlock::Metadata(md) => &md.xml,
        }
    }

    pub fn header(&self) -> &BlockHeader {
        match self {
            TextBasedBlock::Text(tx) => &tx.header,
            TextBasedBlock::Metadata(md) => &md.header,
        }
    }
}

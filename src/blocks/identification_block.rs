// identification_block.rs
use alloc::string::String;

use crate::{
    Error, Result, datatypes::TextEncoding, io::ByteSource, version::FormatVersion,
};

/// Identification Block - file format identifier at the start of every MDF file.
///
/// Unlike every other block it has no generic header: 64 fixed bytes at
/// offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentificationBlock {
    /// File identifier string ("MDF     " or "UnFinMF ").
    pub file_id: String,
    /// Parsed format version marker.
    pub version: FormatVersion,
    /// Program identifier string (tool that created the file).
    pub program_id: String,
    /// Numeric version as stored (e.g., 410 for version 4.10).
    pub version_number: u16,
    /// Standard unfinalized flags (indicates incomplete sections).
    pub unfinalized_flags: u16,
    /// Custom unfinalized flags (vendor-specific).
    pub custom_flags: u16,
}

impl IdentificationBlock {
    pub const SIZE: u64 = 64;

    /// Parses the identification block at offset 0 of `source`.
    pub fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        source.seek(0)?;
        let file_id = source.read_string(8, TextEncoding::Latin1)?;
        // Accept both finalized and unfinalized files
        if file_id != "MDF     " && file_id != "UnFinMF " {
            return Err(Error::FileIdentifierError(file_id));
        }
        let version = FormatVersion::parse(source)?;
        let program_id = source.read_string(8, TextEncoding::Latin1)?;
        source.skip(4)?;
        let version_number = source.read_u16()?;
        source.skip(30)?;
        let unfinalized_flags = source.read_u16()?;
        let custom_flags = source.read_u16()?;
        log::debug!("MDF {version} written by {:?}", program_id.trim_end());

        Ok(Self {
            file_id,
            version,
            program_id,
            version_number,
            unfinalized_flags,
            custom_flags,
        })
    }

    /// Whether the writer did not finish the file ("UnFinMF ").
    pub fn is_unfinalized(&self) -> bool {
        self.file_id == "UnFinMF "
    }
}

//! MDF format version marker.

use core::fmt;

use alloc::string::String;

use crate::{Error, Result, io::ByteSource};

/// Format version from the identification block, e.g. 4.10.
///
/// Ordering compares major, then minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatVersion {
    pub major: u16,
    pub minor: u16,
}

impl FormatVersion {
    pub const V4_10: FormatVersion = FormatVersion::new(4, 10);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Reads the 8-byte marker at the current position.
    pub fn parse<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        Self::from_bytes(&source.read_array::<8>()?)
    }

    /// Parses a marker of the exact form `D.DD` followed by four spaces.
    pub fn from_bytes(bytes: &[u8; 8]) -> Result<Self> {
        let digit = |b: u8| b.is_ascii_digit().then(|| u16::from(b - b'0'));
        let parsed = match bytes {
            [maj, b'.', m1, m2, b' ', b' ', b' ', b' '] => {
                digit(*maj).zip(digit(*m1)).zip(digit(*m2))
            }
            _ => None,
        };
        match parsed {
            Some(((major, m1), m2)) => Ok(Self::new(major, m1 * 10 + m2)),
            None => Err(Error::InvalidVersionString(
                bytes.iter().map(|&b| char::from(b)).collect::<String>(),
            )),
        }
    }

    /// Combined ordinal `major * 100 + minor`, e.g. 410.
    pub const fn as_int(&self) -> u16 {
        self.major * 100 + self.minor
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

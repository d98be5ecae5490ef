//! Error types for MDF4 block parsing.
//!
//! Every failure is one of two kinds (see [`ErrorKind`]): a structural
//! violation of the file format, or an I/O failure of the underlying
//! [`ByteSource`](crate::io::ByteSource). Both abort the parse step in
//! progress; nothing partially parsed is returned.
//!
//! # Example
//!
//! ```
//! use mdf4_blocks::{Error, ErrorKind, SliceSource, blocks::{BlockHeader, BlockId}};
//!
//! let mut source = SliceSource::new(b"##TX");
//! let err = BlockHeader::parse(BlockId::DG, &mut source).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Format);
//! assert!(matches!(err, Error::BlockIDError { .. }));
//! ```

use core::fmt;

use alloc::string::String;

use crate::blocks::BlockId;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The bytes do not follow the MDF4 block structure.
    Format,
    /// The source was exhausted or could not be read.
    Io,
}

/// Errors that can occur while reading MDF blocks.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while reading the underlying source.
    ///
    /// Only available with the `std` feature.
    #[cfg(feature = "std")]
    IOError(std::io::Error),

    /// The source ended before a read could be satisfied.
    UnexpectedEof {
        /// Absolute offset at which the read started
        offset: u64,
        /// Number of bytes requested
        needed: usize,
    },

    /// A block identifier did not match the expected value.
    BlockIDError {
        /// The identifier that was found
        actual: BlockId,
        /// The identifier (or set of identifiers) that was expected
        expected: String,
    },

    /// The block length cannot hold the header and its link table.
    InvalidBlockLength {
        id: BlockId,
        length: u64,
        link_count: u64,
    },

    /// The block carries fewer links than its kind requires.
    TooFewLinks {
        id: BlockId,
        expected: usize,
        actual: usize,
    },

    /// The block payload is shorter than its kind requires.
    TooFewDataBytes {
        id: BlockId,
        expected: u64,
        actual: u64,
    },

    /// The version marker in the identification block is malformed.
    InvalidVersionString(String),

    /// The file identifier is neither "MDF     " nor "UnFinMF ".
    FileIdentifierError(String),

    /// A non-nil link did not resolve to a block.
    UnresolvedLink {
        /// Address stored in the link
        address: u64,
    },

    /// Text bytes could not be decoded with the declared encoding.
    InvalidText {
        /// Absolute offset of the first byte of the text
        offset: u64,
    },

    /// A channel data type code or bit width has no value type.
    UnsupportedDataType {
        data_type: u8,
        bit_count: u32,
    },

    /// An address or length does not fit the platform's `usize` or overflows.
    AddressOverflow(u64),
}

impl Error {
    /// Returns whether this is a format violation or an I/O failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "std")]
            Error::IOError(_) => ErrorKind::Io,
            Error::UnexpectedEof { .. } => ErrorKind::Io,
            Error::BlockIDError { .. }
            | Error::InvalidBlockLength { .. }
            | Error::TooFewLinks { .. }
            | Error::TooFewDataBytes { .. }
            | Error::InvalidVersionString(_)
            | Error::FileIdentifierError(_)
            | Error::UnresolvedLink { .. }
            | Error::InvalidText { .. }
            | Error::UnsupportedDataType { .. }
            | Error::AddressOverflow(_) => ErrorKind::Format,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Format`.
    #[inline]
    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            Error::IOError(e) => write!(f, "I/O error: {e}"),
            Error::UnexpectedEof { offset, needed } => write!(
                f,
                "Unexpected end of input: needed {needed} bytes at offset {offset:#x}"
            ),
            Error::BlockIDError { actual, expected } => write!(
                f,
                "Invalid block identifier: Expected {expected:?}, got {:?}",
                actual.to_string_lossy()
            ),
            Error::InvalidBlockLength {
                id,
                length,
                link_count,
            } => write!(
                f,
                "Block {id} has length {length}, too small for {link_count} links"
            ),
            Error::TooFewLinks {
                id,
                expected,
                actual,
            } => write!(
                f,
                "Expecting a minimum of {expected} links in {id} block, but got {actual} links"
            ),
            Error::TooFewDataBytes {
                id,
                expected,
                actual,
            } => write!(
                f,
                "Expecting a minimum of {expected} data bytes in {id} block, but got {actual} data bytes"
            ),
            Error::InvalidVersionString(s) => write!(f, "Invalid version string: {s:?}"),
            Error::FileIdentifierError(id) => write!(
                f,
                r#"Invalid file identifier: Expected "MDF     ", found {id:?}"#
            ),
            Error::UnresolvedLink { address } => {
                write!(f, "Link at {address:#x} did not resolve to a block")
            }
            Error::InvalidText { offset } => {
                write!(f, "Undecodable text at offset {offset:#x}")
            }
            Error::UnsupportedDataType {
                data_type,
                bit_count,
            } => write!(
                f,
                "Unsupported channel data type {data_type} with {bit_count} bits"
            ),
            Error::AddressOverflow(value) => write!(
                f,
                "Value {value} exceeds maximum addressable size on this platform"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}

/// A specialized Result type for MDF block operations.
pub type Result<T> = core::result::Result<T, Error>;

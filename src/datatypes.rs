//! Value type descriptions.
//!
//! A [`ValueType`] describes how the raw bytes of one channel value are laid
//! out: width, signedness and byte order for numbers, encoding and
//! termination for strings, an optional maximum length for byte arrays. It
//! says nothing about where those bytes live in a record; slicing records
//! and materializing values is left to the record decoder.
//!
//! Consumers either `match` on the enum directly or implement
//! [`ValueTypeVisitor`]. Both are exhaustive: adding a variant breaks every
//! consumer at compile time.
//!
//! ```
//! use mdf4_blocks::datatypes::{ByteOrder, ValueType};
//!
//! let vt = ValueType::from_channel(3, 16).unwrap();
//! match vt {
//!     ValueType::Integer(int) => {
//!         assert!(int.signed);
//!         assert_eq!(int.byte_order, ByteOrder::BigEndian);
//!         assert_eq!(int.width_bytes(), 2);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use alloc::string::String;

use crate::{Error, Result};

/// Byte order of a multi-byte numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// Character encodings used by MDF string values and fixed-length fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    /// ISO-8859-1, one byte per character.
    Latin1,
    Utf8,
    Utf16LE,
    Utf16BE,
}

impl TextEncoding {
    /// Decodes `bytes` into a string.
    ///
    /// Returns `None` when the bytes are not valid in this encoding. Latin-1
    /// always succeeds.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8 => core::str::from_utf8(bytes).ok().map(String::from),
            TextEncoding::Utf16LE => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16BE => decode_utf16(bytes, u16::from_be_bytes),
        }
    }

    /// Width of one code unit in bytes.
    pub fn code_unit_size(self) -> usize {
        match self {
            TextEncoding::Latin1 | TextEncoding::Utf8 => 1,
            TextEncoding::Utf16LE | TextEncoding::Utf16BE => 2,
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|c| unit([c[0], c[1]]));
    char::decode_utf16(units).collect::<core::result::Result<String, _>>().ok()
}

/// How the end of a string value is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringTermination {
    /// The value ends at the first NUL code unit, or at the field end.
    NulTerminated,
    /// Every byte of the field belongs to the value.
    FixedLength,
}

/// Integer of `bits` width (1..=64).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegerType {
    pub bits: u32,
    pub signed: bool,
    pub byte_order: ByteOrder,
}

impl IntegerType {
    /// Number of bytes spanned by the value.
    pub fn width_bytes(&self) -> usize {
        self.bits.div_ceil(8) as usize
    }
}

/// IEEE 754 width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatWidth {
    F32,
    F64,
}

impl FloatWidth {
    pub fn bytes(self) -> usize {
        match self {
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
        }
    }

    fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(FloatWidth::F32),
            64 => Some(FloatWidth::F64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatType {
    pub width: FloatWidth,
    pub byte_order: ByteOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringType {
    pub encoding: TextEncoding,
    pub termination: StringTermination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ByteArrayType {
    /// Upper bound on the value length in bytes, if one is known.
    pub maximum_length: Option<u32>,
}

/// How the raw bytes of a value are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    Integer(IntegerType),
    Float(FloatType),
    String(StringType),
    ByteArray(ByteArrayType),
    /// A byte array holding a MIME-typed sample.
    MimeSample(ByteArrayType),
    /// A byte array holding part of a MIME-typed stream.
    MimeStream(ByteArrayType),
    /// 7-byte CANopen date.
    CanOpenDate,
    /// 6-byte CANopen time.
    CanOpenTime,
    /// Real and imaginary part, each of the given float type.
    Complex(FloatType),
}

impl ValueType {
    /// Maps an MDF channel data type code (`cn_data_type`) and bit count to
    /// a value type.
    ///
    /// Codes follow the MDF 4.1 numbering: 0-3 integers, 4-5 floats, 6-9
    /// strings, 10 byte array, 11-12 MIME, 13-14 CANopen, 15-16 complex.
    pub fn from_channel(data_type: u8, bit_count: u32) -> Result<Self> {
        let unsupported = || Error::UnsupportedDataType {
            data_type,
            bit_count,
        };
        let byte_len = || Some(bit_count / 8);

        let value_type = match data_type {
            0..=3 => {
                if bit_count == 0 || bit_count > 64 {
                    return Err(unsupported());
                }
                ValueType::Integer(IntegerType {
                    bits: bit_count,
                    signed: data_type >= 2,
                    byte_order: if data_type % 2 == 0 {
                        ByteOrder::LittleEndian
                    } else {
                        ByteOrder::BigEndian
                    },
                })
            }
            4 | 5 => ValueType::Float(FloatType {
                width: FloatWidth::from_bits(bit_count).ok_or_else(unsupported)?,
                byte_order: if data_type == 4 {
                    ByteOrder::LittleEndian
                } else {
                    ByteOrder::BigEndian
                },
            }),
            6..=9 => ValueType::String(StringType {
                encoding: match data_type {
                    6 => TextEncoding::Latin1,
                    7 => TextEncoding::Utf8,
                    8 => TextEncoding::Utf16LE,
                    _ => TextEncoding::Utf16BE,
                },
                termination: StringTermination::NulTerminated,
            }),
            10 => ValueType::ByteArray(ByteArrayType {
                maximum_length: byte_len(),
            }),
            11 => ValueType::MimeSample(ByteArrayType {
                maximum_length: byte_len(),
            }),
            12 => ValueType::MimeStream(ByteArrayType {
                maximum_length: byte_len(),
            }),
            13 => ValueType::CanOpenDate,
            14 => ValueType::CanOpenTime,
            15 | 16 => ValueType::Complex(FloatType {
                width: FloatWidth::from_bits(bit_count / 2).ok_or_else(unsupported)?,
                byte_order: if data_type == 15 {
                    ByteOrder::LittleEndian
                } else {
                    ByteOrder::BigEndian
                },
            }),
            _ => return Err(unsupported()),
        };
        Ok(value_type)
    }

    /// Encoded size in bytes, or `None` for variable-length kinds without
    /// a known maximum.
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            ValueType::Integer(int) => Some(int.width_bytes()),
            ValueType::Float(float) => Some(float.width.bytes()),
            ValueType::String(_) => None,
            ValueType::ByteArray(arr) | ValueType::MimeSample(arr) | ValueType::MimeStream(arr) => {
                arr.maximum_length.map(|len| len as usize)
            }
            ValueType::CanOpenDate => Some(7),
            ValueType::CanOpenTime => Some(6),
            ValueType::Complex(float) => Some(float.width.bytes() * 2),
        }
    }

    /// Dispatches to the visitor method matching this variant.
    pub fn accept<V: ValueTypeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            ValueType::Integer(t) => visitor.visit_integer(t),
            ValueType::Float(t) => visitor.visit_float(t),
            ValueType::String(t) => visitor.visit_string(t),
            ValueType::ByteArray(t) => visitor.visit_byte_array(t),
            ValueType::MimeSample(t) => visitor.visit_mime_sample(t),
            ValueType::MimeStream(t) => visitor.visit_mime_stream(t),
            ValueType::CanOpenDate => visitor.visit_canopen_date(),
            ValueType::CanOpenTime => visitor.visit_canopen_time(),
            ValueType::Complex(t) => visitor.visit_complex(t),
        }
    }
}

/// One method per [`ValueType`] variant.
///
/// `Output` is typically a `Result` when the visit can fail.
pub trait ValueTypeVisitor {
    type Output;

    fn visit_integer(&mut self, value_type: &IntegerType) -> Self::Output;
    fn visit_float(&mut self, value_type: &FloatType) -> Self::Output;
    fn visit_string(&mut self, value_type: &StringType) -> Self::Output;
    fn visit_byte_array(&mut self, value_type: &ByteArrayType) -> Self::Output;
    fn visit_mime_sample(&mut self, value_type: &ByteArrayType) -> Self::Output;
    fn visit_mime_stream(&mut self, value_type: &ByteArrayType) -> Self::Output;
    fn visit_canopen_date(&mut self) -> Self::Output;
    fn visit_canopen_time(&mut self) -> Self::Output;
    fn visit_complex(&mut self, value_type: &FloatType) -> Self::Output;
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let order = |o: ByteOrder| match o {
            ByteOrder::LittleEndian => "LE",
            ByteOrder::BigEndian => "BE",
        };
        match self {
            ValueType::Integer(t) => write!(
                f,
                "{}{} ({})",
                if t.signed { "int" } else { "uint" },
                t.bits,
                order(t.byte_order)
            ),
            ValueType::Float(t) => write!(f, "float{} ({})", t.width.bytes() * 8, order(t.byte_order)),
            ValueType::String(t) => write!(f, "string ({:?})", t.encoding),
            ValueType::ByteArray(_) => write!(f, "byte array"),
            ValueType::MimeSample(_) => write!(f, "MIME sample"),
            ValueType::MimeStream(_) => write!(f, "MIME stream"),
            ValueType::CanOpenDate => write!(f, "CANopen date"),
            ValueType::CanOpenTime => write!(f, "CANopen time"),
            ValueType::Complex(t) => {
                write!(f, "complex{} ({})", t.width.bytes() * 16, order(t.byte_order))
            }
        }
    }
}

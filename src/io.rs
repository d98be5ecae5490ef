//! Positioned byte sources.
//!
//! Block parsers never rely on where a previous read left the cursor: they
//! always [`seek`](ByteSource::seek) to an absolute offset first and then
//! issue typed reads. Two traversals may therefore share the same file as
//! long as each one owns its own source.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Error, Result, datatypes::TextEncoding};

/// Largest single allocation step of [`ByteSource::read_bytes`].
pub const READ_CHUNK: usize = 64 * 1024;

/// Random-access reader over the bytes of an MDF file.
///
/// All multi-byte integers and floats are little-endian, as in the MDF4
/// block layout. Implementors only supply [`seek`](Self::seek),
/// [`position`](Self::position) and [`read_exact`](Self::read_exact).
pub trait ByteSource {
    /// Moves the cursor to an absolute offset.
    fn seek(&mut self, offset: u64) -> Result<()>;

    /// Current absolute offset.
    fn position(&self) -> u64;

    /// Fills `buf` completely or fails with an I/O error.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Advances the cursor by `count` bytes without reading them.
    fn skip(&mut self, count: u64) -> Result<()> {
        let target = self
            .position()
            .checked_add(count)
            .ok_or(Error::AddressOverflow(count))?;
        self.seek(target)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    fn read_i8(&mut self) -> Result<i8> {
        self.read_array().map(i8::from_le_bytes)
    }

    fn read_i16(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    fn read_i64(&mut self) -> Result<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Result<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Reads `len` bytes into a new buffer.
    ///
    /// `len` usually comes from an untrusted block length, so the buffer
    /// grows by at most [`READ_CHUNK`] bytes per read and a short source
    /// fails before a large allocation is made.
    fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>> {
        let len = u64_to_usize(len)?;
        let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
        while buf.len() < len {
            let start = buf.len();
            let end = start + (len - start).min(READ_CHUNK);
            buf.resize(end, 0);
            self.read_exact(&mut buf[start..])?;
        }
        Ok(buf)
    }

    /// Reads a fixed-length field of `len` bytes and decodes it.
    ///
    /// The whole field is decoded; padding is kept. Undecodable bytes are a
    /// format error, not replaced.
    fn read_string(&mut self, len: u64, encoding: TextEncoding) -> Result<String> {
        let offset = self.position();
        let bytes = self.read_bytes(len)?;
        encoding
            .decode(&bytes)
            .ok_or(Error::InvalidText { offset })
    }

    /// Seeks to `offset` and reads `len` bytes.
    fn read_at(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        self.seek(offset)?;
        self.read_bytes(len)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn seek(&mut self, offset: u64) -> Result<()> {
        (**self).seek(offset)
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }
}

/// Safely convert a u64 length or address to usize.
#[inline]
pub(crate) fn u64_to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::AddressOverflow(value))
}

/// A [`ByteSource`] over an in-memory buffer.
///
/// Seeking past the end is allowed; the next read fails with
/// [`Error::UnexpectedEof`].
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: u64,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total number of bytes in the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for SliceSource<'_> {
    fn seek(&mut self, offset: u64) -> Result<()> {
        self.pos = offset;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let eof = Error::UnexpectedEof {
            offset: self.pos,
            needed: buf.len(),
        };
        let start = match usize::try_from(self.pos) {
            Ok(start) if start <= self.data.len() => start,
            _ => return Err(eof),
        };
        let bytes = self.data[start..].get(..buf.len()).ok_or(eof)?;
        buf.copy_from_slice(bytes);
        self.pos += buf.len() as u64;
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use self::std_source::{FileSource, ReaderSource};

#[cfg(feature = "std")]
mod std_source {
    use super::ByteSource;
    use crate::Result;
    use std::fs::File;
    use std::io::{BufReader, Read, Seek, SeekFrom};
    use std::path::Path;

    /// A [`ByteSource`] over any seekable reader.
    #[derive(Debug)]
    pub struct ReaderSource<R> {
        inner: R,
        pos: u64,
    }

    /// Buffered reader over a file on disk.
    pub type FileSource = ReaderSource<BufReader<File>>;

    impl FileSource {
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let file = File::open(path)?;
            Ok(Self::new(BufReader::new(file)))
        }
    }

    impl<R: Read + Seek> ReaderSource<R> {
        /// Wraps `inner`; the cursor starts at offset 0 regardless of
        /// where `inner` is positioned.
        pub fn new(inner: R) -> Self {
            Self { inner, pos: 0 }
        }

        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read + Seek> ByteSource for ReaderSource<R> {
        fn seek(&mut self, offset: u64) -> Result<()> {
            self.inner.seek(SeekFrom::Start(offset))?;
            self.pos = offset;
            Ok(())
        }

        fn position(&self) -> u64 {
            self.pos
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
            // Always seek explicitly; the wrapped reader may have been moved.
            self.inner.seek(SeekFrom::Start(self.pos))?;
            self.inner.read_exact(buf)?;
            self.pos += buf.len() as u64;
            Ok(())
        }
    }
}

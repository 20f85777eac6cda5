//! Binary reader for seekable parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian values, fixed-layout records and null-terminated strings
//! from a byte slice. Every error carries the absolute offset of the read.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader over a byte slice with an absolute, seekable position.
///
/// # Example
///
/// ```
/// use firetools_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// reader.seek(4).unwrap();
/// assert!(reader.expect_magic(0x08070605).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Start reading at offset 0.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Absolute position of the cursor.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the whole source, independent of the position.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Bytes left between the cursor and the end.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Whether the cursor sits at (or past) the end.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    ///
    /// Seeking exactly to the end is allowed; seeking past it is not.
    #[inline]
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::OutOfRange {
                offset: position,
                len: 0,
                size: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Skip `count` bytes, failing if fewer remain.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Borrow the next `count` bytes without moving the cursor.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::Truncated {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a null-terminated string. The terminator is consumed; invalid UTF-8 is an error.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let start = self.position;
        let remaining = &self.data[start.min(self.data.len())..];

        let null_pos = memchr::memchr(0, remaining)
            .ok_or(Error::MissingNullTerminator { offset: start })?;

        let string_bytes = &remaining[..null_pos];
        self.position = start + null_pos + 1;

        std::str::from_utf8(string_bytes).map_err(Error::Utf8)
    }

    /// Read a null-terminated string at an absolute offset, then restore the position.
    pub fn read_cstring_at(&mut self, offset: usize) -> Result<&'a str> {
        let saved = self.position;
        self.seek(offset)?;
        let result = self.read_cstring();
        self.position = saved;
        result
    }

    /// Read a fixed-layout record using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let offset = self.position;
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::Truncated {
            offset,
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read `count` consecutive records.
    ///
    /// The whole run is bounds-checked before anything is allocated, so a
    /// corrupt count fails instead of reserving a huge vector.
    pub fn read_array<T: FromBytes>(&mut self, count: usize) -> Result<Vec<T>> {
        let total = count
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(Error::OutOfRange {
                offset: self.position,
                len: usize::MAX,
                size: self.data.len(),
            })?;
        self.peek_bytes(total)?;

        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            result.push(self.read_struct::<T>()?);
        }
        Ok(result)
    }

    /// Expect a specific little-endian u32 magic value.
    pub fn expect_magic(&mut self, expected: u32) -> Result<()> {
        let offset = self.position;
        let actual = self.read_u32()?;
        if actual != expected {
            return Err(Error::MagicMismatch {
                offset,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

//! Offset-addressed string tables.

use std::borrow::Cow;

use crate::{Error, Result};

/// An immutable blob of null-terminated names addressed by byte offset.
///
/// Names are ANSI; bytes that are not valid UTF-8 are replaced rather than
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    data: Vec<u8>,
}

impl StringTable {
    /// Wrap raw string table bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Size of the blob in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read the name starting at `offset`.
    ///
    /// Fails with [`Error::OutOfRange`] if the offset is past the blob or the
    /// name has no terminator inside it.
    pub fn get(&self, offset: u32) -> Result<Cow<'_, str>> {
        let start = offset as usize;
        if start >= self.data.len() {
            return Err(Error::OutOfRange {
                offset: start,
                len: 1,
                size: self.data.len(),
            });
        }

        let tail = &self.data[start..];
        let end = memchr::memchr(0, tail).ok_or(Error::OutOfRange {
            offset: start,
            len: tail.len() + 1,
            size: self.data.len(),
        })?;

        Ok(String::from_utf8_lossy(&tail[..end]))
    }
}

impl From<Vec<u8>> for StringTable {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

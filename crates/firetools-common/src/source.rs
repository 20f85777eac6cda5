//! Backing storage for decoded containers.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::Result;

/// A random-access byte source owned by one decode session.
///
/// Files are memory-mapped; in-memory buffers are kept as-is.
pub enum ByteSource {
    /// Memory-mapped file.
    Mapped(Mmap),
    /// Owned buffer.
    Owned(Vec<u8>),
}

impl ByteSource {
    /// Memory-map a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // The map is read-only and lives as long as the source.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::Mapped(mmap))
    }

    /// The full contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => &mmap[..],
            Self::Owned(data) => data.as_slice(),
        }
    }
}

impl Deref for ByteSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Owned(data)
    }
}

impl From<&[u8]> for ByteSource {
    fn from(data: &[u8]) -> Self {
        Self::Owned(data.to_vec())
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Mapped(_) => "Mapped",
            Self::Owned(_) => "Owned",
        };
        f.debug_struct("ByteSource")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

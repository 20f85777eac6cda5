//! Error types for the PAK crate.

use std::fmt;

use thiserror::Error;

/// The part of a container that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Global header.
    Header,
    /// Page descriptor table.
    PageTable,
    /// Auxiliary record region.
    AuxRecords,
    /// A page's header and file table.
    PageFileTable { page: usize },
    /// A file's header or name strings.
    File { page: usize, file: usize },
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::PageTable => f.write_str("page table"),
            Self::AuxRecords => f.write_str("aux records"),
            Self::PageFileTable { page } => write!(f, "page {page} file table"),
            Self::File { page, file } => write!(f, "page {page} file {file}"),
        }
    }
}

/// Errors that can occur when working with PAK containers.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] firetools_common::Error),

    /// A region of the container could not be decoded.
    #[error("malformed container in {region}: {source}")]
    MalformedContainer {
        region: Region,
        #[source]
        source: firetools_common::Error,
    },

    /// A resource points outside the container.
    #[error("resource range {offset:#x}+{len:#x} outside container of {size:#x} bytes")]
    OutOfRange { offset: usize, len: usize, size: usize },

    /// The file is not a GPU resource descriptor.
    #[error("file `{name}` has class `{class_name}`, not a GPU resource descriptor")]
    NotAResource { name: String, class_name: String },
}

impl Error {
    /// The region a decode failure occurred in, if any.
    pub fn region(&self) -> Option<Region> {
        match self {
            Self::MalformedContainer { region, .. } => Some(*region),
            _ => None,
        }
    }
}

/// Result type for PAK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Attach a [`Region`] to a low-level decode failure.
pub(crate) trait InRegion<T> {
    fn in_region(self, region: Region) -> Result<T>;
}

impl<T> InRegion<T> for firetools_common::Result<T> {
    #[inline]
    fn in_region(self, region: Region) -> Result<T> {
        self.map_err(|source| Error::MalformedContainer { region, source })
    }
}

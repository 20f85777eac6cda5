//! Error types for texture handling.

use thiserror::Error;

/// Errors that can occur when untiling or exporting textures.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A block copy or mip level reaches outside its buffer.
    #[error("range {offset:#x}+{len:#x} outside buffer of {size:#x} bytes")]
    OutOfRange { offset: usize, len: usize, size: usize },

    /// Block size must be non-zero.
    #[error("invalid block size: {0}")]
    InvalidBlockSize(usize),
}

/// Result type for texture operations.
pub type Result<T> = std::result::Result<T, Error>;

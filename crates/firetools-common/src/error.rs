//! Error types for firetools-common.

use thiserror::Error;

/// Common error type for FireTools operations.
///
/// Every positional variant carries the absolute byte offset at which the
/// failure was detected.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of data at offset {offset:#x}: needed {needed} bytes but only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A structural magic value did not match.
    #[error("magic mismatch at offset {offset:#x}: expected {expected:#010x}, got {actual:#010x}")]
    MagicMismatch {
        offset: usize,
        expected: u32,
        actual: u32,
    },

    /// A computed offset or length lies outside the source.
    #[error("range {offset:#x}..+{len} is outside the {size}-byte source")]
    OutOfRange { offset: usize, len: usize, size: usize },

    /// Missing null terminator in string.
    #[error("string at offset {offset:#x} missing null terminator")]
    MissingNullTerminator { offset: usize },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

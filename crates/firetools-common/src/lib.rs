//! Common utilities for FireTools.
//!
//! This crate provides foundational types used across all FireTools crates:
//!
//! - [`BinaryReader`] - Seekable, bounds-checked binary reading from byte slices
//! - [`ByteSource`] - Memory-mapped or owned backing storage for a container
//! - [`FourCC`] - Four-character codes as stored on disk
//! - [`StringTable`] - Offset-addressed blob of null-terminated names

mod error;
mod fourcc;
mod reader;
mod source;
mod strings;

pub use error::{Error, Result};
pub use fourcc::FourCC;
pub use reader::BinaryReader;
pub use source::ByteSource;
pub use strings::StringTable;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Little-endian field types used by every on-disk record.
pub use zerocopy::byteorder::little_endian as le;

/// Re-export memchr for null-terminator searches
pub use memchr;

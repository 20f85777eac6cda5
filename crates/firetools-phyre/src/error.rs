//! Error types for Phyre archive parsing.

use std::fmt;

use firetools_common::FourCC;
use thiserror::Error;

/// What kind of index failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A class descriptor's base class id.
    BaseClass,
    /// The flat member array ran out while assigning members to a class.
    Member,
    /// A member descriptor's type id.
    MemberType,
    /// An instance list's class id.
    InstanceClass,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BaseClass => "base class",
            Self::Member => "member",
            Self::MemberType => "member type",
            Self::InstanceClass => "instance class",
        })
    }
}

/// Errors that can occur when working with Phyre archives.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] firetools_common::Error),

    /// The archive does not start with the Phyre magic.
    #[error("not a Phyre archive: expected magic {expected}, found {actual}")]
    MagicMismatch { expected: FourCC, actual: FourCC },

    /// The declared header size is below the base header size.
    #[error("header size {size} is smaller than the base header ({minimum} bytes)")]
    TruncatedHeader { size: u32, minimum: usize },

    /// The header is extended for a platform this decoder does not know.
    #[error("unknown platform {platform}")]
    UnknownPlatform { platform: FourCC },

    /// An index-encoded reference points outside its table.
    #[error("unresolved {kind} reference {index} in class `{class}`")]
    UnresolvedReference {
        kind: ReferenceKind,
        index: i64,
        class: String,
    },

    /// A base-class chain loops back on itself.
    #[error("inheritance cycle through class `{class}`")]
    InheritanceCycle { class: String },
}

/// Result type for Phyre operations.
pub type Result<T> = std::result::Result<T, Error>;

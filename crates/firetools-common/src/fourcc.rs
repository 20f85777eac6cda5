//! Four-character codes.

use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// A four-character code stored as four raw bytes.
///
/// Formats written on little-endian hosts store the code reversed, so the
/// tag `"DX11"` appears on disk as `11XD`. [`FourCC::value`] reads the bytes
/// as a little-endian u32, which is the number the format compares against,
/// and [`Display`](fmt::Display) prints the tag in its readable order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Build a code from its numeric value.
    #[inline]
    pub const fn from_value(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    /// The bytes interpreted as a little-endian u32.
    #[inline]
    pub const fn value(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.value().to_be_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{self}\")")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FourCC {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

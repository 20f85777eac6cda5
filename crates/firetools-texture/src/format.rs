//! VRAM texture format codes.

use std::borrow::Cow;
use std::fmt;

use firetools_common::FourCC;

use crate::dds::{FOURCC_BC4U, FOURCC_DXT1};
use crate::mips::untile_mip_chain;
use crate::Result;

/// Texture format as stored in a resource descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Code 80: BC4 unorm, tiled.
    Bc4Unorm,
    /// Codes 71 and 72: BC1/DXT1, tiled.
    Dxt1,
    /// Code 35: DXT1 stored linear.
    Dxt1Linear,
    /// Any other code. Exported as tiled DXT1.
    Unknown(u32),
}

impl TextureFormat {
    pub fn from_code(code: u32) -> Self {
        match code {
            80 => Self::Bc4Unorm,
            71 | 72 => Self::Dxt1,
            35 => Self::Dxt1Linear,
            other => Self::Unknown(other),
        }
    }

    /// Bytes per 4x4 block.
    #[inline]
    pub fn block_size(self) -> usize {
        8
    }

    /// Whether the payload needs untiling.
    #[inline]
    pub fn is_tiled(self) -> bool {
        !matches!(self, Self::Dxt1Linear)
    }

    /// Pixel format code written to the DDS header.
    pub fn four_cc(self) -> FourCC {
        match self {
            Self::Bc4Unorm => FOURCC_BC4U,
            Self::Dxt1 | Self::Dxt1Linear | Self::Unknown(_) => FOURCC_DXT1,
        }
    }

    /// Produce row-major block data for a whole mip chain.
    pub fn linearize<'a>(
        self,
        data: &'a [u8],
        width: u32,
        height: u32,
        mip_count: u32,
    ) -> Result<Cow<'a, [u8]>> {
        if self.is_tiled() {
            untile_mip_chain(data, width, height, mip_count, self.block_size()).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(data))
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bc4Unorm => f.write_str("BC4U"),
            Self::Dxt1 => f.write_str("DXT1"),
            Self::Dxt1Linear => f.write_str("DXT1 (linear)"),
            Self::Unknown(code) => write!(f, "unknown ({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(TextureFormat::from_code(80), TextureFormat::Bc4Unorm);
        assert_eq!(TextureFormat::from_code(71), TextureFormat::Dxt1);
        assert_eq!(TextureFormat::from_code(72), TextureFormat::Dxt1);
        assert_eq!(TextureFormat::from_code(35), TextureFormat::Dxt1Linear);
        assert_eq!(TextureFormat::from_code(99), TextureFormat::Unknown(99));
    }

    #[test]
    fn test_four_cc() {
        assert_eq!(TextureFormat::Bc4Unorm.four_cc().0, *b"BC4U");
        assert_eq!(TextureFormat::Unknown(3).four_cc().0, *b"DXT1");
    }

    #[test]
    fn test_linear_format_is_borrowed() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = TextureFormat::Dxt1Linear.linearize(&data, 4, 4, 1).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &data);
    }

    #[test]
    fn test_tiled_format_is_untiled() {
        let data = [9u8; 8];
        let out = TextureFormat::Dxt1.linearize(&data, 4, 4, 1).unwrap();
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(&*out, &data);
    }
}

//! DDS header structures and writer.

use std::io::Write;

use firetools_common::le::U32;
use firetools_common::FourCC;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Result, TextureFormat};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// DXT1 compression.
pub const FOURCC_DXT1: FourCC = FourCC(*b"DXT1");
/// BC4 unorm compression.
pub const FOURCC_BC4U: FourCC = FourCC(*b"BC4U");

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct DdsHeader {
    /// Header size (124).
    pub size: U32,
    pub flags: U32,
    pub height: U32,
    pub width: U32,
    pub pitch_or_linear_size: U32,
    /// Depth (for volume textures).
    pub depth: U32,
    pub mipmap_count: U32,
    pub reserved1: [U32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: U32,
    pub caps2: U32,
    pub caps3: U32,
    pub caps4: U32,
    pub reserved2: U32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    pub const FLAG_CAPS: u32 = 0x1;
    pub const FLAG_HEIGHT: u32 = 0x2;
    pub const FLAG_WIDTH: u32 = 0x4;
    pub const FLAG_PIXELFORMAT: u32 = 0x1000;
    pub const FLAG_MIPMAPCOUNT: u32 = 0x2_0000;
    pub const FLAG_LINEARSIZE: u32 = 0x8_0000;

    /// `DDSCAPS_TEXTURE`.
    pub const CAPS_TEXTURE: u32 = 0x1000;
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct DdsPixelFormat {
    /// Structure size (32).
    pub size: U32,
    pub flags: U32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    pub rgb_bit_count: U32,
    pub r_bit_mask: U32,
    pub g_bit_mask: U32,
    pub b_bit_mask: U32,
    pub a_bit_mask: U32,
}

impl DdsPixelFormat {
    pub const SIZE: u32 = 32;
    /// `DDPF_FOURCC`.
    pub const FLAG_FOURCC: u32 = 0x4;

    /// A compressed pixel format identified by `four_cc`.
    pub fn compressed(four_cc: FourCC) -> Self {
        Self {
            size: U32::new(Self::SIZE),
            flags: U32::new(Self::FLAG_FOURCC),
            four_cc,
            rgb_bit_count: U32::ZERO,
            r_bit_mask: U32::ZERO,
            g_bit_mask: U32::ZERO,
            b_bit_mask: U32::ZERO,
            a_bit_mask: U32::ZERO,
        }
    }
}

/// A linear block-compressed texture ready to be written as a DDS file.
#[derive(Debug, Clone, Copy)]
pub struct DdsTexture<'a> {
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub format: TextureFormat,
    /// Row-major block data for all mips, largest first.
    pub data: &'a [u8],
}

impl DdsTexture<'_> {
    pub fn header(&self) -> DdsHeader {
        DdsHeader {
            size: U32::new(DdsHeader::SIZE),
            flags: U32::new(
                DdsHeader::FLAG_CAPS
                    | DdsHeader::FLAG_HEIGHT
                    | DdsHeader::FLAG_WIDTH
                    | DdsHeader::FLAG_PIXELFORMAT
                    | DdsHeader::FLAG_MIPMAPCOUNT
                    | DdsHeader::FLAG_LINEARSIZE,
            ),
            height: U32::new(self.height),
            width: U32::new(self.width),
            // Top-level size of an 8-byte-block format.
            pitch_or_linear_size: U32::new(self.width.wrapping_mul(self.height) / 2),
            depth: U32::new(1),
            mipmap_count: U32::new(self.mip_count),
            reserved1: [U32::ZERO; 11],
            pixel_format: DdsPixelFormat::compressed(self.format.four_cc()),
            caps: U32::new(DdsHeader::CAPS_TEXTURE),
            caps2: U32::ZERO,
            caps3: U32::ZERO,
            caps4: U32::ZERO,
            reserved2: U32::ZERO,
        }
    }

    /// Write magic, header and data.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(DDS_MAGIC)?;
        writer.write_all(self.header().as_bytes())?;
        writer.write_all(self.data)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = Vec::with_capacity(4 + DdsHeader::SIZE as usize + self.data.len());
        out.extend_from_slice(DDS_MAGIC);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(self.data);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), 124);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), 32);
    }

    #[test]
    fn test_header_bytes() {
        let data = vec![0x5A; 64 * 32 / 2];
        let texture = DdsTexture {
            width: 64,
            height: 32,
            mip_count: 3,
            format: TextureFormat::Bc4Unorm,
            data: &data,
        };
        let bytes = texture.to_bytes();

        assert_eq!(&bytes[..4], b"DDS ");
        assert_eq!(u32_at(&bytes, 4), 124);
        assert_eq!(u32_at(&bytes, 8), 0x000A_1007);
        assert_eq!(u32_at(&bytes, 12), 32);
        assert_eq!(u32_at(&bytes, 16), 64);
        assert_eq!(u32_at(&bytes, 20), 1024);
        assert_eq!(u32_at(&bytes, 24), 1);
        assert_eq!(u32_at(&bytes, 28), 3);
        // Pixel format starts after 11 reserved words.
        assert_eq!(u32_at(&bytes, 76), 32);
        assert_eq!(u32_at(&bytes, 80), 4);
        assert_eq!(&bytes[84..88], b"BC4U");
        assert_eq!(u32_at(&bytes, 108), 0x1000);
        assert_eq!(bytes.len(), 128 + data.len());
        assert_eq!(&bytes[128..], &data[..]);
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let data = [1u8; 8];
        let texture = DdsTexture {
            width: 4,
            height: 4,
            mip_count: 1,
            format: TextureFormat::Dxt1,
            data: &data,
        };

        let mut written = Vec::new();
        texture.write_to(&mut written).unwrap();
        assert_eq!(written, texture.to_bytes());
        assert_eq!(&written[84..88], b"DXT1");
    }
}

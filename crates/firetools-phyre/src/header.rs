//! Archive header and instance list records.

use firetools_common::le::U32;
use firetools_common::{BinaryReader, FourCC};
use tracing::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Header shared by every platform.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BaseHeader {
    pub magic: FourCC,
    /// Declared header size; selects the platform extension.
    pub size: U32,
    pub objects_table_size: U32,
    pub platform: FourCC,
    pub instance_list_count: U32,
    pub array_fixup_size: U32,
    pub array_fixup_count: U32,
    pub pointer_fixup_size: U32,
    pub pointer_fixup_count: U32,
    pub pointer_array_fixup_size: U32,
    pub pointer_array_fixup_count: U32,
    pub pointers_in_arrays_count: U32,
    pub user_fixup_count: U32,
    pub user_fixup_data_size: U32,
    pub total_data_size: U32,
    pub header_class_instance_count: U32,
    pub header_class_child_count: U32,
    pub physics_engine_id: U32,
}

impl BaseHeader {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Base header extended with DX11 buffer sizes.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Dx11Header {
    pub base: BaseHeader,
    pub index_buffer_size: U32,
    pub vertex_buffer_size: U32,
    pub max_texture_mip_buffer_size: U32,
}

impl Dx11Header {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// The platform-dependent archive header.
#[derive(Debug, Clone, Copy)]
pub enum ArchiveHeader {
    Base(BaseHeader),
    Dx11(Dx11Header),
}

impl ArchiveHeader {
    /// `"PHYR"` read as a little-endian u32 (bytes `RYHP` on disk).
    pub const MAGIC: u32 = 0x5048_5952;
    /// `"DX11"` read as a little-endian u32 (bytes `11XD` on disk).
    pub const DX11_PLATFORM: u32 = 0x4458_3131;

    /// Read the header at the reader's position.
    ///
    /// Leaves the reader right after the bytes of the selected variant.
    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let start = reader.position();
        let base: BaseHeader = reader.read_struct()?;

        if base.magic.value() != Self::MAGIC {
            return Err(Error::MagicMismatch {
                expected: FourCC::from_value(Self::MAGIC),
                actual: base.magic,
            });
        }

        let size = base.size.get();
        if (size as usize) < BaseHeader::SIZE {
            return Err(Error::TruncatedHeader {
                size,
                minimum: BaseHeader::SIZE,
            });
        }
        if size as usize == BaseHeader::SIZE {
            return Ok(Self::Base(base));
        }

        match base.platform.value() {
            Self::DX11_PLATFORM => {
                reader.seek(start)?;
                let header: Dx11Header = reader.read_struct()?;
                if size as usize != Dx11Header::SIZE {
                    debug!(size, expected = Dx11Header::SIZE, "DX11 header size differs");
                }
                Ok(Self::Dx11(header))
            }
            _ => Err(Error::UnknownPlatform {
                platform: base.platform,
            }),
        }
    }

    /// The fields common to every variant.
    #[inline]
    pub fn base(&self) -> &BaseHeader {
        match self {
            Self::Base(base) => base,
            Self::Dx11(dx11) => &dx11.base,
        }
    }

    #[inline]
    pub fn platform(&self) -> FourCC {
        self.base().platform
    }

    #[inline]
    pub fn instance_list_count(&self) -> u32 {
        self.base().instance_list_count.get()
    }
}

/// Header of one instance list. The class id is 1-based.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct InstanceListHeader {
    pub class_id: U32,
    pub count: U32,
    /// `objects_size + arrays_size`.
    pub size: U32,
    pub objects_size: U32,
    pub arrays_size: U32,
    pub pointers_in_arrays_count: U32,
    pub array_fixup_count: U32,
    pub pointer_fixup_count: U32,
    pub pointer_array_fixup_count: U32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::base_header;

    #[test]
    fn test_record_sizes() {
        assert_eq!(BaseHeader::SIZE, 72);
        assert_eq!(Dx11Header::SIZE, 84);
        assert_eq!(std::mem::size_of::<InstanceListHeader>(), 36);
    }

    #[test]
    fn test_base_header_exact_size() {
        let mut data = base_header(72, *b"11XD", 2);
        data.extend_from_slice(&[0xEE; 16]);
        let mut reader = BinaryReader::new(&data);

        let header = ArchiveHeader::read(&mut reader).unwrap();
        assert!(matches!(header, ArchiveHeader::Base(_)));
        assert_eq!(reader.position(), 72);
        assert_eq!(header.instance_list_count(), 2);
    }

    #[test]
    fn test_dx11_extension() {
        let mut data = base_header(84, *b"11XD", 0);
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&200u32.to_le_bytes());
        data.extend_from_slice(&300u32.to_le_bytes());
        let mut reader = BinaryReader::new(&data);

        match ArchiveHeader::read(&mut reader).unwrap() {
            ArchiveHeader::Dx11(dx11) => {
                assert_eq!(dx11.index_buffer_size.get(), 100);
                assert_eq!(dx11.vertex_buffer_size.get(), 200);
                assert_eq!(dx11.max_texture_mip_buffer_size.get(), 300);
                assert_eq!(dx11.base.platform.to_string(), "DX11");
            }
            other => panic!("expected DX11 header, got {other:?}"),
        }
        assert_eq!(reader.position(), 84);
    }

    #[test]
    fn test_unknown_platform() {
        let data = base_header(84, *b"4SP\0", 0);
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            ArchiveHeader::read(&mut reader),
            Err(Error::UnknownPlatform { platform }) if platform.0 == *b"4SP\0"
        ));
    }

    #[test]
    fn test_truncated_header() {
        let data = base_header(40, *b"11XD", 0);
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            ArchiveHeader::read(&mut reader),
            Err(Error::TruncatedHeader { size: 40, minimum: 72 })
        ));
    }

    #[test]
    fn test_magic_mismatch() {
        let mut data = base_header(72, *b"11XD", 0);
        data[..4].copy_from_slice(b"DDS ");
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            ArchiveHeader::read(&mut reader),
            Err(Error::MagicMismatch { .. })
        ));
    }

    #[test]
    fn test_short_input() {
        let data = base_header(72, *b"11XD", 0);
        let mut reader = BinaryReader::new(&data[..50]);

        assert!(matches!(
            ArchiveHeader::read(&mut reader),
            Err(Error::Common(firetools_common::Error::Truncated { .. }))
        ));
    }
}

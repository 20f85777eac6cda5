//! GPU resource descriptors (`VRAM_DESC` files).

use firetools_common::le::{U16, U32};
use firetools_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::InRegion;
use crate::{Error, PakArchive, PakFile, Region, Result};

/// Class name of files carrying a [`VramDescRecord`].
pub const VRAM_DESC_CLASS: &str = "VRAM_DESC";

/// Fixed part of a `VRAM_DESC` payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct VramDescRecord {
    pub unknown0: U32,
    pub unknown1: U32,
    /// Offset of the raw data inside the side-data region.
    pub data_offset: U32,
    pub unknown3: U32,
    pub data_length: U32,
    pub h0: U16,
    pub h1: U16,
    pub h2: U16,
    pub h3: U16,
    pub format: U32,
    pub h6: U16,
    pub h7: U16,
    pub mip_count: U32,
    pub width: U32,
    pub height: U32,
    pub unknown12: U32,
    pub unknown13: U32,
    pub unknown14: U32,
    pub unknown15: U32,
}

/// A decoded `VRAM_DESC` file: texture geometry plus the location of its
/// raw data in the side-data region.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Page of the owning file.
    pub page: usize,
    /// Index of the owning file within its page.
    pub file: usize,
    pub record: VramDescRecord,
    /// Resource path stored after the record.
    pub name: String,
}

impl ResourceDescriptor {
    /// Read the descriptor stored in the payload of `file`.
    pub fn read(archive: &PakArchive, file: &PakFile) -> Result<Self> {
        if file.class_name() != VRAM_DESC_CLASS {
            return Err(Error::NotAResource {
                name: file.name().to_owned(),
                class_name: file.class_name().to_owned(),
            });
        }

        let region = Region::File {
            page: file.page_index(),
            file: file.index(),
        };

        let mut reader = BinaryReader::new(archive.bytes());
        let offset = usize::try_from(file.payload_global_offset()).map_err(|_| Error::OutOfRange {
            offset: usize::MAX,
            len: 0,
            size: archive.len(),
        })?;
        reader.seek(offset).in_region(region)?;

        let record: VramDescRecord = reader.read_struct().in_region(region)?;
        let name = reader.read_cstring().in_region(region)?.to_owned();

        Ok(Self {
            page: file.page_index(),
            file: file.index(),
            record,
            name,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.record.width.get()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.record.height.get()
    }

    #[inline]
    pub fn mip_count(&self) -> u32 {
        self.record.mip_count.get()
    }

    /// Raw VRAM format code.
    #[inline]
    pub fn format_code(&self) -> u32 {
        self.record.format.get()
    }

    #[inline]
    pub fn data_offset(&self) -> u32 {
        self.record.data_offset.get()
    }

    #[inline]
    pub fn data_length(&self) -> u32 {
        self.record.data_length.get()
    }
}

impl PakArchive {
    /// Borrow the raw (still tiled) bytes of a resource from the side-data region.
    pub fn read_resource(&self, desc: &ResourceDescriptor) -> Result<&[u8]> {
        let start = self.side_data_base()? + desc.data_offset() as usize;
        let len = desc.data_length() as usize;

        start
            .checked_add(len)
            .filter(|&end| end <= self.len())
            .map(|end| &self.bytes()[start..end])
            .ok_or(Error::OutOfRange {
                offset: start,
                len,
                size: self.len(),
            })
    }

    /// Decode every `VRAM_DESC` file, in page order.
    pub fn resources(&self) -> impl Iterator<Item = Result<ResourceDescriptor>> + '_ {
        self.find_by_class(VRAM_DESC_CLASS)
            .map(move |file| ResourceDescriptor::read(self, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{build, FixtureFile};
    use byteorder::{LittleEndian, WriteBytesExt};

    fn vram_payload(data_offset: u32, data_length: u32, format: u32, name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(data_offset).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(data_length).unwrap();
        for _ in 0..4 {
            out.write_u16::<LittleEndian>(0).unwrap();
        }
        out.write_u32::<LittleEndian>(format).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(3).unwrap();
        out.write_u32::<LittleEndian>(64).unwrap();
        out.write_u32::<LittleEndian>(32).unwrap();
        for _ in 0..4 {
            out.write_u32::<LittleEndian>(0).unwrap();
        }
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out
    }

    #[test]
    fn test_record_size() {
        assert_eq!(std::mem::size_of::<VramDescRecord>(), 64);
    }

    #[test]
    fn test_read_descriptor_and_side_data() {
        let side_data: Vec<u8> = (0u8..32).collect();
        let fixture = build(
            &[vec![
                FixtureFile::new("mesh.bin", "MESH", vec![7; 4]),
                FixtureFile::new("tex/a.vram", VRAM_DESC_CLASS, vram_payload(8, 16, 71, "tex/a.dds")),
            ]],
            0,
            &side_data,
        );
        let archive = PakArchive::parse(&fixture.bytes).unwrap();

        let descs: Vec<_> = archive.resources().collect::<Result<_>>().unwrap();
        assert_eq!(descs.len(), 1);

        let desc = &descs[0];
        assert_eq!(desc.name, "tex/a.dds");
        assert_eq!((desc.page, desc.file), (0, 1));
        assert_eq!((desc.width(), desc.height(), desc.mip_count()), (64, 32, 3));
        assert_eq!(desc.format_code(), 71);

        let raw = archive.read_resource(desc).unwrap();
        assert_eq!(raw, &side_data[8..24]);
    }

    #[test]
    fn test_not_a_resource() {
        let fixture = build(&[vec![FixtureFile::new("mesh.bin", "MESH", vec![0; 80])]], 0, &[]);
        let archive = PakArchive::parse(&fixture.bytes).unwrap();
        let file = archive.files().next().unwrap();

        assert!(matches!(
            ResourceDescriptor::read(&archive, file),
            Err(Error::NotAResource { class_name, .. }) if class_name == "MESH"
        ));
    }

    #[test]
    fn test_resource_out_of_range() {
        let fixture = build(
            &[vec![FixtureFile::new("t", VRAM_DESC_CLASS, vram_payload(4, 64, 80, "t.dds"))]],
            0,
            &[0; 16],
        );
        let archive = PakArchive::parse(&fixture.bytes).unwrap();
        let desc = archive.resources().next().unwrap().unwrap();

        assert!(matches!(
            archive.read_resource(&desc),
            Err(Error::OutOfRange { len: 64, .. })
        ));
    }

    #[test]
    fn test_side_data_larger_than_container() {
        let mut fixture = build(
            &[vec![FixtureFile::new("t", VRAM_DESC_CLASS, vram_payload(0, 4, 71, "t.dds"))]],
            0,
            &[0; 8],
        );
        // `attached_data_size` sits at byte 32 of the header.
        let oversized = fixture.bytes.len() as u32 + 1;
        fixture.bytes[32..36].copy_from_slice(&oversized.to_le_bytes());

        let archive = PakArchive::parse(&fixture.bytes).unwrap();
        let desc = archive.resources().next().unwrap().unwrap();

        assert!(matches!(
            archive.side_data_base(),
            Err(Error::OutOfRange { offset: 0, len, size }) if len == oversized as usize && size == archive.len()
        ));
        assert!(matches!(archive.read_resource(&desc), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_truncated_descriptor() {
        let fixture = build(&[vec![FixtureFile::new("t", VRAM_DESC_CLASS, vec![0; 10])]], 0, &[]);
        let archive = PakArchive::parse(&fixture.bytes).unwrap();
        let file = archive.files().next().unwrap();

        // Only the payload and the page strings follow the file header.
        let err = ResourceDescriptor::read(&archive, file).unwrap_err();
        assert_eq!(err.region(), Some(Region::File { page: 0, file: 0 }));
    }
}

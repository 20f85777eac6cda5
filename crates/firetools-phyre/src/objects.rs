//! The objects table: parallel descriptor arrays plus a shared string blob.

use firetools_common::le::{I32, U32};
use firetools_common::{BinaryReader, StringTable};
use tracing::{debug, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Result, TypeGraph};

/// Counts and total size of the objects table.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ObjectsTableHeader {
    pub magic: U32,
    /// Declared total size including this header and trailing padding.
    pub size: U32,
    pub type_count: U32,
    pub class_count: U32,
    pub class_member_count: U32,
    pub string_table_size: U32,
    pub buffer_count: U32,
    pub buffer_size: U32,
}

/// A primitive type.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TypeDescriptor {
    pub name_offset: U32,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ClassDescriptor {
    /// 0: no base, positive: 1-based local class id, negative: external.
    pub base_class_id: I32,
    /// Size in bytes; the alignment shift lives in the top 4 bits.
    pub size_and_alignment: U32,
    pub name_offset: U32,
    pub member_count: U32,
    pub offset_from_parent: U32,
    pub offset_to_base: U32,
    pub offset_to_base_in_allocated_block: U32,
    pub flags: U32,
    /// 0 when not saved; otherwise the buffer offset plus one.
    pub default_buffer_offset: U32,
}

impl ClassDescriptor {
    #[inline]
    pub fn size(&self) -> u32 {
        self.size_and_alignment.get() & 0x0FFF_FFFF
    }

    #[inline]
    pub fn alignment(&self) -> u32 {
        1 << (self.size_and_alignment.get() >> 28)
    }
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ClassMemberDescriptor {
    pub name_offset: U32,
    /// Below the type count: a type index. Above it: a class index.
    pub type_id: U32,
    pub value_offset: U32,
    pub size: U32,
    pub flags: U32,
    /// Non-zero for fixed-size arrays.
    pub fixed_array_size: U32,
}

/// The objects table declared a size smaller than its contents.
///
/// Reported instead of failing; the arrays are still decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    /// Absolute offset of the table.
    pub offset: usize,
    pub declared: u32,
    pub computed: u64,
}

impl std::fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "objects table at {:#x} declares {} bytes but holds {}",
            self.offset, self.declared, self.computed
        )
    }
}

/// The raw objects table.
#[derive(Debug, Clone)]
pub struct ObjectsTable {
    pub header: ObjectsTableHeader,
    pub types: Vec<TypeDescriptor>,
    pub classes: Vec<ClassDescriptor>,
    pub members: Vec<ClassMemberDescriptor>,
    pub strings: StringTable,
    /// Bytes skipped after the string table.
    pub padding_len: usize,
    pub size_mismatch: Option<SizeMismatch>,
}

impl ObjectsTable {
    /// Read the table at the reader's position, leaving the reader after its padding.
    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let offset = reader.position();
        let header: ObjectsTableHeader = reader.read_struct()?;

        let types: Vec<TypeDescriptor> = reader.read_array(header.type_count.get() as usize)?;
        let classes: Vec<ClassDescriptor> = reader.read_array(header.class_count.get() as usize)?;
        let members: Vec<ClassMemberDescriptor> =
            reader.read_array(header.class_member_count.get() as usize)?;
        let strings = StringTable::new(
            reader
                .read_bytes(header.string_table_size.get() as usize)?
                .to_vec(),
        );

        let computed = (reader.position() - offset) as u64;
        let declared = header.size.get();

        debug!(
            types = types.len(),
            classes = classes.len(),
            members = members.len(),
            strings = strings.len(),
            declared,
            computed,
            "read objects table"
        );

        let mut padding_len = 0;
        let mut size_mismatch = None;
        if (declared as u64) < computed {
            let mismatch = SizeMismatch {
                offset,
                declared,
                computed,
            };
            warn!("{mismatch}");
            size_mismatch = Some(mismatch);
        } else {
            padding_len = (declared as u64 - computed) as usize;
            reader.skip(padding_len)?;
        }

        Ok(Self {
            header,
            types,
            classes,
            members,
            strings,
            padding_len,
            size_mismatch,
        })
    }

    /// Build the class/type graph from the descriptors.
    pub fn type_graph(&self) -> Result<TypeGraph> {
        TypeGraph::build(&self.types, &self.classes, &self.members, &self.strings)
    }
}

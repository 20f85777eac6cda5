//! On-disk PAK records.
//!
//! All records are little-endian and packed; field types come from
//! `zerocopy::byteorder` so decoding does not depend on the host.

use firetools_common::le::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Global container header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct PakHeader {
    pub magic: U16,
    pub kind: U16,
    pub total_header_size: U32,
    pub login_table_page: U32,
    pub login_table_offset: U32,
    pub pages_count: U32,
    pub page_table_offset: U32,
    /// Always 8 in observed files.
    pub constant: U32,
    pub aux_table_offset: U32,
    /// Size of the side-data region at the end of the container.
    pub attached_data_size: U32,
    pub vram_desc_table_page: U32,
    pub vram_desc_table_offset: U32,
}

/// Entry of the page table.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct PageDescriptor {
    pub offset: U32,
    pub size: U32,
    pub index: U32,
}

/// Descriptor of the auxiliary record region.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AuxTableDescriptor {
    pub unknown: U32,
    pub records_offset: U32,
    pub records_count: U32,
}

/// Opaque auxiliary record.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AuxRecord {
    pub w0: U16,
    pub w1: U16,
    pub value: U32,
}

/// Header at the start of every page.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct PageHeader {
    pub magic_a: U32,
    pub magic_b: U32,
    pub unknown: U32,
    pub full_page_size: U32,
    pub table_unknown: U16,
    pub files_count: U16,
}

impl PageHeader {
    /// Value both page magics must hold.
    pub const MAGIC: u32 = 0xDEAD_BEEF;
}

/// Entry of a page's file table. Offsets are relative to the page start.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FileTableRecord {
    pub name_offset: U32,
    pub zero_sentinel: U32,
    pub file_offset: U32,
    pub reserved: U32,
}

/// Header preceding every file payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FileHeader {
    pub name_offset: U32,
    pub zero_sentinel: U32,
    pub class_name_offset: U32,
    pub unknown: U32,
    pub file_size: U32,
    /// Filled with 0x12345 in observed files.
    pub dummy: [U32; 3],
}

impl FileHeader {
    /// Size of the record; the payload starts right after it.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

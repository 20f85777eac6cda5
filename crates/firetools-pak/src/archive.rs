//! PAK container decoding.
//!
//! Parsing visits the header, the page table and the aux region near the
//! start of the container, then jumps to every page. All seeks are absolute.

use std::path::Path;

use firetools_common::{BinaryReader, ByteSource};
use tracing::{debug, warn};

use crate::error::InRegion;
use crate::structs::{
    AuxRecord, AuxTableDescriptor, FileHeader, FileTableRecord, PageDescriptor, PageHeader,
    PakHeader,
};
use crate::{Error, Region, Result};

/// The auxiliary record region. Its meaning is unknown; it is kept as-is.
#[derive(Debug, Clone)]
pub struct AuxTable {
    pub descriptor: AuxTableDescriptor,
    /// Length of the zero run between the descriptor and the records.
    pub padding_len: usize,
    pub records: Vec<AuxRecord>,
}

/// A page of the container and the files it owns.
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    descriptor: PageDescriptor,
    header: PageHeader,
    file_table: Vec<FileTableRecord>,
    files: Vec<PakFile>,
}

impl Page {
    /// Index of this page in the page table.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Absolute offset of the page; every offset inside the page is relative to it.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.descriptor.offset.get()
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.descriptor.size.get()
    }

    #[inline]
    pub fn descriptor(&self) -> &PageDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn header(&self) -> &PageHeader {
        &self.header
    }

    #[inline]
    pub fn file_table(&self) -> &[FileTableRecord] {
        &self.file_table
    }

    #[inline]
    pub fn files(&self) -> &[PakFile] {
        &self.files
    }

    #[inline]
    pub fn files_count(&self) -> usize {
        self.files.len()
    }

    /// Sum of the declared sizes of all files in the page.
    pub fn total_files_size(&self) -> u64 {
        self.files.iter().map(|f| f.size() as u64).sum()
    }
}

/// A named file entry inside a page.
#[derive(Debug, Clone)]
pub struct PakFile {
    page: usize,
    index: usize,
    page_offset: u32,
    file_offset: u32,
    header: FileHeader,
    name: String,
    class_name: String,
}

impl PakFile {
    /// Index of the owning page.
    #[inline]
    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Index of this file within its page.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Declared payload size.
    #[inline]
    pub fn size(&self) -> u32 {
        self.header.file_size.get()
    }

    /// Offset of the file header relative to the page.
    #[inline]
    pub fn header_local_offset(&self) -> u64 {
        self.file_offset as u64
    }

    /// Absolute offset of the file header.
    #[inline]
    pub fn header_global_offset(&self) -> u64 {
        self.page_offset as u64 + self.header_local_offset()
    }

    /// Offset of the payload relative to the page.
    #[inline]
    pub fn payload_local_offset(&self) -> u64 {
        self.header_local_offset() + FileHeader::SIZE as u64
    }

    /// Absolute offset of the payload.
    #[inline]
    pub fn payload_global_offset(&self) -> u64 {
        self.page_offset as u64 + self.payload_local_offset()
    }
}

/// A decoded PAK container.
pub struct PakArchive {
    source: ByteSource,
    header: PakHeader,
    page_table: Vec<PageDescriptor>,
    aux: AuxTable,
    pages: Vec<Page>,
}

struct Contents {
    header: PakHeader,
    page_table: Vec<PageDescriptor>,
    aux: AuxTable,
    pages: Vec<Page>,
}

impl PakArchive {
    /// Open and decode a PAK file (memory-mapped).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_source(ByteSource::open(path)?)
    }

    /// Decode a PAK container from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::from_source(ByteSource::from(data))
    }

    /// Decode a PAK container from an owned byte source.
    pub fn from_source(source: ByteSource) -> Result<Self> {
        let Contents {
            header,
            page_table,
            aux,
            pages,
        } = Self::parse_contents(&source)?;

        Ok(Self {
            source,
            header,
            page_table,
            aux,
            pages,
        })
    }

    #[inline]
    pub fn header(&self) -> &PakHeader {
        &self.header
    }

    #[inline]
    pub fn page_table(&self) -> &[PageDescriptor] {
        &self.page_table
    }

    #[inline]
    pub fn aux_table(&self) -> &AuxTable {
        &self.aux
    }

    #[inline]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[inline]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Iterate all files across all pages, page by page.
    pub fn files(&self) -> impl Iterator<Item = &PakFile> + '_ {
        self.pages.iter().flat_map(|p| p.files.iter())
    }

    /// Total number of files in all pages.
    pub fn total_files_count(&self) -> usize {
        self.pages.iter().map(|p| p.files.len()).sum()
    }

    /// Files whose class name matches exactly.
    pub fn find_by_class<'a>(&'a self, class_name: &'a str) -> impl Iterator<Item = &'a PakFile> + 'a {
        self.files().filter(move |f| f.class_name == class_name)
    }

    /// Length of the whole container in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// The raw container bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    /// Absolute offset where the trailing side-data region starts.
    pub fn side_data_base(&self) -> Result<usize> {
        let attached = self.header.attached_data_size.get() as usize;
        self.len().checked_sub(attached).ok_or(Error::OutOfRange {
            offset: 0,
            len: attached,
            size: self.len(),
        })
    }

    // Internal methods

    fn parse_contents(data: &[u8]) -> Result<Contents> {
        let mut reader = BinaryReader::new(data);

        let header: PakHeader = reader.read_struct().in_region(Region::Header)?;
        let pages_count = header.pages_count.get() as usize;

        debug!(
            pages = pages_count,
            page_table_offset = header.page_table_offset.get(),
            aux_table_offset = header.aux_table_offset.get(),
            attached_data_size = header.attached_data_size.get(),
            "read PAK header"
        );

        // The page table follows the header directly.
        let page_table: Vec<PageDescriptor> =
            reader.read_array(pages_count).in_region(Region::PageTable)?;

        let aux = Self::parse_aux_table(&mut reader, &header).in_region(Region::AuxRecords)?;

        let mut pages = Vec::with_capacity(page_table.len());
        for (index, descriptor) in page_table.iter().enumerate() {
            pages.push(Self::parse_page(&mut reader, index, *descriptor)?);
        }

        Ok(Contents {
            header,
            page_table,
            aux,
            pages,
        })
    }

    fn parse_aux_table(
        reader: &mut BinaryReader,
        header: &PakHeader,
    ) -> firetools_common::Result<AuxTable> {
        reader.seek(header.aux_table_offset.get() as usize)?;
        let descriptor: AuxTableDescriptor = reader.read_struct()?;

        let records_offset = descriptor.records_offset.get() as usize;
        let position = reader.position();
        if records_offset < position {
            return Err(firetools_common::Error::OutOfRange {
                offset: records_offset,
                len: position - records_offset,
                size: reader.len(),
            });
        }

        let padding = reader.read_bytes(records_offset - position)?;
        if padding.iter().any(|&b| b != 0) {
            warn!(offset = position, len = padding.len(), "aux padding is not zero");
        }

        let records = reader.read_array(descriptor.records_count.get() as usize)?;

        Ok(AuxTable {
            descriptor,
            padding_len: padding.len(),
            records,
        })
    }

    fn parse_page(reader: &mut BinaryReader, index: usize, descriptor: PageDescriptor) -> Result<Page> {
        let region = Region::PageFileTable { page: index };
        let page_offset = descriptor.offset.get();

        reader.seek(page_offset as usize).in_region(region)?;
        reader.expect_magic(PageHeader::MAGIC).in_region(region)?;
        reader.expect_magic(PageHeader::MAGIC).in_region(region)?;

        reader.seek(page_offset as usize).in_region(region)?;
        let header: PageHeader = reader.read_struct().in_region(region)?;

        let file_table: Vec<FileTableRecord> = reader
            .read_array(header.files_count.get() as usize)
            .in_region(region)?;

        debug!(page = index, offset = page_offset, files = file_table.len(), "read page");

        let mut files = Vec::with_capacity(file_table.len());
        for (file, record) in file_table.iter().enumerate() {
            files.push(Self::parse_file(reader, index, file, page_offset, record)?);
        }

        Ok(Page {
            index,
            descriptor,
            header,
            file_table,
            files,
        })
    }

    fn parse_file(
        reader: &mut BinaryReader,
        page: usize,
        index: usize,
        page_offset: u32,
        record: &FileTableRecord,
    ) -> Result<PakFile> {
        let region = Region::File { page, file: index };

        if record.zero_sentinel.get() != 0 {
            warn!(page, file = index, value = record.zero_sentinel.get(), "file table sentinel is not zero");
        }

        let base = page_offset as usize;
        let file_offset = record.file_offset.get();

        reader.seek(base + file_offset as usize).in_region(region)?;
        let header: FileHeader = reader.read_struct().in_region(region)?;

        let name = reader
            .read_cstring_at(base + header.name_offset.get() as usize)
            .in_region(region)?
            .to_owned();
        let class_name = reader
            .read_cstring_at(base + header.class_name_offset.get() as usize)
            .in_region(region)?
            .to_owned();

        Ok(PakFile {
            page,
            index,
            page_offset,
            file_offset,
            header,
            name,
            class_name,
        })
    }
}

impl std::fmt::Debug for PakArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PakArchive")
            .field("len", &self.len())
            .field("pages", &self.pages.len())
            .field("files", &self.total_files_count())
            .finish()
    }
}

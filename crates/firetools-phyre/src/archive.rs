//! Phyre archive decoding.

use std::path::Path;

use firetools_common::{BinaryReader, ByteSource};
use tracing::debug;

use crate::{
    ArchiveHeader, ClassId, Error, InstanceListHeader, ObjectsTable, ReferenceKind, Result,
    SizeMismatch, TypeGraph,
};

/// A decoded Phyre archive: header, objects table, class graph and the
/// instance list headers. Instance payloads are not decoded.
#[derive(Debug, Clone)]
pub struct PhyreArchive {
    header: ArchiveHeader,
    objects: ObjectsTable,
    graph: TypeGraph,
    instance_lists: Vec<InstanceListHeader>,
}

impl PhyreArchive {
    /// Open and decode a Phyre archive (memory-mapped).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = ByteSource::open(path)?;
        Self::parse(&source)
    }

    /// Decode a Phyre archive from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let header = ArchiveHeader::read(&mut reader)?;
        debug!(
            platform = %header.platform(),
            size = header.base().size.get(),
            instance_lists = header.instance_list_count(),
            "read Phyre header"
        );

        let objects = ObjectsTable::read(&mut reader)?;
        let graph = objects.type_graph()?;

        let instance_lists: Vec<InstanceListHeader> =
            reader.read_array(header.instance_list_count() as usize)?;

        Ok(Self {
            header,
            objects,
            graph,
            instance_lists,
        })
    }

    #[inline]
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    #[inline]
    pub fn objects_table(&self) -> &ObjectsTable {
        &self.objects
    }

    #[inline]
    pub fn type_graph(&self) -> &TypeGraph {
        &self.graph
    }

    #[inline]
    pub fn instance_lists(&self) -> &[InstanceListHeader] {
        &self.instance_lists
    }

    /// Non-fatal findings from decoding.
    #[inline]
    pub fn diagnostics(&self) -> &[SizeMismatch] {
        self.objects.size_mismatch.as_slice()
    }

    /// Resolve an instance list's 1-based class id.
    pub fn instance_class(&self, list: &InstanceListHeader) -> Result<ClassId> {
        let class_id = list.class_id.get() as usize;
        match class_id.checked_sub(1) {
            Some(index) if index < self.graph.classes().len() => Ok(ClassId(index)),
            _ => Err(Error::UnresolvedReference {
                kind: ReferenceKind::InstanceClass,
                index: class_id as i64,
                class: String::new(),
            }),
        }
    }
}

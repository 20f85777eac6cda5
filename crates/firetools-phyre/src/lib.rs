//! Phyre archive decoder.
//!
//! A Phyre archive starts with a platform-dependent header, followed by an
//! objects table describing the serialized classes and a sequence of instance
//! list headers. The objects table stores types, classes and class members
//! as parallel descriptor arrays that reference each other by index and name
//! things through a shared string blob; [`TypeGraph`] turns that into an
//! arena with typed ids.
//!
//! # Example
//!
//! ```no_run
//! use firetools_phyre::PhyreArchive;
//!
//! let archive = PhyreArchive::open("texture.dds.phyre")?;
//! let graph = archive.type_graph();
//!
//! for list in archive.instance_lists() {
//!     let class = archive.instance_class(list)?;
//!     println!("{} x {}", list.count.get(), graph.classes()[class.0].name);
//! }
//! # Ok::<(), firetools_phyre::Error>(())
//! ```

mod archive;
mod error;
mod graph;
mod header;
mod objects;
mod printer;

#[cfg(test)]
mod fixtures;

pub use archive::PhyreArchive;
pub use error::{Error, ReferenceKind, Result};
pub use graph::{
    BaseClass, Class, ClassId, ClassMember, FieldType, Type, TypeGraph, TypeId,
    EXTERNAL_CLASS_NAME,
};
pub use header::{ArchiveHeader, BaseHeader, Dx11Header, InstanceListHeader};
pub use objects::{
    ClassDescriptor, ClassMemberDescriptor, ObjectsTable, ObjectsTableHeader, SizeMismatch,
    TypeDescriptor,
};
pub use printer::ClassDeclarationWriter;

//! PAK container reader.
//!
//! A PAK file is a page-based container. A global header is followed by a
//! page table; every page is a self-contained region with its own file table,
//! and every file carries a name and a class name stored relative to the page
//! start. The last `attached_data_size` bytes of the container hold side data,
//! such as raw texture payloads referenced by `VRAM_DESC` files.
//!
//! # Example
//!
//! ```no_run
//! use firetools_pak::{PakArchive, ResourceDescriptor};
//!
//! let archive = PakArchive::open("level.pak")?;
//!
//! for file in archive.files() {
//!     println!("{} ({}): {} bytes", file.name(), file.class_name(), file.size());
//! }
//!
//! for file in archive.find_by_class(firetools_pak::VRAM_DESC_CLASS) {
//!     let desc = ResourceDescriptor::read(&archive, file)?;
//!     let raw = archive.read_resource(&desc)?;
//!     println!("{}: {}x{}, {} bytes", desc.name, desc.width(), desc.height(), raw.len());
//! }
//! # Ok::<(), firetools_pak::Error>(())
//! ```

mod archive;
mod error;
mod resource;
pub mod structs;

#[cfg(test)]
mod fixtures;

pub use archive::{AuxTable, PakArchive, PakFile, Page};
pub use error::{Error, Region, Result};
pub use resource::{ResourceDescriptor, VramDescRecord, VRAM_DESC_CLASS};

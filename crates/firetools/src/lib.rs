//! FireTools - PAK container, Phyre archive and tiled texture decoding.
//!
//! This crate re-exports the FireTools library crates under one roof.
//!
//! # Crates
//!
//! - [`firetools_common`] - Common utilities (binary reading, byte sources, string tables)
//! - [`firetools_pak`] - Page-based PAK containers and `VRAM_DESC` resources
//! - [`firetools_phyre`] - Phyre archive headers, objects tables and class graphs
//! - [`firetools_texture`] - Morton untiling, mip chains and DDS export
//!
//! # Example
//!
//! ```no_run
//! use firetools::prelude::*;
//!
//! let archive = PakArchive::open("level.pak")?;
//!
//! for desc in archive.resources() {
//!     let desc = desc?;
//!     let format = TextureFormat::from_code(desc.format_code());
//!     let raw = archive.read_resource(&desc)?;
//!     let linear = format.linearize(raw, desc.width(), desc.height(), desc.mip_count())?;
//!
//!     let texture = DdsTexture {
//!         width: desc.width(),
//!         height: desc.height(),
//!         mip_count: desc.mip_count(),
//!         format,
//!         data: &linear,
//!     };
//!     std::fs::write(format!("{}.dds", desc.file), texture.to_bytes())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use firetools_common as common;
pub use firetools_pak as pak;
pub use firetools_phyre as phyre;
pub use firetools_texture as texture;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use firetools_common::{BinaryReader, ByteSource, FourCC, StringTable};
    pub use firetools_pak::{PakArchive, PakFile, ResourceDescriptor, VRAM_DESC_CLASS};
    pub use firetools_phyre::{ClassDeclarationWriter, PhyreArchive, TypeGraph};
    pub use firetools_texture::{to_linear, to_tiled, untile_mip_chain, DdsTexture, TextureFormat};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

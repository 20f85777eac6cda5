//! GPU texture untiling and DDS export.
//!
//! Block-compressed textures are stored in a tiled layout: 8x8-block tiles
//! in row-major order with a Morton curve inside each tile. This crate
//! converts between that layout and the row-major layout DDS files expect,
//! walks mip chains, and writes DDS headers.
//!
//! # Example
//!
//! ```no_run
//! use firetools_texture::{DdsTexture, TextureFormat};
//!
//! # let raw: &[u8] = &[];
//! let format = TextureFormat::from_code(71);
//! let linear = format.linearize(raw, 256, 128, 9)?;
//!
//! let texture = DdsTexture { width: 256, height: 128, mip_count: 9, format, data: &linear };
//! texture.write_to(std::fs::File::create("out.dds")?)?;
//! # Ok::<(), firetools_texture::Error>(())
//! ```

mod dds;
mod error;
mod format;
mod mips;
mod morton;
mod swizzle;

pub use dds::{DdsHeader, DdsPixelFormat, DdsTexture, DDS_MAGIC, FOURCC_BC4U, FOURCC_DXT1};
pub use error::{Error, Result};
pub use format::TextureFormat;
pub use mips::{is_degenerate, mip_size, untile_mip_chain};
pub use morton::morton2d;
pub use swizzle::{to_linear, to_tiled, TILE_TEXELS};

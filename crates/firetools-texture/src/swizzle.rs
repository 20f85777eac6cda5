//! Tile/untile of block-compressed textures.
//!
//! The tiled layout groups 4x4-pixel blocks ("texels") into 8x8-texel tiles.
//! Tiles are stored row-major, and the 64 blocks inside a tile follow a
//! Morton curve. Every tile occupies `64 * block_size` bytes in the tiled
//! stream, including blocks that fall outside the texture.

use crate::morton::morton2d;
use crate::{Error, Result};

/// Tile edge length in texels.
pub const TILE_TEXELS: usize = 8;

const BLOCKS_PER_TILE: usize = TILE_TEXELS * TILE_TEXELS;

#[derive(Clone, Copy)]
enum Direction {
    ToLinear,
    ToTiled,
}

/// Convert tiled block data to row-major order.
///
/// The output has the input's length. Blocks outside the texel grid are
/// skipped.
pub fn to_linear(tiled: &[u8], width: u32, height: u32, block_size: usize) -> Result<Vec<u8>> {
    transform(tiled, width, height, block_size, Direction::ToLinear)
}

/// Convert row-major block data to the tiled order. Inverse of [`to_linear`].
pub fn to_tiled(linear: &[u8], width: u32, height: u32, block_size: usize) -> Result<Vec<u8>> {
    transform(linear, width, height, block_size, Direction::ToTiled)
}

fn transform(
    src: &[u8],
    width: u32,
    height: u32,
    block_size: usize,
    direction: Direction,
) -> Result<Vec<u8>> {
    if block_size == 0 {
        return Err(Error::InvalidBlockSize(block_size));
    }

    let width_texels = width as usize / 4;
    let height_texels = height as usize / 4;
    let tiles_x = (width_texels + TILE_TEXELS - 1) / TILE_TEXELS;
    let tiles_y = (height_texels + TILE_TEXELS - 1) / TILE_TEXELS;

    let curve: [usize; BLOCKS_PER_TILE] =
        std::array::from_fn(|t| morton2d(t, TILE_TEXELS, TILE_TEXELS));

    let mut out = vec![0u8; src.len()];
    let mut cursor = 0usize;

    for tile_y in 0..tiles_y {
        for tile_x in 0..tiles_x {
            for &index in &curve {
                let x = tile_x * TILE_TEXELS + index % TILE_TEXELS;
                let y = tile_y * TILE_TEXELS + index / TILE_TEXELS;

                if x < width_texels && y < height_texels {
                    let linear = (y * width_texels + x) * block_size;
                    let (from, to) = match direction {
                        Direction::ToLinear => (cursor, linear),
                        Direction::ToTiled => (linear, cursor),
                    };
                    copy_block(src, from, &mut out, to, block_size)?;
                }

                // The tiled cursor moves even for skipped blocks.
                cursor += block_size;
            }
        }
    }

    Ok(out)
}

fn copy_block(src: &[u8], from: usize, dst: &mut [u8], to: usize, len: usize) -> Result<()> {
    let source = src.get(from..from + len).ok_or(Error::OutOfRange {
        offset: from,
        len,
        size: src.len(),
    })?;

    let size = dst.len();
    let dest = dst.get_mut(to..to + len).ok_or(Error::OutOfRange {
        offset: to,
        len,
        size,
    })?;

    dest.copy_from_slice(source);
    Ok(())
}

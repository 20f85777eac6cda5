//! Mip chains of tiled textures.

use tracing::trace;

use crate::swizzle::to_linear;
use crate::{Error, Result};

/// Whether a mip level is smaller than one block in either dimension.
#[inline]
pub fn is_degenerate(width: u32, height: u32) -> bool {
    width < 4 || height < 4
}

/// Bytes a mip level occupies in the tiled stream.
///
/// Degenerate levels hold a single block. Dimensions whose size does not fit
/// in `usize` are out of range.
pub fn mip_size(width: u32, height: u32, block_size: usize) -> Result<usize> {
    if is_degenerate(width, height) {
        return Ok(block_size);
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|texels| texels.checked_mul(block_size))
        .map(|bytes| bytes / 16)
        .ok_or(Error::OutOfRange {
            offset: 0,
            len: usize::MAX,
            size: 0,
        })
}

/// Untile every level of a mip chain and concatenate the results.
///
/// Dimensions halve after each level and never drop below 1. Degenerate
/// levels are copied verbatim.
pub fn untile_mip_chain(
    data: &[u8],
    width: u32,
    height: u32,
    mip_count: u32,
    block_size: usize,
) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let (mut w, mut h) = (width, height);
    let mut offset = 0usize;

    for level in 0..mip_count {
        let size = mip_size(w, h, block_size).map_err(|_| Error::OutOfRange {
            offset,
            len: usize::MAX,
            size: data.len(),
        })?;
        let mip = data
            .get(offset..)
            .and_then(|rest| rest.get(..size))
            .ok_or(Error::OutOfRange {
                offset,
                len: size,
                size: data.len(),
            })?;

        trace!(level, width = w, height = h, offset, size, "untile mip");

        if is_degenerate(w, h) {
            out.extend_from_slice(mip);
        } else {
            out.extend_from_slice(&to_linear(mip, w, h, block_size)?);
        }

        offset += size;
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swizzle::to_tiled;

    #[test]
    fn test_mip_sizes() {
        assert_eq!(mip_size(128, 128, 8).unwrap(), 128 * 128 / 2);
        assert_eq!(mip_size(64, 32, 8).unwrap(), 1024);
        assert_eq!(mip_size(2, 8, 8).unwrap(), 8);
        assert_eq!(mip_size(1, 1, 8).unwrap(), 8);
    }

    #[test]
    fn test_oversized_dimensions() {
        assert!(matches!(
            mip_size(u32::MAX, u32::MAX, 8),
            Err(Error::OutOfRange { len: usize::MAX, .. })
        ));
        assert!(matches!(
            untile_mip_chain(&[0u8; 16], u32::MAX, u32::MAX, 1, 8),
            Err(Error::OutOfRange { offset: 0, size: 16, .. })
        ));
    }

    #[test]
    fn test_chain_with_degenerate_tail() {
        // 32x32: levels 32, 16, 8, 4, then 2 and 1 are single blocks.
        let dims = [32u32, 16, 8, 4, 2, 1];
        let mut tiled = Vec::new();
        let mut expected = Vec::new();
        for (level, &d) in dims.iter().enumerate() {
            let size = mip_size(d, d, 8).unwrap();
            let linear: Vec<u8> = (0..size).map(|i| (i + level * 31) as u8).collect();
            if is_degenerate(d, d) {
                tiled.extend_from_slice(&linear);
            } else {
                tiled.extend_from_slice(&to_tiled(&linear, d, d, 8).unwrap());
            }
            expected.extend_from_slice(&linear);
        }

        let out = untile_mip_chain(&tiled, 32, 32, dims.len() as u32, 8).unwrap();
        assert_eq!(out, expected);
        assert_eq!(out.len(), 512 + 128 + 32 + 8 + 8 + 8);
    }

    #[test]
    fn test_dimensions_floor_at_one() {
        // 8x2 halves to 4x1, then 2x1, then 1x1; all degenerate.
        let data = vec![0xAB; 8 * 4];
        let out = untile_mip_chain(&data, 8, 2, 4, 8).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_truncated_chain() {
        let data = vec![0; 512 + 100];
        assert!(matches!(
            untile_mip_chain(&data, 32, 32, 2, 8),
            Err(Error::OutOfRange { offset: 512, len: 128, .. })
        ));
    }
}

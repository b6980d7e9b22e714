//! Box-filter downsampling for RGB rasters.
//!
//! Each output pixel is the truncating integer mean of a 2x2 source block:
//! `dst = (a + b + c + d) / 4` per channel, summed in `u16`. The filter is
//! deliberately lossy and not gamma-aware; successive applications walk a
//! power-of-two raster down to a single tile.

use crate::raster::{Raster, CHANNELS};
use crate::util::{TileGenError, TileGenResult};

/// Produces a raster of half the width and half the height of `src`.
///
/// Requires both source dimensions to be at least 2. The source is not
/// mutated; callers replace their buffer with the returned one.
pub fn downsample(src: &Raster) -> TileGenResult<Raster> {
    let src_width = src.width();
    let src_height = src.height();
    if src_width < 2 || src_height < 2 {
        return Err(TileGenError::InvalidDimensions {
            width: src_width,
            height: src_height,
        });
    }

    let dst_width = src_width / 2;
    let dst_height = src_height / 2;
    let mut dst = vec![0u8; dst_width * dst_height * CHANNELS];

    let view = src.view();
    for y in 0..dst_height {
        let row0 = view.row(2 * y).ok_or(TileGenError::BufferTooSmall {
            needed: (2 * y + 1) * src_width * CHANNELS,
            got: src.data().len(),
        })?;
        let row1 = view.row(2 * y + 1).ok_or(TileGenError::BufferTooSmall {
            needed: (2 * y + 2) * src_width * CHANNELS,
            got: src.data().len(),
        })?;

        let out_base = y * dst_width * CHANNELS;
        for x in 0..dst_width {
            let left = 2 * x * CHANNELS;
            let right = left + CHANNELS;
            for c in 0..CHANNELS {
                let sum = u16::from(row0[left + c])
                    + u16::from(row0[right + c])
                    + u16::from(row1[left + c])
                    + u16::from(row1[right + c]);
                dst[out_base + x * CHANNELS + c] = (sum / 4) as u8;
            }
        }
    }

    Raster::new(dst, dst_width, dst_height)
}

#[cfg(test)]
mod tests {
    use super::downsample;
    use crate::raster::Raster;

    fn raster_from_pixels(pixels: &[[u8; 3]], width: usize, height: usize) -> Raster {
        let data = pixels.iter().flatten().copied().collect();
        Raster::new(data, width, height).unwrap()
    }

    #[test]
    fn halves_both_dimensions() {
        let src = Raster::new(vec![0u8; 8 * 4 * 3], 8, 4).unwrap();
        let dst = downsample(&src).unwrap();
        assert_eq!(dst.width(), 4);
        assert_eq!(dst.height(), 2);
    }

    #[test]
    fn averages_with_truncation() {
        // 2x2 block per channel: (1 + 2 + 3 + 5) / 4 = 2 (11/4 truncated)
        let src = raster_from_pixels(
            &[[1, 10, 255], [2, 20, 255], [3, 30, 255], [5, 41, 255]],
            2,
            2,
        );
        let dst = downsample(&src).unwrap();
        assert_eq!(dst.width(), 1);
        assert_eq!(dst.height(), 1);
        assert_eq!(dst.data(), &[2, 25, 255]);
    }

    #[test]
    fn does_not_mutate_source() {
        let src = raster_from_pixels(&[[9, 9, 9], [1, 1, 1], [3, 3, 3], [7, 7, 7]], 2, 2);
        let before = src.data().to_vec();
        let _ = downsample(&src).unwrap();
        assert_eq!(src.data(), before.as_slice());
    }

    #[test]
    fn rejects_single_pixel_dimension() {
        let src = Raster::new(vec![0u8; 4 * 1 * 3], 4, 1).unwrap();
        assert!(downsample(&src).is_err());
    }

    #[test]
    fn repeated_halving_reaches_tile_size_exactly() {
        use crate::tile::TILE_SIZE;

        let mut raster =
            Raster::new(vec![128u8; 4 * TILE_SIZE * 4 * TILE_SIZE * 3], 4 * TILE_SIZE, 4 * TILE_SIZE)
                .unwrap();
        let mut steps = 0;
        while raster.width() > TILE_SIZE {
            raster = downsample(&raster).unwrap();
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(raster.width(), TILE_SIZE);
        assert_eq!(raster.height(), TILE_SIZE);
    }
}

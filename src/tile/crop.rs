//! Cropping one pyramid level into fixed-size tiles.

use crate::raster::RasterView;
use crate::tile::{TileAddress, TileSink, TILE_SIZE};
use crate::util::{TileGenError, TileGenResult};

/// Splits `buf` into its `nr x nr` grid of tiles and routes each one to
/// `sink`, row-major (v outer, u inner).
///
/// `nr = width / TILE_SIZE`; each tile is `TILE_SIZE` wide and
/// `TILE_SIZE / aspect` tall, where `aspect = width / height`. The tile at
/// grid position `(u, v)` carries the global address
/// `(root_x * nr + u, root_y * nr + v)` at `zoom`. When `nr == 1` the
/// whole buffer passes through the same sink contract.
///
/// Returns the number of tiles written.
pub fn crop_to_tiles(
    buf: RasterView<'_>,
    zoom: i32,
    root_x: u32,
    root_y: u32,
    sink: &mut dyn TileSink,
) -> TileGenResult<u32> {
    let width = buf.width();
    let height = buf.height();
    if width % TILE_SIZE != 0 || width < TILE_SIZE {
        return Err(TileGenError::TileMisaligned { width });
    }
    let aspect = buf.aspect();
    if aspect == 0 || width % height != 0 || TILE_SIZE % aspect != 0 {
        return Err(TileGenError::BadAspect { width, height });
    }

    let nr = width / TILE_SIZE;
    let tile_height = TILE_SIZE / aspect;

    for v in 0..nr {
        for u in 0..nr {
            let tile = buf.roi(u * TILE_SIZE, v * tile_height, TILE_SIZE, tile_height)?;
            let addr = TileAddress {
                zoom,
                x: root_x * nr as u32 + u as u32,
                y: root_y * nr as u32 + v as u32,
            };
            sink.write_tile(addr, tile)?;
        }
    }

    Ok((nr * nr) as u32)
}

#[cfg(test)]
mod tests {
    use super::crop_to_tiles;
    use crate::raster::{Raster, RasterView, CHANNELS};
    use crate::tile::{TileAddress, TileSink, TILE_SIZE};
    use crate::util::{TileGenError, TileGenResult};

    struct CollectSink {
        tiles: Vec<(TileAddress, usize, usize, Vec<u8>)>,
    }

    impl TileSink for CollectSink {
        fn write_tile(&mut self, addr: TileAddress, tile: RasterView<'_>) -> TileGenResult<()> {
            let owned = tile.to_raster()?;
            self.tiles
                .push((addr, tile.width(), tile.height(), owned.data().to_vec()));
            Ok(())
        }
    }

    fn pattern_raster(width: usize, height: usize) -> Raster {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
                data.extend_from_slice(&[value, value.wrapping_add(1), value.wrapping_add(2)]);
            }
        }
        Raster::new(data, width, height).unwrap()
    }

    #[test]
    fn emits_expected_grid_and_addresses() {
        let raster = pattern_raster(2 * TILE_SIZE, 2 * TILE_SIZE);
        let mut sink = CollectSink { tiles: Vec::new() };
        let written = crop_to_tiles(raster.view(), 7, 3, 5, &mut sink).unwrap();

        assert_eq!(written, 4);
        let addrs: Vec<_> = sink.tiles.iter().map(|t| (t.0.x, t.0.y)).collect();
        assert_eq!(addrs, vec![(6, 10), (7, 10), (6, 11), (7, 11)]);
        for (addr, w, h, _) in &sink.tiles {
            assert_eq!(addr.zoom, 7);
            assert_eq!(*w, TILE_SIZE);
            assert_eq!(*h, TILE_SIZE);
        }
    }

    #[test]
    fn single_tile_level_passes_whole_buffer() {
        let raster = pattern_raster(TILE_SIZE, TILE_SIZE);
        let mut sink = CollectSink { tiles: Vec::new() };
        let written = crop_to_tiles(raster.view(), 0, 9, 2, &mut sink).unwrap();

        assert_eq!(written, 1);
        let (addr, w, h, data) = &sink.tiles[0];
        assert_eq!((addr.x, addr.y), (9, 2));
        assert_eq!((*w, *h), (TILE_SIZE, TILE_SIZE));
        assert_eq!(data.as_slice(), raster.data());
    }

    #[test]
    fn rectangular_aspect_shrinks_tile_height() {
        let raster = pattern_raster(2 * TILE_SIZE, TILE_SIZE);
        let mut sink = CollectSink { tiles: Vec::new() };
        let written = crop_to_tiles(raster.view(), 1, 0, 0, &mut sink).unwrap();

        assert_eq!(written, 4);
        for (_, w, h, _) in &sink.tiles {
            assert_eq!(*w, TILE_SIZE);
            assert_eq!(*h, TILE_SIZE / 2);
        }
    }

    #[test]
    fn rejects_misaligned_widths() {
        let raster = pattern_raster(TILE_SIZE / 2, TILE_SIZE / 2);
        let mut sink = CollectSink { tiles: Vec::new() };
        let err = crop_to_tiles(raster.view(), 0, 0, 0, &mut sink).unwrap_err();
        assert_eq!(
            err,
            TileGenError::TileMisaligned {
                width: TILE_SIZE / 2,
            }
        );
    }
}

#![cfg(feature = "image-io")]

//! Round trips through the packed archive layout.

use std::io::Cursor;
use tempfile::TempDir;
use tilegen::{
    build_packed, Direction, PackParams, Raster, TileFormat, TileGenError, CHANNELS, HEADER_BYTES,
    INDEX_SLOTS, TILE_SIZE,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn gradient_raster(width: usize, height: usize) -> Raster {
    let mut data = Vec::with_capacity(width * height * CHANNELS);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x & 0xFF) as u8, (y & 0xFF) as u8, ((x + y) & 0xFF) as u8]);
        }
    }
    Raster::new(data, width, height).unwrap()
}

fn slot(bytes: &[u8], index: usize) -> u32 {
    let at = index * 4;
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn decode_payload_tile(payload: &[u8], offset: u32) -> (u32, u32) {
    let cursor = Cursor::new(&payload[offset as usize..]);
    let img = image::load(cursor, image::ImageFormat::Png).unwrap();
    (img.width(), img.height())
}

#[test]
fn square_pack_records_the_coarse_levels() {
    let out = TempDir::new().unwrap();
    let raster = gradient_raster(2 * TILE_SIZE, 2 * TILE_SIZE);

    let summary = build_packed(
        raster,
        &PackParams {
            out_dir: out.path(),
            root_x: 3,
            root_y: 4,
            direction: Direction::North,
            format: TileFormat::Png,
        },
    )
    .unwrap();

    let zooms: Vec<_> = summary
        .levels
        .iter()
        .map(|l| (l.zoom, l.tiles_per_side, l.tiles_written))
        .collect();
    assert_eq!(zooms, vec![(0, 2, 4), (1, 1, 1)]);

    let bytes = std::fs::read(out.path().join("packed/3/4.pack")).unwrap();
    assert!(bytes.len() > HEADER_BYTES as usize);
    let payload = &bytes[HEADER_BYTES as usize..];

    // The 2x2 grid fills the last four slots, in write order (v outer).
    let offsets: Vec<u32> = (1360..INDEX_SLOTS).map(|i| slot(&bytes, i)).collect();
    assert_eq!(offsets[0], 0);
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    for &offset in &offsets {
        assert_eq!(
            &payload[offset as usize..offset as usize + 8],
            PNG_SIGNATURE.as_slice()
        );
        assert_eq!(
            decode_payload_tile(payload, offset),
            (TILE_SIZE as u32, TILE_SIZE as u32)
        );
    }

    // No other slot is touched.
    assert!((0..1360).all(|i| slot(&bytes, i) == 0));

    // The single-tile level rides along as unindexed payload.
    let signatures = payload
        .windows(PNG_SIGNATURE.len())
        .filter(|w| *w == PNG_SIGNATURE)
        .count();
    assert_eq!(signatures, 5);

    // And the same tile lands in the loose tree under the fixed label.
    let standalone = image::open(out.path().join("13/3/4.png")).unwrap();
    assert_eq!((standalone.width(), standalone.height()), (256, 256));
}

#[test]
fn rectangular_pack_shrinks_tile_height() {
    let out = TempDir::new().unwrap();
    let raster = gradient_raster(4 * TILE_SIZE, 2 * TILE_SIZE);

    let summary = build_packed(
        raster,
        &PackParams {
            out_dir: out.path(),
            root_x: 0,
            root_y: 0,
            direction: Direction::North,
            format: TileFormat::Png,
        },
    )
    .unwrap();

    let grids: Vec<_> = summary
        .levels
        .iter()
        .map(|l| (l.tiles_per_side, l.tiles_written))
        .collect();
    assert_eq!(grids, vec![(4, 16), (2, 4), (1, 1)]);

    let bytes = std::fs::read(out.path().join("packed/0/0.pack")).unwrap();
    let payload = &bytes[HEADER_BYTES as usize..];

    // 4x4 level occupies its own slot range; no aliasing into the 2x2 one.
    for i in 1344..1360 {
        let offset = slot(&bytes, i);
        assert_eq!(
            decode_payload_tile(payload, offset),
            (TILE_SIZE as u32, TILE_SIZE as u32 / 2)
        );
    }
    for i in 1360..INDEX_SLOTS {
        let offset = slot(&bytes, i);
        assert!(offset > 0);
        assert_eq!(
            decode_payload_tile(payload, offset),
            (TILE_SIZE as u32, TILE_SIZE as u32 / 2)
        );
    }
    assert!((0..1344).all(|i| slot(&bytes, i) == 0));

    let standalone = image::open(out.path().join("13/0/0.png")).unwrap();
    assert_eq!((standalone.width(), standalone.height()), (256, 128));
}

#[test]
fn packed_rejects_portrait_rasters() {
    let out = TempDir::new().unwrap();
    let raster = gradient_raster(TILE_SIZE, 2 * TILE_SIZE);

    let err = build_packed(
        raster,
        &PackParams {
            out_dir: out.path(),
            root_x: 0,
            root_y: 0,
            direction: Direction::North,
            format: TileFormat::Png,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        TileGenError::BadAspect {
            width: TILE_SIZE,
            height: 2 * TILE_SIZE,
        }
    );
}

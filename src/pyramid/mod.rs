//! Zoom-loop drivers for the two output layouts.
//!
//! Both drivers share the same skeleton: validate the source raster and
//! root address up front, then alternate cropping the current level into a
//! sink with box-filter downsampling until the buffer is exactly one tile
//! wide. Processing is single-threaded and strictly sequential; the first
//! error aborts the run with no partial-output cleanup.

use crate::raster::Raster;
use crate::tile::coord::Direction;
use crate::tile::{TileFormat, TILE_SIZE};
use crate::util::{TileGenError, TileGenResult};
use std::path::Path;

#[cfg(feature = "image-io")]
use crate::io::sink::{LooseTreeSink, PackedSink};
#[cfg(feature = "image-io")]
use crate::pack::PackedWriter;
#[cfg(feature = "image-io")]
use crate::raster::downsample::downsample;
#[cfg(feature = "image-io")]
use crate::tile::coord::map_root;
#[cfg(feature = "image-io")]
use crate::tile::crop::crop_to_tiles;
#[cfg(feature = "image-io")]
use crate::trace::{trace_event, trace_span};
#[cfg(feature = "image-io")]
use std::io::BufWriter;

/// Zoom label of the standalone finest tile a packed run writes into the
/// regular tree alongside the archive.
pub const STANDALONE_TILE_ZOOM: u32 = 13;

/// Per-level record of one pyramid run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelStats {
    /// Level label: absolute zoom for the loose tree, depth for packed.
    pub zoom: i32,
    /// Tiles per side at this level.
    pub tiles_per_side: usize,
    /// Tiles emitted for this level.
    pub tiles_written: u32,
}

/// Summary of a completed run, finest level first.
#[derive(Clone, Debug, Default)]
pub struct PyramidSummary {
    pub levels: Vec<LevelStats>,
}

impl PyramidSummary {
    /// Total tiles emitted across all levels.
    pub fn total_tiles(&self) -> u64 {
        self.levels.iter().map(|l| u64::from(l.tiles_written)).sum()
    }
}

fn is_power_of_two(v: usize) -> bool {
    v != 0 && v & (v - 1) == 0
}

/// Start-state validation for the loose-tree tool: square, power-of-two,
/// at least one tile on a side.
pub fn validate_square_raster(raster: &Raster) -> TileGenResult<()> {
    let width = raster.width();
    let height = raster.height();
    if !is_power_of_two(width) || !is_power_of_two(height) {
        return Err(TileGenError::NotPowerOfTwo { width, height });
    }
    if width != height {
        return Err(TileGenError::NotSquare { width, height });
    }
    if width < TILE_SIZE {
        return Err(TileGenError::TooSmall { width, height });
    }
    Ok(())
}

/// Start-state validation for the packed tool: power-of-two dimensions
/// with an integer aspect factor that divides the tile size.
pub fn validate_aspect_raster(raster: &Raster) -> TileGenResult<()> {
    let width = raster.width();
    let height = raster.height();
    if !is_power_of_two(width) || !is_power_of_two(height) {
        return Err(TileGenError::NotPowerOfTwo { width, height });
    }
    if height > width || width % height != 0 || TILE_SIZE % raster.aspect() != 0 {
        return Err(TileGenError::BadAspect { width, height });
    }
    if width < TILE_SIZE {
        return Err(TileGenError::TooSmall { width, height });
    }
    Ok(())
}

/// Parameters for a loose-tree run.
#[derive(Clone, Copy, Debug)]
pub struct TreeParams<'a> {
    pub out_dir: &'a Path,
    pub root_x: u32,
    pub root_y: u32,
    pub max_zoom: i32,
    pub direction: Direction,
    pub format: TileFormat,
}

/// Parameters for a packed run.
#[derive(Clone, Copy, Debug)]
pub struct PackParams<'a> {
    pub out_dir: &'a Path,
    pub root_x: u32,
    pub root_y: u32,
    pub direction: Direction,
    pub format: TileFormat,
}

/// Generates the loose `zoom/x/y` tile tree for one root tile.
///
/// Levels are labeled from `params.max_zoom` downward; the run ends after
/// the single-tile level is written.
#[cfg(feature = "image-io")]
pub fn build_tile_tree(raster: Raster, params: &TreeParams<'_>) -> TileGenResult<PyramidSummary> {
    let _guard = trace_span!("tile_tree").entered();
    validate_square_raster(&raster)?;
    let (root_x, root_y) = map_root(params.root_x, params.root_y, params.direction)?;

    let mut raster = raster;
    let mut zoom = params.max_zoom;
    let mut summary = PyramidSummary::default();
    loop {
        let nr = raster.width() / TILE_SIZE;
        let mut sink = LooseTreeSink::new(params.out_dir, params.format);
        let tiles_written = crop_to_tiles(raster.view(), zoom, root_x, root_y, &mut sink)?;
        trace_event!("level_written", zoom = zoom, tiles_per_side = nr);
        summary.levels.push(LevelStats {
            zoom,
            tiles_per_side: nr,
            tiles_written,
        });

        if raster.width() == TILE_SIZE {
            break;
        }
        raster = downsample(&raster)?;
        zoom -= 1;
    }
    Ok(summary)
}

/// Generates the packed archive for one root tile, plus the standalone
/// finest tile at `<out>/13/<x>/<y>.png`.
///
/// Levels are labeled with an ascending depth counter from 0. Grids of
/// 32x32 down to 2x2 tiles per side receive index entries; any other
/// level (including the final single tile) is appended as payload only.
#[cfg(feature = "image-io")]
pub fn build_packed(raster: Raster, params: &PackParams<'_>) -> TileGenResult<PyramidSummary> {
    let _guard = trace_span!("packed_pyramid").entered();
    validate_aspect_raster(&raster)?;
    let (root_x, root_y) = map_root(params.root_x, params.root_y, params.direction)?;

    let pack_dir = params
        .out_dir
        .join("packed")
        .join(root_x.to_string());
    std::fs::create_dir_all(&pack_dir)?;
    let pack_path = pack_dir.join(format!("{root_y}.pack"));
    let file = std::fs::File::create(&pack_path)?;
    let writer = PackedWriter::new(BufWriter::new(file))?;
    let mut sink = PackedSink::new(writer, root_x, root_y, params.format);

    let mut raster = raster;
    let mut depth = 0i32;
    let mut summary = PyramidSummary::default();
    loop {
        let nr = raster.width() / TILE_SIZE;
        sink.begin_level(nr);
        let tiles_written = crop_to_tiles(raster.view(), depth, root_x, root_y, &mut sink)?;
        trace_event!("level_packed", depth = depth, tiles_per_side = nr);
        summary.levels.push(LevelStats {
            zoom: depth,
            tiles_per_side: nr,
            tiles_written,
        });

        if raster.width() == TILE_SIZE {
            break;
        }
        raster = downsample(&raster)?;
        depth += 1;
    }

    // The finest tile goes into the regular tree as well, under its fixed
    // zoom label, so viewers can bootstrap without opening the archive.
    let standalone = params
        .out_dir
        .join(STANDALONE_TILE_ZOOM.to_string())
        .join(root_x.to_string())
        .join(format!("{root_y}.png"));
    crate::io::encode_tile_to_file(&standalone, raster.view(), TileFormat::Png)?;

    sink.finish()?;
    trace_event!("pack_finished", levels = summary.levels.len());
    Ok(summary)
}

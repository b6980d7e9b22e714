//! Tile sinks: the loose `zoom/x/y` tree and the packed stream.

use crate::io::{encode_tile_to_file, encode_tile_to_stream};
use crate::pack::PackedWriter;
use crate::raster::RasterView;
use crate::tile::{TileAddress, TileFormat, TileSink};
use crate::util::{TileGenError, TileGenResult};
use std::io::{Seek, Write};
use std::path::PathBuf;

/// Writes each tile as `<out_dir>/<zoom>/<x>/<y>.<ext>`.
pub struct LooseTreeSink {
    out_dir: PathBuf,
    format: TileFormat,
}

impl LooseTreeSink {
    pub fn new(out_dir: impl Into<PathBuf>, format: TileFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
        }
    }
}

impl TileSink for LooseTreeSink {
    fn write_tile(&mut self, addr: TileAddress, tile: RasterView<'_>) -> TileGenResult<()> {
        let path = self
            .out_dir
            .join(addr.zoom.to_string())
            .join(addr.x.to_string())
            .join(format!("{}.{}", addr.y, self.format.extension()));
        encode_tile_to_file(path, tile, self.format)
    }
}

/// Appends each tile to a packed stream, recording its offset in the
/// archive's index when the current level is within the indexed range.
///
/// The driver announces each level's grid size with [`PackedSink::begin_level`]
/// before cropping it; local tile coordinates are recovered from the global
/// address using the mapped root.
pub struct PackedSink<W: Write + Seek> {
    writer: PackedWriter<W>,
    root_x: u32,
    root_y: u32,
    format: TileFormat,
    nr: usize,
}

impl<W: Write + Seek> PackedSink<W> {
    pub fn new(writer: PackedWriter<W>, root_x: u32, root_y: u32, format: TileFormat) -> Self {
        Self {
            writer,
            root_x,
            root_y,
            format,
            nr: 0,
        }
    }

    /// Sets the tiles-per-side of the level about to be cropped.
    pub fn begin_level(&mut self, nr: usize) {
        self.nr = nr;
    }

    /// Finalizes the offset table and returns the underlying stream.
    pub fn finish(self) -> TileGenResult<W> {
        self.writer.finish()
    }
}

impl<W: Write + Seek> TileSink for PackedSink<W> {
    fn write_tile(&mut self, addr: TileAddress, tile: RasterView<'_>) -> TileGenResult<()> {
        let nr = self.nr;
        let out_of_grid = || TileGenError::InvalidTileIndex {
            nr,
            u: addr.x as usize,
            v: addr.y as usize,
        };
        let u = addr
            .x
            .checked_sub(self.root_x * nr as u32)
            .ok_or_else(out_of_grid)? as usize;
        let v = addr
            .y
            .checked_sub(self.root_y * nr as u32)
            .ok_or_else(out_of_grid)? as usize;
        self.writer.record_tile_offset(nr, u, v)?;
        encode_tile_to_stream(&mut self.writer, tile, self.format)
    }
}

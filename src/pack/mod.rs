//! Packed tile archive: offset index plus concatenated tile payloads.
//!
//! A `.pack` file holds the coarse levels of one root tile as a single
//! stream: a fixed `1364 x 4`-byte offset table followed by the encoded
//! tiles in write order. The table covers tile grids of 32x32 down to 2x2
//! tiles per side (1024 + 256 + 64 + 16 + 4 slots); offsets are u32
//! little-endian and relative to the first payload byte. Slots of levels
//! never written stay zero. Levels outside that grid range are appended as
//! payload without an index entry.
//!
//! The table is written twice: zeroed up front to reserve the header, and
//! again with final values on `finish`, so the output must support seeking.

use crate::util::{TileGenError, TileGenResult};
use std::io::{Seek, SeekFrom, Write};

/// Number of pyramid levels covered by the offset index.
pub const PACKED_LEVELS: usize = 5;

/// Tiles per side of each indexed level, finest grid first.
const LEVEL_GRIDS: [usize; PACKED_LEVELS] = [32, 16, 8, 4, 2];

/// First slot of each indexed level, same order as `LEVEL_GRIDS`.
const LEVEL_BASES: [usize; PACKED_LEVELS] = [0, 1024, 1280, 1344, 1360];

/// Total number of index slots.
pub const INDEX_SLOTS: usize = 1364;

/// Size of the reserved offset table in bytes.
pub const HEADER_BYTES: u64 = (INDEX_SLOTS * 4) as u64;

/// Offset table for one packed run, keyed by `(grid size, u, v)`.
pub struct PackedIndex {
    offsets: Vec<u32>,
}

impl PackedIndex {
    /// Creates an index with every slot zeroed.
    pub fn new() -> Self {
        Self {
            offsets: vec![0u32; INDEX_SLOTS],
        }
    }

    /// Returns the flat slot for local tile `(u, v)` on an `nr`-per-side
    /// grid, or `None` when the grid is outside the indexed range.
    pub fn slot(nr: usize, u: usize, v: usize) -> Option<usize> {
        let level = LEVEL_GRIDS.iter().position(|&g| g == nr)?;
        Some(LEVEL_BASES[level] + v * nr + u)
    }

    /// Stores the payload-relative byte offset of one tile.
    ///
    /// Grids outside the indexed range are accepted and ignored, so the
    /// caller can record unconditionally while cropping.
    pub fn record(&mut self, nr: usize, u: usize, v: usize, offset: u32) -> TileGenResult<()> {
        if u >= nr || v >= nr {
            return Err(TileGenError::InvalidTileIndex { nr, u, v });
        }
        if let Some(slot) = Self::slot(nr, u, v) {
            self.offsets[slot] = offset;
        }
        Ok(())
    }

    /// Returns the recorded offsets in slot order.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }
}

impl Default for PackedIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequential writer for one packed tile archive.
///
/// Payload bytes are appended through the `io::Write` impl; tile offsets
/// are captured with [`PackedWriter::record_tile_offset`] immediately
/// before each tile's bytes. One writer owns one output stream for the
/// whole run.
pub struct PackedWriter<W: Write + Seek> {
    stream: W,
    index: PackedIndex,
}

impl<W: Write + Seek> PackedWriter<W> {
    /// Reserves the offset table and positions the stream for payload.
    pub fn new(mut stream: W) -> TileGenResult<Self> {
        stream.seek(SeekFrom::Start(0))?;
        stream.write_all(&[0u8; HEADER_BYTES as usize])?;
        Ok(Self {
            stream,
            index: PackedIndex::new(),
        })
    }

    /// Current position relative to the first payload byte.
    pub fn payload_position(&mut self) -> TileGenResult<u32> {
        let pos = self.stream.stream_position()?;
        let rel = pos - HEADER_BYTES;
        u32::try_from(rel).map_err(|_| TileGenError::PackTooLarge { position: rel })
    }

    /// Records the current payload position as the offset of the tile at
    /// `(u, v)` on an `nr`-per-side grid. Must be called before the
    /// tile's payload bytes are appended.
    pub fn record_tile_offset(&mut self, nr: usize, u: usize, v: usize) -> TileGenResult<()> {
        let offset = self.payload_position()?;
        self.index.record(nr, u, v, offset)
    }

    /// Rewrites the offset table with final values and returns the stream,
    /// positioned after the table. The payload written so far remains the
    /// end of the file.
    pub fn finish(mut self) -> TileGenResult<W> {
        self.stream.seek(SeekFrom::Start(0))?;
        let mut table = [0u8; HEADER_BYTES as usize];
        for (slot, offset) in self.index.offsets().iter().enumerate() {
            table[slot * 4..slot * 4 + 4].copy_from_slice(&offset.to_le_bytes());
        }
        self.stream.write_all(&table)?;
        self.stream.flush()?;
        Ok(self.stream)
    }
}

impl<W: Write + Seek> Write for PackedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stream.flush()
    }
}

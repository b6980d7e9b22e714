//! Tilegen converts one power-of-two RGB raster into an image pyramid of
//! fixed-size map tiles.
//!
//! The pyramid is produced by repeated 2x2 box-filter downsampling; each
//! level is cropped into `TILE_SIZE`-wide tiles addressed on a global
//! `zoom/x/y` grid. Output is either a loose directory tree of encoded
//! tiles or a single packed archive holding the coarse levels of one root
//! tile behind a fixed-size offset index. Decoding and encoding go through
//! the `image` crate behind the `image-io` feature; progress reporting
//! goes through `tracing` behind the `tracing` feature.

#[cfg(feature = "image-io")]
pub mod io;
pub mod pack;
pub mod pyramid;
pub mod raster;
pub mod tile;
#[cfg(feature = "image-io")]
pub(crate) mod trace;
pub mod util;

pub use pack::{PackedIndex, PackedWriter, HEADER_BYTES, INDEX_SLOTS, PACKED_LEVELS};
pub use pyramid::{
    validate_aspect_raster, validate_square_raster, LevelStats, PackParams, PyramidSummary,
    TreeParams, STANDALONE_TILE_ZOOM,
};
pub use raster::downsample::downsample;
pub use raster::{Raster, RasterView, CHANNELS};
pub use tile::coord::{map_root, Direction, GRID_MAX};
pub use tile::crop::crop_to_tiles;
pub use tile::{TileAddress, TileFormat, TileSink, TILE_SIZE};
pub use util::{TileGenError, TileGenResult};

#[cfg(feature = "image-io")]
pub use io::{decode_raster, encode_tile_to_file, encode_tile_to_stream, JPEG_QUALITY};
#[cfg(feature = "image-io")]
pub use io::sink::{LooseTreeSink, PackedSink};
#[cfg(feature = "image-io")]
pub use pyramid::{build_packed, build_tile_tree};

//! Tile addressing and the sink seam between cropping and encoding.

use crate::raster::RasterView;
use crate::util::TileGenResult;

pub mod coord;
pub mod crop;

/// Edge length of a square output tile in pixels.
pub const TILE_SIZE: usize = 256;

/// Global coordinate of one output tile at a given zoom level.
///
/// The loose tree labels levels with an absolute zoom number counted down
/// from the caller's maximum; the packed stream labels them with an
/// ascending depth counter. Either way the valid x/y range at a canonical
/// zoom `z` is `[0, 2^z)` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileAddress {
    pub zoom: i32,
    pub x: u32,
    pub y: u32,
}

/// Encoded tile image format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFormat {
    Png,
    Jpeg,
}

impl TileFormat {
    /// File extension used in the loose tree layout.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
        }
    }
}

/// Receives cropped tiles from the pyramid loop.
///
/// Implementations encode the pixels and either write a loose file per
/// tile or append to a packed stream; the cropper itself never encodes.
pub trait TileSink {
    /// Consumes one tile, rows in top-to-bottom order.
    fn write_tile(&mut self, addr: TileAddress, tile: RasterView<'_>) -> TileGenResult<()>;
}

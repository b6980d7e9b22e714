//! Error types for tilegen.

use thiserror::Error;

/// Result alias for tilegen operations.
pub type TileGenResult<T> = std::result::Result<T, TileGenError>;

/// Errors that can occur while generating a tile pyramid.
///
/// Variants are grouped by the process exit code they map to (see
/// [`TileGenError::exit_code`]): I/O and unknown input format, decode
/// failures, shape constraints on the source raster, addressing
/// constraints, and internal buffer/index violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileGenError {
    /// A file or directory operation failed.
    #[error("i/o error: {reason}")]
    Io { reason: String },
    /// The input path has an extension no decoder claims.
    #[error("unknown input format: {path}")]
    UnknownFormat { path: String },
    /// The decoder rejected the input stream.
    #[error("could not decode input: {reason}")]
    Decode { reason: String },
    /// The input has more than 8 bits per channel.
    #[error("unsupported channel depth (more than 8 bits)")]
    UnsupportedDepth,
    /// A raster dimension is not a power of two.
    #[error("raster dimensions {width}x{height} are not powers of two")]
    NotPowerOfTwo { width: usize, height: usize },
    /// The raster must be square for this tool.
    #[error("raster dimensions {width}x{height} are not square")]
    NotSquare { width: usize, height: usize },
    /// Width over height is not a usable integer aspect factor.
    #[error("raster dimensions {width}x{height} have an unusable aspect ratio")]
    BadAspect { width: usize, height: usize },
    /// The input does not carry three color channels.
    #[error("input does not have exactly three channels")]
    WrongChannelCount,
    /// The input carries an alpha channel or a non-RGB color layout.
    #[error("input color layout is not 8-bit RGB")]
    WrongColorType,
    /// The cardinal direction argument was not recognized.
    #[error("unknown cardinal direction {code:?}")]
    UnknownDirection { code: String },
    /// The root tile address lies outside the global grid.
    #[error("root tile ({x}, {y}) is outside the global grid")]
    InvalidRootTile { x: u32, y: u32 },
    /// The raster width does not divide into whole tiles.
    #[error("raster width {width} is not a multiple of the tile size")]
    TileMisaligned { width: usize },
    /// The raster is smaller than a single tile.
    #[error("raster dimensions {width}x{height} are smaller than one tile")]
    TooSmall { width: usize, height: usize },
    /// A buffer was constructed with zero or overflowing dimensions.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A view stride is smaller than the view width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// A backing buffer is too short for the requested view.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A requested sub-rectangle does not fit inside the source view.
    #[error("roi {width}x{height}+{x}+{y} out of bounds for {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A local tile coordinate exceeds the level's grid.
    #[error("tile ({u}, {v}) out of range for a {nr}x{nr} grid")]
    InvalidTileIndex { nr: usize, u: usize, v: usize },
    /// The packed payload outgrew the 32-bit offset space.
    #[error("packed payload position {position} exceeds the 32-bit offset range")]
    PackTooLarge { position: u64 },
}

impl TileGenError {
    /// Stable numeric code reported as the process exit status.
    ///
    /// Codes 2, 3 and 6..=9 mirror the historical tools: unreadable or
    /// unrecognized input, failed decode, and the pixel-shape rejections.
    /// Codes from 10 up cover addressing and layout constraints this
    /// implementation enforces explicitly.
    pub fn exit_code(&self) -> i32 {
        match self {
            TileGenError::Io { .. } | TileGenError::UnknownFormat { .. } => 2,
            TileGenError::Decode { .. } => 3,
            TileGenError::UnsupportedDepth => 6,
            TileGenError::NotPowerOfTwo { .. }
            | TileGenError::NotSquare { .. }
            | TileGenError::BadAspect { .. } => 7,
            TileGenError::WrongChannelCount => 8,
            TileGenError::WrongColorType => 9,
            TileGenError::UnknownDirection { .. } => 10,
            TileGenError::InvalidRootTile { .. } => 11,
            TileGenError::TileMisaligned { .. } | TileGenError::TooSmall { .. } => 12,
            TileGenError::InvalidDimensions { .. }
            | TileGenError::InvalidStride { .. }
            | TileGenError::BufferTooSmall { .. }
            | TileGenError::RoiOutOfBounds { .. }
            | TileGenError::InvalidTileIndex { .. }
            | TileGenError::PackTooLarge { .. } => 13,
        }
    }
}

impl From<std::io::Error> for TileGenError {
    fn from(err: std::io::Error) -> Self {
        TileGenError::Io {
            reason: err.to_string(),
        }
    }
}

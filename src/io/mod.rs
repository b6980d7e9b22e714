//! Raster decoding and tile encoding via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Decoding dispatches on
//! the file extension (`.png`, `.ppm`) and accepts only 8-bit RGB pixels;
//! everything else is rejected before any output is produced. Encoding
//! writes PNG or JPEG tiles either to loose files or into a packed stream.

use crate::raster::{Raster, RasterView};
use crate::tile::TileFormat;
use crate::trace::trace_event;
use crate::util::{TileGenError, TileGenResult};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub mod sink;

/// Fixed quality for JPEG-encoded tiles.
pub const JPEG_QUALITY: u8 = 90;

/// Loads a source raster from disk.
///
/// The extension picks the codec; unsupported extensions fail with
/// `UnknownFormat`. The decoded image must be 8-bit three-channel RGB:
/// 16-bit inputs fail with `UnsupportedDepth`, grayscale with
/// `WrongChannelCount`, alpha or palette layouts with `WrongColorType`.
/// Dimensional constraints are checked by the pyramid driver, not here.
pub fn decode_raster<P: AsRef<Path>>(path: P) -> TileGenResult<Raster> {
    let path = path.as_ref();
    let format = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => ImageFormat::Png,
        Some("ppm") => ImageFormat::Pnm,
        _ => {
            return Err(TileGenError::UnknownFormat {
                path: path.display().to_string(),
            })
        }
    };

    let reader = BufReader::new(File::open(path)?);
    let decoded = image::load(reader, format).map_err(|err| TileGenError::Decode {
        reason: err.to_string(),
    })?;

    let raster = match decoded {
        DynamicImage::ImageRgb8(buf) => {
            let width = buf.width() as usize;
            let height = buf.height() as usize;
            Raster::new(buf.into_raw(), width, height)?
        }
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => {
            return Err(TileGenError::WrongChannelCount)
        }
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgb32F(_)
        | DynamicImage::ImageRgba32F(_) => return Err(TileGenError::UnsupportedDepth),
        _ => return Err(TileGenError::WrongColorType),
    };

    trace_event!(
        "raster_decoded",
        width = raster.width(),
        height = raster.height()
    );
    Ok(raster)
}

/// Encodes one tile into `writer` in the requested format.
///
/// The view may be a strided ROI; rows are gathered into a contiguous
/// buffer before encoding.
pub fn encode_tile_to_stream<W: Write>(
    writer: &mut W,
    tile: RasterView<'_>,
    format: TileFormat,
) -> TileGenResult<()> {
    let owned = tile.to_raster()?;
    let width = owned.width() as u32;
    let height = owned.height() as u32;
    let encode_err = |err: image::ImageError| TileGenError::Io {
        reason: err.to_string(),
    };
    match format {
        TileFormat::Png => PngEncoder::new(writer)
            .write_image(owned.data(), width, height, ExtendedColorType::Rgb8)
            .map_err(encode_err),
        TileFormat::Jpeg => JpegEncoder::new_with_quality(writer, JPEG_QUALITY)
            .write_image(owned.data(), width, height, ExtendedColorType::Rgb8)
            .map_err(encode_err),
    }
}

/// Encodes one tile as a loose file, creating parent directories as
/// needed (idempotently).
pub fn encode_tile_to_file<P: AsRef<Path>>(
    path: P,
    tile: RasterView<'_>,
    format: TileFormat,
) -> TileGenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    encode_tile_to_stream(&mut writer, tile, format)?;
    writer.flush()?;
    Ok(())
}

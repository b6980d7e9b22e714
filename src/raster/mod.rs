//! RGB raster buffers and views.
//!
//! `Raster` owns a contiguous, row-major RGB24 pixel grid decoded from a
//! source image. `RasterView` is a borrowed 2D window into such a grid with
//! an explicit stride counted in pixels, so a stride larger than the width
//! represents a sub-rectangle of a wider parent. ROI slices are zero-copy
//! views into the same backing bytes and retain the original stride; the
//! tile cropper is built entirely on them.

use crate::util::{TileGenError, TileGenResult};

pub mod downsample;

/// Bytes per pixel for the RGB24 layout.
pub const CHANNELS: usize = 3;

/// Owned contiguous RGB24 raster.
#[derive(Debug)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Creates a raster from interleaved RGB bytes of exactly
    /// `width * height * 3` length.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> TileGenResult<Self> {
        if width == 0 || height == 0 {
            return Err(TileGenError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or(TileGenError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(TileGenError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(TileGenError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height; the integer "aspect" factor for valid inputs.
    pub fn aspect(&self) -> usize {
        self.width / self.height.max(1)
    }

    /// Returns the interleaved RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the whole raster.
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// Borrowed 2D RGB view with an explicit stride in pixels.
#[derive(Copy, Clone)]
pub struct RasterView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> RasterView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> TileGenResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> TileGenResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(TileGenError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the view width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the view height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Width over height; the integer "aspect" factor for valid inputs.
    pub fn aspect(&self) -> usize {
        self.width / self.height.max(1)
    }

    /// Returns the backing bytes including any row padding.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the RGB triple at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y.checked_mul(self.stride)?.checked_add(x)?).checked_mul(CHANNELS)?;
        let bytes = self.data.get(idx..idx + CHANNELS)?;
        Some([bytes[0], bytes[1], bytes[2]])
    }

    /// Returns the contiguous bytes of row `y`, `width * 3` long.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?.checked_mul(CHANNELS)?;
        let end = start.checked_add(self.width.checked_mul(CHANNELS)?)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> TileGenResult<RasterView<'a>> {
        if width == 0 || height == 0 {
            return Err(TileGenError::InvalidDimensions { width, height });
        }

        let img_width = self.width;
        let img_height = self.height;
        let oob = || TileGenError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width,
            img_height,
        };
        if x >= img_width || y >= img_height {
            return Err(oob());
        }
        let end_x = x.checked_add(width).ok_or_else(oob)?;
        let end_y = y.checked_add(height).ok_or_else(oob)?;
        if end_x > img_width || end_y > img_height {
            return Err(oob());
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or(TileGenError::InvalidDimensions {
                width: img_width,
                height: img_height,
            })?;
        let data = self.data.get(start..).ok_or(TileGenError::BufferTooSmall {
            needed: start.saturating_add(1),
            got: self.data.len(),
        })?;

        RasterView::new(data, width, height, self.stride)
    }

    /// Copies the viewed rows into an owned contiguous raster.
    pub fn to_raster(&self) -> TileGenResult<Raster> {
        let mut data = Vec::with_capacity(self.width * self.height * CHANNELS);
        for y in 0..self.height {
            let row = self.row(y).ok_or(TileGenError::BufferTooSmall {
                needed: (y + 1) * self.stride * CHANNELS,
                got: self.data.len(),
            })?;
            data.extend_from_slice(row);
        }
        Raster::new(data, self.width, self.height)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> TileGenResult<usize> {
    if width == 0 || height == 0 {
        return Err(TileGenError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(TileGenError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(TileGenError::InvalidDimensions { width, height })?;
    Ok(needed)
}

//! I/O helpers for edge rasters and JSON.
//!
//! - `load_raw_rgb`: read a headerless 3-bytes-per-pixel file, keeping the
//!   first byte of every triplet.
//! - `load_raw_rgb_color`: same layout, keeping all three channels.
//! - `load_grayscale_image`: decode a PNG/JPEG/etc. into an owned 8-bit buffer.
//! - `save_grayscale_u8` / `save_raw_rgb`: write an owned 8-bit buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageView, ImageViewMut, PixelGrid};
use crate::error::{Result, VectorizeError};
use image::{DynamicImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit raster with borrowed [`PixelGrid`] conversion.
#[derive(Clone, Debug)]
pub struct RasterU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl RasterU8 {
    /// Construct an owned raster given raw bytes (`data.len() == width * height`).
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            stride: width,
            data,
        }
    }

    /// Copy a borrowed grid into an owned raster.
    pub fn from_grid(grid: &PixelGrid<'_>) -> Self {
        let mut data = Vec::with_capacity(grid.w * grid.h);
        for row in grid.rows() {
            data.extend_from_slice(row);
        }
        Self::new(grid.w, grid.h, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only `PixelGrid` view
    pub fn as_grid(&self) -> PixelGrid<'_> {
        PixelGrid {
            w: self.width,
            h: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }
}

impl ImageView for RasterU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl ImageViewMut for RasterU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.width;
        &mut self.data[start..end]
    }
}

/// Interleaved 3-channel raster, as stored in raw RGB files.
#[derive(Clone, Debug)]
pub struct RgbRaster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbRaster {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Read a raw RGB file and keep only the first byte of each pixel triplet.
pub fn load_raw_rgb(path: &Path, width: usize, height: usize) -> Result<RasterU8> {
    let color = load_raw_rgb_color(path, width, height)?;
    let data = color.data.chunks_exact(3).map(|px| px[0]).collect();
    Ok(RasterU8::new(width, height, data))
}

/// Read a raw RGB file keeping all three bytes per pixel.
pub fn load_raw_rgb_color(path: &Path, width: usize, height: usize) -> Result<RgbRaster> {
    let mut bytes = fs::read(path)?;
    let row_len = width * 3;
    let expected = row_len * height;
    if bytes.len() < expected {
        let row = bytes.len() / row_len.max(1);
        return Err(VectorizeError::RasterSize {
            path: path.display().to_string(),
            row,
            read: bytes.len() - row * row_len,
            expected: row_len,
        });
    }
    bytes.truncate(expected);
    Ok(RgbRaster {
        width,
        height,
        data: bytes,
    })
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<RasterU8> {
    let img = image::open(path)?.into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(RasterU8::new(width, height, data))
}

/// Save an 8-bit buffer to any format `image` infers from the extension.
pub fn save_grayscale_u8(buffer: &RasterU8, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let image: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width as u32, buffer.height as u32, buffer.data.clone())
            .ok_or_else(|| {
                VectorizeError::Config(format!(
                    "buffer does not fit {}x{} image",
                    buffer.width, buffer.height
                ))
            })?;
    DynamicImage::ImageLuma8(image).save(path)?;
    Ok(())
}

/// Save an 8-bit buffer as raw RGB with the byte replicated into all channels.
pub fn save_raw_rgb(buffer: &RasterU8, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = Vec::with_capacity(buffer.data.len() * 3);
    for row in buffer.rows() {
        for &v in row {
            out.extend_from_slice(&[v, v, v]);
        }
    }
    fs::write(path, out)?;
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

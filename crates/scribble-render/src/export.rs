//! Bitmap export for classification.
//!
//! A surface snapshot is resampled into a fixed [`EXPORT_SIZE`] square,
//! collapsed to grayscale with an unweighted channel mean, and serialized as
//! a PNG data URI.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use scribble_core::predict::DataUri;
use thiserror::Error;

/// Width and height of every exported bitmap.
pub const EXPORT_SIZE: u32 = 28;

/// Export errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Cannot export an empty surface")]
    EmptySurface,
    #[error("PNG encoding failed: {0}")]
    Png(String),
}

/// Result type for export operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Copy of a surface's pixels in premultiplied RGBA8.
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    image: RgbaImage,
}

impl SurfaceSnapshot {
    /// Wrap premultiplied RGBA8 data. Returns `None` if the buffer length does
    /// not match the dimensions.
    pub fn from_premultiplied(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(|image| Self { image })
    }

    /// A fully transparent snapshot.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Fixed-size off-screen buffer holding straight-alpha RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct ExportBuffer {
    image: RgbaImage,
}

impl ExportBuffer {
    /// Resample a snapshot into a new `EXPORT_SIZE` x `EXPORT_SIZE` buffer.
    ///
    /// Filtering runs on premultiplied pixels so transparent areas do not
    /// bleed color into stroke edges.
    pub fn from_snapshot(snapshot: &SurfaceSnapshot) -> EncodeResult<Self> {
        let (width, height) = snapshot.dimensions();
        if width == 0 || height == 0 {
            return Err(EncodeError::EmptySurface);
        }

        let mut image = imageops::resize(&snapshot.image, EXPORT_SIZE, EXPORT_SIZE, FilterType::Triangle);
        for pixel in image.pixels_mut() {
            *pixel = Rgba(demultiply(pixel.0));
        }

        log::debug!("Resampled {}x{} surface to {}x{}", width, height, EXPORT_SIZE, EXPORT_SIZE);
        Ok(Self { image })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Straight-alpha RGBA of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Replace red, green and blue of every pixel with their mean.
    pub fn collapse_luminance(&mut self) {
        for pixel in self.image.pixels_mut() {
            pixel.0 = collapse_pixel(pixel.0);
        }
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn to_png(&self) -> EncodeResult<Vec<u8>> {
        let (width, height) = self.image.dimensions();
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| EncodeError::Png(e.to_string()))?;
            writer
                .write_image_data(self.image.as_raw())
                .map_err(|e| EncodeError::Png(e.to_string()))?;
        }
        Ok(png_data)
    }

    /// Encode as a `data:image/png;base64,...` URI.
    pub fn to_data_uri(&self) -> EncodeResult<DataUri> {
        Ok(DataUri::png(self.to_png()?))
    }
}

/// Run the raster half of the export: resample, collapse to gray, encode.
pub fn export_data_uri(snapshot: &SurfaceSnapshot) -> EncodeResult<DataUri> {
    let mut buffer = ExportBuffer::from_snapshot(snapshot)?;
    buffer.collapse_luminance();
    buffer.to_data_uri()
}

/// Gray out one straight-alpha pixel. Alpha is kept.
///
/// The mean is rounded to nearest, the way a canvas stores a fractional
/// channel value. A sum of three bytes divided by three never lands on a
/// half, so there is no tie to break.
pub fn collapse_pixel([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let avg = ((r as u16 + g as u16 + b as u16 + 1) / 3) as u8;
    [avg, avg, avg, a]
}

fn demultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0, 0, 0, 0],
        255 => [r, g, b, a],
        _ => {
            let alpha = a as u32;
            let channel = |c: u8| ((c as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
            [channel(r), channel(g), channel(b), a]
        }
    }
}

//! Turns an uploaded data URI into model input.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};
use scribble_core::{DataUri, DataUriError};
use thiserror::Error;

/// Side length of the model input.
pub const INPUT_SIZE: u32 = 28;

/// Number of values in one model input.
pub const INPUT_LEN: usize = (INPUT_SIZE * INPUT_SIZE) as usize;

/// Preprocessing errors.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Invalid image payload: {0}")]
    Payload(#[from] DataUriError),
    #[error("Cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode, convert to 8-bit luma, resize to `INPUT_SIZE` square and scale to
/// `[0, 1]`, row-major.
pub fn preprocess(image_uri: &str) -> Result<Vec<f32>, PreprocessError> {
    let payload = DataUri::parse(image_uri)?;
    let decoded = image::load_from_memory(payload.data())?;
    let gray = to_luma(&decoded.to_rgba8());
    let resized = imageops::resize(&gray, INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);
    Ok(resized.pixels().map(|p| p.0[0] as f32 / 255.0).collect())
}

/// ITU-R 601-2 luma, ignoring alpha.
pub fn luma([r, g, b, _]: [u8; 4]) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

fn to_luma(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luma(image.get_pixel(x, y).0)])
    })
}

use crate::error::Result;
use crate::state::SourceImage;
use slint::{Image, Rgb8Pixel, SharedPixelBuffer};
use std::path::Path;

/// Reads and decodes the chosen file. Blocking; run on a rayon worker.
///
/// Returns the raw file bytes (what gets uploaded) alongside the decoded
/// preview, so the file is read exactly once.
pub fn load_source_blocking(path: &Path) -> Result<(Vec<u8>, SourceImage)> {
    let bytes = std::fs::read(path)?;
    let decoded = image::load_from_memory(&bytes)?;
    let rgb = decoded.to_rgb8();
    let source = SourceImage {
        width: rgb.width(),
        height: rgb.height(),
        data: rgb.into_raw(),
    };
    Ok((bytes, source))
}

/// Converts RGB8 pixel data into a `slint::Image`.
pub fn create_slint_image(data: &[u8], width: u32, height: u32) -> Image {
    let buffer = SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(data, width, height);
    Image::from_rgb8(buffer)
}

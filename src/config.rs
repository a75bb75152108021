//! Application configuration constants.

/// Supported image file extensions for file-drop filtering.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Segmentation API endpoint. Fixed at build time; override with the
/// `SEGMENT_ENDPOINT` environment variable when compiling.
pub const SEGMENT_ENDPOINT: &str = match option_env!("SEGMENT_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "http://127.0.0.1:5000/segment",
};

/// Opacity applied to the mask overlay until the user adjusts the slider.
pub const DEFAULT_MASK_OPACITY: f32 = 0.6;

/// Granularity of the opacity slider; values are quantized to this step.
pub const MASK_OPACITY_STEP: f32 = 0.05;

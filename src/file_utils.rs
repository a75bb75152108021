use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use std::path::Path;

/// Returns true when the path has a supported image extension.
/// Used to filter window file-drop events; the file dialog filters itself.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

//! Helpers that push session state into the Slint `ViewState` global.
//!
//! Grouped setters so every handler updates the panels the same way; no
//! handler touches individual properties directly.

use crate::config::DEFAULT_MASK_OPACITY;
use log::error;
use slint::ComponentHandle;

/// Puts the panels into the in-flight state for a fresh selection:
/// loading on, prior mask/error gone, overlay controls back to defaults.
pub fn show_loading(ui: &crate::AppWindow) {
    let view = ui.global::<crate::ViewState>();
    view.set_loading(true);
    view.set_image_loaded(false);
    view.set_mask_loaded(false);
    view.set_error_message("".into());
    view.set_overlay_visible(true);
    view.set_mask_opacity(DEFAULT_MASK_OPACITY);
}

/// Displays the decoded upload in the original-image panel.
pub fn show_source(ui: &crate::AppWindow, image: slint::Image) {
    let view = ui.global::<crate::ViewState>();
    view.set_source_image(image);
    view.set_image_loaded(true);
}

/// Displays the returned mask in the binary-segmentation panel and ends the
/// loading state. The overlay panel updates separately once compositing
/// finishes.
pub fn show_mask(ui: &crate::AppWindow, mask: slint::Image) {
    let view = ui.global::<crate::ViewState>();
    view.set_mask_image(mask);
    view.set_mask_loaded(true);
    view.set_loading(false);
}

/// Installs a freshly composited overlay image.
pub fn set_overlay(ui: &crate::AppWindow, overlay: slint::Image) {
    ui.global::<crate::ViewState>().set_overlay_image(overlay);
}

pub fn set_overlay_visible(ui: &crate::AppWindow, visible: bool) {
    ui.global::<crate::ViewState>().set_overlay_visible(visible);
}

pub fn set_mask_opacity(ui: &crate::AppWindow, opacity: f32) {
    ui.global::<crate::ViewState>().set_mask_opacity(opacity);
}

/// Logs and displays a failure; the dismiss button clears it again.
pub fn show_error(ui: &crate::AppWindow, message: &str) {
    error!("{}", message);
    let view = ui.global::<crate::ViewState>();
    view.set_loading(false);
    view.set_error_message(message.into());
}

pub fn clear_error(ui: &crate::AppWindow) {
    ui.global::<crate::ViewState>().set_error_message("".into());
}

/// Returns every panel and control to the empty Idle state.
pub fn reset(ui: &crate::AppWindow) {
    let view = ui.global::<crate::ViewState>();
    view.set_loading(false);
    view.set_image_loaded(false);
    view.set_mask_loaded(false);
    view.set_error_message("".into());
    view.set_overlay_visible(true);
    view.set_mask_opacity(DEFAULT_MASK_OPACITY);
    view.set_source_image(slint::Image::default());
    view.set_mask_image(slint::Image::default());
    view.set_overlay_image(slint::Image::default());
}

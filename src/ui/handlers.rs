//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (select_image, clear_session, toggle_overlay,
//! opacity_edited, dismiss_error) using the appropriate threading model for
//! each operation type.

use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use crate::segmentation::SegmentationClient;
use crate::state::AppState;
use crate::ui::{pipeline, view};
use log::debug;
use rfd::AsyncFileDialog;
use slint::ComponentHandle;

/// Sets up all UI event handlers for the application.
pub fn setup_handlers(ui: &crate::AppWindow, app_state: &AppState, client: &SegmentationClient) {
    // Image selection handler
    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    ui.global::<crate::Logic>().on_select_image({
        let ui_handle = ui.as_weak();
        let session = app_state.session.clone();
        let client = client.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let session = session.clone();
            let client = client.clone();
            let _ = slint::spawn_local(async move {
                let picked = AsyncFileDialog::new()
                    .add_filter("Images", &SUPPORTED_IMAGE_EXTENSIONS)
                    .pick_file()
                    .await;

                // A cancelled dialog is an empty selection: no-op, no error.
                let Some(file_handle) = picked else {
                    debug!("File dialog cancelled");
                    return;
                };

                pipeline::process_image(
                    ui_handle,
                    session,
                    client,
                    file_handle.path().to_path_buf(),
                );
            });
        }
    });

    // Clear handler: back to Idle, controls to defaults. Bumping the
    // generation inside clear() orphans any request still in flight.
    ui.global::<crate::Logic>().on_clear_session({
        let ui_handle = ui.as_weak();
        let session = app_state.session.clone();
        move || {
            session.lock().unwrap().clear();
            if let Some(ui) = ui_handle.upgrade() {
                view::reset(&ui);
            }
        }
    });

    // Overlay visibility toggle. No recompute: the overlay panel falls back
    // to the bare source image while hidden.
    ui.global::<crate::Logic>().on_toggle_overlay({
        let ui_handle = ui.as_weak();
        let session = app_state.session.clone();
        move || {
            let visible = session.lock().unwrap().toggle_overlay();
            if let Some(ui) = ui_handle.upgrade() {
                view::set_overlay_visible(&ui, visible);
            }
        }
    });

    // Opacity slider. The session clamps and quantizes; the applied value is
    // written back so the readout always shows what is actually rendered.
    ui.global::<crate::Logic>().on_opacity_edited({
        let ui_handle = ui.as_weak();
        let session = app_state.session.clone();
        move |value| {
            let applied = session.lock().unwrap().set_opacity(value);
            if let Some(ui) = ui_handle.upgrade() {
                view::set_mask_opacity(&ui, applied);
            }
            pipeline::refresh_overlay(ui_handle.clone(), session.clone());
        }
    });

    // Error dismissal clears the message only; the phase is unchanged.
    ui.global::<crate::Logic>().on_dismiss_error({
        let ui_handle = ui.as_weak();
        let session = app_state.session.clone();
        move || {
            session.lock().unwrap().dismiss_error();
            if let Some(ui) = ui_handle.upgrade() {
                view::clear_error(&ui);
            }
        }
    });
}

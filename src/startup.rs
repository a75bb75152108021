use i_slint_backend_winit::WinitWindowAccessor;
use i_slint_backend_winit::{EventResult, winit::event::WindowEvent};
use log::warn;
use slint::ComponentHandle;
use std::path::PathBuf;

use crate::segmentation::SegmentationClient;
use crate::state::AppState;
use crate::ui::pipeline;

/// First non-flag CLI argument with a supported image extension, if any.
fn startup_image_from_args() -> Option<PathBuf> {
    std::env::args_os()
        .skip(1)
        .filter_map(|arg| {
            let arg_str = arg.to_string_lossy();
            if arg_str.starts_with('-') {
                None
            } else {
                Some(PathBuf::from(arg))
            }
        })
        .find(|path| crate::file_utils::is_supported_image(path))
}

/// Hooks window file drops into the pipeline and opens an image passed on the
/// command line, if one was given.
pub fn configure_startup_opening(
    app: &crate::AppWindow,
    app_state: &AppState,
    client: &SegmentationClient,
) {
    let ui_handle = app.as_weak();
    let session = app_state.session.clone();
    let drop_client = client.clone();

    app.window().on_winit_window_event(move |_window, event| {
        if let WindowEvent::DroppedFile(path) = event {
            if crate::file_utils::is_supported_image(path) {
                pipeline::process_image(
                    ui_handle.clone(),
                    session.clone(),
                    drop_client.clone(),
                    path.clone(),
                );
            } else {
                warn!("Ignoring dropped file without an image extension: {:?}", path);
            }
        }
        EventResult::Propagate
    });

    if let Some(path) = startup_image_from_args() {
        pipeline::process_image(
            app.as_weak(),
            app_state.session.clone(),
            client.clone(),
            path,
        );
    }
}

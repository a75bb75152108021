//! The upload-to-render pipeline.
//!
//! `process_image` is the single entry point for both the file dialog and
//! window file drops. It decodes the file on a rayon worker, shows the
//! preview as soon as decoding finishes, then runs the segmentation request
//! via `slint::spawn_local` (wrapped in `async_compat::Compat`, since reqwest
//! needs a tokio reactor). Each stage re-checks the selection generation
//! before touching state, so a superseded selection's results are dropped no
//! matter when they arrive.

use crate::segmentation::SegmentationClient;
use crate::state::SessionState;
use crate::ui::view;
use crate::{image_loader, overlay};
use async_compat::Compat;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Starts a new selection: resets prior mask/error, shows the loading state,
/// decodes the file and issues the segmentation request.
pub fn process_image(
    ui: slint::Weak<crate::AppWindow>,
    session: Arc<Mutex<SessionState>>,
    client: SegmentationClient,
    path: PathBuf,
) {
    let generation = session.lock().unwrap().begin_selection();

    if let Some(ui) = ui.upgrade() {
        view::show_loading(&ui);
    }

    // Decode on a worker thread, then hop back to the event loop.
    rayon::spawn(move || {
        let result = image_loader::load_source_blocking(&path);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui_strong) = ui.upgrade() else { return };

            match result {
                Ok((bytes, source)) => {
                    let source = Arc::new(source);
                    // Superseded while decoding: drop everything silently.
                    if !session.lock().unwrap().set_source(generation, source.clone()) {
                        return;
                    }

                    view::show_source(
                        &ui_strong,
                        image_loader::create_slint_image(&source.data, source.width, source.height),
                    );

                    request_mask(ui, session, client, generation, file_name, bytes);
                }
                Err(e) => {
                    let message = e.to_string();
                    if session.lock().unwrap().fail(generation, message.clone()) {
                        view::show_error(&ui_strong, &message);
                    }
                }
            }
        });
    });
}

/// Issues the POST for one selection and applies the outcome, unless the
/// selection was superseded while the request was in flight.
fn request_mask(
    ui: slint::Weak<crate::AppWindow>,
    session: Arc<Mutex<SessionState>>,
    client: SegmentationClient,
    generation: u64,
    file_name: String,
    bytes: Vec<u8>,
) {
    let _ = slint::spawn_local(Compat::new(async move {
        let result = client.segment(file_name, bytes).await;

        // spawn_local resumes on the event loop, so UI access is safe here.
        let Some(ui_strong) = ui.upgrade() else { return };

        match result {
            Ok(mask) => {
                let mask = Arc::new(mask);
                if !session.lock().unwrap().complete(generation, mask.clone()) {
                    return;
                }

                let panel = overlay::mask_panel_pixels(&mask);
                view::show_mask(
                    &ui_strong,
                    image_loader::create_slint_image(&panel, mask.width, mask.height),
                );

                refresh_overlay(ui, session);
            }
            Err(e) => {
                let message = e.to_string();
                if session.lock().unwrap().fail(generation, message.clone()) {
                    view::show_error(&ui_strong, &message);
                }
            }
        }
    }));
}

/// Recomposites the overlay panel from the current source/mask pair.
///
/// The composite runs on a rayon worker tagged with a render sequence number
/// and the selection generation; the finished image is installed only when
/// both still match, so out-of-order slider events or a new selection cannot
/// leave a stale composite on screen.
pub fn refresh_overlay(ui: slint::Weak<crate::AppWindow>, session: Arc<Mutex<SessionState>>) {
    let (source, mask, opacity, generation, seq) = {
        let mut session = session.lock().unwrap();
        let (Some(source), Some(mask)) = (session.source(), session.mask()) else {
            return;
        };
        (
            source,
            mask,
            session.opacity(),
            session.generation(),
            session.next_render(),
        )
    };

    let session_handle = session;
    rayon::spawn(move || {
        let pixels = overlay::compose(&source, &mask, opacity);
        let (width, height) = (source.width, source.height);

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui.upgrade() else { return };
            {
                let session = session_handle.lock().unwrap();
                if !session.is_current(generation) || !session.is_latest_render(seq) {
                    return;
                }
            }
            view::set_overlay(&ui, image_loader::create_slint_image(&pixels, width, height));
        });
    });
}

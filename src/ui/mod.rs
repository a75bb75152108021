//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: UI-bound async work (file dialog, the HTTP request
//!   via `async_compat::Compat`)
//! - `rayon::spawn`: CPU-heavy work (image decoding, overlay compositing)
//! - `slint::invoke_from_event_loop`: returning results from rayon workers to
//!   the UI thread

pub mod handlers;
pub mod pipeline;
mod view;

pub use handlers::setup_handlers;

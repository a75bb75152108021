//! State management for the segmentation viewer.

use std::sync::{Arc, Mutex};

pub mod session;

pub use session::{MaskResult, Phase, SessionState, SourceImage};

/// Application-wide state container.
pub struct AppState {
    pub session: Arc<Mutex<SessionState>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(SessionState::new())),
        }
    }
}

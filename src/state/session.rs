//! Session state for the upload-to-render pipeline.
//!
//! A single [`SessionState`] owns everything the panels render from: the
//! decoded upload, the mask returned by the API, the overlay controls and the
//! error message. Every mutation goes through a transition method so the
//! phase diagram (Idle → Loading → Ready/Failed) stays in one place.
//!
//! Responses and composite jobs are correlated to the selection that issued
//! them with a generation counter. A result is applied only when its
//! generation still matches; anything else is a stale response and is
//! dropped. "Last resolved wins" is not good enough here because a slow
//! request for an old selection can finish after the request for a newer one.

use crate::config::{DEFAULT_MASK_OPACITY, MASK_OPACITY_STEP};
use log::debug;
use std::sync::Arc;

/// Decoded RGB8 pixels of the uploaded photograph.
pub struct SourceImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decoded Luma8 pixels of the mask returned by the segmentation API.
/// Valid only for the selection generation that issued the request.
#[derive(Debug)]
pub struct MaskResult {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image chosen
    Idle,
    /// Image chosen, request in flight
    Loading,
    /// Mask present
    Ready,
    /// Error present; the original image may still display
    Failed,
}

/// Render state and its transition rules.
pub struct SessionState {
    phase: Phase,
    /// Bumped on every selection and on clear. Orphans in-flight work.
    generation: u64,
    /// Bumped per composite job so out-of-order slider events cannot
    /// leave a stale overlay on screen.
    render_seq: u64,
    source: Option<Arc<SourceImage>>,
    mask: Option<Arc<MaskResult>>,
    error: Option<String>,
    opacity: f32,
    overlay_visible: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            render_seq: 0,
            source: None,
            mask: None,
            error: None,
            opacity: DEFAULT_MASK_OPACITY,
            overlay_visible: true,
        }
    }

    /// Starts a new selection: drops the prior image, mask and error, resets
    /// the overlay controls and enters Loading. Returns the generation that
    /// all results of this selection must carry.
    pub fn begin_selection(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.source = None;
        self.mask = None;
        self.error = None;
        self.opacity = DEFAULT_MASK_OPACITY;
        self.overlay_visible = true;
        debug!("Selection started, generation {}", self.generation);
        self.generation
    }

    /// True when `generation` identifies the currently active selection.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// The currently active selection generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Installs the decoded upload for the given selection.
    /// Returns false (and changes nothing) when the selection was superseded.
    pub fn set_source(&mut self, generation: u64, source: Arc<SourceImage>) -> bool {
        if !self.is_current(generation) {
            debug!(
                "Dropping decoded image for superseded generation {} (current {})",
                generation, self.generation
            );
            return false;
        }
        self.source = Some(source);
        true
    }

    /// Applies a successful mask result. Stale results are dropped.
    pub fn complete(&mut self, generation: u64, mask: Arc<MaskResult>) -> bool {
        if !self.is_current(generation) {
            debug!(
                "Dropping stale mask for generation {} (current {})",
                generation, self.generation
            );
            return false;
        }
        self.phase = Phase::Ready;
        self.mask = Some(mask);
        self.error = None;
        true
    }

    /// Applies a failure. Stale failures are dropped. The source image is
    /// kept so the upload panel can keep displaying it.
    pub fn fail(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current(generation) {
            debug!(
                "Dropping stale error for generation {} (current {}): {}",
                generation, self.generation, message
            );
            return false;
        }
        self.phase = Phase::Failed;
        self.mask = None;
        self.error = Some(message);
        true
    }

    /// Returns to Idle, dropping the image, mask and error and resetting the
    /// overlay controls. Bumps the generation so any request still in flight
    /// can never resurrect the cleared state.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.source = None;
        self.mask = None;
        self.error = None;
        self.opacity = DEFAULT_MASK_OPACITY;
        self.overlay_visible = true;
    }

    /// Clears the error message without leaving Failed.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Clamps to [0, 1], quantizes to the slider step and stores the result.
    /// Returns the value actually applied.
    pub fn set_opacity(&mut self, value: f32) -> f32 {
        let stepped = (value / MASK_OPACITY_STEP).round() * MASK_OPACITY_STEP;
        self.opacity = stepped.clamp(0.0, 1.0);
        self.opacity
    }

    /// Flips overlay visibility and returns the new value. Opacity is
    /// untouched; the two controls are independent.
    pub fn toggle_overlay(&mut self) -> bool {
        self.overlay_visible = !self.overlay_visible;
        self.overlay_visible
    }

    /// Reserves a render sequence number for a composite job.
    pub fn next_render(&mut self) -> u64 {
        self.render_seq += 1;
        self.render_seq
    }

    /// True when `seq` is the most recently reserved composite job.
    pub fn is_latest_render(&self, seq: u64) -> bool {
        self.render_seq == seq
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source(&self) -> Option<Arc<SourceImage>> {
        self.source.clone()
    }

    pub fn mask(&self) -> Option<Arc<MaskResult>> {
        self.mask.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(w: u32, h: u32) -> Arc<SourceImage> {
        Arc::new(SourceImage {
            data: vec![128; (w * h * 3) as usize],
            width: w,
            height: h,
        })
    }

    fn mask(w: u32, h: u32) -> Arc<MaskResult> {
        Arc::new(MaskResult {
            data: vec![255; (w * h) as usize],
            width: w,
            height: h,
        })
    }

    #[test]
    fn selection_clears_prior_mask_and_error() {
        let mut session = SessionState::new();
        let r#gen = session.begin_selection();
        assert!(session.set_source(r#gen, source(2, 2)));
        assert!(session.fail(r#gen, "Server responded 500".to_string()));
        assert_eq!(session.phase(), Phase::Failed);

        let gen2 = session.begin_selection();
        assert!(gen2 > r#gen);
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.mask().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn successful_completion_enters_ready() {
        let mut session = SessionState::new();
        let r#gen = session.begin_selection();
        session.set_source(r#gen, source(2, 2));
        assert!(session.complete(r#gen, mask(2, 2)));
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.mask().is_some());
        assert!(session.error().is_none());
    }

    #[test]
    fn failure_enters_failed_and_keeps_source() {
        let mut session = SessionState::new();
        let r#gen = session.begin_selection();
        session.set_source(r#gen, source(2, 2));
        assert!(session.fail(r#gen, "Mask not returned by API".to_string()));
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.mask().is_none());
        assert!(session.source().is_some());
        assert_eq!(session.error(), Some("Mask not returned by API"));
    }

    #[test]
    fn stale_success_is_ignored_after_new_selection() {
        let mut session = SessionState::new();
        let gen_a = session.begin_selection();
        // B supersedes A while A's request is still in flight.
        let gen_b = session.begin_selection();
        session.set_source(gen_b, source(4, 4));

        // A resolves after B: its mask must not be applied.
        assert!(!session.complete(gen_a, mask(2, 2)));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.mask().is_none());

        // B's own result still lands.
        assert!(session.complete(gen_b, mask(4, 4)));
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.mask().unwrap().width, 4);
    }

    #[test]
    fn stale_failure_is_ignored_after_new_selection() {
        let mut session = SessionState::new();
        let gen_a = session.begin_selection();
        let gen_b = session.begin_selection();

        assert!(!session.fail(gen_a, "Server responded 500".to_string()));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.error().is_none());

        assert!(session.complete(gen_b, mask(2, 2)));
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn stale_source_is_ignored() {
        let mut session = SessionState::new();
        let gen_a = session.begin_selection();
        let gen_b = session.begin_selection();

        assert!(!session.set_source(gen_a, source(2, 2)));
        assert!(session.source().is_none());
        assert!(session.set_source(gen_b, source(4, 4)));
        assert_eq!(session.source().unwrap().width, 4);
    }

    #[test]
    fn clear_resets_controls_from_every_phase() {
        let mut session = SessionState::new();

        // From Ready, with controls moved off their defaults.
        let r#gen = session.begin_selection();
        session.set_source(r#gen, source(2, 2));
        session.complete(r#gen, mask(2, 2));
        session.set_opacity(0.15);
        session.toggle_overlay();
        session.clear();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.source().is_none());
        assert!(session.mask().is_none());
        assert!((session.opacity() - crate::config::DEFAULT_MASK_OPACITY).abs() < 1e-6);
        assert!(session.overlay_visible());

        // From Failed.
        let r#gen = session.begin_selection();
        session.fail(r#gen, "Server responded 502".to_string());
        session.clear();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.error().is_none());

        // From Loading.
        session.begin_selection();
        session.clear();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn clear_orphans_in_flight_request() {
        let mut session = SessionState::new();
        let r#gen = session.begin_selection();
        session.clear();

        assert!(!session.complete(r#gen, mask(2, 2)));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.mask().is_none());
    }

    #[test]
    fn new_selection_resets_overlay_controls() {
        let mut session = SessionState::new();
        let r#gen = session.begin_selection();
        session.complete(r#gen, mask(2, 2));
        session.set_opacity(0.9);
        session.toggle_overlay();

        session.begin_selection();
        assert!((session.opacity() - crate::config::DEFAULT_MASK_OPACITY).abs() < 1e-6);
        assert!(session.overlay_visible());
    }

    #[test]
    fn opacity_is_clamped_and_quantized() {
        let mut session = SessionState::new();
        assert_eq!(session.set_opacity(-0.3), 0.0);
        assert_eq!(session.set_opacity(1.7), 1.0);
        // 0.33 snaps to the nearest 0.05 step.
        assert!((session.set_opacity(0.33) - 0.35).abs() < 1e-6);
        assert!((session.set_opacity(0.62) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn toggle_preserves_opacity() {
        let mut session = SessionState::new();
        session.set_opacity(0.25);
        assert!(!session.toggle_overlay());
        assert!((session.opacity() - 0.25).abs() < 1e-6);
        assert!(session.toggle_overlay());
        assert!((session.opacity() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn dismissing_error_stays_failed() {
        let mut session = SessionState::new();
        let r#gen = session.begin_selection();
        session.fail(r#gen, "Server responded 500".to_string());
        session.dismiss_error();
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.error().is_none());
    }

    #[test]
    fn render_sequence_identifies_latest_composite() {
        let mut session = SessionState::new();
        let first = session.next_render();
        let second = session.next_render();
        assert!(!session.is_latest_render(first));
        assert!(session.is_latest_render(second));
    }
}

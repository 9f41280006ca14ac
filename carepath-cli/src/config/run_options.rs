//! Optional overrides for one run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use std::path::PathBuf;

use carepath::{ConsultState, GeoPoint, MediaHandle};

/// Inputs and overrides for a run. All fields are optional; only set fields override the
/// base config.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Recorded question to transcribe.
    pub audio: Option<PathBuf>,
    /// Photo for the symptom branch.
    pub image: Option<PathBuf>,
    /// Caller location, required by the hospital workflow.
    pub location: Option<GeoPoint>,
    /// Run the hospital lookup instead of the consultation.
    pub hospitals: bool,
    /// Use mocks only; no keys needed.
    pub offline: bool,
    /// Override the knowledge database path.
    pub knowledge_db: Option<PathBuf>,
    /// Log node enter/exit.
    pub verbose: bool,
}

impl RunOptions {
    /// Initial state for `query` plus the media and location in these options.
    pub fn request(&self, query: &str) -> ConsultState {
        let mut state = ConsultState::from_text(query);
        state.audio_input = self.audio.clone().map(MediaHandle::from);
        state.image_input = self.image.clone().map(MediaHandle::from);
        state.location = self.location;
        state
    }
}

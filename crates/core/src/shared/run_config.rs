use std::path::PathBuf;

use super::constants::{DEFAULT_MIN_CONFIDENCE, DISPLAY_WIDTH};

/// Which frame source drives a run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunMode {
    /// Continuous camera stream with on-screen display.
    Live,
    /// Single still image; the annotated result is saved next to the caller.
    File(PathBuf),
}

/// Resolved once at startup; immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub mode: RunMode,
    pub blur_faces: bool,
}

impl RunConfig {
    pub fn pipeline_options(&self, min_confidence: f32) -> PipelineOptions {
        PipelineOptions {
            min_confidence,
            blur_faces: self.blur_faces,
            ..PipelineOptions::default()
        }
    }
}

/// Knobs of the per-frame pipeline shared by both run modes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineOptions {
    pub display_width: u32,
    pub min_confidence: f32,
    pub blur_faces: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            blur_faces: false,
        }
    }
}

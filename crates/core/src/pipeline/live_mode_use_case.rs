use std::time::{Duration, Instant};

use crate::display::domain::frame_display::FrameDisplay;
use crate::shared::constants::{CAMERA_WARMUP, WINDOW_TITLE};
use crate::video::domain::frame_source::FrameSource;

use super::frame_processor::FrameProcessor;
use super::pipeline_error::PipelineError;
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use super::stop_condition::{StopCondition, StopReason};

/// Lifecycle of a live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// How a live session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveSummary {
    pub frames: usize,
    pub reason: StopReason,
}

/// Camera pipeline: read → process → show, until the stop condition fires.
pub struct LiveModeUseCase {
    source: Box<dyn FrameSource>,
    display: Box<dyn FrameDisplay>,
    processor: FrameProcessor,
    stop: StopCondition,
    warmup: Duration,
    logger: Box<dyn PipelineLogger>,
}

impl LiveModeUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        display: Box<dyn FrameDisplay>,
        processor: FrameProcessor,
        stop: StopCondition,
    ) -> Self {
        Self {
            source,
            display,
            processor,
            stop,
            warmup: CAMERA_WARMUP,
            logger: Box::new(NullPipelineLogger),
        }
    }

    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Runs until an exit key, window close, interrupt or camera failure.
    ///
    /// Display and camera are released on every return path, errors included.
    pub fn execute(&mut self) -> Result<LiveSummary, PipelineError> {
        let Self {
            source,
            display,
            processor,
            stop,
            warmup,
            logger,
        } = self;

        let mut state = LiveState::Starting;
        log::debug!("Live mode: {state:?}");
        let mut session = LiveSession {
            source: source.as_mut(),
            display: display.as_mut(),
        };
        session.source.start().map_err(PipelineError::Source)?;
        std::thread::sleep(*warmup);
        session
            .display
            .open(WINDOW_TITLE)
            .map_err(PipelineError::Display)?;

        transition(&mut state, LiveState::Running);
        let mut frames = 0;
        let reason = loop {
            let t = Instant::now();
            let frame = match session.source.read() {
                Ok(frame) if !frame.is_empty() => frame,
                Ok(_) => {
                    log::warn!("Camera returned an empty frame");
                    break StopReason::SourceFailed;
                }
                Err(e) => {
                    log::warn!("Failed to read frame from camera: {e}");
                    break StopReason::SourceFailed;
                }
            };
            logger.timing("read", elapsed_ms(t));

            let t = Instant::now();
            let processed = processor.process(&frame)?;
            logger.timing("detect", elapsed_ms(t));
            logger.metric("faces", processed.faces.len() as f64);
            log::debug!(
                "Frame {}: {} face(s)",
                frame.index(),
                processed.faces.len()
            );

            let t = Instant::now();
            session
                .display
                .show(&processed.frame)
                .map_err(PipelineError::Display)?;
            logger.timing("display", elapsed_ms(t));
            frames += 1;
            logger.frame_completed();

            if let Some(reason) = stop.check(&mut *session.display) {
                break reason;
            }
        };

        transition(&mut state, LiveState::Stopping);
        drop(session);
        transition(&mut state, LiveState::Stopped);

        logger.info(&format!("Live mode stopped after {frames} frame(s): {reason}"));
        logger.summary();
        Ok(LiveSummary { frames, reason })
    }
}

/// Owns the started camera and open window for the duration of a session.
///
/// Dropping it closes the display, then stops the source.
struct LiveSession<'a> {
    source: &'a mut dyn FrameSource,
    display: &'a mut dyn FrameDisplay,
}

impl Drop for LiveSession<'_> {
    fn drop(&mut self) {
        self.display.close();
        self.source.stop();
    }
}

fn transition(state: &mut LiveState, next: LiveState) {
    log::debug!("Live mode: {state:?} -> {next:?}");
    *state = next;
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

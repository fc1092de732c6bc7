use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::display::domain::frame_display::FrameDisplay;

/// Interrupt flag shared between a signal handler and the live loop.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Sets the flag and reports whether it was already set, so a handler
    /// can tell a repeated interrupt from the first one.
    pub fn trigger_again(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a live session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    ExitKey,
    WindowClosed,
    Interrupted,
    SourceFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::ExitKey => "exit key pressed",
            StopReason::WindowClosed => "window closed",
            StopReason::Interrupted => "interrupted by user (Ctrl+C)",
            StopReason::SourceFailed => "camera stopped delivering frames",
        };
        f.write_str(text)
    }
}

/// The single predicate deciding whether the live loop continues.
///
/// Combines an exit key (Escape, `q`, `Q`), window liveness and the interrupt
/// flag. Evaluating it services the display's event queue for up to
/// `poll_interval`.
pub struct StopCondition {
    signal: StopSignal,
    poll_interval: Duration,
}

impl StopCondition {
    pub fn new(signal: StopSignal, poll_interval: Duration) -> Self {
        Self {
            signal,
            poll_interval,
        }
    }

    pub fn check(&self, display: &mut dyn FrameDisplay) -> Option<StopReason> {
        if self.signal.is_triggered() {
            return Some(StopReason::Interrupted);
        }
        let key = display.poll_key(self.poll_interval);
        if key.is_some_and(|k| k.is_exit()) {
            return Some(StopReason::ExitKey);
        }
        if !display.is_open() {
            return Some(StopReason::WindowClosed);
        }
        // The poll may have blocked long enough for Ctrl+C to arrive.
        if self.signal.is_triggered() {
            return Some(StopReason::Interrupted);
        }
        None
    }
}

use crate::shared::frame::Frame;
use crate::shared::DynError;

/// A live stream of frames, such as a camera.
///
/// The pipeline calls `start` once, then `read` until it decides to stop,
/// then `stop`. `stop` must be safe to call more than once.
pub trait FrameSource: Send {
    fn start(&mut self) -> Result<(), DynError>;

    /// Blocks until the next frame is available.
    fn read(&mut self) -> Result<Frame, DynError>;

    fn stop(&mut self);
}

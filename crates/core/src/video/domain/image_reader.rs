use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::DynError;

/// Loads a still image as an RGB frame.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, DynError>;
}

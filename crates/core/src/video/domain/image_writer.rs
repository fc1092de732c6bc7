use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::DynError;

/// Writes a single frame to an image file.
pub trait ImageWriter: Send {
    /// Encodes `frame` in the format implied by the extension of `path`.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), DynError>;
}

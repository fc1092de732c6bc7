use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::DynError;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a frame with the `image` crate, picking the encoder from the
/// output file's extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), DynError> {
        let img = frame
            .to_rgb_image()
            .ok_or("frame is not a packed RGB image")?;
        img.save(path)?;
        log::debug!("Wrote {}x{} image to {}", img.width(), img.height(), path.display());
        Ok(())
    }
}

use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::DynError;
use crate::video::domain::image_reader::ImageReader;

use super::rgb_decoder::RgbDecoder;

/// Decodes a still image through ffmpeg's image demuxers.
///
/// Uses ffmpeg rather than the `image` crate because it is markedly faster
/// on large JPEGs.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, DynError> {
        if !path.is_file() {
            return Err(format!("no such file: {}", path.display()).into());
        }
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("no image data found")?;
        let stream_index = stream.index();
        let mut decoder = RgbDecoder::for_stream(&stream)?;

        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder.send(&packet)?;
            if let Some(frame) = decoder.receive(0)? {
                return Ok(frame);
            }
        }

        // Some decoders hold the only picture until flushed.
        decoder.send_eof()?;
        decoder
            .receive(0)?
            .ok_or_else(|| format!("failed to decode {}", path.display()).into())
    }
}

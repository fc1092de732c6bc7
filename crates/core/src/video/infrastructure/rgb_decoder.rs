use crate::shared::frame::Frame;
use crate::shared::DynError;

/// Video decoder paired with a scaler that converts every decoded picture
/// to packed RGB24 at its native resolution.
pub(super) struct RgbDecoder {
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
}

impl RgbDecoder {
    pub fn for_stream(stream: &ffmpeg_next::format::stream::Stream) -> Result<Self, DynError> {
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(format!("stream reports an empty picture ({width}x{height})").into());
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            decoder,
            scaler,
            width,
            height,
        })
    }

    pub fn send(&mut self, packet: &ffmpeg_next::Packet) -> Result<(), DynError> {
        self.decoder.send_packet(packet)?;
        Ok(())
    }

    pub fn send_eof(&mut self) -> Result<(), DynError> {
        self.decoder.send_eof()?;
        Ok(())
    }

    /// Next decoded picture, if the decoder has one ready.
    pub fn receive(&mut self, index: usize) -> Result<Option<Frame>, DynError> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(
            rgb_frame.data(0),
            rgb_frame.stride(0),
            self.width,
            self.height,
        );
        Ok(Some(Frame::new(pixels, self.width, self.height, 3, index)))
    }
}

/// Copies RGB24 rows out of a plane whose rows may be padded
/// (`stride > width * 3`) into a tightly packed buffer.
fn extract_rgb_pixels(plane: &[u8], stride: usize, width: u32, height: u32) -> Vec<u8> {
    let row_len = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&plane[row_start..row_start + row_len]);
    }
    pixels
}

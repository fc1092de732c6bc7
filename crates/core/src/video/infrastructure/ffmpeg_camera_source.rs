use crate::shared::frame::Frame;
use crate::shared::DynError;
use crate::video::domain::frame_source::FrameSource;

use super::rgb_decoder::RgbDecoder;

/// An ffmpeg capture device: the input format driving it plus the device
/// name that format understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraDevice {
    pub format: String,
    pub name: String,
}

impl CameraDevice {
    pub fn new(format: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            name: name.into(),
        }
    }

    /// First camera on this platform.
    pub fn platform_default() -> Self {
        Self::with_name(default_device_name())
    }

    /// A named device on this platform's capture format.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self::new(platform_format(), name)
    }
}

fn platform_format() -> &'static str {
    if cfg!(target_os = "macos") {
        "avfoundation"
    } else if cfg!(target_os = "windows") {
        "dshow"
    } else {
        "v4l2"
    }
}

fn default_device_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "0"
    } else if cfg!(target_os = "windows") {
        "video=Integrated Camera"
    } else {
        "/dev/video0"
    }
}

/// Live frames from a camera via libavdevice.
pub struct FfmpegCameraSource {
    device: CameraDevice,
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<RgbDecoder>,
    video_stream_index: usize,
    frame_index: usize,
}

// Safety: FfmpegCameraSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCameraSource {}

impl FfmpegCameraSource {
    pub fn new(device: CameraDevice) -> Self {
        Self {
            device,
            input_ctx: None,
            decoder: None,
            video_stream_index: 0,
            frame_index: 0,
        }
    }

    pub fn is_started(&self) -> bool {
        self.input_ctx.is_some()
    }
}

impl FrameSource for FfmpegCameraSource {
    fn start(&mut self) -> Result<(), DynError> {
        if self.is_started() {
            return Ok(());
        }
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let format = ffmpeg_next::device::input::video()
            .find(|f| f.name() == self.device.format)
            .ok_or_else(|| format!("capture format '{}' is not available", self.device.format))?;

        let ictx = ffmpeg_next::format::open_with(
            &self.device.name,
            &ffmpeg_next::format::format::Format::Input(format),
            ffmpeg_next::Dictionary::new(),
        )
        .map_err(|e| format!("cannot open camera '{}': {e}", self.device.name))?
        .input();

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("camera provides no video stream")?;
        let video_stream_index = stream.index();
        let decoder = RgbDecoder::for_stream(&stream)?;

        log::info!(
            "Opened camera {} ({})",
            self.device.name,
            self.device.format
        );
        self.video_stream_index = video_stream_index;
        self.decoder = Some(decoder);
        self.input_ctx = Some(ictx);
        self.frame_index = 0;
        Ok(())
    }

    fn read(&mut self) -> Result<Frame, DynError> {
        let (Some(ictx), Some(decoder)) = (self.input_ctx.as_mut(), self.decoder.as_mut()) else {
            return Err("camera is not started".into());
        };

        loop {
            if let Some(frame) = decoder.receive(self.frame_index)? {
                self.frame_index += 1;
                return Ok(frame);
            }
            let Some((stream, packet)) = ictx.packets().next() else {
                return Err("camera stream ended".into());
            };
            if stream.index() != self.video_stream_index {
                continue;
            }
            decoder.send(&packet)?;
        }
    }

    fn stop(&mut self) {
        if self.input_ctx.take().is_some() {
            log::debug!("Closed camera {}", self.device.name);
        }
        self.decoder = None;
    }
}

use std::time::Duration;

/// Width every frame is resized to before detection and display.
pub const DISPLAY_WIDTH: u32 = 400;

/// Side length of the square model input.
pub const MODEL_INPUT_SIZE: u32 = 300;

/// Per-channel means subtracted from the model input, in (B, G, R) order.
pub const MODEL_CHANNEL_MEANS_BGR: [f32; 3] = [104.0, 177.0, 123.0];

/// Candidates scoring below this are discarded.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Bounded wait for a key press on each live-mode iteration.
pub const KEY_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Pause after starting the camera so the sensor can settle.
pub const CAMERA_WARMUP: Duration = Duration::from_secs(1);

pub const WINDOW_TITLE: &str = "Frame";

pub const BLURRED_SUFFIX: &str = "_face_blurred";
pub const DETECTED_SUFFIX: &str = "_face_detected";

pub const NETWORK_FILE_NAME: &str = "deploy.onnx";
pub const WEIGHTS_FILE_NAME: &str = "res10_300x300_ssd_iter_140000.onnx.data";

/// Subdirectory of each search root holding the model files.
pub const MODEL_SUBDIR: &str = "model";

/// Application directory name under the user data dir.
pub const APP_DIR_NAME: &str = "face-detector";

/// System-wide install location searched after the user data dir.
pub const SYSTEM_MODEL_ROOT: &str = "/usr/local/share/face-detector";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

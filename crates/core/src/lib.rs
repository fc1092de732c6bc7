//! Face detection pipeline: camera frames or still images in, annotated
//! frames out.
//!
//! Each bounded context keeps its traits in `domain` and its adapters
//! (ONNX Runtime, ffmpeg, winit/wgpu, `image`) in `infrastructure`.

pub mod annotation;
pub mod detection;
pub mod display;
pub mod pipeline;
pub mod preprocessing;
pub mod shared;
pub mod video;

pub mod annotator;
pub mod canvas;
pub mod face_blur;
mod gaussian;

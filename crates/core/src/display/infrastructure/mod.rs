mod frame_renderer;
pub mod window_display;

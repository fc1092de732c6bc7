pub mod ffmpeg_camera_source;
pub mod image_file_reader;
pub mod image_file_writer;
mod rgb_decoder;

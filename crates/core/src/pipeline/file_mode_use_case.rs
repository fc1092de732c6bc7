use std::path::{Path, PathBuf};

use crate::shared::constants::{BLURRED_SUFFIX, DETECTED_SUFFIX};
use crate::shared::face_detection::FaceDetection;
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::image_writer::ImageWriter;

use super::frame_processor::FrameProcessor;
use super::pipeline_error::PipelineError;

/// Result of annotating one image.
#[derive(Clone, Debug, PartialEq)]
pub struct FileOutcome {
    pub output_path: PathBuf,
    pub faces: Vec<FaceDetection>,
}

/// Single-image pipeline: read → process → write into `output_dir`.
pub struct FileModeUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    processor: FrameProcessor,
    output_dir: PathBuf,
}

impl FileModeUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        processor: FrameProcessor,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            reader,
            writer,
            processor,
            output_dir,
        }
    }

    pub fn execute(&mut self, input: &Path) -> Result<FileOutcome, PipelineError> {
        let output_name = output_filename(input, self.processor.options().blur_faces)
            .ok_or_else(|| PipelineError::Input {
                path: input.to_path_buf(),
                source: "path does not name a file".into(),
            })?;

        let frame = self
            .reader
            .read(input)
            .map_err(|source| PipelineError::Input {
                path: input.to_path_buf(),
                source,
            })?;

        let processed = self.processor.process(&frame)?;
        log::debug!("{}: {} face(s)", input.display(), processed.faces.len());

        let output_path = self.output_dir.join(&output_name);
        self.writer
            .write(&output_path, &processed.frame)
            .map_err(|source| PipelineError::Output {
                path: output_path.clone(),
                source,
            })?;
        log::info!("Output saved to: {}", output_name.display());

        Ok(FileOutcome {
            output_path,
            faces: processed.faces,
        })
    }
}

/// Output file name for `input`: its base name with `_face_blurred` or
/// `_face_detected` inserted before the extension. Directories are dropped.
///
/// `None` when `input` has no file name component (e.g. `..`).
pub fn output_filename(input: &Path, blur_faces: bool) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    let suffix = if blur_faces {
        BLURRED_SUFFIX
    } else {
        DETECTED_SUFFIX
    };
    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(PathBuf::from(name))
}

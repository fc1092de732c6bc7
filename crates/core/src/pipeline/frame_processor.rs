use crate::annotation::annotator::annotate;
use crate::detection::domain::detection_interpreter::interpret;
use crate::detection::domain::detection_model::DetectionModel;
use crate::preprocessing::input_tensor::to_input_tensor;
use crate::preprocessing::resize::resize_to_width;
use crate::shared::face_detection::FaceDetection;
use crate::shared::frame::Frame;
use crate::shared::run_config::PipelineOptions;

use super::pipeline_error::PipelineError;

/// An annotated display-sized frame and the faces found on it.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedFrame {
    pub frame: Frame,
    pub faces: Vec<FaceDetection>,
}

/// Per-frame pipeline shared by live and file mode:
/// resize → tensor → infer → interpret → annotate.
pub struct FrameProcessor {
    model: Box<dyn DetectionModel>,
    options: PipelineOptions,
}

impl FrameProcessor {
    pub fn new(model: Box<dyn DetectionModel>, options: PipelineOptions) -> Self {
        Self { model, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn process(&mut self, frame: &Frame) -> Result<ProcessedFrame, PipelineError> {
        if frame.is_empty() {
            return Err(PipelineError::EmptyFrame);
        }
        let mut display = resize_to_width(frame, self.options.display_width);
        let tensor = to_input_tensor(&display);
        let raw = self.model.infer(&tensor)?;
        let faces = interpret(
            &raw,
            display.width(),
            display.height(),
            self.options.min_confidence,
        );
        annotate(&mut display, &faces, self.options.blur_faces);
        Ok(ProcessedFrame {
            frame: display,
            faces,
        })
    }
}

use crate::shared::face_detection::{BoundingBox, FaceDetection};

use super::detection_model::RawDetectionSet;

/// Decodes raw model output into faces on a `frame_width` × `frame_height` frame.
///
/// Candidates scoring below `min_confidence` are dropped; a score equal to the
/// threshold is kept. Surviving boxes are scaled from normalized coordinates
/// to pixels, truncated toward zero and clamped into the frame. Model order is
/// preserved and overlapping boxes are not merged.
pub fn interpret(
    raw: &RawDetectionSet,
    frame_width: u32,
    frame_height: u32,
    min_confidence: f32,
) -> Vec<FaceDetection> {
    let w = frame_width as f32;
    let h = frame_height as f32;

    raw.candidates()
        .filter(|c| c.confidence >= min_confidence)
        .map(|c| {
            let bbox = BoundingBox::new(
                (c.left * w) as i32,
                (c.top * h) as i32,
                (c.right * w) as i32,
                (c.bottom * h) as i32,
            );
            FaceDetection {
                confidence: c.confidence,
                bounding_box: bbox.clamped(frame_width, frame_height),
            }
        })
        .collect()
}

use crate::shared::face_detection::FaceDetection;
use crate::shared::frame::Frame;

use super::canvas::{draw_box, draw_label};
use super::face_blur::blur_region;

/// Offset between a box's top edge and its label baseline.
const LABEL_OFFSET: i32 = 10;

/// Confidence as a percentage with two decimals, e.g. `0.87` -> `"87.00%"`.
pub fn label_text(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// Label baseline above the box, or just inside it when the box hugs the
/// top of the frame.
pub fn label_anchor_y(top: i32) -> i32 {
    let above = top - LABEL_OFFSET;
    if above < LABEL_OFFSET {
        top + LABEL_OFFSET
    } else {
        above
    }
}

/// Marks every face on `frame` in place.
///
/// Each face gets its confidence label, then either a box outline or, when
/// `blur_faces` is set, a blur over the box region. Faces are drawn in the
/// order given, so a later blur may soften an earlier label.
pub fn annotate(frame: &mut Frame, faces: &[FaceDetection], blur_faces: bool) {
    for face in faces {
        let bbox = &face.bounding_box;
        draw_label(
            frame,
            &label_text(face.confidence),
            bbox.x1,
            label_anchor_y(bbox.y1),
        );
        if blur_faces {
            blur_region(frame, bbox);
        } else {
            draw_box(frame, bbox);
        }
    }
}

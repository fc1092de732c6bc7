use image::imageops::{self, FilterType};

use crate::shared::frame::Frame;

/// Scales `frame` so its width equals `target_width`, keeping the aspect ratio.
///
/// The derived height is truncated, never below one pixel. Detections are
/// later reported in the coordinate space of the returned frame.
pub fn resize_to_width(frame: &Frame, target_width: u32) -> Frame {
    if frame.is_empty() || target_width == 0 || frame.width() == target_width {
        return frame.clone();
    }
    let ratio = target_width as f64 / frame.width() as f64;
    let target_height = ((frame.height() as f64 * ratio) as u32).max(1);
    resize_exact(frame, target_width, target_height)
}

/// Resizes to exactly `width` × `height` with a bilinear filter.
pub fn resize_exact(frame: &Frame, width: u32, height: u32) -> Frame {
    let Some(src) = frame.to_rgb_image() else {
        return frame.clone();
    };
    let resized = imageops::resize(&src, width, height, FilterType::Triangle);
    Frame::from_rgb_image(resized, frame.index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn make_frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 3) as usize], w, h, 3, 3)
    }

    #[rstest]
    #[case::landscape(800, 600, 400, 300)]
    #[case::portrait(600, 800, 400, 533)]
    #[case::upscale(200, 100, 400, 200)]
    #[case::thin_strip(4000, 3, 400, 1)]
    fn test_resize_to_width_preserves_aspect(
        #[case] w: u32,
        #[case] h: u32,
        #[case] expected_w: u32,
        #[case] expected_h: u32,
    ) {
        let out = resize_to_width(&make_frame(w, h, 10), 400);
        assert_eq!(out.width(), expected_w);
        assert_eq!(out.height(), expected_h);
        assert_eq!(out.data().len(), (expected_w * expected_h * 3) as usize);
    }

    #[test]
    fn test_resize_keeps_frame_index() {
        let out = resize_to_width(&make_frame(800, 600, 10), 400);
        assert_eq!(out.index(), 3);
    }

    #[test]
    fn test_uniform_colour_survives_resize() {
        let out = resize_to_width(&make_frame(640, 480, 77), 400);
        assert!(out.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_same_width_is_a_copy() {
        let frame = make_frame(400, 250, 5);
        assert_eq!(resize_to_width(&frame, 400), frame);
    }

    #[test]
    fn test_empty_frame_passes_through() {
        let frame = Frame::new(Vec::new(), 0, 0, 3, 0);
        assert!(resize_to_width(&frame, 400).is_empty());
    }

    #[test]
    fn test_resize_exact_ignores_aspect() {
        let out = resize_exact(&make_frame(400, 100, 1), 300, 300);
        assert_eq!((out.width(), out.height()), (300, 300));
    }
}

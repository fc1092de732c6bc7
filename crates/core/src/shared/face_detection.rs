/// Axis-aligned face rectangle in pixel coordinates of the frame it was
/// detected on. `(x1, y1)` is the top-left corner, `(x2, y2)` the bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Horizontal extent; zero when the corners are inverted.
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).max(0) as u32
    }

    /// Vertical extent; zero when the corners are inverted.
    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Clamps every coordinate into `[0, frame_width) × [0, frame_height)`.
    ///
    /// Model output is untrusted: on frames whose aspect ratio differs from
    /// the training data, boxes can land partly or fully outside the frame.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Self {
        let max_x = frame_width.saturating_sub(1) as i32;
        let max_y = frame_height.saturating_sub(1) as i32;
        Self {
            x1: self.x1.clamp(0, max_x),
            y1: self.y1.clamp(0, max_y),
            x2: self.x2.clamp(0, max_x),
            y2: self.y2.clamp(0, max_y),
        }
    }
}

/// One accepted face: model confidence plus its box on the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceDetection {
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_extent() {
        let b = BoundingBox::new(40, 30, 200, 180);
        assert_eq!(b.width(), 160);
        assert_eq!(b.height(), 150);
        assert!(!b.is_empty());
    }

    #[test]
    fn test_inverted_box_is_empty() {
        let b = BoundingBox::new(50, 50, 10, 80);
        assert_eq!(b.width(), 0);
        assert!(b.is_empty());
    }

    #[rstest]
    #[case::inside(BoundingBox::new(10, 10, 50, 50), BoundingBox::new(10, 10, 50, 50))]
    #[case::negative(BoundingBox::new(-20, -5, 50, 50), BoundingBox::new(0, 0, 50, 50))]
    #[case::past_edges(BoundingBox::new(10, 10, 400, 300), BoundingBox::new(10, 10, 399, 299))]
    #[case::fully_outside(BoundingBox::new(500, 400, 600, 450), BoundingBox::new(399, 299, 399, 299))]
    fn test_clamped(#[case] input: BoundingBox, #[case] expected: BoundingBox) {
        assert_eq!(input.clamped(400, 300), expected);
    }

    #[test]
    fn test_clamped_on_zero_sized_frame() {
        let b = BoundingBox::new(5, 5, 10, 10).clamped(0, 0);
        assert_eq!(b, BoundingBox::new(0, 0, 0, 0));
    }
}

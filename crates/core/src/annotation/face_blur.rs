use ndarray::s;

use crate::shared::face_detection::BoundingBox;
use crate::shared::frame::Frame;

use super::gaussian;

/// Kernel length for blurring an extent of `extent` pixels.
///
/// The extent itself, stepped down to the nearest odd number; never below 1.
pub fn blur_kernel_size(extent: u32) -> usize {
    let k = extent.max(1) as usize;
    if k % 2 == 0 {
        k - 1
    } else {
        k
    }
}

/// Gaussian-blurs a whole sub-image with a kernel as large as the image
/// itself, which smears a face beyond recognition.
pub fn blur(sub_image: &Frame) -> Frame {
    let mut out = sub_image.clone();
    if out.is_empty() {
        return out;
    }
    let kernel_x = gaussian::gaussian_kernel_1d(blur_kernel_size(out.width()));
    let kernel_y = gaussian::gaussian_kernel_1d(blur_kernel_size(out.height()));
    let (w, h, c) = (
        out.width() as usize,
        out.height() as usize,
        out.channels() as usize,
    );
    let mut temp = Vec::new();
    gaussian::separable_gaussian_blur(out.data_mut(), w, h, c, &kernel_x, &kernel_y, &mut temp);
    out
}

/// Replaces the pixels inside `bbox` with a blurred copy.
///
/// Corners are inclusive, so a box clamped to the last column or row still
/// covers it. Boxes that are empty or lie outside the frame are ignored.
pub fn blur_region(frame: &mut Frame, bbox: &BoundingBox) {
    let clamped = bbox.clamped(frame.width(), frame.height());
    if clamped.is_empty() {
        return;
    }
    let (x1, y1) = (clamped.x1 as usize, clamped.y1 as usize);
    let x2 = (clamped.x2 as usize + 1).min(frame.width() as usize);
    let y2 = (clamped.y2 as usize + 1).min(frame.height() as usize);

    let roi: Vec<u8> = frame
        .as_ndarray()
        .slice(s![y1..y2, x1..x2, ..])
        .iter()
        .copied()
        .collect();
    let sub_image = Frame::new(
        roi,
        (x2 - x1) as u32,
        (y2 - y1) as u32,
        frame.channels(),
        frame.index(),
    );
    let blurred = blur(&sub_image);

    frame
        .as_ndarray_mut()
        .slice_mut(s![y1..y2, x1..x2, ..])
        .assign(&blurred.as_ndarray());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn checkerboard(w: u32, h: u32) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, w, h, 3, 0)
    }

    #[rstest]
    #[case::zero(0, 1)]
    #[case::one(1, 1)]
    #[case::two(2, 1)]
    #[case::three(3, 3)]
    #[case::even(160, 159)]
    #[case::odd(151, 151)]
    fn test_kernel_size_is_odd_and_positive(#[case] extent: u32, #[case] expected: usize) {
        let k = blur_kernel_size(extent);
        assert_eq!(k, expected);
        assert_eq!(k % 2, 1);
    }

    #[test]
    fn test_kernel_size_property_over_range() {
        for extent in 0..500 {
            let k = blur_kernel_size(extent);
            assert!(k >= 1 && k % 2 == 1 && k <= extent.max(1) as usize);
        }
    }

    #[rstest]
    #[case::single_pixel(1, 1)]
    #[case::single_row(9, 1)]
    #[case::single_column(1, 9)]
    #[case::even_by_even(8, 6)]
    fn test_blur_degenerate_shapes_do_not_panic(#[case] w: u32, #[case] h: u32) {
        let out = blur(&checkerboard(w, h));
        assert_eq!((out.width(), out.height()), (w, h));
    }

    #[test]
    fn test_blur_one_by_one_is_identity() {
        let frame = checkerboard(1, 1);
        assert_eq!(blur(&frame), frame);
    }

    #[test]
    fn test_blur_flattens_detail() {
        let frame = checkerboard(31, 31);
        let out = blur(&frame);
        let spread = |f: &Frame| {
            let max = *f.data().iter().max().unwrap() as i32;
            let min = *f.data().iter().min().unwrap() as i32;
            max - min
        };
        assert!(spread(&out) < spread(&frame) / 4);
    }

    #[test]
    fn test_blur_region_only_touches_the_box() {
        let mut frame = checkerboard(40, 30);
        let original = frame.clone();
        let bbox = BoundingBox::new(10, 5, 30, 25);

        blur_region(&mut frame, &bbox);

        let (a, b) = (frame.as_ndarray(), original.as_ndarray());
        for y in 0..30 {
            for x in 0..40 {
                let inside = (10..=30).contains(&x) && (5..=25).contains(&y);
                if !inside {
                    assert_eq!(a[[y, x, 0]], b[[y, x, 0]], "pixel ({x},{y}) changed");
                }
            }
        }
        assert_ne!(a[[15, 20, 0]], b[[15, 20, 0]]);
        assert_eq!((frame.width(), frame.height()), (40, 30));
    }

    #[test]
    fn test_blur_region_reaches_last_column_and_row() {
        let mut frame = checkerboard(40, 30);
        let original = frame.clone();

        // A full-frame face, as the interpreter clamps it.
        blur_region(&mut frame, &BoundingBox::new(0, 0, 39, 29));

        let (a, b) = (frame.as_ndarray(), original.as_ndarray());
        let right_untouched = (0..30).filter(|&y| a[[y, 39, 0]] == b[[y, 39, 0]]).count();
        let bottom_untouched = (0..40).filter(|&x| a[[29, x, 0]] == b[[29, x, 0]]).count();
        assert_eq!(right_untouched, 0);
        assert_eq!(bottom_untouched, 0);
    }

    #[test]
    fn test_blur_region_beyond_frame_is_capped() {
        let mut frame = checkerboard(20, 20);
        let original = frame.clone();

        blur_region(&mut frame, &BoundingBox::new(10, 10, 500, 500));

        assert_eq!((frame.width(), frame.height()), (20, 20));
        assert_ne!(
            frame.as_ndarray()[[19, 19, 0]],
            original.as_ndarray()[[19, 19, 0]]
        );
    }

    #[test]
    fn test_blur_region_ignores_empty_boxes() {
        let mut frame = checkerboard(20, 20);
        let original = frame.clone();
        blur_region(&mut frame, &BoundingBox::new(5, 5, 5, 15));
        blur_region(&mut frame, &BoundingBox::new(12, 12, 4, 4));
        assert_eq!(frame, original);
    }
}

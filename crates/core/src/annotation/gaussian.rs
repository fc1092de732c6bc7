/// Sigma OpenCV derives for a kernel of `kernel_size` when none is given.
pub fn default_sigma(kernel_size: usize) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Precompute a normalized 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = default_sigma(kernel_size);
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Separable Gaussian blur with independent horizontal and vertical kernels.
///
/// Borders replicate the edge pixel. A kernel of length 1 leaves that axis
/// untouched. `temp` is scratch space and may be reused across calls.
pub fn separable_gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_x: &[f32],
    kernel_y: &[f32],
    temp: &mut Vec<f32>,
) {
    if width == 0 || height == 0 || (kernel_x.len() <= 1 && kernel_y.len() <= 1) {
        return;
    }
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;

    temp.clear();
    temp.resize(width * height * channels, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel_x.iter().enumerate() {
                    let sx = (x as isize + k as isize - half_x).clamp(0, width as isize - 1) as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel_y.iter().enumerate() {
                    let sy =
                        (y as isize + k as isize - half_y).clamp(0, height as isize - 1) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn blur(data: &mut [u8], w: usize, h: usize, kx: usize, ky: usize) {
        let mut temp = Vec::new();
        separable_gaussian_blur(
            data,
            w,
            h,
            3,
            &gaussian_kernel_1d(kx),
            &gaussian_kernel_1d(ky),
            &mut temp,
        );
    }

    #[test]
    fn test_default_sigma_matches_opencv_convention() {
        assert_relative_eq!(default_sigma(1), 0.5, epsilon = 1e-12);
        assert_relative_eq!(default_sigma(3), 0.8, epsilon = 1e-12);
        assert_relative_eq!(default_sigma(7), 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        for size in [1, 3, 7, 151] {
            let sum: f32 = gaussian_kernel_1d(size).iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_kernel_is_symmetric_and_peaks_in_the_middle() {
        let k = gaussian_kernel_1d(7);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
            assert!(k[3] >= k[i]);
        }
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        blur(&mut data, 10, 10, 5, 9);
        assert!(data.iter().all(|&v| (v as i32 - 128).abs() <= 1));
    }

    #[test]
    fn test_blur_spreads_a_bright_pixel() {
        let mut data = vec![0u8; 10 * 10 * 3];
        let cx = 5 * 10 + 5;
        data[cx * 3] = 255;

        blur(&mut data, 10, 10, 5, 5);

        assert!(data[cx * 3] < 255);
        assert!(data[(5 * 10 + 6) * 3] > 0);
        assert!(data[(6 * 10 + 5) * 3] > 0);
    }

    #[test]
    fn test_horizontal_only_kernel_keeps_columns_apart() {
        let mut data = vec![0u8; 5 * 5 * 3];
        data[(2 * 5 + 2) * 3] = 255;

        blur(&mut data, 5, 5, 3, 1);

        // Spread along the row, not into the rows above or below.
        assert!(data[(2 * 5 + 1) * 3] > 0);
        assert_eq!(data[(5 + 2) * 3], 0);
        assert_eq!(data[(3 * 5 + 2) * 3], 0);
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut data: Vec<u8> = (0..75).collect();
        let original = data.clone();
        blur(&mut data, 5, 5, 1, 1);
        assert_eq!(data, original);
    }
}

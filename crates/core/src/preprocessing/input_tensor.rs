use ndarray::Array4;

use crate::shared::constants::{MODEL_CHANNEL_MEANS_BGR, MODEL_INPUT_SIZE};
use crate::shared::frame::Frame;

use super::resize::resize_exact;

/// Normalized NCHW model input: `[1, 3, 300, 300]`, channels in B, G, R order
/// with the per-channel mean subtracted and no further scaling.
#[derive(Clone, Debug, PartialEq)]
pub struct InputTensor(Array4<f32>);

impl InputTensor {
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn into_array(self) -> Array4<f32> {
        self.0
    }
}

/// Builds the model input from a frame of any size.
///
/// The square resize here exists only for the model; it is independent of the
/// display resize, and detections are denormalized against the display frame.
pub fn to_input_tensor(frame: &Frame) -> InputTensor {
    let side = MODEL_INPUT_SIZE;
    let resized = if frame.width() == side && frame.height() == side {
        frame.clone()
    } else {
        resize_exact(frame, side, side)
    };

    let src = resized.as_ndarray(); // [H, W, C] RGB u8
    let side = side as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, side, side));

    for y in 0..side {
        for x in 0..side {
            for (plane, &mean) in MODEL_CHANNEL_MEANS_BGR.iter().enumerate() {
                // plane 0 = B (RGB index 2), plane 2 = R (RGB index 0)
                let rgb_channel = 2 - plane;
                tensor[[0, plane, y, x]] = src[[y, x, rgb_channel]] as f32 - mean;
            }
        }
    }

    InputTensor(tensor)
}

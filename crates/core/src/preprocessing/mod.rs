pub mod input_tensor;
pub mod resize;

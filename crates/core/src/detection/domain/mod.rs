pub mod detection_interpreter;
pub mod detection_model;

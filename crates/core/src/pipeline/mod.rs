pub mod file_mode_use_case;
pub mod frame_processor;
pub mod live_mode_use_case;
pub mod pipeline_error;
pub mod pipeline_logger;
pub mod stop_condition;

pub mod constants;
pub mod face_detection;
pub mod frame;
pub mod run_config;

/// Error type returned by I/O adapters (readers, writers, sources, displays).
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

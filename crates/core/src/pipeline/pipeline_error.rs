use std::path::PathBuf;

use thiserror::Error;

use crate::detection::domain::detection_model::DetectorError;
use crate::shared::DynError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("could not open image file {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: DynError,
    },
    #[error("failed to save image to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: DynError,
    },
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error("received an empty frame")]
    EmptyFrame,
    #[error("camera error: {0}")]
    Source(#[source] DynError),
    #[error("display error: {0}")]
    Display(#[source] DynError),
}

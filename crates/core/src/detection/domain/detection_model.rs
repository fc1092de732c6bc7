use std::path::PathBuf;

use ndarray::{Array4, ArrayD, Ix4};
use thiserror::Error;

use crate::preprocessing::input_tensor::InputTensor;
use crate::shared::DynError;

/// Layout of the SSD detection output. Only this block changes when swapping
/// in a model with a different output contract.
pub mod layout {
    /// Axis enumerating candidate detections.
    pub const CANDIDATE_AXIS: usize = 2;
    /// Offset of the confidence score within one candidate record.
    pub const CONFIDENCE: usize = 2;
    /// Offsets of the normalized box corners within one candidate record.
    pub const LEFT: usize = 3;
    pub const TOP: usize = 4;
    pub const RIGHT: usize = 5;
    pub const BOTTOM: usize = 6;
    /// Minimum record length covering every offset above.
    pub const RECORD_LEN: usize = 7;
}

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("failed to load detection model from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: DynError,
    },
    #[error("inference failed: {0}")]
    Inference(#[source] DynError),
    #[error("detector contract violation: {0}")]
    ContractViolation(String),
}

/// Opaque face-detection capability: tensor in, raw detections out.
///
/// Calls are synchronous and blocking. Errors indicate a mismatched or corrupt
/// model and are never retried.
pub trait DetectionModel: Send {
    fn infer(&mut self, input: &InputTensor) -> Result<RawDetectionSet, DetectorError>;
}

/// One candidate as read from the raw output, still normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawCandidate {
    pub confidence: f32,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Raw 4-D detection output, validated against [`layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetectionSet(Array4<f32>);

impl RawDetectionSet {
    pub fn new(array: Array4<f32>) -> Result<Self, DetectorError> {
        let shape = array.shape();
        if shape[0] == 0 || shape[1] == 0 {
            return Err(DetectorError::ContractViolation(format!(
                "empty leading dimensions in output shape {shape:?}"
            )));
        }
        if shape[3] < layout::RECORD_LEN {
            return Err(DetectorError::ContractViolation(format!(
                "candidate records hold {} values, expected at least {}",
                shape[3],
                layout::RECORD_LEN
            )));
        }
        Ok(Self(array))
    }

    /// Accepts an output of unknown rank, rejecting anything but 4-D.
    pub fn from_dyn(array: ArrayD<f32>) -> Result<Self, DetectorError> {
        let shape = array.shape().to_vec();
        let array = array.into_dimensionality::<Ix4>().map_err(|_| {
            DetectorError::ContractViolation(format!(
                "expected a 4-D detection output, got shape {shape:?}"
            ))
        })?;
        Self::new(array)
    }

    pub fn candidate_count(&self) -> usize {
        self.0.shape()[layout::CANDIDATE_AXIS]
    }

    /// Candidates in model output order.
    pub fn candidates(&self) -> impl Iterator<Item = RawCandidate> + '_ {
        (0..self.candidate_count()).map(move |i| {
            let at = |offset: usize| self.0[[0, 0, i, offset]];
            RawCandidate {
                confidence: at(layout::CONFIDENCE),
                left: at(layout::LEFT),
                top: at(layout::TOP),
                right: at(layout::RIGHT),
                bottom: at(layout::BOTTOM),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_candidates_follow_layout() {
        let mut arr = Array4::<f32>::zeros((1, 1, 2, 7));
        arr[[0, 0, 1, 2]] = 0.9;
        arr[[0, 0, 1, 3]] = 0.1;
        arr[[0, 0, 1, 4]] = 0.2;
        arr[[0, 0, 1, 5]] = 0.3;
        arr[[0, 0, 1, 6]] = 0.4;
        let set = RawDetectionSet::new(arr).unwrap();

        assert_eq!(set.candidate_count(), 2);
        let second = set.candidates().nth(1).unwrap();
        assert_eq!(
            second,
            RawCandidate {
                confidence: 0.9,
                left: 0.1,
                top: 0.2,
                right: 0.3,
                bottom: 0.4,
            }
        );
    }

    #[test]
    fn test_short_records_are_rejected() {
        let arr = Array4::<f32>::zeros((1, 1, 3, 5));
        assert!(matches!(
            RawDetectionSet::new(arr),
            Err(DetectorError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_wrong_rank_is_rejected() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[1, 200, 7]));
        assert!(matches!(
            RawDetectionSet::from_dyn(arr),
            Err(DetectorError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_dynamic_rank_four_is_accepted() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 200, 7]));
        let set = RawDetectionSet::from_dyn(arr).unwrap();
        assert_eq!(set.candidate_count(), 200);
    }

    #[test]
    fn test_zero_candidates_is_valid() {
        let set = RawDetectionSet::new(Array4::<f32>::zeros((1, 1, 0, 7))).unwrap();
        assert_eq!(set.candidates().count(), 0);
    }
}

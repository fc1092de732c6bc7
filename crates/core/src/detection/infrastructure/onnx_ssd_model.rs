//! Res10 SSD face detector running on ONNX Runtime via `ort`.
//!
//! The network graph and its trained weights are separate files: the graph
//! references the weights as ONNX external data, which ONNX Runtime resolves
//! relative to the graph's directory. Loading fails unless the configured
//! weights file is the one the graph names.
use std::fmt::Display;
use std::path::Path;

use crate::detection::domain::detection_model::{DetectionModel, DetectorError, RawDetectionSet};
use crate::preprocessing::input_tensor::InputTensor;
use crate::shared::constants::MODEL_INPUT_SIZE;

use super::execution_provider::accelerated_providers;
use super::model_resolver::ModelFiles;

/// SSD detector backed by an ONNX Runtime session.
pub struct OnnxSsdModel {
    session: ort::session::Session,
}

impl OnnxSsdModel {
    /// Load the model and check that its declared input matches `[1, 3, 300, 300]`.
    pub fn new(files: &ModelFiles) -> Result<Self, DetectorError> {
        let network = files.network.as_path();
        check_weights_beside_network(files)?;
        check_graph_references_weights(files)?;

        let session = ort::session::Session::builder()
            .map_err(load_error(network))?
            .with_execution_providers(accelerated_providers())
            .map_err(load_error(network))?
            .commit_from_file(network)
            .map_err(load_error(network))?;

        let declared = session.inputs().first().and_then(|input| {
            if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                Some(shape.iter().copied().collect::<Vec<i64>>())
            } else {
                None
            }
        });
        if let Some(dims) = declared {
            validate_input_dims(&dims)?;
        }

        log::info!("Loaded face detection model from {}", network.display());
        Ok(Self { session })
    }
}

impl DetectionModel for OnnxSsdModel {
    fn infer(&mut self, input: &InputTensor) -> Result<RawDetectionSet, DetectorError> {
        let input_value = ort::value::Tensor::from_array(input.as_array().clone())
            .map_err(inference_error)?;
        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(inference_error)?;
        if outputs.len() == 0 {
            return Err(DetectorError::ContractViolation(
                "model produced no outputs".to_string(),
            ));
        }
        let detections = outputs[0]
            .try_extract_array::<f32>()
            .map_err(inference_error)?
            .to_owned();
        RawDetectionSet::from_dyn(detections)
    }
}

fn load_error<E: Display>(path: &Path) -> impl FnOnce(E) -> DetectorError {
    let path = path.to_path_buf();
    move |e| DetectorError::Load {
        path,
        source: e.to_string().into(),
    }
}

fn inference_error<E: Display>(e: E) -> DetectorError {
    DetectorError::Inference(e.to_string().into())
}

/// ONNX Runtime only finds external weights in the graph's own directory.
fn check_weights_beside_network(files: &ModelFiles) -> Result<(), DetectorError> {
    let parent = |p: &Path| p.parent().map(Path::to_path_buf).unwrap_or_default();
    if parent(&files.network) != parent(&files.weights) {
        return Err(DetectorError::Load {
            path: files.weights.clone(),
            source: format!(
                "weights must be in the same directory as the network graph ({})",
                parent(&files.network).display()
            )
            .into(),
        });
    }
    Ok(())
}

/// The graph stores each external-data `location` as a plain string, so the
/// weights file name must appear verbatim in the graph bytes.
fn check_graph_references_weights(files: &ModelFiles) -> Result<(), DetectorError> {
    let graph = std::fs::read(&files.network).map_err(load_error(&files.network))?;
    let name = files
        .weights
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.is_empty() || !contains_bytes(&graph, name.as_bytes()) {
        return Err(DetectorError::Load {
            path: files.weights.clone(),
            source: format!(
                "network graph {} does not reference weights file '{name}'",
                files.network.display()
            )
            .into(),
        });
    }
    Ok(())
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Dynamic (non-positive) dimensions are accepted; fixed ones must match.
fn validate_input_dims(dims: &[i64]) -> Result<(), DetectorError> {
    let side = MODEL_INPUT_SIZE as i64;
    let expected = [1, 3, side, side];
    let matches = dims.len() == expected.len()
        && dims
            .iter()
            .zip(expected.iter())
            .all(|(&got, &want)| got <= 0 || got == want);
    if matches {
        Ok(())
    } else {
        Err(DetectorError::ContractViolation(format!(
            "model expects input {dims:?}, pipeline produces {expected:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn model_files_for(dir: &Path) -> ModelFiles {
        ModelFiles {
            network: dir.join("deploy.onnx"),
            weights: dir.join("weights.onnx.data"),
        }
    }

    #[rstest]
    #[case::exact(&[1, 3, 300, 300])]
    #[case::dynamic_batch(&[-1, 3, 300, 300])]
    #[case::fully_dynamic(&[-1, -1, -1, -1])]
    fn test_accepts_compatible_inputs(#[case] dims: &[i64]) {
        assert!(validate_input_dims(dims).is_ok());
    }

    #[rstest]
    #[case::wrong_size(&[1, 3, 640, 640])]
    #[case::wrong_channels(&[1, 1, 300, 300])]
    #[case::wrong_rank(&[3, 300, 300])]
    fn test_rejects_incompatible_inputs(#[case] dims: &[i64]) {
        assert!(matches!(
            validate_input_dims(dims),
            Err(DetectorError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_weights_in_other_directory_are_rejected() {
        let files = ModelFiles {
            network: PathBuf::from("/opt/a/deploy.onnx"),
            weights: PathBuf::from("/opt/b/weights.onnx.data"),
        };
        assert!(matches!(
            check_weights_beside_network(&files),
            Err(DetectorError::Load { .. })
        ));
    }

    #[test]
    fn test_weights_beside_network_are_accepted() {
        let files = model_files_for(Path::new("/opt/models"));
        assert!(check_weights_beside_network(&files).is_ok());
    }

    /// Minimal stand-in for a graph whose initializers live in `location`.
    fn write_graph(dir: &Path, location: &str) -> PathBuf {
        let path = dir.join("deploy.onnx");
        let mut bytes = b"\x08\x07\x12\x08location\x1a".to_vec();
        bytes.push(location.len() as u8);
        bytes.extend_from_slice(location.as_bytes());
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_graph_referencing_weights_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let files = ModelFiles {
            network: write_graph(dir.path(), "weights.onnx.data"),
            weights: dir.path().join("weights.onnx.data"),
        };
        assert!(check_graph_references_weights(&files).is_ok());
    }

    #[test]
    fn test_renamed_weights_beside_network_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let files = ModelFiles {
            network: write_graph(dir.path(), "weights.onnx.data"),
            weights: dir.path().join("anything.data"),
        };
        std::fs::write(&files.weights, b"").unwrap();

        let result = check_graph_references_weights(&files);

        assert!(matches!(
            result,
            Err(DetectorError::Load { ref path, .. }) if path == &files.weights
        ));
        assert!(matches!(
            OnnxSsdModel::new(&files),
            Err(DetectorError::Load { ref path, .. }) if path == &files.weights
        ));
    }

    #[rstest]
    #[case::present(b"abcdef", b"cde", true)]
    #[case::absent(b"abcdef", b"xyz", false)]
    #[case::longer_needle(b"ab", b"abc", false)]
    #[case::empty_needle(b"ab", b"", false)]
    fn test_contains_bytes(#[case] hay: &[u8], #[case] needle: &[u8], #[case] expected: bool) {
        assert_eq!(contains_bytes(hay, needle), expected);
    }

    #[test]
    fn test_missing_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxSsdModel::new(&model_files_for(dir.path()));
        assert!(matches!(result, Err(DetectorError::Load { .. })));
    }
}

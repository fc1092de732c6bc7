use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{
    APP_DIR_NAME, MODEL_SUBDIR, NETWORK_FILE_NAME, SYSTEM_MODEL_ROOT, WEIGHTS_FILE_NAME,
};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model files not found in any of: {}", display_list(.searched))]
    NotFound { searched: Vec<PathBuf> },
    #[error("network file not found: {0}")]
    MissingNetwork(PathBuf),
    #[error("weights file not found: {0}")]
    MissingWeights(PathBuf),
}

/// Resolved locations of the detector's network graph and trained weights.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFiles {
    pub network: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    /// Uses the given paths as-is, failing if either file is missing.
    pub fn explicit(network: PathBuf, weights: PathBuf) -> Result<Self, ModelResolveError> {
        if !network.is_file() {
            return Err(ModelResolveError::MissingNetwork(network));
        }
        if !weights.is_file() {
            return Err(ModelResolveError::MissingWeights(weights));
        }
        Ok(Self { network, weights })
    }

    fn in_root(root: &Path) -> Self {
        let dir = root.join(MODEL_SUBDIR);
        Self {
            network: dir.join(NETWORK_FILE_NAME),
            weights: dir.join(WEIGHTS_FILE_NAME),
        }
    }

    fn exist(&self) -> bool {
        self.network.is_file() && self.weights.is_file()
    }
}

/// Search roots, in priority order.
///
/// 1. `preferred` (e.g. a `--model-dir` flag)
/// 2. Current working directory
/// 3. User data directory (`<data_dir>/face-detector`)
/// 4. System install location
pub fn search_roots(preferred: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = preferred {
        roots.push(dir.to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(data) = dirs::data_dir() {
        roots.push(data.join(APP_DIR_NAME));
    }
    roots.push(PathBuf::from(SYSTEM_MODEL_ROOT));
    roots
}

/// Returns the first root holding both `model/<network>` and `model/<weights>`.
pub fn resolve(roots: &[PathBuf]) -> Result<ModelFiles, ModelResolveError> {
    for root in roots {
        let candidate = ModelFiles::in_root(root);
        if candidate.exist() {
            log::debug!("Model files found under {}", root.display());
            return Ok(candidate);
        }
        log::debug!("No model files under {}", root.display());
    }
    Err(ModelResolveError::NotFound {
        searched: roots.to_vec(),
    })
}

fn display_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Model artifact resolution and loading
//!
//! The artifact lives next to the installed executable, so the tool behaves
//! the same whatever directory it is invoked from.

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{PredictError, PredictResult};
use crate::predictor::{Capability, Model, OnnxModel};

/// Artifact file name shipped alongside the binary
pub const DEFAULT_MODEL_FILE: &str = "risk_model.onnx";

/// Information about the loaded artifact
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub path: PathBuf,
    pub checksum: String,
    pub size_bytes: usize,
    pub capability: Capability,
}

/// Loads the artifact once per run
#[derive(Debug, Clone)]
pub struct ModelLoader {
    path: PathBuf,
    expected_sha256: Option<String>,
    strict_schema: bool,
}

impl ModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expected_sha256: None,
            strict_schema: false,
        }
    }

    /// Build a loader from the run configuration
    pub fn from_config(config: &RunConfig) -> PredictResult<Self> {
        let dir = match &config.model_dir {
            Some(dir) => dir.clone(),
            None => install_dir().map_err(|source| PredictError::ModelLoad {
                path: PathBuf::from(&config.model_file),
                source,
            })?,
        };

        Ok(Self {
            path: dir.join(&config.model_file),
            expected_sha256: config.expected_sha256.clone(),
            strict_schema: config.strict_schema,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, verify and deserialize the artifact
    pub fn load(&self) -> PredictResult<(Model, ModelInfo)> {
        if !self.path.exists() {
            return Err(PredictError::ModelNotFound {
                path: self.path.clone(),
            });
        }

        self.load_existing().map_err(|source| PredictError::ModelLoad {
            path: self.path.clone(),
            source,
        })
    }

    fn load_existing(&self) -> Result<(Model, ModelInfo)> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read model file {:?}", self.path))?;

        let checksum = compute_checksum(&bytes);
        if let Some(expected) = &self.expected_sha256 {
            if !checksum.eq_ignore_ascii_case(expected.trim()) {
                return Err(anyhow!(
                    "Checksum mismatch: expected {}, got {}",
                    expected.trim(),
                    checksum
                ));
            }
            debug!(checksum = %checksum, "Model checksum validated");
        }

        let onnx = OnnxModel::from_bytes(&bytes)?;
        if self.strict_schema {
            onnx.check_schema().context("Model input schema mismatch")?;
        }

        let info = ModelInfo {
            path: self.path.clone(),
            checksum,
            size_bytes: bytes.len(),
            capability: onnx.capability(),
        };

        info!(
            path = %info.path.display(),
            size = info.size_bytes,
            checksum = %info.checksum,
            capability = %info.capability,
            "Loaded model"
        );

        Ok((onnx.into_model(), info))
    }
}

/// Directory holding the running executable, symlinks resolved
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Could not determine executable path")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .context("Executable path has no parent directory")
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"");
        assert_eq!(
            checksum,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(compute_checksum(b"weights"), compute_checksum(b"weights"));
    }

    #[test]
    fn test_missing_model_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_MODEL_FILE);

        let err = ModelLoader::new(&path).load().unwrap_err();
        match &err {
            PredictError::ModelNotFound { path: reported } => assert_eq!(reported, &path),
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_corrupt_model_is_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_MODEL_FILE);
        fs::write(&path, b"not an onnx graph").unwrap();

        let err = ModelLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, PredictError::ModelLoad { .. }), "{:?}", err);
        assert!(err.to_string().contains("Failed to parse ONNX model"));
    }

    #[test]
    fn test_checksum_mismatch_rejected_before_parsing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DEFAULT_MODEL_FILE), b"not an onnx graph").unwrap();
        let config = RunConfig {
            model_dir: Some(temp_dir.path().to_path_buf()),
            expected_sha256: Some("00".repeat(32)),
            ..Default::default()
        };

        let err = ModelLoader::from_config(&config).unwrap().load().unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"), "{}", err);
    }

    #[test]
    fn test_from_config_resolves_in_install_dir() {
        let loader = ModelLoader::from_config(&RunConfig::default()).unwrap();
        let exe_dir = install_dir().unwrap();
        assert_eq!(loader.path(), exe_dir.join(DEFAULT_MODEL_FILE));
    }

    #[test]
    fn test_from_config_honours_model_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            model_dir: Some(temp_dir.path().to_path_buf()),
            strict_schema: true,
            ..Default::default()
        };
        let loader = ModelLoader::from_config(&config).unwrap();
        assert_eq!(loader.path(), temp_dir.path().join(DEFAULT_MODEL_FILE));
        assert!(loader.strict_schema);
    }
}

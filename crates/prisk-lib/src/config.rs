//! Run configuration
//!
//! The tool reads no configuration files or environment variables; every
//! knob arrives through the command line and lands here.

use std::path::PathBuf;

use crate::loader::DEFAULT_MODEL_FILE;

/// Configuration for one scoring run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Artifact file name, resolved next to the executable
    pub model_file: String,
    /// Directory to resolve the artifact in; `None` means the install directory
    pub model_dir: Option<PathBuf>,
    /// Validate the artifact's declared inputs against the feature schema
    pub strict_schema: bool,
    /// Expected SHA256 of the artifact, hex encoded
    pub expected_sha256: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_file: DEFAULT_MODEL_FILE.to_string(),
            model_dir: None,
            strict_schema: false,
            expected_sha256: None,
        }
    }
}

//! Error taxonomy for a scoring run
//!
//! Every variant is terminal. The binary renders any of them as a single
//! `ERROR:` line and exits with the same status.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::NUM_FEATURES;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{expected} arguments required (P T Vit_P Vit_T Instab_P Ratio_PT Corr_PT), got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("invalid argument {position} ({name}): {raw:?} is not a finite number")]
    ArgumentFormat {
        position: usize,
        name: &'static str,
        raw: String,
    },

    #[error("model not found at {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("unable to load model {}: {source:#}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("prediction failed: {source:#}")]
    Prediction {
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid command line: {0}")]
    InvalidOption(String),
}

impl PredictError {
    pub fn argument_count(actual: usize) -> Self {
        Self::ArgumentCount {
            expected: NUM_FEATURES,
            actual,
        }
    }
}

pub type PredictResult<T> = Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_argument_count_message() {
        let err = PredictError::argument_count(6);
        assert_eq!(
            err.to_string(),
            "7 arguments required (P T Vit_P Vit_T Instab_P Ratio_PT Corr_PT), got 6"
        );
    }

    #[test]
    fn test_model_load_includes_cause_chain() {
        let source = anyhow!("truncated protobuf").context("Failed to parse ONNX model");
        let err = PredictError::ModelLoad {
            path: PathBuf::from("/opt/prisk/risk_model.onnx"),
            source,
        };
        let message = err.to_string();
        assert!(message.contains("/opt/prisk/risk_model.onnx"));
        assert!(message.contains("Failed to parse ONNX model: truncated protobuf"));
    }
}

//! Risk scoring library for the PRISK pressure line monitor
//!
//! This crate provides the core functionality for:
//! - Validating the seven feature arguments
//! - Framing features as structured and positional model inputs
//! - Loading the trained ONNX artifact next to the executable
//! - Dispatching predictions with a positional fallback
//! - Normalizing, formatting and reporting the result

pub mod args;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod report;

pub use config::RunConfig;
pub use error::PredictError;
pub use loader::{ModelInfo, ModelLoader, DEFAULT_MODEL_FILE};
pub use models::*;
pub use predictor::{
    Capability, Dispatch, FeatureView, Model, PointEstimator, PointOutput, PredictionDispatcher,
    ProbabilityEstimator, Representation,
};

/// Run the full pipeline: validate, load, predict, normalize.
///
/// Arguments are validated before the artifact is touched.
pub fn score(config: &RunConfig, raw_args: &[String]) -> Result<ScoreReport, PredictError> {
    let features = args::validate(raw_args)?;
    let (model, _info) = ModelLoader::from_config(config)?.load()?;
    score_features(&model, &features)
}

/// Run the pipeline against an already loaded model
pub fn score_with_model(model: &Model, raw_args: &[String]) -> Result<ScoreReport, PredictError> {
    let features = args::validate(raw_args)?;
    score_features(model, &features)
}

fn score_features(model: &Model, features: &FeatureVector) -> Result<ScoreReport, PredictError> {
    let dispatch = PredictionDispatcher::new(model).dispatch(features)?;
    Ok(ScoreReport::new(features, model.capability(), &dispatch))
}

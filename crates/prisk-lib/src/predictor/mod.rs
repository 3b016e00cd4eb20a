//! ML prediction engine

mod dispatch;
mod features;
mod inference;
pub mod output;


pub use dispatch::{Dispatch, PredictionDispatcher};
pub use features::{FeatureView, Representation, StructuredRow};
pub use inference::{check_input_schema, classify_outputs, OnnxModel};
pub use output::{RiskLevel, RiskScore};

use anyhow::Result;
use serde::Serialize;

/// Models that estimate a distribution over classes
pub trait ProbabilityEstimator {
    /// Class probabilities for a single row
    fn predict_proba(&self, input: &FeatureView) -> Result<Vec<f64>>;
}

/// Models that produce a direct score
pub trait PointEstimator {
    fn predict(&self, input: &FeatureView) -> Result<PointOutput>;
}

/// Raw output of a point estimate
#[derive(Debug, Clone, PartialEq)]
pub enum PointOutput {
    Scalar(f64),
    Sequence(Vec<f64>),
}

/// Prediction capability of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Probabilistic,
    PointEstimate,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Probabilistic => write!(f, "probabilistic"),
            Capability::PointEstimate => write!(f, "point_estimate"),
        }
    }
}

/// A loaded model, classified by capability once at load time
pub enum Model {
    Probabilistic(Box<dyn ProbabilityEstimator>),
    PointEstimate(Box<dyn PointEstimator>),
}

impl Model {
    pub fn capability(&self) -> Capability {
        match self {
            Model::Probabilistic(_) => Capability::Probabilistic,
            Model::PointEstimate(_) => Capability::PointEstimate,
        }
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Model").field(&self.capability()).finish()
    }
}

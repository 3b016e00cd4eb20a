//! Prediction dispatch with a two-tier input fallback
//!
//! The structured view is tried first so column drift surfaces as an error
//! instead of a silent mis-score. Only when the model rejects it is the
//! positional view tried, exactly once.

use anyhow::{bail, Result};
use tracing::{debug, info};

use super::features::{FeatureView, Representation};
use super::{Model, PointOutput};
use crate::error::{PredictError, PredictResult};
use crate::models::FeatureVector;

/// Raw score together with the representation that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispatch {
    pub raw_score: f64,
    pub representation: Representation,
}

pub struct PredictionDispatcher<'m> {
    model: &'m Model,
}

impl<'m> PredictionDispatcher<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    pub fn dispatch(&self, features: &FeatureVector) -> PredictResult<Dispatch> {
        let primary = FeatureView::structured(features);
        let primary_error = match self.attempt(&primary) {
            Ok(raw_score) => {
                return Ok(self.accepted(raw_score, Representation::Structured));
            }
            Err(e) => e,
        };

        debug!(
            capability = %self.model.capability(),
            error = %format!("{:#}", primary_error),
            "Structured input rejected, retrying with positional input"
        );

        let fallback = FeatureView::positional(features);
        match self.attempt(&fallback) {
            Ok(raw_score) => Ok(self.accepted(raw_score, Representation::Positional)),
            Err(source) => Err(PredictError::Prediction { source }),
        }
    }

    fn accepted(&self, raw_score: f64, representation: Representation) -> Dispatch {
        info!(
            capability = %self.model.capability(),
            representation = %representation,
            raw_score,
            "Prediction completed"
        );
        Dispatch {
            raw_score,
            representation,
        }
    }

    /// One attempt against one representation
    fn attempt(&self, input: &FeatureView) -> Result<f64> {
        let score = match self.model {
            Model::Probabilistic(model) => score_distribution(&model.predict_proba(input)?)?,
            Model::PointEstimate(model) => score_point(model.predict(input)?)?,
        };
        if score.is_nan() {
            bail!("Model produced a NaN score");
        }
        Ok(score)
    }
}

/// Max-class confidence is taken as the risk magnitude
fn score_distribution(distribution: &[f64]) -> Result<f64> {
    match distribution {
        [] => bail!("Model returned an empty probability distribution"),
        [only] => Ok(*only),
        _ => Ok(distribution.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
    }
}

fn score_point(output: PointOutput) -> Result<f64> {
    match output {
        PointOutput::Scalar(value) => Ok(value),
        PointOutput::Sequence(values) => match values.first() {
            Some(first) => Ok(*first),
            None => bail!("Model returned an empty prediction"),
        },
    }
}

//! ONNX inference using tract
//!
//! The artifact is parsed once. A runnable plan is only built when an
//! attempt is made, because the input facts differ between the structured
//! binding (one `[1,1]` input per column) and the positional binding (one
//! `[1,7]` input).

use anyhow::{bail, Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::debug;

use super::features::FeatureView;
use super::{Capability, Model, PointEstimator, PointOutput, ProbabilityEstimator};
use crate::models::{FEATURE_NAMES, NUM_FEATURES};

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Pick the output a model is scored on.
///
/// Classifiers expose a `probabilities` (or `output_probability`) tensor next
/// to the label; anything without one is a point estimator and scored on its
/// first output. sklearn-onnx classifiers must be exported with
/// `zipmap=False`: a ZipMap output is a sequence of maps, not a tensor, and
/// fails both input tiers.
pub fn classify_outputs<S: AsRef<str>>(names: &[S]) -> Option<(Capability, usize)> {
    if names.is_empty() {
        return None;
    }
    let probability = names
        .iter()
        .position(|name| name.as_ref().to_ascii_lowercase().contains("prob"));
    Some(match probability {
        Some(index) => (Capability::Probabilistic, index),
        None => (Capability::PointEstimate, 0),
    })
}

/// Accept seven inputs named exactly like the feature columns, in order,
/// or a single positional input.
pub fn check_input_schema<S: AsRef<str>>(input_names: &[S]) -> Result<()> {
    match input_names.len() {
        1 => Ok(()),
        NUM_FEATURES => {
            let pairs = input_names.iter().zip(FEATURE_NAMES);
            for (position, (declared, expected)) in pairs.enumerate() {
                if declared.as_ref() != expected {
                    bail!(
                        "Input {} is named {:?}, expected {:?}",
                        position + 1,
                        declared.as_ref(),
                        expected
                    );
                }
            }
            Ok(())
        }
        n => bail!(
            "Model declares {} inputs, expected {} named columns or 1 positional input",
            n,
            NUM_FEATURES
        ),
    }
}

/// ONNX-backed model
pub struct OnnxModel {
    graph: InferenceModel,
    input_names: Vec<String>,
    output: OutletId,
    capability: Capability,
}

impl OnnxModel {
    /// Parse an ONNX model from bytes and classify its capability
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        let graph = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?;

        let input_names = graph
            .input_outlets()?
            .iter()
            .map(|outlet| graph.node(outlet.node).name.clone())
            .collect();

        let outputs = graph.output_outlets()?.to_vec();
        let output_names: Vec<String> = outputs
            .iter()
            .map(|outlet| {
                graph
                    .outlet_label(*outlet)
                    .map(str::to_string)
                    .unwrap_or_else(|| graph.node(outlet.node).name.clone())
            })
            .collect();

        let (capability, index) = classify_outputs(&output_names)
            .context("Model declares no outputs to score")?;

        debug!(
            inputs = ?input_names,
            outputs = ?output_names,
            capability = %capability,
            scored_output = %output_names[index],
            "Parsed ONNX model"
        );

        Ok(Self {
            graph,
            input_names,
            output: outputs[index],
            capability,
        })
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Check the declared inputs against the training-time feature schema
    pub fn check_schema(&self) -> Result<()> {
        check_input_schema(&self.input_names)
    }

    /// Wrap as a model of the detected capability
    pub fn into_model(self) -> Model {
        match self.capability {
            Capability::Probabilistic => Model::Probabilistic(Box::new(self)),
            Capability::PointEstimate => Model::PointEstimate(Box::new(self)),
        }
    }

    /// Optimize the graph for one input binding
    fn plan(&self, input_shape: [usize; 2]) -> Result<TractModel> {
        let mut graph = self.graph.clone();
        for index in 0..self.input_names.len() {
            graph = graph.with_input_fact(index, f32::fact(input_shape).into())?;
        }
        graph.set_output_outlets(&[self.output])?;
        let plan = graph
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(plan)
    }

    /// Convert a feature view into plan inputs
    fn bind(&self, input: &FeatureView) -> Result<(TractModel, TVec<TValue>)> {
        match input {
            FeatureView::Structured(row) => {
                if self.input_names.len() != NUM_FEATURES {
                    bail!(
                        "Model declares {} inputs, named columns need {}",
                        self.input_names.len(),
                        NUM_FEATURES
                    );
                }
                let mut tensors: TVec<TValue> = TVec::new();
                for name in &self.input_names {
                    let value = row
                        .value(name)
                        .with_context(|| format!("Model input {:?} matches no feature column", name))?;
                    tensors.push(Tensor::from_shape(&[1, 1], &[value as f32])?.into());
                }
                Ok((self.plan([1, 1])?, tensors))
            }
            FeatureView::Positional(values) => {
                if self.input_names.len() != 1 {
                    bail!(
                        "Model declares {} inputs, positional row needs 1",
                        self.input_names.len()
                    );
                }
                let row: Vec<f32> = values.iter().map(|v| *v as f32).collect();
                let tensor = Tensor::from_shape(&[1, NUM_FEATURES], &row)?;
                Ok((self.plan([1, NUM_FEATURES])?, tvec!(tensor.into())))
            }
        }
    }

    /// Run the scored output for one view, returned as f32 values with its rank
    fn run(&self, input: &FeatureView) -> Result<(usize, Vec<f32>)> {
        let start = Instant::now();
        let (plan, inputs) = self.bind(input)?;
        let result = plan.run(inputs)?;
        let output = result.first().context("No output from model")?;
        let values = output
            .cast_to::<f32>()
            .context("Model output is not numeric")?
            .as_slice::<f32>()?
            .to_vec();

        debug!(
            representation = %input.representation(),
            elapsed_us = start.elapsed().as_micros() as u64,
            shape = ?output.shape(),
            "Inference completed"
        );
        Ok((output.rank(), values))
    }
}

impl ProbabilityEstimator for OnnxModel {
    fn predict_proba(&self, input: &FeatureView) -> Result<Vec<f64>> {
        let (_, values) = self.run(input)?;
        Ok(values.into_iter().map(f64::from).collect())
    }
}

impl PointEstimator for OnnxModel {
    fn predict(&self, input: &FeatureView) -> Result<PointOutput> {
        let (rank, values) = self.run(input)?;
        if rank == 0 {
            let value = values.first().context("Model returned an empty scalar")?;
            return Ok(PointOutput::Scalar(f64::from(*value)));
        }
        Ok(PointOutput::Sequence(values.into_iter().map(f64::from).collect()))
    }
}

//! Core data models for risk scoring

use serde::{Deserialize, Serialize};

use crate::predictor::output::{self, RiskLevel, RiskScore};
use crate::predictor::{Capability, Dispatch, Representation};

/// Number of features the model was trained on
pub const NUM_FEATURES: usize = 7;

/// Feature column names, in training-time order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["P", "T", "Vit_P", "Vit_T", "Instab_P", "Ratio_PT", "Corr_PT"];

/// Feature vector for ML inference
///
/// Field order mirrors `FEATURE_NAMES`. Nothing checks it against the
/// artifact unless strict schema validation is requested at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Current pressure (bar)
    #[serde(rename = "P")]
    pub pressure: f64,
    /// Current temperature (°C)
    #[serde(rename = "T")]
    pub temperature: f64,
    /// Pressure rate of change (bar/min)
    #[serde(rename = "Vit_P")]
    pub pressure_rate: f64,
    /// Temperature rate of change (°C/min)
    #[serde(rename = "Vit_T")]
    pub temperature_rate: f64,
    /// Pressure instability (standard deviation over the window)
    #[serde(rename = "Instab_P")]
    pub pressure_instability: f64,
    /// Pressure / temperature ratio
    #[serde(rename = "Ratio_PT")]
    pub pressure_temperature_ratio: f64,
    /// Pressure-temperature correlation
    #[serde(rename = "Corr_PT")]
    pub pressure_temperature_correlation: f64,
}

impl FeatureVector {
    pub fn from_array(values: [f64; NUM_FEATURES]) -> Self {
        let [
            pressure,
            temperature,
            pressure_rate,
            temperature_rate,
            pressure_instability,
            pressure_temperature_ratio,
            pressure_temperature_correlation,
        ] = values;
        Self {
            pressure,
            temperature,
            pressure_rate,
            temperature_rate,
            pressure_instability,
            pressure_temperature_ratio,
            pressure_temperature_correlation,
        }
    }

    /// Values in training-time order
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.pressure,
            self.temperature,
            self.pressure_rate,
            self.temperature_rate,
            self.pressure_instability,
            self.pressure_temperature_ratio,
            self.pressure_temperature_correlation,
        ]
    }
}

/// Final result of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    /// Clamped score rounded to the rendered precision
    pub score: f64,
    pub formatted: String,
    pub risk_level: RiskLevel,
    pub tbe_minutes: Option<f64>,
    pub capability: Capability,
    pub representation: Representation,
}

impl ScoreReport {
    pub fn new(features: &FeatureVector, capability: Capability, dispatch: &Dispatch) -> Self {
        let score = RiskScore::clamped(dispatch.raw_score);
        Self {
            score: score.rounded(),
            formatted: score.to_string(),
            risk_level: score.level(),
            tbe_minutes: output::time_before_exceedance(features.pressure, features.pressure_rate),
            capability,
            representation: dispatch.representation,
        }
    }
}

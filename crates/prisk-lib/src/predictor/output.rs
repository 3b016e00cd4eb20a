//! Prediction output normalization and post-processing
//!
//! Handles clamping of raw model outputs into a risk score, the fixed-point
//! rendering written to stdout, and the derived risk level and
//! time-before-exceedance figures.

use serde::Serialize;

/// Decimal places in the rendered score
pub const SCORE_DECIMALS: usize = 6;

/// Pressure threshold used for time-before-exceedance (bar)
pub const PRESSURE_LIMIT_BAR: f64 = 10.0;

/// Score thresholds for risk levels
pub const CRITICAL_THRESHOLD: f64 = 0.85;
pub const HIGH_THRESHOLD: f64 = 0.65;
pub const MEDIUM_THRESHOLD: f64 = 0.35;

/// A risk score in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RiskScore(f64);

impl RiskScore {
    /// Clamp a raw score; regressors can land outside the unit interval.
    pub fn clamped(raw: f64) -> Self {
        let value = raw.clamp(0.0, 1.0);
        // -0.0 would otherwise render as "-0.000000"
        Self(if value == 0.0 { 0.0 } else { value })
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Value rounded to `SCORE_DECIMALS`, dropping f32 output noise
    pub fn rounded(self) -> f64 {
        let scale = 10f64.powi(SCORE_DECIMALS as i32);
        (self.0 * scale).round() / scale
    }

    pub fn level(self) -> RiskLevel {
        RiskLevel::from_score(self.0)
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", SCORE_DECIMALS, self.0)
    }
}

/// Coarse risk classification of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Minutes until pressure reaches the limit at the current rate.
///
/// `None` means a stable line: already at or above the limit, or pressure
/// not rising.
pub fn time_before_exceedance(pressure: f64, pressure_rate: f64) -> Option<f64> {
    if pressure >= PRESSURE_LIMIT_BAR || pressure_rate <= 0.0 {
        return None;
    }
    Some((PRESSURE_LIMIT_BAR - pressure) / pressure_rate)
}

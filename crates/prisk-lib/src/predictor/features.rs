//! Framing of the feature vector for model consumption
//!
//! Trained artifacts disagree on how they validate input: some bind named
//! columns, others only accept a bare row. Both views carry the same values
//! in the same training-time order.

use serde::Serialize;

use crate::models::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};

/// Which representation an attempt was made with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    Structured,
    Positional,
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Representation::Structured => write!(f, "structured"),
            Representation::Positional => write!(f, "positional"),
        }
    }
}

/// A single row of named columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuredRow {
    columns: [(&'static str, f64); NUM_FEATURES],
}

impl StructuredRow {
    pub fn columns(&self) -> &[(&'static str, f64); NUM_FEATURES] {
        &self.columns
    }

    /// Look up a column by its training-time name
    pub fn value(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| *value)
    }
}

/// Model input, either named columns or a positional row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureView {
    Structured(StructuredRow),
    Positional([f64; NUM_FEATURES]),
}

impl FeatureView {
    pub fn structured(features: &FeatureVector) -> Self {
        let values = features.to_array();
        let mut columns = [("", 0.0); NUM_FEATURES];
        for (slot, (name, value)) in columns.iter_mut().zip(FEATURE_NAMES.iter().zip(values)) {
            *slot = (*name, value);
        }
        FeatureView::Structured(StructuredRow { columns })
    }

    pub fn positional(features: &FeatureVector) -> Self {
        FeatureView::Positional(features.to_array())
    }

    pub fn representation(&self) -> Representation {
        match self {
            FeatureView::Structured(_) => Representation::Structured,
            FeatureView::Positional(_) => Representation::Positional,
        }
    }
}

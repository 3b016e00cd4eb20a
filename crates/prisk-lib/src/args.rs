//! Validation of the seven positional feature arguments

use crate::error::{PredictError, PredictResult};
use crate::models::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};

/// Parse the raw arguments (program name excluded) into a feature vector.
///
/// Fails on the first malformed entry, reporting its 1-based position.
pub fn validate(raw_args: &[String]) -> PredictResult<FeatureVector> {
    if raw_args.len() != NUM_FEATURES {
        return Err(PredictError::argument_count(raw_args.len()));
    }

    let mut values = [0.0; NUM_FEATURES];
    for (i, raw) in raw_args.iter().enumerate() {
        values[i] = parse_feature(i, raw)?;
    }

    Ok(FeatureVector::from_array(values))
}

fn parse_feature(index: usize, raw: &str) -> PredictResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PredictError::ArgumentFormat {
            position: index + 1,
            name: FEATURE_NAMES[index],
            raw: raw.to_string(),
        }),
    }
}

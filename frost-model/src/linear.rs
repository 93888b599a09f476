use frost_core::{ForecastError, Result};
use frost_data::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// A standardized linear function of the feature vector:
/// `intercept + sum(coef_i * (x_i - mean_i) / scale_i)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub feature_means: Vec<f64>,
    pub feature_scales: Vec<f64>,
}

impl LinearModel {
    /// A model on raw (unscaled) features.
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> LinearModel {
        let width = coefficients.len();
        LinearModel {
            intercept,
            coefficients,
            feature_means: vec![0.0; width],
            feature_scales: vec![1.0; width],
        }
    }

    /// Check the model fits a feature vector of `width` and holds usable numbers.
    pub fn validate(&self, width: usize) -> Result<()> {
        for (name, len) in [
            ("coefficients", self.coefficients.len()),
            ("feature_means", self.feature_means.len()),
            ("feature_scales", self.feature_scales.len()),
        ] {
            if len != width {
                return Err(ForecastError::ModelUnavailable(format!(
                    "{name} has {len} entries, expected {width}"
                )));
            }
        }
        let all_finite = std::iter::once(&self.intercept)
            .chain(&self.coefficients)
            .chain(&self.feature_means)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ForecastError::ModelUnavailable(
                "weights contain non-finite values".to_string(),
            ));
        }
        if self.feature_scales.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ForecastError::ModelUnavailable(
                "feature scales must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Raw linear output for one feature vector.
    pub fn decision(&self, features: &FeatureVector) -> f64 {
        features
            .as_slice()
            .iter()
            .zip(&self.coefficients)
            .zip(self.feature_means.iter().zip(&self.feature_scales))
            .map(|((x, coef), (mean, scale))| coef * (x - mean) / scale)
            .sum::<f64>()
            + self.intercept
    }
}

/// Predicts the next day's minimum temperature (degC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemperatureRegressor(pub LinearModel);

impl TemperatureRegressor {
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        self.0.decision(features)
    }
}

/// Logistic model of the next day's minimum being at or below the frost
/// threshold; the decision value is a log-odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrostClassifier(pub LinearModel);

impl FrostClassifier {
    /// Frost probability in percent.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let decision = self.0.decision(features);
        (100.0 / (1.0 + (-decision).exp())).clamp(0.0, 100.0)
    }

    /// Hard label: positive decision means frost.
    pub fn predicts_frost(&self, features: &FeatureVector) -> bool {
        self.0.decision(features) > 0.0
    }
}

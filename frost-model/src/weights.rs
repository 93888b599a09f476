use crate::linear::{FrostClassifier, TemperatureRegressor};
use chrono::NaiveDate;
use frost_core::risk::FROST_THRESHOLD_C;
use frost_core::{ForecastError, Result};
use frost_data::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weight file layout version understood by this build.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Where a set of weights came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub alpha: f64,
    /// Share of training targets at or below the frost threshold, in percent.
    pub frost_rate: f64,
}

/// Output of both models for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub temperature: f64,
    pub frost_probability: f64,
}

/// The pair of next-day models plus the metadata needed to trust them.
///
/// Immutable after loading; share it behind an `Arc` rather than
/// reloading per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrostModels {
    pub version: u32,
    pub feature_names: Vec<String>,
    pub temperature: TemperatureRegressor,
    pub frost: FrostClassifier,
    #[serde(default = "default_frost_threshold")]
    pub frost_threshold: f64,
    #[serde(default)]
    pub trained_on: Option<TrainingSummary>,
}

fn default_frost_threshold() -> f64 {
    FROST_THRESHOLD_C
}

impl FrostModels {
    pub fn new(temperature: TemperatureRegressor, frost: FrostClassifier) -> Result<FrostModels> {
        let models = FrostModels {
            version: MODEL_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            temperature,
            frost,
            frost_threshold: FROST_THRESHOLD_C,
            trained_on: None,
        };
        models.validate()?;
        Ok(models)
    }

    /// Reject weights written for another format or feature layout.
    pub fn validate(&self) -> Result<()> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(ForecastError::ModelUnavailable(format!(
                "weight format version {} is not supported (expected {})",
                self.version, MODEL_FORMAT_VERSION
            )));
        }
        if self.feature_names != FEATURE_NAMES {
            return Err(ForecastError::ModelUnavailable(format!(
                "feature layout {:?} does not match {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        if !self.frost_threshold.is_finite() {
            return Err(ForecastError::ModelUnavailable(
                "frost threshold must be finite".to_string(),
            ));
        }
        self.temperature.0.validate(FEATURE_COUNT)?;
        self.frost.0.validate(FEATURE_COUNT)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<FrostModels> {
        let models: FrostModels = serde_json::from_str(json)
            .map_err(|e| ForecastError::ModelUnavailable(format!("unreadable weights: {e}")))?;
        models.validate()?;
        Ok(models)
    }

    /// Load and validate a weight file.
    pub fn load(path: &Path) -> Result<FrostModels> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::ModelUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let models = FrostModels::from_json(&json)?;
        log::info!(
            "[Frost] models: loaded weights from {} ({})",
            path.display(),
            models
                .trained_on
                .as_ref()
                .map_or("no training summary".to_string(), |t| format!(
                    "{} rows, {} to {}",
                    t.rows, t.first_date, t.last_date
                ))
        );
        Ok(models)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::ModelUnavailable(format!("cannot encode weights: {e}")))
    }

    /// Write the weights as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| {
            ForecastError::ModelUnavailable(format!("cannot write {}: {e}", path.display()))
        })
    }

    /// Run both models on one feature vector.
    pub fn infer(&self, features: &FeatureVector) -> Inference {
        Inference {
            temperature: self.temperature.predict(features),
            frost_probability: self.frost.probability(features),
        }
    }
}

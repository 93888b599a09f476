//! Feature vectors for next-day minimum temperature models.
//!
//! A vector for target day T is computed from the seven records ending at
//! T-1. Observed, bridged and predicted records are treated alike.

use chrono::{Datelike, NaiveDate};
use frost_core::{DailyRecord, ForecastError, Result};
use std::f64::consts::TAU;

/// Days of history each feature vector looks at.
pub const FEATURE_WINDOW_DAYS: usize = 7;

/// Width of every feature vector.
pub const FEATURE_COUNT: usize = 8;

/// Feature order shared by training, weight files and inference.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "lag_1", "lag_2", "lag_3", "mean_7d", "min_7d", "max_7d", "doy_sin", "doy_cos",
];

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Minimum temperature of the day before the target.
    pub fn lag_1(&self) -> f64 {
        self.0[0]
    }
}

/// Position of `date` in the seasonal cycle as (sin, cos).
pub fn seasonal_terms(date: NaiveDate) -> (f64, f64) {
    let angle = TAU * date.ordinal0() as f64 / DAYS_PER_YEAR;
    (angle.sin(), angle.cos())
}

/// Build the feature vector predicting `target` from the records ending
/// the day before it.
///
/// `window` is oldest first; only its last [`FEATURE_WINDOW_DAYS`]
/// records are used and they must be consecutive days ending at
/// `target - 1`.
pub fn build_features(window: &[DailyRecord], target: NaiveDate) -> Result<FeatureVector> {
    if window.len() < FEATURE_WINDOW_DAYS {
        return Err(ForecastError::InsufficientHistory {
            needed: FEATURE_WINDOW_DAYS,
            found: window.len(),
        });
    }
    let recent = &window[window.len() - FEATURE_WINDOW_DAYS..];
    let expected_end = target.pred_opt();
    if recent.last().map(|r| r.date) != expected_end {
        return Err(ForecastError::InvalidHistory(format!(
            "feature window for {target} must end the day before, found {:?}",
            recent.last().map(|r| r.date)
        )));
    }
    if recent
        .windows(2)
        .any(|w| (w[1].date - w[0].date).num_days() != 1)
    {
        return Err(ForecastError::InvalidHistory(format!(
            "feature window for {target} is not consecutive days"
        )));
    }

    let values: Vec<f64> = recent.iter().map(|r| r.min_temperature).collect();
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (doy_sin, doy_cos) = seasonal_terms(target);

    Ok(FeatureVector([
        values[n - 1],
        values[n - 2],
        values[n - 3],
        mean,
        min,
        max,
        doy_sin,
        doy_cos,
    ]))
}

/// Every (features, next-day minimum) pair a record slice supports.
///
/// Targets whose preceding window crosses a hole in the dates are left
/// out rather than failing the whole set.
pub fn training_rows(records: &[DailyRecord]) -> Vec<(FeatureVector, f64)> {
    (FEATURE_WINDOW_DAYS..records.len())
        .filter_map(|i| {
            let target = &records[i];
            build_features(&records[i - FEATURE_WINDOW_DAYS..i], target.date)
                .ok()
                .map(|features| (features, target.min_temperature))
        })
        .collect()
}

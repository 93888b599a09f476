use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A day counts as a frost day when its minimum is at or below this (degC).
pub const FROST_THRESHOLD_C: f64 = 0.0;

/// Highest predicted minimum still rated `Extremo` (degC).
pub const EXTREME_RISK_MAX_C: f64 = -2.0;

/// Highest predicted minimum still rated `Alto` (degC).
pub const HIGH_RISK_MAX_C: f64 = 0.0;

/// Highest predicted minimum still rated `Moderado` (degC).
pub const MODERATE_RISK_MAX_C: f64 = 2.0;

/// Frost danger, declared from least to most severe so the derived
/// ordering is the severity ordering.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Bajo,
    Moderado,
    Alto,
    Extremo,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Bajo => "Bajo",
            RiskLevel::Moderado => "Moderado",
            RiskLevel::Alto => "Alto",
            RiskLevel::Extremo => "Extremo",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper bounds (inclusive, degC) of each risk band.
///
/// Bands must be ordered `extremo_max <= alto_max <= moderado_max`;
/// anything warmer than `moderado_max` is `Bajo`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub extremo_max: f64,
    pub alto_max: f64,
    pub moderado_max: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            extremo_max: EXTREME_RISK_MAX_C,
            alto_max: HIGH_RISK_MAX_C,
            moderado_max: MODERATE_RISK_MAX_C,
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.extremo_max, self.alto_max, self.moderado_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ForecastError::InvalidConfig(
                "risk thresholds must be finite".to_string(),
            ));
        }
        if !(self.extremo_max <= self.alto_max && self.alto_max <= self.moderado_max) {
            return Err(ForecastError::InvalidConfig(format!(
                "risk thresholds out of order: extremo {} / alto {} / moderado {}",
                self.extremo_max, self.alto_max, self.moderado_max
            )));
        }
        Ok(())
    }

    /// Rate a predicted minimum temperature.
    pub fn classify(&self, predicted_temperature: f64) -> RiskLevel {
        if predicted_temperature <= self.extremo_max {
            RiskLevel::Extremo
        } else if predicted_temperature <= self.alto_max {
            RiskLevel::Alto
        } else if predicted_temperature <= self.moderado_max {
            RiskLevel::Moderado
        } else {
            RiskLevel::Bajo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_band_edges() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(-2.0), RiskLevel::Extremo);
        assert_eq!(t.classify(-1.99), RiskLevel::Alto);
        assert_eq!(t.classify(0.0), RiskLevel::Alto);
        assert_eq!(t.classify(0.01), RiskLevel::Moderado);
        assert_eq!(t.classify(2.0), RiskLevel::Moderado);
        assert_eq!(t.classify(2.01), RiskLevel::Bajo);
    }

    #[test]
    fn classify_is_monotonic_in_temperature() {
        let t = RiskThresholds::default();
        let temps: Vec<f64> = (-80..=80).map(|i| i as f64 * 0.1).collect();
        for pair in temps.windows(2) {
            // colder never rates less severe
            assert!(t.classify(pair[0]) >= t.classify(pair[1]));
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(RiskLevel::Extremo > RiskLevel::Alto);
        assert!(RiskLevel::Alto > RiskLevel::Moderado);
        assert!(RiskLevel::Moderado > RiskLevel::Bajo);
    }

    #[test]
    fn validate_rejects_unordered_bands() {
        let t = RiskThresholds {
            extremo_max: 1.0,
            alto_max: 0.0,
            moderado_max: 2.0,
        };
        assert!(matches!(t.validate(), Err(ForecastError::InvalidConfig(_))));
        assert!(RiskThresholds::default().validate().is_ok());
    }

    #[test]
    fn risk_level_serializes_as_label() {
        let json = serde_json::to_string(&RiskLevel::Moderado).unwrap();
        assert_eq!(json, "\"Moderado\"");
        assert_eq!(RiskLevel::Extremo.to_string(), "Extremo");
    }
}

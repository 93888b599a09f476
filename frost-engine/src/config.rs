use frost_core::risk::FROST_THRESHOLD_C;
use frost_core::{ForecastError, Result, RiskThresholds};
use frost_data::bridging::BridgeParams;
use frost_data::features::FEATURE_WINDOW_DAYS;
use serde::{Deserialize, Serialize};

/// Real days required before a forecast is attempted.
pub const DEFAULT_MIN_HISTORY_DAYS: usize = 30;

/// Days forecast after the query date.
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// Trailing days returned for charting.
pub const CHART_HISTORY_DAYS: usize = 30;

/// Trailing days summarized as mean/min/max next to the forecast.
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// Tunables for one engine instance.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub min_history_days: usize,
    pub horizon_days: usize,
    pub chart_history_days: usize,
    pub rolling_window_days: usize,
    pub frost_threshold: f64,
    pub bridge: BridgeParams,
    pub risk: RiskThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_history_days: DEFAULT_MIN_HISTORY_DAYS,
            horizon_days: FORECAST_HORIZON_DAYS,
            chart_history_days: CHART_HISTORY_DAYS,
            rolling_window_days: ROLLING_WINDOW_DAYS,
            frost_threshold: FROST_THRESHOLD_C,
            bridge: BridgeParams::default(),
            risk: RiskThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_history_days < FEATURE_WINDOW_DAYS {
            return Err(ForecastError::InvalidConfig(format!(
                "min_history_days {} is below the {}-day feature window",
                self.min_history_days, FEATURE_WINDOW_DAYS
            )));
        }
        if self.horizon_days == 0 {
            return Err(ForecastError::InvalidConfig(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if self.chart_history_days == 0 || self.rolling_window_days == 0 {
            return Err(ForecastError::InvalidConfig(
                "chart and rolling windows must be at least 1 day".to_string(),
            ));
        }
        if !self.frost_threshold.is_finite() {
            return Err(ForecastError::InvalidConfig(
                "frost_threshold must be finite".to_string(),
            ));
        }
        self.bridge.validate()?;
        self.risk.validate()
    }

    /// Records to read from the store, enough for every window at once.
    pub fn history_window_days(&self) -> usize {
        [
            self.min_history_days,
            self.bridge.window_days,
            self.chart_history_days,
            self.rolling_window_days,
            FEATURE_WINDOW_DAYS,
        ]
        .into_iter()
        .max()
        .unwrap_or(FEATURE_WINDOW_DAYS)
    }
}

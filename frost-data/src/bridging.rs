//! Synthesis of the days between the last observation and yesterday.
//!
//! The station feed lags behind the calendar. Before forecasting, every
//! missing day up to the anchor date gets a placeholder value built from
//! persistence, a pull toward the recent mean, and a day-to-day change
//! picked from the real history. Values stay inside the envelope of the
//! seed window, and the pick is a pure function of the date so the same
//! inputs always bridge to the same numbers.

use chrono::{Datelike, NaiveDate};
use frost_core::date_range::DateRange;
use frost_core::{DailyRecord, ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Longest run of missing days that will be synthesized.
pub const DEFAULT_MAX_GAP_DAYS: i64 = 14;

/// Trailing real days used to seed the synthesis.
pub const DEFAULT_BRIDGE_WINDOW_DAYS: usize = 30;

/// Slack (degC) allowed beyond the seed window's min/max.
pub const DEFAULT_CLAMP_MARGIN_C: f64 = 1.0;

/// Fraction of the distance to the seed mean recovered each day.
pub const DEFAULT_MEAN_REVERSION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeParams {
    pub max_gap_days: i64,
    pub window_days: usize,
    pub clamp_margin: f64,
    pub mean_reversion: f64,
}

impl Default for BridgeParams {
    fn default() -> Self {
        BridgeParams {
            max_gap_days: DEFAULT_MAX_GAP_DAYS,
            window_days: DEFAULT_BRIDGE_WINDOW_DAYS,
            clamp_margin: DEFAULT_CLAMP_MARGIN_C,
            mean_reversion: DEFAULT_MEAN_REVERSION,
        }
    }
}

impl BridgeParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_gap_days < 0 {
            return Err(ForecastError::InvalidConfig(
                "max_gap_days must not be negative".to_string(),
            ));
        }
        if self.window_days < 2 {
            return Err(ForecastError::InvalidConfig(
                "bridge window needs at least 2 days".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mean_reversion) {
            return Err(ForecastError::InvalidConfig(format!(
                "mean_reversion {} outside [0, 1]",
                self.mean_reversion
            )));
        }
        if !(self.clamp_margin >= 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "clamp_margin {} must be a non-negative number",
                self.clamp_margin
            )));
        }
        Ok(())
    }
}

/// Days in `(last_real_date, through]`, zero when nothing is missing.
pub fn missing_days(last_real_date: NaiveDate, through: NaiveDate) -> i64 {
    (through - last_real_date).num_days().max(0)
}

/// Fail with [`ForecastError::StaleHistory`] when the gap is too long to bridge.
pub fn check_gap(last_real_date: NaiveDate, through: NaiveDate, params: &BridgeParams) -> Result<i64> {
    let missing = missing_days(last_real_date, through);
    if missing > params.max_gap_days {
        return Err(ForecastError::StaleHistory {
            last_real_date,
            missing_days: missing,
            max_gap_days: params.max_gap_days,
        });
    }
    Ok(missing)
}

/// splitmix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Which empirical delta a missing date draws.
fn perturbation_index(date: NaiveDate, len: usize) -> usize {
    (mix(date.num_days_from_ce() as u64) % len as u64) as usize
}

/// Synthesize one bridged record per day after the seed's last record,
/// through `through` inclusive.
///
/// `seed` is the trailing real window, oldest first, ending at the last
/// real date. Returns an empty vector when nothing is missing.
pub fn bridge_gap(
    seed: &[DailyRecord],
    through: NaiveDate,
    params: &BridgeParams,
) -> Result<Vec<DailyRecord>> {
    let Some(last) = seed.last() else {
        return Err(ForecastError::InsufficientHistory {
            needed: params.window_days,
            found: 0,
        });
    };
    let missing = check_gap(last.date, through, params)?;
    if missing == 0 {
        return Ok(Vec::new());
    }
    if seed.len() < params.window_days {
        return Err(ForecastError::InsufficientHistory {
            needed: params.window_days,
            found: seed.len(),
        });
    }

    let values: Vec<f64> = seed.iter().map(|r| r.min_temperature).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let floor = values.iter().copied().fold(f64::INFINITY, f64::min) - params.clamp_margin;
    let ceiling = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + params.clamp_margin;
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let mut previous = last.min_temperature;
    let bridged: Vec<DailyRecord> = DateRange::following(last.date, missing as u64)
        .map(|date| {
            let delta = deltas[perturbation_index(date, deltas.len())];
            let next = previous + params.mean_reversion * (mean - previous) + delta;
            previous = next.clamp(floor, ceiling);
            DailyRecord::bridged(date, previous)
        })
        .collect();

    log::info!(
        "[Frost] bridging: synthesized {} days from {} through {}",
        bridged.len(),
        last.date,
        through
    );
    Ok(bridged)
}

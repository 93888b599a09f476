//! Descriptive statistics over daily records.

use chrono::NaiveDate;
use frost_core::DailyRecord;
use serde::{Deserialize, Serialize};

/// Mean/min/max of a short trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingWindowStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub days: usize,
}

impl RollingWindowStats {
    /// `None` for an empty slice.
    pub fn from_records(records: &[DailyRecord]) -> Option<RollingWindowStats> {
        if records.is_empty() {
            return None;
        }
        let values = records.iter().map(|r| r.min_temperature);
        let sum: f64 = values.clone().sum();
        Some(RollingWindowStats {
            mean: sum / records.len() as f64,
            min: values.clone().fold(f64::INFINITY, f64::min),
            max: values.fold(f64::NEG_INFINITY, f64::max),
            days: records.len(),
        })
    }
}

/// Whole-history aggregates shown next to a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    #[serde(rename = "total_registros")]
    pub total_records: usize,
    #[serde(rename = "temp_promedio")]
    pub mean_temperature: f64,
    #[serde(rename = "heladas_totales")]
    pub frost_days: usize,
    #[serde(rename = "porcentaje_heladas")]
    pub frost_percentage: f64,
    #[serde(rename = "fecha_inicio")]
    pub first_date: Option<NaiveDate>,
    #[serde(rename = "fecha_fin")]
    pub last_date: Option<NaiveDate>,
    #[serde(rename = "temp_minima_absoluta")]
    pub absolute_min: Option<f64>,
    #[serde(rename = "temp_maxima_absoluta")]
    pub absolute_max: Option<f64>,
}

impl SummaryStatistics {
    /// Aggregate a date-sorted slice. Days at or below `frost_threshold`
    /// count as frost days.
    pub fn from_records(records: &[DailyRecord], frost_threshold: f64) -> SummaryStatistics {
        let total_records = records.len();
        let frost_days = records.iter().filter(|r| r.is_frost(frost_threshold)).count();
        let window = RollingWindowStats::from_records(records);
        SummaryStatistics {
            total_records,
            mean_temperature: window.map_or(0.0, |w| w.mean),
            frost_days,
            frost_percentage: frost_percentage(frost_days, total_records),
            first_date: records.first().map(|r| r.date),
            last_date: records.last().map(|r| r.date),
            absolute_min: window.map(|w| w.min),
            absolute_max: window.map(|w| w.max),
        }
    }
}

/// `frost_days / total * 100`, zero for an empty history.
pub fn frost_percentage(frost_days: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        frost_days as f64 / total as f64 * 100.0
    }
}

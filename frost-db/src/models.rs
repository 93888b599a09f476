//! Query result structs.

use serde::Serialize;

/// Frost tally for one calendar month of history.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyFrostSummary {
    /// `YYYY-MM`
    pub month: String,
    pub days: usize,
    pub frost_days: usize,
    pub mean_min_temperature: f64,
    pub lowest_temperature: f64,
}

//! Data processing for daily minimum-temperature history.
//!
//! This crate turns raw daily records into what the forecast models
//! consume: contiguous series, bridged recent days, feature vectors and
//! descriptive statistics.

pub mod bridging;
pub mod features;
pub mod stats;

/// Linear interpolation for filling holes inside the observed history.
pub mod interpolation {
    use frost_core::DailyRecord;

    /// Linearly interpolate between two records, filling in daily values.
    ///
    /// Returns one record per day from start to end (inclusive). The end
    /// points keep their own origin; interior days are tagged bridged and
    /// rounded to a tenth of a degree, the station's resolution.
    pub fn interpolate_pair(start: &DailyRecord, end: &DailyRecord) -> Vec<DailyRecord> {
        let days = (end.date - start.date).num_days();
        if days <= 0 {
            return vec![*start];
        }

        let slope = (end.min_temperature - start.min_temperature) / days as f64;
        let mut result = Vec::with_capacity((days + 1) as usize);
        result.push(*start);

        for i in 1..days {
            let date = start.date + chrono::Duration::days(i);
            let value = ((start.min_temperature + slope * i as f64) * 10.0).round() / 10.0;
            result.push(DailyRecord::bridged(date, value));
        }

        result.push(*end);
        result
    }

    /// Fill gaps in a date-sorted slice of records using linear interpolation.
    pub fn fill_gaps(records: &[DailyRecord]) -> Vec<DailyRecord> {
        let Some(last) = records.last() else {
            return Vec::new();
        };

        let mut result = Vec::with_capacity(records.len());
        for window in records.windows(2) {
            let start = &window[0];
            let end = &window[1];
            if (end.date - start.date).num_days() <= 1 {
                result.push(*start);
            } else {
                // the end point opens the next window
                let interpolated = interpolate_pair(start, end);
                result.extend_from_slice(&interpolated[..interpolated.len() - 1]);
            }
        }
        result.push(*last);

        let filled = result.len() - records.len();
        if filled > 0 {
            log::info!("[Frost] interpolation: filled {} interior days", filled);
        }
        result
    }

}

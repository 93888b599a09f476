use crate::daily_record::{parse_history_csv, DailyRecord, RecordOrigin};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// Read contract the forecast engine needs from a history source.
///
/// Implementations are read-only from the engine's point of view; the
/// engine never writes back, so a store can be shared between callers.
pub trait HistoricalStore {
    /// Date of the most recent observed (non-synthetic) record.
    fn latest_real_date(&self) -> Result<NaiveDate>;

    /// The `window_days` most recent records dated on or before `date`,
    /// oldest first.
    ///
    /// Fails with [`ForecastError::InsufficientHistory`] when fewer exist.
    fn series_ending_at(&self, date: NaiveDate, window_days: usize) -> Result<Vec<DailyRecord>>;

    /// Date of the oldest record.
    fn first_date(&self) -> Result<NaiveDate>;

    /// Every record, oldest first.
    fn all_records(&self) -> Result<Vec<DailyRecord>>;
}

/// An ordered daily series of minimum temperatures, one record per date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalSeries {
    records: Vec<DailyRecord>,
}

impl HistoricalSeries {
    /// Build a series from records already in strictly increasing date order.
    pub fn new(records: Vec<DailyRecord>) -> Result<HistoricalSeries> {
        if let Some(pair) = records.windows(2).find(|w| w[0].date >= w[1].date) {
            let reason = if pair[0].date == pair[1].date {
                "duplicate date"
            } else {
                "dates out of order"
            };
            return Err(ForecastError::InvalidHistory(format!(
                "{reason} at {} / {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(HistoricalSeries { records })
    }

    /// Parse a history CSV (see [`parse_history_csv`]), sorting rows by date.
    pub fn from_csv(csv_data: &str) -> Result<HistoricalSeries> {
        let mut parsed = parse_history_csv(csv_data)?;
        parsed.records.sort_by_key(|r| r.date);
        log::info!(
            "[Frost] history: parsed {} daily records ({} skipped)",
            parsed.records.len(),
            parsed.skipped
        );
        HistoricalSeries::new(parsed.records)
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DailyRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// A copy holding only the records dated on or before `date`.
    pub fn truncated_at(&self, date: NaiveDate) -> HistoricalSeries {
        let end = self.records.partition_point(|r| r.date <= date);
        HistoricalSeries {
            records: self.records[..end].to_vec(),
        }
    }
}

impl HistoricalStore for HistoricalSeries {
    fn latest_real_date(&self) -> Result<NaiveDate> {
        self.records
            .iter()
            .rev()
            .find(|r| r.origin == RecordOrigin::Observed)
            .map(|r| r.date)
            .ok_or(ForecastError::InsufficientHistory {
                needed: 1,
                found: 0,
            })
    }

    fn series_ending_at(&self, date: NaiveDate, window_days: usize) -> Result<Vec<DailyRecord>> {
        let end = self.records.partition_point(|r| r.date <= date);
        if end < window_days {
            return Err(ForecastError::InsufficientHistory {
                needed: window_days,
                found: end,
            });
        }
        Ok(self.records[end - window_days..end].to_vec())
    }

    fn first_date(&self) -> Result<NaiveDate> {
        self.records
            .first()
            .map(|r| r.date)
            .ok_or(ForecastError::InsufficientHistory {
                needed: 1,
                found: 0,
            })
    }

    fn all_records(&self) -> Result<Vec<DailyRecord>> {
        Ok(self.records.clone())
    }
}

use crate::Database;
use chrono::NaiveDate;
use frost_core::{DailyRecord, ForecastError, HistoricalStore, Result};

fn store_error(e: anyhow::Error) -> ForecastError {
    ForecastError::Store(format!("{e:#}"))
}

impl HistoricalStore for Database {
    fn latest_real_date(&self) -> Result<NaiveDate> {
        self.query_latest_observed_date()
            .map_err(store_error)?
            .ok_or(ForecastError::InsufficientHistory {
                needed: 1,
                found: 0,
            })
    }

    fn series_ending_at(&self, date: NaiveDate, window_days: usize) -> Result<Vec<DailyRecord>> {
        let records = self
            .query_trailing_records(date, window_days)
            .map_err(store_error)?;
        if records.len() < window_days {
            return Err(ForecastError::InsufficientHistory {
                needed: window_days,
                found: records.len(),
            });
        }
        Ok(records)
    }

    fn first_date(&self) -> Result<NaiveDate> {
        self.query_date_range()
            .map_err(store_error)?
            .map(|(first, _)| first)
            .ok_or(ForecastError::InsufficientHistory {
                needed: 1,
                found: 0,
            })
    }

    fn all_records(&self) -> Result<Vec<DailyRecord>> {
        self.query_all_records().map_err(store_error)
    }
}

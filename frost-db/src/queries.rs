//! Typed query methods over the daily history.
//!
//! Dates are stored as ISO `YYYY-MM-DD` text, so string comparison in SQL
//! orders them chronologically.

use crate::models::MonthlyFrostSummary;
use crate::Database;
use anyhow::anyhow;
use chrono::NaiveDate;
use frost_core::daily_record::DATE_FORMAT;
use frost_core::{DailyRecord, RecordOrigin};
use frost_data::stats::{frost_percentage, SummaryStatistics};
use rusqlite::{params, Row};

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| anyhow!("stored date {:?} is not {}: {}", raw, DATE_FORMAT, e))
}

fn raw_record(row: &Row<'_>) -> rusqlite::Result<(String, f64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn to_record((date, min_temperature, origin): (String, f64, String)) -> anyhow::Result<DailyRecord> {
    let origin =
        RecordOrigin::parse(&origin).ok_or_else(|| anyhow!("unknown record origin {:?}", origin))?;
    Ok(DailyRecord {
        date: parse_date(&date)?,
        min_temperature,
        origin,
    })
}

impl Database {
    /// Number of stored days.
    pub fn query_record_count(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM daily_temperatures", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// First and last stored dates, `None` when empty.
    pub fn query_date_range(&self) -> anyhow::Result<Option<(NaiveDate, NaiveDate)>> {
        let conn = self.conn.borrow();
        let (first, last): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(date), MAX(date) FROM daily_temperatures",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((parse_date(&first)?, parse_date(&last)?))),
            _ => Ok(None),
        }
    }

    /// Most recent day recorded by the station.
    pub fn query_latest_observed_date(&self) -> anyhow::Result<Option<NaiveDate>> {
        let conn = self.conn.borrow();
        let last: Option<String> = conn.query_row(
            "SELECT MAX(date) FROM daily_temperatures WHERE origin = ?1",
            params![RecordOrigin::Observed.as_str()],
            |row| row.get(0),
        )?;
        last.as_deref().map(parse_date).transpose()
    }

    /// Records with `start <= date <= end`, oldest first.
    pub fn query_records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<DailyRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, min_temperature, origin FROM daily_temperatures
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![format_date(start), format_date(end)], raw_record)?
            .collect::<Result<Vec<_>, _>>()?;
        let records = rows.into_iter().map(to_record).collect::<anyhow::Result<Vec<_>>>()?;
        log::info!(
            "[Frost] query: query_records_between returned {} records",
            records.len()
        );
        Ok(records)
    }

    /// Up to `days` most recent records dated on or before `end`, oldest first.
    pub fn query_trailing_records(
        &self,
        end: NaiveDate,
        days: usize,
    ) -> anyhow::Result<Vec<DailyRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, min_temperature, origin FROM daily_temperatures
             WHERE date <= ?1
             ORDER BY date DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![format_date(end), days as i64], raw_record)?
            .collect::<Result<Vec<_>, _>>()?;
        let mut records = rows.into_iter().map(to_record).collect::<anyhow::Result<Vec<_>>>()?;
        records.reverse();
        log::debug!(
            "[Frost] query: query_trailing_records returned {} records",
            records.len()
        );
        Ok(records)
    }

    /// Every record, oldest first.
    pub fn query_all_records(&self) -> anyhow::Result<Vec<DailyRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, min_temperature, origin FROM daily_temperatures ORDER BY date",
        )?;
        let rows = stmt
            .query_map([], raw_record)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(to_record).collect()
    }

    /// Whole-history aggregates computed in SQL.
    ///
    /// Agrees with [`SummaryStatistics::from_records`] over the same rows.
    pub fn query_summary_statistics(&self, frost_threshold: f64) -> anyhow::Result<SummaryStatistics> {
        let conn = self.conn.borrow();
        let (total, mean, frost, first, last, low, high): (
            i64,
            Option<f64>,
            Option<i64>,
            Option<String>,
            Option<String>,
            Option<f64>,
            Option<f64>,
        ) = conn.query_row(
            "SELECT COUNT(*),
                    AVG(min_temperature),
                    SUM(CASE WHEN min_temperature <= ?1 THEN 1 ELSE 0 END),
                    MIN(date),
                    MAX(date),
                    MIN(min_temperature),
                    MAX(min_temperature)
             FROM daily_temperatures",
            params![frost_threshold],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            },
        )?;
        let total_records = total as usize;
        let frost_days = frost.unwrap_or(0) as usize;
        Ok(SummaryStatistics {
            total_records,
            mean_temperature: mean.unwrap_or(0.0),
            frost_days,
            frost_percentage: frost_percentage(frost_days, total_records),
            first_date: first.as_deref().map(parse_date).transpose()?,
            last_date: last.as_deref().map(parse_date).transpose()?,
            absolute_min: low,
            absolute_max: high,
        })
    }

    /// Frost tally per calendar month, oldest first.
    pub fn query_monthly_frost(&self, frost_threshold: f64) -> anyhow::Result<Vec<MonthlyFrostSummary>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT substr(date, 1, 7) AS month,
                    COUNT(*),
                    SUM(CASE WHEN min_temperature <= ?1 THEN 1 ELSE 0 END),
                    AVG(min_temperature),
                    MIN(min_temperature)
             FROM daily_temperatures
             GROUP BY month
             ORDER BY month",
        )?;
        let rows = stmt
            .query_map(params![frost_threshold], |row| {
                Ok(MonthlyFrostSummary {
                    month: row.get(0)?,
                    days: row.get::<_, i64>(1)? as usize,
                    frost_days: row.get::<_, i64>(2)? as usize,
                    mean_min_temperature: row.get(3)?,
                    lowest_temperature: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Frost] query: query_monthly_frost returned {} months",
            rows.len()
        );
        Ok(rows)
    }
}

//! Loading daily records into the database.
//!
//! # CSV Format
//!
//! Headers required, `Fecha,Tmin` or any alias accepted by
//! [`frost_core::daily_record::parse_history_csv`]:
//! ```text
//! Fecha,Tmin
//! 2024-01-01,3.4
//! 2024-01-02,-0.6
//! ```

use crate::Database;
use frost_core::daily_record::{parse_history_csv, DATE_FORMAT};
use frost_core::DailyRecord;
use rusqlite::params;

impl Database {
    /// Load a history CSV. Returns the number of rows stored.
    ///
    /// Rows with unparsable dates or temperatures are skipped. A date that
    /// appears twice keeps its last value.
    pub fn load_history(&self, csv_data: &str) -> anyhow::Result<usize> {
        let parsed = parse_history_csv(csv_data)?;
        let count = self.insert_records(&parsed.records)?;
        log::info!(
            "[Frost] loader: Loaded {} daily records, skipped {} unparsable",
            count,
            parsed.skipped
        );
        Ok(count)
    }

    /// Insert or replace records in one transaction.
    pub fn insert_records(&self, records: &[DailyRecord]) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO daily_temperatures (date, min_temperature, origin)
                 VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.date.format(DATE_FORMAT).to_string(),
                    record.min_temperature,
                    record.origin.as_str()
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }
}

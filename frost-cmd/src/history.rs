//! `history`: dump the trailing days of a history as CSV.

use chrono::NaiveDate;
use frost_core::DailyRecord;
use std::io::Write;

pub fn run_history(history_path: &str, days: usize, end: Option<NaiveDate>) -> anyhow::Result<()> {
    let db = crate::open_history(history_path)?;
    let end = match end {
        Some(end) => end,
        None => match db.query_date_range()? {
            Some((_, last)) => last,
            None => anyhow::bail!("{} holds no records", history_path),
        },
    };
    let records = db.query_trailing_records(end, days)?;
    write_records(&records, std::io::stdout().lock())
}

/// Write records as `Fecha,Tmin,Origen` CSV.
pub fn write_records<W: Write>(records: &[DailyRecord], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Fecha", "Tmin", "Origen"])?;
    for r in records {
        wtr.write_record([
            frost_utils::dates::format_date(&r.date),
            r.min_temperature.to_string(),
            r.origin.as_str().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

/// Date format used for history CSV files and JSON output: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Alternative date formats found in station exports.
pub const ALTERNATE_DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%d/%m/%Y"];

/// Header names accepted for the date column (compared lowercase).
pub const DATE_COLUMN_NAMES: [&str; 2] = ["fecha", "date"];

/// Header names accepted for the minimum temperature column (compared lowercase).
pub const TEMPERATURE_COLUMN_NAMES: [&str; 4] =
    ["tmin", "min_temperature", "temperatura_minima", "temp_min"];

/// Where a daily value came from.
/// - `Observed`: recorded by the station, historical ground truth
/// - `Bridged`: synthesized to cover days the data feed has not delivered yet
/// - `Predicted`: a forecast fed back as input during the recursive rollout
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Observed,
    Bridged,
    Predicted,
}

impl RecordOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOrigin::Observed => "observed",
            RecordOrigin::Bridged => "bridged",
            RecordOrigin::Predicted => "predicted",
        }
    }

    pub fn parse(raw: &str) -> Option<RecordOrigin> {
        match raw {
            "observed" => Some(RecordOrigin::Observed),
            "bridged" => Some(RecordOrigin::Bridged),
            "predicted" => Some(RecordOrigin::Predicted),
            _ => None,
        }
    }
}

/// One calendar day of minimum temperature, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "temperatura_minima")]
    pub min_temperature: f64,
    #[serde(rename = "origen")]
    pub origin: RecordOrigin,
}

impl DailyRecord {
    pub fn observed(date: NaiveDate, min_temperature: f64) -> DailyRecord {
        DailyRecord {
            date,
            min_temperature,
            origin: RecordOrigin::Observed,
        }
    }

    pub fn bridged(date: NaiveDate, min_temperature: f64) -> DailyRecord {
        DailyRecord {
            date,
            min_temperature,
            origin: RecordOrigin::Bridged,
        }
    }

    pub fn predicted(date: NaiveDate, min_temperature: f64) -> DailyRecord {
        DailyRecord {
            date,
            min_temperature,
            origin: RecordOrigin::Predicted,
        }
    }

    /// True for anything that was not recorded by the station.
    pub fn is_synthetic(&self) -> bool {
        self.origin != RecordOrigin::Observed
    }

    /// True when the day is at or below the frost threshold.
    pub fn is_frost(&self, threshold: f64) -> bool {
        self.min_temperature <= threshold
    }
}

/// Records parsed from a history CSV, plus how many rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedHistory {
    pub records: Vec<DailyRecord>,
    pub skipped: usize,
}

/// Parse a date in any of the accepted formats.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // "2024-01-15 00:00" style timestamps keep only the date part
    let raw = raw.split_whitespace().next().unwrap_or(raw);
    std::iter::once(DATE_FORMAT)
        .chain(ALTERNATE_DATE_FORMATS)
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
}

/// Parse a history CSV body (with headers) into observed records.
///
/// Expected format: `Fecha,Tmin` (see [`DATE_COLUMN_NAMES`] and
/// [`TEMPERATURE_COLUMN_NAMES`] for accepted header spellings). Rows whose
/// date or temperature cannot be parsed are skipped and counted; the
/// returned records keep file order.
///
/// # Example CSV
/// ```text
/// Fecha,Tmin
/// 2024-01-01,3.4
/// 2024-01-02,-0.6
/// ```
pub fn parse_history_csv(csv_data: &str) -> Result<ParsedHistory> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| ForecastError::InvalidHistory(format!("unreadable CSV header: {e}")))?
        .clone();
    let date_idx = find_column(&headers, &DATE_COLUMN_NAMES).ok_or_else(|| {
        ForecastError::InvalidHistory(format!("no date column in header {:?}", headers))
    })?;
    let temp_idx = find_column(&headers, &TEMPERATURE_COLUMN_NAMES).ok_or_else(|| {
        ForecastError::InvalidHistory(format!(
            "no minimum temperature column in header {:?}",
            headers
        ))
    })?;

    let mut parsed = ParsedHistory::default();
    for result in rdr.records() {
        let row = result.map_err(|e| ForecastError::InvalidHistory(e.to_string()))?;
        let date = row.get(date_idx).and_then(parse_record_date);
        let value = row
            .get(temp_idx)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        match (date, value) {
            (Some(date), Some(value)) => parsed.records.push(DailyRecord::observed(date, value)),
            _ => parsed.skipped += 1,
        }
    }
    if parsed.skipped > 0 {
        log::warn!(
            "[Frost] history: skipped {} rows with missing or non-numeric values",
            parsed.skipped
        );
    }
    Ok(parsed)
}

#[cfg(test)]
mod test {
    use super::*;

    const STR_RESULT: &str = r#"Fecha,Tmin
2024-01-01,3.4
2024-01-02,-0.6
2024-01-03,
2024-01-04,NA
2024-01-05,1.25
"#;

    #[test]
    fn test_parse_history_csv() {
        let parsed = parse_history_csv(STR_RESULT).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(
            parsed.records[1],
            DailyRecord::observed(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), -0.6)
        );
    }

    #[test]
    fn test_parse_history_csv_header_aliases() {
        let csv = "date,temperatura_minima,station\n20240301,4.0,MAD\n02/03/2024,5.5,MAD\n";
        let parsed = parse_history_csv(csv).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(
            parsed.records[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn test_parse_history_csv_missing_column() {
        let err = parse_history_csv("Fecha,Tmax\n2024-01-01,20.0\n").unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHistory(_)));
    }

    #[test]
    fn test_record_origin_tags() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(!DailyRecord::observed(d, 1.0).is_synthetic());
        assert!(DailyRecord::bridged(d, 1.0).is_synthetic());
        assert!(DailyRecord::predicted(d, 1.0).is_synthetic());
        assert!(DailyRecord::observed(d, 0.0).is_frost(0.0));
        assert!(!DailyRecord::observed(d, 0.1).is_frost(0.0));
    }

    #[test]
    fn test_record_origin_text_form() {
        for origin in [RecordOrigin::Observed, RecordOrigin::Bridged, RecordOrigin::Predicted] {
            assert_eq!(RecordOrigin::parse(origin.as_str()), Some(origin));
        }
        assert_eq!(RecordOrigin::parse("guessed"), None);
    }

    #[test]
    fn test_record_serializes_with_spanish_keys() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let json = serde_json::to_string(&DailyRecord::bridged(d, 2.5)).unwrap();
        assert_eq!(
            json,
            r#"{"fecha":"2024-05-01","temperatura_minima":2.5,"origen":"bridged"}"#
        );
    }
}

//! Shared utility functions for the frost crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y%m%d")?)
    }

    /// Whole days from `from` to `to`, negative when `to` is earlier.
    pub fn days_between(from: &NaiveDate, to: &NaiveDate) -> i64 {
        (*to - *from).num_days()
    }

}

/// File helpers
pub mod files {
    use anyhow::Context;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use std::path::Path;

    /// True when the path ends in `.gz`.
    pub fn is_gzip(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    }

    /// Read a text file, decompressing it first when it ends in `.gz`.
    pub fn read_text(path: &Path) -> anyhow::Result<String> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        if !is_gzip(path) {
            return String::from_utf8(bytes)
                .with_context(|| format!("{} is not UTF-8", path.display()));
        }
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .with_context(|| format!("decompressing {}", path.display()))?;
        log::debug!(
            "[Frost] files: inflated {} ({} -> {} bytes)",
            path.display(),
            bytes.len(),
            text.len()
        );
        Ok(text)
    }

}

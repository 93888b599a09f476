//! SQL schema for the in-memory history database.

/// The full schema as one batch.
///
/// - `daily_temperatures` - one row per calendar day: ISO date, minimum
///   temperature in degC, and whether the value was observed or bridged.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS daily_temperatures (
        date TEXT PRIMARY KEY,
        min_temperature REAL NOT NULL,
        origin TEXT NOT NULL DEFAULT 'observed'
    );
    CREATE INDEX IF NOT EXISTS idx_daily_origin ON daily_temperatures(origin, date);
    "#
}

//! `predict`: run the engine over a history file.

use chrono::{Local, NaiveDate};
use frost_core::municipality::{Municipality, MADRID_CUNDINAMARCA};
use frost_engine::{EngineConfig, ForecastEngine, ForecastResult};
use std::path::Path;

pub fn run_predict(
    history_path: &str,
    models_path: &str,
    today: Option<NaiveDate>,
    json: bool,
    engine_config: EngineConfig,
) -> anyhow::Result<()> {
    let db = crate::open_history(history_path)?;
    let engine = ForecastEngine::load(Path::new(models_path), engine_config)?;
    let query_date = today.unwrap_or_else(|| Local::now().date_naive());

    let outcome = engine.predict(&db, query_date);
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if let Some(result) = outcome.result() {
        println!("{}", render_report(result, &MADRID_CUNDINAMARCA));
    }
    if let Some(error) = outcome.error() {
        anyhow::bail!("no forecast for {}: {}", query_date, error);
    }
    Ok(())
}

/// Plain-text forecast report.
pub fn render_report(result: &ForecastResult, place: &Municipality) -> String {
    let mut lines = vec![
        format!(
            "Frost forecast for {} ({} m)",
            place.display_name(),
            place.elevation_m
        ),
        format!(
            "Query date {}, last observed day {}",
            result.query_date, result.last_real_date
        ),
    ];
    if result.simulated_data {
        lines.push(format!(
            "Warning: {} missing days up to yesterday were simulated",
            result.bridged_days.len()
        ));
    }
    lines.push(format!(
        "Tomorrow {}: {:.1} C, frost probability {:.0}%, risk {}",
        result.target_date,
        result.predicted_temperature,
        result.frost_probability,
        result.risk_level
    ));
    lines.push(format!(
        "Yesterday {:.1} C, expected change {:+.1} C",
        result.temp_yesterday, result.expected_change
    ));
    lines.push(format!(
        "Last 7 days: mean {:.1} C, min {:.1} C, max {:.1} C",
        result.rolling_mean, result.rolling_min, result.rolling_max
    ));
    lines.push(String::new());
    lines.push(format!("{:<12}{:>8}{:>8}  {}", "Date", "Tmin", "Frost", "Risk"));
    for day in &result.forecast {
        lines.push(format!(
            "{:<12}{:>8.1}{:>7.0}%  {}",
            day.date.to_string(),
            day.predicted_temperature,
            day.frost_probability,
            day.risk_level
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use frost_core::date_range::DateRange;
    use frost_core::{DailyRecord, HistoricalSeries};
    use frost_model::{FrostClassifier, FrostModels, LinearModel, TemperatureRegressor};

    fn forecast(records_end: NaiveDate, today: NaiveDate) -> ForecastResult {
        let mut temperature = vec![0.0; 8];
        temperature[0] = 1.0;
        let models = FrostModels::new(
            TemperatureRegressor(LinearModel::new(0.0, temperature)),
            FrostClassifier(LinearModel::new(0.0, vec![0.0; 8])),
        )
        .unwrap();
        let records = DateRange(records_end - Duration::days(39), records_end)
            .map(|d| DailyRecord::observed(d, -0.5))
            .collect();
        let store = HistoricalSeries::new(records).unwrap();
        ForecastEngine::new(models, EngineConfig::default())
            .unwrap()
            .try_predict(&store, today)
            .unwrap()
    }

    #[test]
    fn report_lists_every_forecast_day() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let report = render_report(&forecast(today - Duration::days(1), today), &MADRID_CUNDINAMARCA);
        assert!(report.starts_with("Frost forecast for Madrid, Cundinamarca (2554 m)"));
        assert!(report.contains("Tomorrow 2024-01-21: -0.5 C, frost probability 50%, risk Alto"));
        assert!(!report.contains("Warning"));
        assert_eq!(report.lines().filter(|l| l.starts_with("2024-01-2")).count(), 7);
    }

    #[test]
    fn report_warns_about_simulated_days() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let report = render_report(&forecast(today - Duration::days(4), today), &MADRID_CUNDINAMARCA);
        assert!(report.contains("Warning: 3 missing days up to yesterday were simulated"));
    }
}

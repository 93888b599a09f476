use chrono::{Duration, NaiveDate};
use frost_core::date_range::DateRange;
use frost_core::{DailyRecord, ForecastError, HistoricalSeries, RecordOrigin, RiskLevel};
use frost_db::Database;
use frost_engine::{EngineConfig, ForecastEngine, PredictionOutcome};
use frost_model::train::{train_models, DEFAULT_RIDGE_ALPHA};
use frost_model::{FrostClassifier, FrostModels, LinearModel, TemperatureRegressor};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
}

/// Oscillates between -1 and 8 degC, rounded to a tenth.
fn oscillating(days: i64, end: NaiveDate) -> Vec<DailyRecord> {
    DateRange(end - Duration::days(days - 1), end)
        .enumerate()
        .map(|(i, d)| {
            let t = 3.5 + 4.5 * (i as f64 * 0.7).sin();
            DailyRecord::observed(d, (t * 10.0).round() / 10.0)
        })
        .collect()
}

/// Tomorrow repeats today; frost odds climb as the last day cools.
fn persistence() -> FrostModels {
    let mut temperature = vec![0.0; 8];
    temperature[0] = 1.0;
    let mut frost = vec![0.0; 8];
    frost[0] = -1.5;
    FrostModels::new(
        TemperatureRegressor(LinearModel::new(0.0, temperature)),
        FrostClassifier(LinearModel::new(0.0, frost)),
    )
    .unwrap()
}

fn engine(models: FrostModels) -> ForecastEngine {
    ForecastEngine::new(models, EngineConfig::default()).unwrap()
}

fn to_csv(records: &[DailyRecord]) -> String {
    let mut csv = String::from("Fecha,Tmin\n");
    for r in records {
        csv.push_str(&format!("{},{}\n", r.date, r.min_temperature));
    }
    csv
}

fn assert_forecast_invariants(outcome: &PredictionOutcome) {
    let result = outcome.result().expect("forecast should succeed");
    assert_eq!(result.forecast.len(), 7);
    assert_eq!(result.target_date, today() + Duration::days(1));
    for (i, day) in result.forecast.iter().enumerate() {
        assert_eq!(day.date, today() + Duration::days(i as i64 + 1));
        assert!((0.0..=100.0).contains(&day.frost_probability));
        if day.predicted_temperature <= 0.0 {
            assert!(matches!(day.risk_level, RiskLevel::Alto | RiskLevel::Extremo));
        }
    }
    assert!(result
        .forecast
        .windows(2)
        .all(|w| w[0].date < w[1].date));
    assert_eq!(result.nowcast.date, today());
    assert_eq!(result.predicted_temperature, result.forecast[0].predicted_temperature);
    assert_eq!(
        result.expected_change,
        result.predicted_temperature - result.temp_yesterday
    );
}

#[test]
fn full_history_ending_yesterday() {
    let records = oscillating(40, today() - Duration::days(1));
    let yesterday_value = records[39].min_temperature;
    let store = HistoricalSeries::new(records).unwrap();
    let outcome = engine(persistence()).predict(&store, today());

    assert_forecast_invariants(&outcome);
    let result = outcome.result().unwrap();
    assert!(!result.simulated_data);
    assert!(result.bridged_days.is_empty());
    assert_eq!(result.last_real_date, today() - Duration::days(1));
    assert_eq!(result.temp_yesterday, yesterday_value);
    assert_eq!(result.history.len(), 30);
    assert!(result.history.iter().all(|r| r.origin == RecordOrigin::Observed));
    assert!(result.rolling_min <= result.rolling_mean && result.rolling_mean <= result.rolling_max);
    // predictions fed back into the rollout are not bridged inputs
    assert!(!result.nowcast.is_synthetic_input);
    assert!(result.forecast.iter().all(|d| !d.is_synthetic_input));
}

#[test]
fn trained_models_keep_invariants() {
    let training = oscillating(400, today() - Duration::days(60));
    let models = train_models(&training, DEFAULT_RIDGE_ALPHA, 0.0).unwrap();
    let store = HistoricalSeries::new(oscillating(40, today() - Duration::days(1))).unwrap();
    assert_forecast_invariants(&engine(models).predict(&store, today()));
}

#[test]
fn five_missing_days_are_bridged() {
    let mut records = oscillating(40, today() - Duration::days(1));
    records.truncate(35);
    let last_real = today() - Duration::days(6);
    assert_eq!(records.last().unwrap().date, last_real);
    let seed: Vec<f64> = records[5..].iter().map(|r| r.min_temperature).collect();
    let last_week: Vec<f64> = records[28..].iter().map(|r| r.min_temperature).collect();
    let low = seed.iter().copied().fold(f64::INFINITY, f64::min) - 1.0;
    let high = seed.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1.0;

    let store = HistoricalSeries::new(records).unwrap();
    let outcome = engine(persistence()).predict(&store, today());
    assert_forecast_invariants(&outcome);

    let result = outcome.result().unwrap();
    assert!(result.simulated_data);
    assert_eq!(result.last_real_date, last_real);
    assert_eq!(result.bridged_days.len(), 5);
    let bridged_dates: Vec<NaiveDate> = result.bridged_days.iter().map(|r| r.date).collect();
    assert_eq!(
        bridged_dates,
        DateRange(last_real + Duration::days(1), today() - Duration::days(1)).collect::<Vec<_>>()
    );
    for r in &result.bridged_days {
        assert_eq!(r.origin, RecordOrigin::Bridged);
        assert!(r.min_temperature >= low && r.min_temperature <= high);
    }
    assert_eq!(result.history.last().unwrap().date, today() - Duration::days(1));
    assert_eq!(
        result.history.iter().filter(|r| r.is_synthetic()).count(),
        5
    );
    assert!(result.nowcast.is_synthetic_input);
    assert!(result.forecast[0].is_synthetic_input);

    // the 7-day stats come from the last 7 station days, not the bridged ones
    let mean = last_week.iter().sum::<f64>() / 7.0;
    assert!((result.rolling_mean - mean).abs() < 1e-9);
    assert_eq!(
        result.rolling_min,
        last_week.iter().copied().fold(f64::INFINITY, f64::min)
    );
    assert_eq!(
        result.rolling_max,
        last_week.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    );
}

#[test]
fn cold_spell_forecasts_high_risk() {
    let mut records = oscillating(40, today() - Duration::days(1));
    for r in records.iter_mut().skip(33) {
        r.min_temperature = -1.5;
    }
    let store = HistoricalSeries::new(records).unwrap();
    let outcome = engine(persistence()).predict(&store, today());
    assert_forecast_invariants(&outcome);

    let result = outcome.result().unwrap();
    assert_eq!(result.nowcast.predicted_temperature, -1.5);
    assert!(result.forecast.iter().all(|d| d.predicted_temperature <= 0.0));
    assert!(result.forecast.iter().all(|d| d.risk_level == RiskLevel::Alto));
    assert_eq!(result.peak_risk(), Some(RiskLevel::Alto));
    // frost coefficient -1.5 on lag_1 puts -1.5 degC at about 90%
    assert!(result.frost_probability > 85.0);
}

#[test]
fn hard_freeze_forecasts_extreme_risk() {
    let mut records = oscillating(40, today() - Duration::days(1));
    if let Some(last) = records.last_mut() {
        last.min_temperature = -3.0;
    }
    let store = HistoricalSeries::new(records).unwrap();
    let outcome = engine(persistence()).predict(&store, today());
    assert_forecast_invariants(&outcome);
    let result = outcome.result().unwrap();
    assert!(result.forecast.iter().all(|d| d.risk_level == RiskLevel::Extremo));
}

#[test]
fn bridging_is_deterministic() {
    let mut records = oscillating(40, today() - Duration::days(1));
    records.truncate(32);
    let store = HistoricalSeries::new(records).unwrap();
    let engine = engine(persistence());
    let first = engine.predict(&store, today());
    let second = engine.predict(&store, today());
    assert!(first.is_success());
    assert_eq!(first, second);
}

#[test]
fn twenty_missing_days_is_stale() {
    let records = oscillating(40, today() - Duration::days(21));
    let store = HistoricalSeries::new(records).unwrap();
    let outcome = engine(persistence()).predict(&store, today());

    assert_eq!(
        outcome.cause(),
        Some(&ForecastError::StaleHistory {
            last_real_date: today() - Duration::days(21),
            missing_days: 20,
            max_gap_days: 14,
        })
    );
    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json.get("error").is_some());
    assert!(json.get("predicciones_7dias").is_none());
}

#[test]
fn five_days_of_history_is_insufficient() {
    let records = oscillating(5, today() - Duration::days(1));
    let store = HistoricalSeries::new(records).unwrap();
    let outcome = engine(persistence()).predict(&store, today());

    assert_eq!(
        outcome.cause(),
        Some(&ForecastError::InsufficientHistory {
            needed: 30,
            found: 5
        })
    );
    assert!(outcome.error().unwrap().contains("Insufficient history"));
}

#[test]
fn empty_store_is_an_error_not_a_panic() {
    let store = HistoricalSeries::default();
    let outcome = engine(persistence()).predict(&store, today());
    assert!(!outcome.is_success());
}

#[test]
fn sqlite_store_matches_in_memory_store() {
    let mut records = oscillating(45, today() - Duration::days(1));
    records.truncate(41);
    let db = Database::from_csv(&to_csv(&records)).unwrap();
    let series = HistoricalSeries::new(records).unwrap();
    let engine = engine(persistence());

    let from_db = engine.predict(&db, today());
    let from_memory = engine.predict(&series, today());
    assert!(from_db.is_success());
    assert_eq!(from_db, from_memory);
}

#[test]
fn result_serializes_with_display_keys() {
    let store = HistoricalSeries::new(oscillating(40, today() - Duration::days(1))).unwrap();
    let outcome = engine(persistence()).predict(&store, today());
    let json = serde_json::to_value(&outcome).unwrap();

    for key in [
        "fecha_consulta",
        "fecha_prediccion",
        "temperatura_predicha",
        "probabilidad_helada",
        "riesgo",
        "temp_ayer",
        "cambio_esperado",
        "temp_promedio_7d",
        "temp_minima_7d",
        "temp_maxima_7d",
        "predicciones_7dias",
        "datos_simulados",
        "ultima_fecha_real",
        "historial_30d",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert!(json.get("error").is_none());
    assert_eq!(json["fecha_consulta"], "2024-08-15");
    assert_eq!(json["predicciones_7dias"].as_array().unwrap().len(), 7);
}

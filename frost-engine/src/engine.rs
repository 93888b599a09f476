use crate::config::EngineConfig;
use crate::result::{ForecastDay, ForecastResult, PredictionOutcome};
use chrono::{Local, NaiveDate};
use frost_core::date_range::DateRange;
use frost_core::{
    DailyRecord, ForecastError, HistoricalStore, RecordOrigin, Result, RiskThresholds,
};
use frost_data::bridging::{bridge_gap, check_gap};
use frost_data::features::{build_features, FEATURE_WINDOW_DAYS};
use frost_data::interpolation::fill_gaps;
use frost_data::stats::{RollingWindowStats, SummaryStatistics};
use frost_model::FrostModels;
use std::path::Path;
use std::sync::Arc;

/// Last `n` elements of a slice, or all of it when shorter.
fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Predict one day from the records ending the day before it.
///
/// Returns the display value and the pseudo-observation to append before
/// predicting the following day.
pub fn rollout_step(
    models: &FrostModels,
    risk: &RiskThresholds,
    window: &[DailyRecord],
    target: NaiveDate,
) -> Result<(ForecastDay, DailyRecord)> {
    let features = build_features(window, target)?;
    let inference = models.infer(&features);
    let is_synthetic_input = tail(window, FEATURE_WINDOW_DAYS)
        .iter()
        .any(|r| r.origin == RecordOrigin::Bridged);
    let day = ForecastDay {
        date: target,
        predicted_temperature: inference.temperature,
        frost_probability: inference.frost_probability,
        risk_level: risk.classify(inference.temperature),
        is_synthetic_input,
    };
    Ok((day, DailyRecord::predicted(target, inference.temperature)))
}

/// Roll the models forward over `dates`, each prediction becoming the
/// newest input of the next step.
///
/// `seed` must end the day before the first date.
pub fn rollout<I>(
    models: &FrostModels,
    risk: &RiskThresholds,
    seed: Vec<DailyRecord>,
    dates: I,
) -> Result<Vec<ForecastDay>>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let (_, days) = dates.into_iter().try_fold(
        (seed, Vec::new()),
        |(mut window, mut days), target| {
            let (day, record) = rollout_step(models, risk, &window, target)?;
            days.push(day);
            window.push(record);
            Ok::<_, ForecastError>((window, days))
        },
    )?;
    Ok(days)
}

/// Frost forecaster bound to one set of weights and one configuration.
///
/// Cheap to clone and safe to share between threads; to pick up new
/// weights, build a new engine.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    models: Arc<FrostModels>,
    config: EngineConfig,
}

impl ForecastEngine {
    pub fn new(models: FrostModels, config: EngineConfig) -> Result<ForecastEngine> {
        ForecastEngine::from_shared(Arc::new(models), config)
    }

    pub fn from_shared(models: Arc<FrostModels>, config: EngineConfig) -> Result<ForecastEngine> {
        models.validate()?;
        config.validate()?;
        if (models.frost_threshold - config.frost_threshold).abs() > 1e-9 {
            return Err(ForecastError::InvalidConfig(format!(
                "models were trained for a frost threshold of {} degC but the engine uses {} degC",
                models.frost_threshold, config.frost_threshold
            )));
        }
        Ok(ForecastEngine { models, config })
    }

    /// Load weights from a JSON file.
    pub fn load(path: &Path, config: EngineConfig) -> Result<ForecastEngine> {
        ForecastEngine::new(FrostModels::load(path)?, config)
    }

    pub fn models(&self) -> &Arc<FrostModels> {
        &self.models
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast from the local calendar date.
    pub fn predict_today<S: HistoricalStore + ?Sized>(&self, store: &S) -> PredictionOutcome {
        self.predict(store, Local::now().date_naive())
    }

    /// Forecast the days after `query_date`; failures come back as data.
    pub fn predict<S: HistoricalStore + ?Sized>(
        &self,
        store: &S,
        query_date: NaiveDate,
    ) -> PredictionOutcome {
        let outcome = PredictionOutcome::from(self.try_predict(store, query_date));
        if let Some(error) = outcome.error() {
            log::warn!("[Frost] engine: no forecast for {}: {}", query_date, error);
        }
        outcome
    }

    pub fn try_predict<S: HistoricalStore + ?Sized>(
        &self,
        store: &S,
        query_date: NaiveDate,
    ) -> Result<ForecastResult> {
        let config = &self.config;
        let yesterday = query_date.pred_opt().ok_or_else(|| {
            ForecastError::InvalidConfig(format!("no day precedes {query_date}"))
        })?;

        let latest_real = store.latest_real_date()?;
        let missing = check_gap(latest_real, yesterday, &config.bridge)?;
        let anchor = latest_real.min(yesterday);
        let stored = store.series_ending_at(anchor, config.history_window_days())?;
        let real: Vec<DailyRecord> = stored
            .iter()
            .filter(|r| r.origin == RecordOrigin::Observed)
            .copied()
            .collect();
        let observed = fill_gaps(&stored);
        let last_real_date = real.last().map_or(anchor, |r| r.date);
        log::info!(
            "[Frost] engine: query {}, last real day {}, {} missing days",
            query_date,
            last_real_date,
            missing
        );

        // seed and rolling stats only ever see station values, never interpolated holes
        let bridged_days = bridge_gap(tail(&real, config.bridge.window_days), yesterday, &config.bridge)?;
        let mut series = observed;
        series.extend_from_slice(&bridged_days);

        let last_day = series.last().ok_or(ForecastError::InsufficientHistory {
            needed: config.min_history_days,
            found: 0,
        })?;
        let temp_yesterday = last_day.min_temperature;
        let rolling = RollingWindowStats::from_records(tail(&real, config.rolling_window_days))
            .ok_or(ForecastError::InsufficientHistory {
                needed: config.rolling_window_days,
                found: 0,
            })?;
        let history = tail(&series, config.chart_history_days).to_vec();

        // today's minimum is not recorded yet, so the rollout starts from an estimate of it
        let (nowcast, today) = rollout_step(&self.models, &config.risk, &series, query_date)?;
        series.push(today);
        let forecast = rollout(
            &self.models,
            &config.risk,
            series,
            DateRange::following(query_date, config.horizon_days as u64),
        )?;

        let first = *forecast.first().ok_or_else(|| {
            ForecastError::InvalidConfig("forecast horizon produced no days".to_string())
        })?;
        log::debug!(
            "[Frost] engine: {} -> {:.1} degC, {:.0}% frost, {}",
            first.date,
            first.predicted_temperature,
            first.frost_probability,
            first.risk_level
        );

        Ok(ForecastResult {
            query_date,
            target_date: first.date,
            predicted_temperature: first.predicted_temperature,
            frost_probability: first.frost_probability,
            risk_level: first.risk_level,
            temp_yesterday,
            expected_change: first.predicted_temperature - temp_yesterday,
            rolling_mean: rolling.mean,
            rolling_min: rolling.min,
            rolling_max: rolling.max,
            forecast,
            simulated_data: !bridged_days.is_empty(),
            last_real_date,
            bridged_days,
            nowcast,
            history,
        })
    }

    /// Whole-history aggregates using the configured frost threshold.
    pub fn summary_statistics<S: HistoricalStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<SummaryStatistics> {
        let records = store.all_records()?;
        Ok(SummaryStatistics::from_records(&records, self.config.frost_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::{HistoricalSeries, RiskLevel};
    use frost_model::{FrostClassifier, LinearModel, TemperatureRegressor};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    /// Tomorrow equals today; frost odds rise as lag_1 drops.
    fn persistence() -> FrostModels {
        let mut temp = vec![0.0; 8];
        temp[0] = 1.0;
        let mut frost = vec![0.0; 8];
        frost[0] = -2.0;
        FrostModels::new(
            TemperatureRegressor(LinearModel::new(0.0, temp)),
            FrostClassifier(LinearModel::new(0.0, frost)),
        )
        .unwrap()
    }

    fn flat(from: u32, to: u32, value: f64) -> Vec<DailyRecord> {
        DateRange(day(from), day(to))
            .map(|d| DailyRecord::observed(d, value))
            .collect()
    }

    #[test]
    fn rollout_step_flags_bridged_inputs() {
        let models = persistence();
        let risk = RiskThresholds::default();
        let mut window = flat(1, 7, 1.5);
        let (clean, record) = rollout_step(&models, &risk, &window, day(8)).unwrap();
        assert!(!clean.is_synthetic_input);
        assert_eq!(clean.predicted_temperature, 1.5);
        assert_eq!(clean.risk_level, RiskLevel::Moderado);
        assert_eq!(record.origin, RecordOrigin::Predicted);

        // own predictions are not flagged
        window.push(record);
        let (next, _) = rollout_step(&models, &risk, &window, day(9)).unwrap();
        assert!(!next.is_synthetic_input);

        window[3] = DailyRecord::bridged(window[3].date, 1.5);
        let (bridged, _) = rollout_step(&models, &risk, &window, day(9)).unwrap();
        assert!(bridged.is_synthetic_input);
    }

    #[test]
    fn rollout_feeds_predictions_back() {
        let models = persistence();
        let risk = RiskThresholds::default();
        let days = rollout(&models, &risk, flat(1, 7, -1.0), DateRange(day(8), day(14))).unwrap();
        assert_eq!(days.len(), 7);
        assert!(days.iter().all(|d| d.predicted_temperature == -1.0));
        assert!(days.iter().all(|d| d.risk_level == RiskLevel::Alto));
        assert!(days.iter().all(|d| !d.is_synthetic_input));
    }

    #[test]
    fn rollout_rejects_seed_not_ending_before_first_date() {
        let models = persistence();
        let err = rollout(
            &models,
            &RiskThresholds::default(),
            flat(1, 7, 3.0),
            DateRange(day(10), day(12)),
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHistory(_)));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = EngineConfig {
            horizon_days: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            ForecastEngine::new(persistence(), config),
            Err(ForecastError::InvalidConfig(_))
        ));
    }

    #[test]
    fn flat_history_forecasts_flat() {
        let engine = ForecastEngine::new(persistence(), EngineConfig::default()).unwrap();
        let store = HistoricalSeries::new(flat(1, 31, 4.0)).unwrap();
        let result = engine.try_predict(&store, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()).unwrap();
        assert_eq!(result.target_date, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
        assert_eq!(result.temp_yesterday, 4.0);
        assert_eq!(result.expected_change, 0.0);
        assert_eq!(result.rolling_mean, 4.0);
        assert_eq!(result.history.len(), 30);
        assert_eq!(result.nowcast.date, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert!(result.bridged_days.is_empty());
        assert_eq!(result.peak_risk(), Some(RiskLevel::Bajo));
    }

    #[test]
    fn new_rejects_mismatched_frost_threshold() {
        let config = EngineConfig {
            frost_threshold: 2.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            ForecastEngine::new(persistence(), config),
            Err(ForecastError::InvalidConfig(_))
        ));
    }

    #[test]
    fn summary_uses_configured_threshold() {
        let config = EngineConfig {
            frost_threshold: 2.0,
            ..EngineConfig::default()
        };
        let mut models = persistence();
        models.frost_threshold = 2.0;
        let engine = ForecastEngine::new(models, config).unwrap();
        let mut records = flat(1, 2, 1.0);
        records.extend(flat(3, 4, 5.0));
        let store = HistoricalSeries::new(records).unwrap();
        let stats = engine.summary_statistics(&store).unwrap();
        assert_eq!(stats.frost_days, 2);
        assert_eq!(stats.frost_percentage, 50.0);
    }

    /// 40 varying July/August days ending on the 9th of August, with the
    /// 3rd and 4th of August missing.
    fn holed() -> Vec<DailyRecord> {
        let start = day(1);
        let hole = DateRange(
            NaiveDate::from_ymd_opt(2024, 8, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 4).unwrap(),
        )
        .collect::<Vec<_>>();
        DateRange(start, start + chrono::Duration::days(39))
            .enumerate()
            .map(|(i, d)| DailyRecord::observed(d, 2.0 + (i % 5) as f64 * 0.8 - (i % 3) as f64))
            .filter(|r| !hole.contains(&r.date))
            .collect()
    }

    #[test]
    fn bridging_seed_skips_interpolated_holes() {
        let records = holed();
        let query = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        let engine = ForecastEngine::new(persistence(), EngineConfig::default()).unwrap();
        let store = HistoricalSeries::new(records.clone()).unwrap();
        let result = engine.try_predict(&store, query).unwrap();

        let params = &engine.config().bridge;
        let yesterday = query - chrono::Duration::days(1);
        let expected = bridge_gap(tail(&records, params.window_days), yesterday, params).unwrap();
        assert_eq!(result.bridged_days.len(), 4);
        assert_eq!(result.bridged_days, expected);
        assert_eq!(result.last_real_date, NaiveDate::from_ymd_opt(2024, 8, 9).unwrap());
        // interpolated holes still show in the chart history
        assert!(result
            .history
            .iter()
            .any(|r| r.date == NaiveDate::from_ymd_opt(2024, 8, 3).unwrap() && r.origin == RecordOrigin::Bridged));
    }

    #[test]
    fn rolling_stats_cover_real_days_only() {
        let records = holed();
        let query = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        let engine = ForecastEngine::new(persistence(), EngineConfig::default()).unwrap();
        let store = HistoricalSeries::new(records.clone()).unwrap();
        let result = engine.try_predict(&store, query).unwrap();

        // the last 7 real days straddle the hole; the bridged days after them are left out
        let real = tail(&records, 7);
        let mean = real.iter().map(|r| r.min_temperature).sum::<f64>() / 7.0;
        let min = real.iter().map(|r| r.min_temperature).fold(f64::INFINITY, f64::min);
        let max = real.iter().map(|r| r.min_temperature).fold(f64::NEG_INFINITY, f64::max);
        assert!((result.rolling_mean - mean).abs() < 1e-12);
        assert_eq!(result.rolling_min, min);
        assert_eq!(result.rolling_max, max);
        assert!(result.nowcast.is_synthetic_input);
    }
}

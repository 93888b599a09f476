use chrono::NaiveDate;
use frost_core::{DailyRecord, ForecastError, RiskLevel};
use serde::Serialize;

/// One forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastDay {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "temperatura")]
    pub predicted_temperature: f64,
    /// Percent, 0 to 100
    #[serde(rename = "probabilidad_helada")]
    pub frost_probability: f64,
    #[serde(rename = "riesgo")]
    pub risk_level: RiskLevel,
    /// The seven days feeding this prediction included a bridged value.
    /// The rollout's own earlier predictions do not count.
    #[serde(rename = "entrada_sintetica")]
    pub is_synthetic_input: bool,
}

/// Everything a display needs after a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    #[serde(rename = "fecha_consulta")]
    pub query_date: NaiveDate,
    #[serde(rename = "fecha_prediccion")]
    pub target_date: NaiveDate,
    #[serde(rename = "temperatura_predicha")]
    pub predicted_temperature: f64,
    #[serde(rename = "probabilidad_helada")]
    pub frost_probability: f64,
    #[serde(rename = "riesgo")]
    pub risk_level: RiskLevel,
    /// Minimum of the day before the query date, real or bridged.
    #[serde(rename = "temp_ayer")]
    pub temp_yesterday: f64,
    /// Predicted target minus `temp_yesterday`.
    #[serde(rename = "cambio_esperado")]
    pub expected_change: f64,
    #[serde(rename = "temp_promedio_7d")]
    pub rolling_mean: f64,
    #[serde(rename = "temp_minima_7d")]
    pub rolling_min: f64,
    #[serde(rename = "temp_maxima_7d")]
    pub rolling_max: f64,
    #[serde(rename = "predicciones_7dias")]
    pub forecast: Vec<ForecastDay>,
    #[serde(rename = "datos_simulados")]
    pub simulated_data: bool,
    #[serde(rename = "ultima_fecha_real")]
    pub last_real_date: NaiveDate,
    #[serde(rename = "dias_simulados")]
    pub bridged_days: Vec<DailyRecord>,
    /// Model estimate for the query date, the first rollout input.
    #[serde(rename = "estimacion_hoy")]
    pub nowcast: ForecastDay,
    #[serde(rename = "historial_30d")]
    pub history: Vec<DailyRecord>,
}

impl ForecastResult {
    /// The forecast for the day after the query date.
    pub fn first_day(&self) -> Option<&ForecastDay> {
        self.forecast.first()
    }

    /// Most severe risk over the horizon.
    pub fn peak_risk(&self) -> Option<RiskLevel> {
        self.forecast.iter().map(|d| d.risk_level).max()
    }
}

/// Either a full result or only an error description.
///
/// Serializes as the bare result object or as `{"error": "..."}`, so a
/// consumer branches on the presence of the `error` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Success(Box<ForecastResult>),
    Failure {
        error: String,
        #[serde(skip)]
        cause: ForecastError,
    },
}

impl PredictionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&ForecastResult> {
        match self {
            PredictionOutcome::Success(result) => Some(result),
            PredictionOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Success(_) => None,
            PredictionOutcome::Failure { error, .. } => Some(error),
        }
    }

    pub fn cause(&self) -> Option<&ForecastError> {
        match self {
            PredictionOutcome::Success(_) => None,
            PredictionOutcome::Failure { cause, .. } => Some(cause),
        }
    }
}

impl From<Result<ForecastResult, ForecastError>> for PredictionOutcome {
    fn from(value: Result<ForecastResult, ForecastError>) -> Self {
        match value {
            Ok(result) => PredictionOutcome::Success(Box::new(result)),
            Err(cause) => PredictionOutcome::Failure {
                error: cause.to_string(),
                cause,
            },
        }
    }
}

//! Fitting for both next-day models.
//!
//! Features are standardized on the training rows. The temperature
//! regressor is a least-squares fit through `linregress`, with the L2
//! penalty expressed as `sqrt(alpha)` pseudo-rows appended to the data.
//! The frost classifier is a penalized logistic regression fitted by
//! Newton steps, so its decision value is a log-odds.

use crate::linear::{FrostClassifier, LinearModel, TemperatureRegressor};
use crate::weights::{FrostModels, TrainingSummary};
use frost_core::{DailyRecord, ForecastError, Result};
use frost_data::features::{training_rows, FeatureVector, FEATURE_COUNT, FEATURE_WINDOW_DAYS};
use frost_data::stats::frost_percentage;
use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};
use nalgebra::{DMatrix, DVector};

/// Default L2 penalty for both models.
pub const DEFAULT_RIDGE_ALPHA: f64 = 1.0;

/// Fewest (features, target) rows worth fitting on.
pub const MIN_TRAINING_ROWS: usize = 30;

/// Newton step cap for the classifier.
const MAX_NEWTON_STEPS: usize = 50;

/// Stop once no coefficient moves more than this.
const NEWTON_TOLERANCE: f64 = 1e-8;

/// Floor on the IRLS weights `p(1-p)` so the Hessian stays invertible.
const MIN_IRLS_WEIGHT: f64 = 1e-9;

fn check_inputs(rows: usize, targets: usize, alpha: f64) -> Result<()> {
    if rows == 0 || rows != targets {
        return Err(ForecastError::InsufficientHistory {
            needed: MIN_TRAINING_ROWS,
            found: rows.min(targets),
        });
    }
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(ForecastError::InvalidConfig(format!(
            "ridge alpha must be positive, got {alpha}"
        )));
    }
    Ok(())
}

/// Column means and population standard deviations. Constant columns keep
/// unit scale, so their standardized value is zero.
fn column_moments(rows: &[FeatureVector]) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let means: Vec<f64> = (0..FEATURE_COUNT)
        .map(|j| rows.iter().map(|r| r.0[j]).sum::<f64>() / n)
        .collect();
    let scales = (0..FEATURE_COUNT)
        .map(|j| {
            let var = rows.iter().map(|r| (r.0[j] - means[j]).powi(2)).sum::<f64>() / n;
            if var > 1e-12 {
                var.sqrt()
            } else {
                1.0
            }
        })
        .collect();
    (means, scales)
}

fn standardized(row: &FeatureVector, means: &[f64], scales: &[f64], j: usize) -> f64 {
    (row.0[j] - means[j]) / scales[j]
}

/// Fit a ridge regression of `targets` on `rows`.
///
/// The penalty rows ask each standardized coefficient to be zero with the
/// prediction at the target mean.
pub fn fit_ridge(rows: &[FeatureVector], targets: &[f64], alpha: f64) -> Result<LinearModel> {
    check_inputs(rows.len(), targets.len(), alpha)?;
    let (means, scales) = column_moments(rows);
    let y_mean = targets.iter().sum::<f64>() / targets.len() as f64;
    let penalty = alpha.sqrt();

    let mut y = targets.to_vec();
    y.extend(std::iter::repeat(y_mean).take(FEATURE_COUNT));
    let mut data = vec![("Y".to_string(), y)];
    let mut names = Vec::with_capacity(FEATURE_COUNT);
    for j in 0..FEATURE_COUNT {
        let mut column: Vec<f64> = rows
            .iter()
            .map(|r| standardized(r, &means, &scales, j))
            .collect();
        column.extend((0..FEATURE_COUNT).map(|k| if k == j { penalty } else { 0.0 }));
        let name = format!("X{j}");
        names.push(name.clone());
        data.push((name, column));
    }

    let regression_data = RegressionDataBuilder::new()
        .build_from(data)
        .map_err(|e| ForecastError::ModelUnavailable(format!("regression data: {e}")))?;
    let formula = format!("Y ~ {}", names.join(" + "));
    let model = FormulaRegressionBuilder::new()
        .data(&regression_data)
        .formula(formula.as_str())
        .fit()
        .map_err(|e| ForecastError::ModelUnavailable(format!("linear regression fit failed: {e}")))?;

    // parameters() returns [intercept, X0, .., X7]
    let params = model.parameters();
    if params.len() != FEATURE_COUNT + 1 {
        return Err(ForecastError::ModelUnavailable(format!(
            "regression returned {} parameters, expected {}",
            params.len(),
            FEATURE_COUNT + 1
        )));
    }
    Ok(LinearModel {
        intercept: params[0],
        coefficients: params[1..].to_vec(),
        feature_means: means,
        feature_scales: scales,
    })
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Fit an L2-penalized logistic regression of `labels` on `rows`.
///
/// The intercept is not penalized. The returned model's decision value is
/// the log-odds of a `true` label.
pub fn fit_logistic(rows: &[FeatureVector], labels: &[bool], alpha: f64) -> Result<LinearModel> {
    check_inputs(rows.len(), labels.len(), alpha)?;
    let (means, scales) = column_moments(rows);
    let n = rows.len();
    let width = FEATURE_COUNT + 1;

    let design = DMatrix::from_fn(n, width, |i, j| {
        if j == 0 {
            1.0
        } else {
            standardized(&rows[i], &means, &scales, j - 1)
        }
    });
    let y = DVector::from_iterator(n, labels.iter().map(|&l| if l { 1.0 } else { 0.0 }));
    let mut penalty = DMatrix::<f64>::identity(width, width) * alpha;
    penalty[(0, 0)] = 0.0;

    let mut beta = DVector::<f64>::zeros(width);
    let mut converged = false;
    for _ in 0..MAX_NEWTON_STEPS {
        let p = (&design * &beta).map(sigmoid);
        let w = p.map(|p| (p * (1.0 - p)).max(MIN_IRLS_WEIGHT));
        let gradient = design.transpose() * (&y - &p) - &penalty * &beta;
        let weighted = DMatrix::from_fn(n, width, |i, j| design[(i, j)] * w[i]);
        let hessian = design.transpose() * weighted + &penalty;
        let step = hessian
            .cholesky()
            .ok_or_else(|| {
                ForecastError::ModelUnavailable("logistic Hessian is not positive definite".to_string())
            })?
            .solve(&gradient);
        beta += &step;
        if step.amax() < NEWTON_TOLERANCE {
            converged = true;
            break;
        }
    }
    if !converged {
        log::warn!(
            "[Frost] train: logistic fit stopped after {} steps without converging",
            MAX_NEWTON_STEPS
        );
    }
    if beta.iter().any(|b| !b.is_finite()) {
        return Err(ForecastError::ModelUnavailable(
            "logistic fit diverged".to_string(),
        ));
    }

    Ok(LinearModel {
        intercept: beta[0],
        coefficients: beta.iter().skip(1).copied().collect(),
        feature_means: means,
        feature_scales: scales,
    })
}

/// Fit both models on a date-sorted history.
pub fn train_models(records: &[DailyRecord], alpha: f64, frost_threshold: f64) -> Result<FrostModels> {
    let rows = training_rows(records);
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(ForecastError::InsufficientHistory {
            needed: MIN_TRAINING_ROWS + FEATURE_WINDOW_DAYS,
            found: records.len(),
        });
    }
    let (features, temperatures): (Vec<FeatureVector>, Vec<f64>) = rows.into_iter().unzip();
    let frost_labels: Vec<bool> = temperatures.iter().map(|t| *t <= frost_threshold).collect();
    let frost_count = frost_labels.iter().filter(|l| **l).count();

    let temperature = TemperatureRegressor(fit_ridge(&features, &temperatures, alpha)?);
    let frost = FrostClassifier(fit_logistic(&features, &frost_labels, alpha)?);

    let mut models = FrostModels::new(temperature, frost)?;
    models.frost_threshold = frost_threshold;
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        models.trained_on = Some(TrainingSummary {
            rows: features.len(),
            first_date: first.date,
            last_date: last.date,
            alpha,
            frost_rate: frost_percentage(frost_count, features.len()),
        });
    }
    log::info!(
        "[Frost] train: fitted on {} rows ({} frost targets, alpha {})",
        features.len(),
        frost_count,
        alpha
    );
    Ok(models)
}

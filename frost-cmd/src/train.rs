//! `train`: fit the models on a history file.

use frost_core::HistoricalSeries;
use frost_model::train::train_models;
use std::path::Path;

pub fn run_train(
    history_path: &str,
    output: &str,
    alpha: f64,
    frost_threshold: f64,
) -> anyhow::Result<()> {
    let text = frost_utils::files::read_text(Path::new(history_path))?;
    let series = HistoricalSeries::from_csv(&text)?;
    let models = train_models(series.records(), alpha, frost_threshold)?;
    models.save(Path::new(output))?;
    if let Some(summary) = &models.trained_on {
        log::info!(
            "[Frost] cmd: wrote {} ({} rows, {} to {}, frost rate {:.1}%)",
            output,
            summary.rows,
            summary.first_date,
            summary.last_date,
            summary.frost_rate
        );
    }
    Ok(())
}

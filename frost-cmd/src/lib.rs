//! Command implementations for the frost CLI.
//!
//! Provides subcommands to forecast, summarize, train on and inspect a
//! daily minimum-temperature history.

use chrono::NaiveDate;
use clap::Subcommand;
use frost_db::Database;
use frost_model::train::DEFAULT_RIDGE_ALPHA;
use std::path::Path;

pub mod history;
pub mod predict;
pub mod settings;
pub mod stats;
pub mod train;

/// Trailing days printed by `history` when `--days` is not given.
pub const DEFAULT_HISTORY_DAYS: usize = 30;

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    frost_utils::dates::parse_date(s).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[derive(Subcommand)]
pub enum Command {
    /// Forecast minimum temperature and frost risk for the next seven days
    Predict {
        /// History CSV (`Fecha,Tmin`), optionally gzip-compressed
        #[arg(short = 'H', long)]
        history: String,

        /// Model weights JSON written by `train`
        #[arg(short = 'm', long)]
        models: String,

        /// Query date (defaults to the local calendar date)
        #[arg(long, value_parser = parse_cli_date)]
        today: Option<NaiveDate>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Engine configuration file (TOML or JSON)
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Longest run of missing days to bridge
        #[arg(long)]
        max_gap_days: Option<i64>,

        /// Real days required before forecasting
        #[arg(long)]
        min_history_days: Option<usize>,
    },

    /// Summary statistics and monthly frost counts for a history
    Stats {
        /// History CSV (`Fecha,Tmin`), optionally gzip-compressed
        #[arg(short = 'H', long)]
        history: String,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,

        /// Engine configuration file (TOML or JSON)
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Fit both models on a history and write the weights
    Train {
        /// History CSV (`Fecha,Tmin`), optionally gzip-compressed
        #[arg(short = 'H', long)]
        history: String,

        /// Output path for the weights JSON
        #[arg(short = 'o', long)]
        output: String,

        /// Ridge penalty
        #[arg(long, default_value_t = DEFAULT_RIDGE_ALPHA)]
        alpha: f64,

        /// Engine configuration file (TOML or JSON)
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Print the trailing days of a history as CSV
    History {
        /// History CSV (`Fecha,Tmin`), optionally gzip-compressed
        #[arg(short = 'H', long)]
        history: String,

        /// Number of days to print
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: usize,

        /// Last day to print (defaults to the last stored day)
        #[arg(long, value_parser = parse_cli_date)]
        end: Option<NaiveDate>,
    },
}

/// Read a history file into a fresh in-memory database.
pub fn open_history(path: &str) -> anyhow::Result<Database> {
    let text = frost_utils::files::read_text(Path::new(path))?;
    let db = Database::from_csv(&text)?;
    log::info!(
        "[Frost] cmd: opened {} ({} days)",
        path,
        db.query_record_count()?
    );
    Ok(db)
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Predict {
            history,
            models,
            today,
            json,
            config,
            max_gap_days,
            min_history_days,
        } => {
            let overrides = settings::Overrides {
                max_gap_days,
                min_history_days,
            };
            let engine_config = overrides.apply(settings::load_engine_config(config.as_deref())?)?;
            predict::run_predict(&history, &models, today, json, engine_config)
        }
        Command::Stats {
            history,
            json,
            config,
        } => {
            let engine_config = settings::load_engine_config(config.as_deref())?;
            stats::run_stats(&history, json, engine_config.frost_threshold)
        }
        Command::Train {
            history,
            output,
            alpha,
            config,
        } => {
            let engine_config = settings::load_engine_config(config.as_deref())?;
            train::run_train(&history, &output, alpha, engine_config.frost_threshold)
        }
        Command::History { history, days, end } => history::run_history(&history, days, end),
    }
}

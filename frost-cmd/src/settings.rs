//! Engine configuration loading.
//!
//! Sources, later ones winning:
//! 1. built-in defaults ([`EngineConfig::default`]);
//! 2. `frost.toml` / `frost.json` in the working directory, or the file
//!    passed with `--config` (which must then exist);
//! 3. `FROST_*` environment variables, nested keys joined with `__`
//!    (`FROST_BRIDGE__MAX_GAP_DAYS=10`).
//!
//! Command-line flags are applied on top by the caller.

use anyhow::Context;
use config::{Environment, File};
use frost_engine::EngineConfig;

/// File stem looked up when no `--config` is given.
pub const DEFAULT_CONFIG_NAME: &str = "frost";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FROST";

pub fn load_engine_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    let file = match path {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };
    let engine_config: EngineConfig = config::Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("reading engine configuration")?
        .try_deserialize()
        .context("decoding engine configuration")?;
    engine_config.validate()?;
    log::debug!("[Frost] settings: {:?}", engine_config);
    Ok(engine_config)
}

/// Flag overrides shared by the commands that run the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub max_gap_days: Option<i64>,
    pub min_history_days: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, mut engine_config: EngineConfig) -> anyhow::Result<EngineConfig> {
        if let Some(days) = self.max_gap_days {
            engine_config.bridge.max_gap_days = days;
        }
        if let Some(days) = self.min_history_days {
            engine_config.min_history_days = days;
        }
        engine_config.validate()?;
        Ok(engine_config)
    }
}

//! Frost forecast engine.
//!
//! [`ForecastEngine`] owns an immutable set of model weights and a
//! configuration. Each [`ForecastEngine::predict`] call is a pure function
//! of the store snapshot and the query date:
//!
//! 1. find the last observed day and bridge the gap up to yesterday;
//! 2. estimate the query date itself (its minimum is not recorded yet);
//! 3. roll the models forward one day at a time, feeding each prediction
//!    back as the newest input, for the forecast horizon.
//!
//! Forecast error compounds with each step of the rollout and nothing
//! recalibrates it, so day seven is the least trustworthy.
//!
//! Failures are returned as data ([`PredictionOutcome::Failure`]) so a
//! display layer can always render something.

pub mod config;
pub mod engine;
pub mod result;

pub use config::EngineConfig;
pub use engine::{rollout, rollout_step, ForecastEngine};
pub use result::{ForecastDay, ForecastResult, PredictionOutcome};

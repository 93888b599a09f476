//! Next-day models for minimum temperature and frost occurrence.
//!
//! Two independent linear models share one feature layout
//! ([`frost_data::features::FEATURE_NAMES`]): a ridge regressor for the
//! temperature itself and a logistic classifier whose decision value is
//! the log-odds of frost. Weights live in a JSON file, are
//! loaded once into an immutable [`FrostModels`], and can be refit from
//! history with [`train::train_models`].

pub mod linear;
pub mod train;
pub mod weights;

pub use linear::{FrostClassifier, LinearModel, TemperatureRegressor};
pub use weights::{FrostModels, Inference, TrainingSummary, MODEL_FORMAT_VERSION};

pub mod daily_record;
pub mod date_range;
pub mod error;
pub mod municipality;
pub mod risk;
pub mod series;

pub use daily_record::{DailyRecord, RecordOrigin};
pub use error::{ForecastError, Result};
pub use risk::{RiskLevel, RiskThresholds};
pub use series::{HistoricalSeries, HistoricalStore};

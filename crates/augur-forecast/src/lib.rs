//! Forecast the category and amount of a user's next expense or income.
//!
//! A [`ForecastingPipeline`] loads the transaction history, engineers
//! features, trains an `augur-rf` classifier and regressor for the
//! requested type, and assembles a [`ForecastResult`].

mod config;
mod error;
mod pipeline;
mod result;
mod stats;

pub use config::ForecastConfig;
pub use error::ForecastError;
pub use pipeline::ForecastingPipeline;
pub use result::{ForecastResult, Prediction};
pub use stats::{median, most_frequent_fine_category};

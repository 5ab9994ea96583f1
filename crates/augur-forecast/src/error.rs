//! Error types for augur-forecast.

use augur_io::IoError;
use augur_rf::RfError;

/// Errors from a forecast call.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Loading the transaction history failed.
    #[error("failed to load transaction history")]
    Source(#[from] IoError),

    /// Training or prediction failed, including use of an unfitted model.
    #[error("model error")]
    Model(#[from] RfError),

    /// The classifier produced an id with no coarse category.
    #[error("classifier produced unknown coarse category id {id}")]
    UnknownCoarseId {
        /// The predicted id.
        id: usize,
    },
}

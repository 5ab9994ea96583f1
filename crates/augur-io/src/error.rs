//! I/O error types for augur-io.

use std::path::PathBuf;

/// Errors from loading transaction history.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record, including
    /// a field that does not deserialize into its column type.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a transaction type string is neither `expense` nor `income`.
    #[error("unknown transaction type \"{raw}\": expected \"expense\" or \"income\"")]
    UnknownTxType {
        /// The string that failed to parse.
        raw: String,
    },
}

//! CSV transaction history reader.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::IoError;
use crate::domain::{TransactionRecord, TransactionSource};

/// Loads transactions from a CSV file.
///
/// Expected CSV format:
/// - Header row required: `id,date,amount,category,type,description`
/// - `type` is `expense` or `income`; `description` may be empty or absent
/// - Dates are kept verbatim and validated during feature engineering
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record or a field of the wrong type |
#[derive(Debug, Clone)]
pub struct CsvTransactionSource {
    path: PathBuf,
}

impl CsvTransactionSource {
    /// Create a source for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Return the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

impl TransactionSource for CsvTransactionSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<TransactionRecord>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let records = rdr
            .deserialize::<TransactionRecord>()
            .map(|result| result.map_err(|e| self.csv_error(e)))
            .collect::<Result<Vec<_>, _>>()?;

        info!(n_records = records.len(), "loaded transaction history");
        Ok(records)
    }
}

//! Transaction history input and feature engineering for augur.
//!
//! Records come from a [`TransactionSource`]; [`FeatureEngineer`] turns them
//! into classification and regression rows using the fixed
//! [`CategoryTables`].

mod category;
mod domain;
mod error;
mod features;
mod reader;

pub use category::{CategoryTables, CoarseCategory};
pub use domain::{TransactionId, TransactionRecord, TransactionSource, TxType};
pub use error::IoError;
pub use features::{
    CLASSIFICATION_FEATURES, CalendarFeatures, Datasets, FeatureEngineer, REGRESSION_FEATURES,
    SkipCounts, TrainingSet, TypeDatasets, build_datasets, parse_date,
};
pub use reader::CsvTransactionSource;

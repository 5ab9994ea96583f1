//! Feature engineering: transaction records to numeric training rows.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, instrument, warn};

use crate::category::CategoryTables;
use crate::domain::{TransactionRecord, TxType};

/// Column names of a classification row, in order.
pub const CLASSIFICATION_FEATURES: [&str; 6] = [
    "day_of_week",
    "month",
    "amount",
    "is_weekend",
    "is_month_start",
    "is_month_end",
];

/// Column names of a regression row, in order.
pub const REGRESSION_FEATURES: [&str; 5] = [
    "day_of_week",
    "month",
    "is_weekend",
    "is_month_start",
    "fine_category_id",
];

/// Parse a record date: `YYYY-MM-DD`, an RFC 3339 timestamp, or a
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp without offset.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

/// Calendar attributes of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    /// 1-based day of month.
    pub day_of_month: u32,
    /// 1-based month.
    pub month: u32,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Day 1 to 3.
    pub is_month_start: bool,
    /// Day 28 or later.
    pub is_month_end: bool,
}

impl CalendarFeatures {
    /// Derive the calendar attributes of `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        let day_of_month = date.day();
        Self {
            day_of_week,
            day_of_month,
            month: date.month(),
            is_weekend: day_of_week >= 5,
            is_month_start: day_of_month <= 3,
            is_month_end: day_of_month >= 28,
        }
    }

    /// Classification row: see [`CLASSIFICATION_FEATURES`].
    #[must_use]
    pub fn classification_row(&self, amount: f64) -> Vec<f64> {
        vec![
            f64::from(self.day_of_week),
            f64::from(self.month),
            amount,
            flag(self.is_weekend),
            flag(self.is_month_start),
            flag(self.is_month_end),
        ]
    }

    /// Regression row: see [`REGRESSION_FEATURES`].
    #[must_use]
    pub fn regression_row(&self, fine_category_id: usize) -> Vec<f64> {
        vec![
            f64::from(self.day_of_week),
            f64::from(self.month),
            flag(self.is_weekend),
            flag(self.is_month_start),
            fine_category_id as f64,
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Row-major features with one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet<L> {
    /// Feature rows.
    pub features: Vec<Vec<f64>>,
    /// Labels aligned with `features`.
    pub labels: Vec<L>,
}

impl<L> TrainingSet<L> {
    fn push(&mut self, row: Vec<f64>, label: L) {
        self.features.push(row);
        self.labels.push(label);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<L> Default for TrainingSet<L> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Classification (features to coarse id) and regression (features to
/// amount) datasets for one transaction type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeDatasets {
    /// Rows labelled with coarse category ids.
    pub classification: TrainingSet<usize>,
    /// Rows labelled with amounts.
    pub regression: TrainingSet<f64>,
}

/// Number of records dropped during feature engineering, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Category outside both fine maps.
    pub unknown_category: usize,
    /// Date that did not parse.
    pub malformed_date: usize,
    /// Amount that is negative, NaN or infinite.
    pub invalid_amount: usize,
}

impl SkipCounts {
    /// Total records skipped.
    #[must_use]
    pub fn total(&self) -> usize {
        self.unknown_category + self.malformed_date + self.invalid_amount
    }
}

/// Datasets for both transaction types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    /// Expense rows.
    pub expense: TypeDatasets,
    /// Income rows.
    pub income: TypeDatasets,
    /// Records that produced no row.
    pub skipped: SkipCounts,
}

impl Datasets {
    /// Datasets of one transaction type.
    #[must_use]
    pub fn for_type(&self, tx_type: TxType) -> &TypeDatasets {
        match tx_type {
            TxType::Expense => &self.expense,
            TxType::Income => &self.income,
        }
    }
}

/// Turns transaction records into training rows using fixed category tables.
///
/// Pure: the same records always give the same datasets, in record order.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngineer {
    tables: &'static CategoryTables,
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new(CategoryTables::global())
    }
}

impl FeatureEngineer {
    /// Create an engineer over the given tables.
    #[must_use]
    pub fn new(tables: &'static CategoryTables) -> Self {
        Self { tables }
    }

    /// Return the category tables in use.
    #[must_use]
    pub fn tables(&self) -> &'static CategoryTables {
        self.tables
    }

    /// Build classification and regression datasets for both types.
    #[instrument(skip_all, fields(n_records = records.len()))]
    pub fn build(&self, records: &[TransactionRecord]) -> Datasets {
        let mut datasets = Datasets::default();

        for record in records {
            let Some(fine_id) = self.tables.fine_id(&record.category) else {
                datasets.skipped.unknown_category += 1;
                continue;
            };
            let Some(date) = parse_date(&record.date) else {
                warn!(id = %record.id, date = %record.date, "skipping record with malformed date");
                datasets.skipped.malformed_date += 1;
                continue;
            };
            if !record.amount.is_finite() || record.amount < 0.0 {
                warn!(id = %record.id, amount = record.amount, "skipping record with invalid amount");
                datasets.skipped.invalid_amount += 1;
                continue;
            }

            let calendar = CalendarFeatures::from_date(date);
            let coarse = self.tables.coarse_for(record.tx_type, &record.category);

            let target = match record.tx_type {
                TxType::Expense => &mut datasets.expense,
                TxType::Income => &mut datasets.income,
            };
            target
                .classification
                .push(calendar.classification_row(record.amount), coarse.id);
            target
                .regression
                .push(calendar.regression_row(fine_id), record.amount);
        }

        debug!(
            expense_rows = datasets.expense.classification.len(),
            income_rows = datasets.income.classification.len(),
            unknown_category = datasets.skipped.unknown_category,
            malformed_date = datasets.skipped.malformed_date,
            invalid_amount = datasets.skipped.invalid_amount,
            "built datasets"
        );
        datasets
    }
}

/// Build datasets with the global category tables.
#[must_use]
pub fn build_datasets(records: &[TransactionRecord]) -> Datasets {
    FeatureEngineer::default().build(records)
}

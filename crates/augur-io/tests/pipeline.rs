//! Integration tests: CSV -> records -> feature datasets.

use std::fs;
use std::path::{Path, PathBuf};

use augur_io::{
    CLASSIFICATION_FEATURES, CsvTransactionSource, FeatureEngineer, REGRESSION_FEATURES,
    TransactionSource, TxType,
};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn history_to_datasets() {
    // 1. Read CSV
    let records = CsvTransactionSource::new(&fixture_path("history.csv"))
        .load()
        .expect("fixture should parse");
    assert_eq!(records.len(), 14);
    let n_expense = records
        .iter()
        .filter(|r| r.tx_type == TxType::Expense)
        .count();
    assert_eq!(n_expense, 10);

    // 2. Engineer features
    let datasets = FeatureEngineer::default().build(&records);

    // 3. One unknown category and one malformed date are dropped
    assert_eq!(datasets.skipped.unknown_category, 1);
    assert_eq!(datasets.skipped.malformed_date, 1);
    assert_eq!(datasets.skipped.invalid_amount, 0);

    let expense = datasets.for_type(TxType::Expense);
    assert_eq!(expense.classification.labels, vec![2, 2, 1, 6, 1, 2, 2, 1]);
    assert_eq!(expense.regression.len(), 8);
    assert_eq!(expense.regression.labels[0], 1450.0);

    let income = datasets.for_type(TxType::Income);
    assert_eq!(income.classification.labels, vec![5, 5, 0, 4]);
    // Stocks, from an RFC 3339 timestamp on Saturday 2024-02-03.
    assert_eq!(income.regression.features[2], vec![5.0, 2.0, 1.0, 1.0, 10.0]);

    // 4. Row widths match the published column names
    for row in &expense.classification.features {
        assert_eq!(row.len(), CLASSIFICATION_FEATURES.len());
    }
    for row in &income.regression.features {
        assert_eq!(row.len(), REGRESSION_FEATURES.len());
    }
}

#[test]
fn reload_gives_identical_datasets() {
    let dir = TempDir::new().unwrap();
    let copy = dir.path().join("copy.csv");
    fs::copy(fixture_path("history.csv"), &copy).unwrap();

    let engineer = FeatureEngineer::default();
    let a = engineer.build(&CsvTransactionSource::new(&fixture_path("history.csv")).load().unwrap());
    let b = engineer.build(&CsvTransactionSource::new(&copy).load().unwrap());
    assert_eq!(a, b);
}

#[test]
fn header_only_file_is_empty_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "id,date,amount,category,type,description\n").unwrap();

    let records = CsvTransactionSource::new(&path).load().unwrap();
    assert!(records.is_empty());
    let datasets = FeatureEngineer::default().build(&records);
    assert!(datasets.expense.classification.is_empty());
    assert!(datasets.income.classification.is_empty());
}

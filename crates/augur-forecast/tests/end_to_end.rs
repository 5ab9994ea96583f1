//! End-to-end forecasting tests: history -> pipeline -> JSON.

use std::fs;

use augur_forecast::{ForecastConfig, ForecastingPipeline};
use augur_io::{CsvTransactionSource, TransactionRecord, TxType};
use augur_rf::RandomForestConfig;
use chrono::NaiveDate;
use tempfile::TempDir;

const GROCERY_DAY: &str = "2024-03-15";
const DINING_DAY: &str = "2024-07-06";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// 10 Groceries at 50.0 on a Friday, 2 Dining at 20.0 on a Saturday.
fn grocery_history() -> Vec<TransactionRecord> {
    let mut history: Vec<TransactionRecord> = (0..10)
        .map(|i| {
            TransactionRecord::new(format!("g{i}"), GROCERY_DAY, 50.0, "Groceries", TxType::Expense)
        })
        .collect();
    history.push(TransactionRecord::new("d0", DINING_DAY, 20.0, "Dining", TxType::Expense));
    history.push(TransactionRecord::new("d1", DINING_DAY, 20.0, "Dining", TxType::Expense));
    history
}

#[test]
fn expense_forecast_predicts_living() {
    let pipeline =
        ForecastingPipeline::new(grocery_history(), ForecastConfig::new().with_seed(Some(42)));
    let result = pipeline.forecast_next_at(TxType::Expense, today()).unwrap();

    assert!(result.success);
    assert_eq!(result.n_transactions, 12);
    let pred = result.pred.expect("model should be trained");
    assert_eq!(pred.tx_type, TxType::Expense);
    assert_eq!(pred.coarse_category, "Living");
    assert!(
        (20.0..=50.0).contains(&pred.amount),
        "amount {} outside observed range",
        pred.amount
    );
}

#[test]
fn below_threshold_reports_failure() {
    let history: Vec<TransactionRecord> = grocery_history().into_iter().take(5).collect();
    let pipeline = ForecastingPipeline::new(history, ForecastConfig::new());
    let result = pipeline.forecast_next_at(TxType::Expense, today()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"success": false, "n_transactions": 5, "pred": {}})
    );
}

#[test]
fn seeded_forecasts_are_reproducible() {
    let config = ForecastConfig::new()
        .with_seed(Some(7))
        .with_classifier(RandomForestConfig::new(9).unwrap())
        .with_regressor(RandomForestConfig::new(9).unwrap().with_sample_ratio(0.8));
    let pipeline = ForecastingPipeline::new(grocery_history(), config);

    let a = pipeline.forecast_next_at(TxType::Expense, today()).unwrap();
    let b = pipeline.forecast_next_at(TxType::Expense, today()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn income_and_expense_are_independent() {
    let mut history = grocery_history();
    history.extend((0..10).map(|i| {
        TransactionRecord::new(format!("s{i}"), "2024-03-01", 2500.0, "Salary", TxType::Income)
    }));
    let pipeline = ForecastingPipeline::new(history, ForecastConfig::new().with_seed(Some(3)));

    let expense = pipeline.forecast_next_at(TxType::Expense, today()).unwrap();
    let income = pipeline.forecast_next_at(TxType::Income, today()).unwrap();
    assert_eq!(expense.n_transactions, 12);
    assert_eq!(income.n_transactions, 10);

    let pred = income.pred.expect("income model should be trained");
    assert_eq!(pred.coarse_category, "Regular Income");
    assert_eq!(pred.amount, 2500.0);
}

#[test]
fn csv_history_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let mut csv = String::from("id,date,amount,category,type,description\n");
    for record in grocery_history() {
        csv.push_str(&format!(
            "{},{},{},{},{},\n",
            record.id, record.date, record.amount, record.category, record.tx_type
        ));
    }
    fs::write(&path, csv).unwrap();

    let pipeline = ForecastingPipeline::new(
        CsvTransactionSource::new(&path),
        ForecastConfig::new().with_seed(Some(42)),
    );
    let result = pipeline.forecast_next_at(TxType::Expense, today()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["n_transactions"], 12);
    assert_eq!(json["pred"]["type"], "expense");
    assert_eq!(json["pred"]["coarse_category"], "Living");
}

#[test]
fn missing_history_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let pipeline = ForecastingPipeline::new(
        CsvTransactionSource::new(&dir.path().join("absent.csv")),
        ForecastConfig::new(),
    );
    assert!(pipeline.forecast_next_at(TxType::Income, today()).is_err());
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use augur_forecast::{ForecastConfig, ForecastingPipeline};
use augur_io::{
    CLASSIFICATION_FEATURES, CsvTransactionSource, FeatureEngineer, REGRESSION_FEATURES,
    TransactionSource, TxType,
};
use augur_rf::{
    RandomForestClassifier, RandomForestConfig, RandomForestRegressor, accuracy,
    mean_absolute_error, train_test_split,
};

/// Split seed used by `evaluate` when `--seed` is not given.
const DEFAULT_EVAL_SEED: u64 = 42;

#[derive(Parser)]
#[command(name = "augur")]
#[command(about = "Forecast the next expense or income from transaction history")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility (fresh entropy if not set)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel prediction (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Random Forest parameters shared by both subcommands.
#[derive(Args, Debug, Clone)]
struct ForestArgs {
    /// Number of trees in each forest
    #[arg(long, default_value_t = 15)]
    n_trees: usize,

    /// Maximum tree depth (root is depth 1)
    #[arg(long, default_value_t = 10)]
    max_depth: usize,

    /// Partition size at or below which a child becomes a leaf
    #[arg(long, default_value_t = 2)]
    min_size: usize,

    /// Bootstrap sample size as a fraction of the dataset, in (0, 1]
    #[arg(long, default_value_t = 1.0)]
    sample_ratio: f64,
}

impl ForestArgs {
    fn to_config(&self) -> Result<RandomForestConfig> {
        Ok(RandomForestConfig::new(self.n_trees)?
            .with_max_depth(self.max_depth)
            .with_min_size(self.min_size)
            .with_sample_ratio(self.sample_ratio))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Predict the coarse category and amount of the next transaction
    Forecast {
        /// Path to the transaction history CSV file
        #[arg(long)]
        data: PathBuf,

        /// Transaction type to forecast: "expense" or "income"
        #[arg(long = "type")]
        tx_type: TxType,

        /// Date of the forecast event, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// History size below which no forecast is attempted
        #[arg(long, default_value_t = 10)]
        min_transactions: usize,

        #[command(flatten)]
        forest: ForestArgs,
    },

    /// Report held-out classifier accuracy and regressor error for one type
    Evaluate {
        /// Path to the transaction history CSV file
        #[arg(long)]
        data: PathBuf,

        /// Transaction type to evaluate: "expense" or "income"
        #[arg(long = "type")]
        tx_type: TxType,

        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_ratio: f64,

        #[command(flatten)]
        forest: ForestArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput {
    #[serde(rename = "type")]
    tx_type: TxType,
    n_rows: usize,
    n_train: usize,
    n_test: usize,
    n_trees: usize,
    classification_features: &'static [&'static str],
    regression_features: &'static [&'static str],
    accuracy: f64,
    mean_absolute_error: f64,
    skipped_records: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Forecast {
            data,
            tx_type,
            today,
            min_transactions,
            forest,
        } => {
            let forest_config = forest.to_config()?;
            let config = ForecastConfig::new()
                .with_min_transactions(min_transactions)
                .with_classifier(forest_config.clone())
                .with_regressor(forest_config)
                .with_seed(cli.seed);

            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let pipeline = ForecastingPipeline::new(CsvTransactionSource::new(&data), config);
            let result = pipeline
                .forecast_next_at(tx_type, today)
                .with_context(|| format!("failed to forecast next {tx_type}"))?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Evaluate {
            data,
            tx_type,
            test_ratio,
            forest,
        } => {
            let config = forest.to_config()?;
            let seed = cli.seed.unwrap_or(DEFAULT_EVAL_SEED);

            // Read history and build datasets
            let records = CsvTransactionSource::new(&data)
                .load()
                .context("failed to read transaction history")?;
            let datasets = FeatureEngineer::default().build(&records);
            let typed = datasets.for_type(tx_type);
            info!(
                n_records = records.len(),
                n_rows = typed.classification.len(),
                "datasets built"
            );

            // Same seed and row count give the same permutation for both views
            let clf_split = train_test_split(
                &typed.classification.features,
                &typed.classification.labels,
                test_ratio,
                seed,
            )?;
            let reg_split = train_test_split(
                &typed.regression.features,
                &typed.regression.labels,
                test_ratio,
                seed,
            )?;

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut classifier = RandomForestClassifier::new(config.clone());
            classifier
                .fit(&clf_split.train_features, &clf_split.train_labels, &mut rng)
                .context("classifier training failed")?;
            let mut regressor = RandomForestRegressor::new(config.clone());
            regressor
                .fit(&reg_split.train_features, &reg_split.train_labels, &mut rng)
                .context("regressor training failed")?;

            let predicted_ids = classifier.predict_batch(&clf_split.test_features)?;
            let predicted_amounts = regressor.predict_batch(&reg_split.test_features)?;

            let output = EvaluateOutput {
                tx_type,
                n_rows: typed.classification.len(),
                n_train: clf_split.train_labels.len(),
                n_test: clf_split.test_labels.len(),
                n_trees: config.n_trees(),
                classification_features: &CLASSIFICATION_FEATURES,
                regression_features: &REGRESSION_FEATURES,
                accuracy: accuracy(&clf_split.test_labels, &predicted_ids),
                mean_absolute_error: mean_absolute_error(&reg_split.test_labels, &predicted_amounts),
                skipped_records: datasets.skipped.total(),
            };
            info!(
                accuracy = output.accuracy,
                mae = output.mean_absolute_error,
                "evaluation complete"
            );
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

//! Next-transaction forecasting: load history, train, predict.

use std::fmt;

use augur_io::{CalendarFeatures, FeatureEngineer, TransactionSource, TxType, TypeDatasets};
use augur_rf::{RandomForestClassifier, RandomForestRegressor};
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::result::{ForecastResult, Prediction};
use crate::stats::{amounts_of, median, most_frequent_fine_category};

/// Progress of one forecast call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForecastStage {
    Loading,
    InsufficientData,
    Training,
    Predicting,
    Done,
}

impl fmt::Display for ForecastStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ForecastStage::Loading => "loading",
            ForecastStage::InsufficientData => "insufficient_data",
            ForecastStage::Training => "training",
            ForecastStage::Predicting => "predicting",
            ForecastStage::Done => "done",
        })
    }
}

fn enter(stage: ForecastStage) {
    debug!(%stage, "forecast stage");
}

struct TrainedModels {
    classifier: RandomForestClassifier,
    regressor: RandomForestRegressor,
}

/// Predicts the coarse category and amount of the next expense or income.
///
/// Each call reloads the history from its [`TransactionSource`] and trains
/// fresh forests; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ForecastingPipeline<S> {
    source: S,
    config: ForecastConfig,
    engineer: FeatureEngineer,
}

impl<S: TransactionSource> ForecastingPipeline<S> {
    /// Create a pipeline over `source`.
    pub fn new(source: S, config: ForecastConfig) -> Self {
        Self {
            source,
            config,
            engineer: FeatureEngineer::default(),
        }
    }

    /// Return the pipeline configuration.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the next expense as of today.
    ///
    /// # Errors
    ///
    /// See [`forecast_next_at`](Self::forecast_next_at).
    pub fn forecast_next_expense(&self) -> Result<ForecastResult, ForecastError> {
        self.forecast_next(TxType::Expense)
    }

    /// Forecast the next income as of today.
    ///
    /// # Errors
    ///
    /// See [`forecast_next_at`](Self::forecast_next_at).
    pub fn forecast_next_income(&self) -> Result<ForecastResult, ForecastError> {
        self.forecast_next(TxType::Income)
    }

    /// Forecast the next transaction of `tx_type` as of the local date.
    ///
    /// # Errors
    ///
    /// See [`forecast_next_at`](Self::forecast_next_at).
    pub fn forecast_next(&self, tx_type: TxType) -> Result<ForecastResult, ForecastError> {
        self.forecast_next_at(tx_type, Local::now().date_naive())
    }

    /// Forecast the next transaction of `tx_type`, taking `today` as the
    /// date of the predicted event.
    ///
    /// An insufficient total history gives `success: false`. A sufficient
    /// history whose `tx_type` rows fall below the training gate gives
    /// `success: true` with no prediction.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                                 |
    /// |-------------------------------------|--------------------------------------|
    /// | [`ForecastError::Source`]           | the history cannot be loaded         |
    /// | [`ForecastError::Model`]            | training or prediction fails         |
    /// | [`ForecastError::UnknownCoarseId`]  | the classifier returns an unknown id |
    #[instrument(skip_all, fields(tx_type = %tx_type, today = %today))]
    pub fn forecast_next_at(
        &self,
        tx_type: TxType,
        today: NaiveDate,
    ) -> Result<ForecastResult, ForecastError> {
        enter(ForecastStage::Loading);
        let records = self.source.load()?;
        let n_transactions = records.iter().filter(|r| r.tx_type == tx_type).count();

        if records.len() < self.config.min_transactions {
            enter(ForecastStage::InsufficientData);
            info!(
                n_records = records.len(),
                min_transactions = self.config.min_transactions,
                "not enough history to forecast"
            );
            return Ok(ForecastResult::insufficient(n_transactions));
        }

        enter(ForecastStage::Training);
        let datasets = self.engineer.build(&records);
        let Some(models) = self.train(datasets.for_type(tx_type))? else {
            info!(n_transactions, "too few usable rows to train, no prediction");
            return Ok(ForecastResult::untrained(n_transactions));
        };

        enter(ForecastStage::Predicting);
        let tables = self.engineer.tables();
        let calendar = CalendarFeatures::from_date(today);

        let typical_amount = median(&amounts_of(&records, tx_type));
        let coarse_id = models
            .classifier
            .predict(&calendar.classification_row(typical_amount))?;
        let coarse_category = tables
            .coarse_name(coarse_id)
            .ok_or(ForecastError::UnknownCoarseId { id: coarse_id })?;

        let fine_id = most_frequent_fine_category(&records, tx_type, tables)
            .and_then(|fine| tables.fine_id(fine))
            .unwrap_or(0);
        let amount = models
            .regressor
            .predict(&calendar.regression_row(fine_id))?;

        enter(ForecastStage::Done);
        info!(
            n_transactions,
            coarse_category,
            amount,
            typical_amount,
            fine_id,
            "forecast complete"
        );
        Ok(ForecastResult::predicted(
            n_transactions,
            Prediction {
                tx_type,
                coarse_category: coarse_category.to_owned(),
                amount,
            },
        ))
    }

    /// Fit both forests, or return `None` when the rows fall below the gate.
    fn train(&self, data: &TypeDatasets) -> Result<Option<TrainedModels>, ForecastError> {
        if data.classification.len() < self.config.min_transactions {
            return Ok(None);
        }

        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut classifier = RandomForestClassifier::new(self.config.classifier.clone());
        classifier.fit(
            &data.classification.features,
            &data.classification.labels,
            &mut rng,
        )?;
        let mut regressor = RandomForestRegressor::new(self.config.regressor.clone());
        regressor.fit(&data.regression.features, &data.regression.labels, &mut rng)?;

        Ok(Some(TrainedModels {
            classifier,
            regressor,
        }))
    }
}

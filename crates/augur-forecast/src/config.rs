//! Configuration for the forecasting pipeline.

use augur_rf::RandomForestConfig;

/// Settings for [`ForecastingPipeline`](crate::ForecastingPipeline).
///
/// # Defaults
///
/// | Parameter          | Default                        |
/// |--------------------|--------------------------------|
/// | `min_transactions` | 10                             |
/// | `classifier`       | [`RandomForestConfig::default`] |
/// | `regressor`        | [`RandomForestConfig::default`] |
/// | `seed`             | `None` (entropy)               |
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub(crate) min_transactions: usize,
    pub(crate) classifier: RandomForestConfig,
    pub(crate) regressor: RandomForestConfig,
    pub(crate) seed: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_transactions: 10,
            classifier: RandomForestConfig::default(),
            regressor: RandomForestConfig::default(),
            seed: None,
        }
    }
}

impl ForecastConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the history size below which no forecast is attempted. The same
    /// count gates training on a type's dataset.
    #[must_use]
    pub fn with_min_transactions(mut self, min_transactions: usize) -> Self {
        self.min_transactions = min_transactions;
        self
    }

    /// Set the coarse category classifier's forest settings.
    #[must_use]
    pub fn with_classifier(mut self, classifier: RandomForestConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the amount regressor's forest settings.
    #[must_use]
    pub fn with_regressor(mut self, regressor: RandomForestConfig) -> Self {
        self.regressor = regressor;
        self
    }

    /// Seed the forests' generator for reproducible forecasts.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Return the minimum history size.
    #[must_use]
    pub fn min_transactions(&self) -> usize {
        self.min_transactions
    }

    /// Return the classifier settings.
    #[must_use]
    pub fn classifier(&self) -> &RandomForestConfig {
        &self.classifier
    }

    /// Return the regressor settings.
    #[must_use]
    pub fn regressor(&self) -> &RandomForestConfig {
        &self.regressor
    }

    /// Return the seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

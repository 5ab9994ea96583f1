//! Prediction methods for the Random Forest ensembles.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RfError;
use crate::forest::{Forest, RandomForestClassifier, RandomForestRegressor};
use crate::tally::LabelTally;

fn fitted<'a>(forest: Option<&'a Forest>, model: &'static str) -> Result<&'a Forest, RfError> {
    forest.ok_or(RfError::NotFitted { model })
}

impl RandomForestClassifier {
    /// Predict the class label for a single sample.
    ///
    /// Every tree votes with its leaf label; the label with the most votes
    /// wins, and on a tie the label voted first (in tree order) wins.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                              |
    /// |----------------------------------------|-----------------------------------|
    /// | [`RfError::NotFitted`]                 | called before [`fit`](Self::fit)  |
    /// | [`RfError::PredictionFeatureMismatch`] | `sample.len() != n_features`      |
    pub fn predict(&self, sample: &[f64]) -> Result<usize, RfError> {
        let forest = fitted(self.forest.as_ref(), "RandomForestClassifier")?;
        let votes = LabelTally::from_labels(forest.tree_outputs(sample)?);
        // Labels are class ids stored as f64, so the cast is exact.
        Ok(votes.mode().unwrap_or(0.0) as usize)
    }

    /// Predict class labels for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict), for the first failing sample.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }
}

impl RandomForestRegressor {
    /// Predict a target for a single sample as the mean of the trees' leaf values.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                              |
    /// |----------------------------------------|-----------------------------------|
    /// | [`RfError::NotFitted`]                 | called before [`fit`](Self::fit)  |
    /// | [`RfError::PredictionFeatureMismatch`] | `sample.len() != n_features`      |
    pub fn predict(&self, sample: &[f64]) -> Result<f64, RfError> {
        let forest = fitted(self.forest.as_ref(), "RandomForestRegressor")?;
        let outputs = forest.tree_outputs(sample)?;
        Ok(outputs.iter().sum::<f64>() / outputs.len() as f64)
    }

    /// Predict targets for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict), for the first failing sample.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }
}

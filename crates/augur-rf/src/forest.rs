//! Bootstrap-aggregated forests of CART trees.

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::config::RandomForestConfig;
use crate::dataset::Dataset;
use crate::error::RfError;
use crate::tree::{DecisionTree, DecisionTreeConfig};

/// Trees grown on independent bootstrap samples of one dataset.
#[derive(Debug, Clone)]
pub(crate) struct Forest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) n_features: usize,
}

impl Forest {
    /// Grow `config.n_trees` trees, each on its own bootstrap sample.
    #[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = dataset.n_samples()))]
    pub(crate) fn grow(
        config: &RandomForestConfig,
        dataset: &Dataset,
        rng: &mut impl Rng,
    ) -> Result<Self, RfError> {
        if config.n_trees == 0 {
            return Err(RfError::InvalidTreeCount { n_trees: 0 });
        }
        let n_features = dataset.n_features();
        let max_features = config.max_features.resolve(n_features)?;
        let draw_count = config.draw_count(dataset.n_samples())?;

        info!(
            n_trees = config.n_trees,
            n_samples = dataset.n_samples(),
            n_features,
            max_features,
            draw_count,
            "training random forest"
        );

        let tree_config = DecisionTreeConfig::new()
            .with_max_depth(config.max_depth)
            .with_min_size(config.min_size)
            .with_max_features(Some(max_features));

        let mut trees = Vec::with_capacity(config.n_trees);
        for tree_index in 0..config.n_trees {
            let sample = dataset.bootstrap(draw_count, rng);
            let tree = tree_config.fit(&sample, rng)?;
            debug!(tree_index, n_nodes = tree.n_nodes(), "tree grown");
            trees.push(tree);
        }

        Ok(Self { trees, n_features })
    }

    /// Check the sample width and collect each tree's leaf value.
    pub(crate) fn tree_outputs(&self, sample: &[f64]) -> Result<Vec<f64>, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(self.trees.iter().map(|t| t.root.predict(sample)).collect())
    }
}

/// Random Forest classifier over integer class labels.
///
/// Created unfitted; [`fit`](Self::fit) grows the trees and
/// [`predict`](crate::RandomForestClassifier::predict) returns the plurality vote.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    pub(crate) config: RandomForestConfig,
    pub(crate) forest: Option<Forest>,
}

impl RandomForestClassifier {
    /// Create an unfitted classifier.
    #[must_use]
    pub fn new(config: RandomForestConfig) -> Self {
        Self {
            config,
            forest: None,
        }
    }

    /// Train on row-major `features` and one class label per row, replacing
    /// any previously fitted trees.
    ///
    /// # Errors
    ///
    /// Input errors from [`Dataset::new`] and configuration errors
    /// ([`RfError::InvalidMaxFeatures`], [`RfError::InvalidSampleRatio`],
    /// [`RfError::InvalidMaxDepth`], [`RfError::InvalidMinSize`]).
    pub fn fit(
        &mut self,
        features: &[Vec<f64>],
        labels: &[usize],
        rng: &mut impl Rng,
    ) -> Result<(), RfError> {
        let labels: Vec<f64> = labels.iter().map(|&l| l as f64).collect();
        let dataset = Dataset::new(features, &labels)?;
        self.forest = Some(Forest::grow(&self.config, &dataset, rng)?);
        Ok(())
    }

    /// Return `true` once [`fit`](Self::fit) has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }

    /// Return the training configuration.
    #[must_use]
    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }

    /// Return the fitted trees (empty before fit).
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        match &self.forest {
            Some(forest) => &forest.trees,
            None => &[],
        }
    }
}

/// Random Forest regressor over continuous targets.
///
/// Each tree's leaves hold the mode of their training targets; the forest
/// prediction is the mean across trees.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    pub(crate) config: RandomForestConfig,
    pub(crate) forest: Option<Forest>,
}

impl RandomForestRegressor {
    /// Create an unfitted regressor.
    #[must_use]
    pub fn new(config: RandomForestConfig) -> Self {
        Self {
            config,
            forest: None,
        }
    }

    /// Train on row-major `features` and one target per row, replacing any
    /// previously fitted trees.
    ///
    /// # Errors
    ///
    /// Same as [`RandomForestClassifier::fit`].
    pub fn fit(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        rng: &mut impl Rng,
    ) -> Result<(), RfError> {
        let dataset = Dataset::new(features, targets)?;
        self.forest = Some(Forest::grow(&self.config, &dataset, rng)?);
        Ok(())
    }

    /// Return `true` once [`fit`](Self::fit) has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }

    /// Return the training configuration.
    #[must_use]
    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }

    /// Return the fitted trees (empty before fit).
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        match &self.forest {
            Some(forest) => &forest.trees,
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::config::{MaxFeatures, RandomForestConfig};
    use crate::{RandomForestClassifier, RandomForestRegressor, RfError};

    /// Generate a simple 3-class separable dataset.
    fn make_separable_data() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for class in 0..3 {
            for i in 0..20 {
                features.push(vec![class as f64 * 10.0 + i as f64 * 0.15, 0.5]);
                labels.push(class);
            }
        }
        (features, labels)
    }

    #[test]
    fn three_class_separable_accuracy() {
        let (features, labels) = make_separable_data();
        let config = RandomForestConfig::new(25)
            .unwrap()
            .with_max_features(MaxFeatures::All);
        let mut clf = RandomForestClassifier::new(config);
        clf.fit(&features, &labels, &mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();

        let predictions = clf.predict_batch(&features).unwrap();
        let correct = predictions
            .iter()
            .zip(&labels)
            .filter(|&(&p, &l)| p == l)
            .count();
        let accuracy = correct as f64 / labels.len() as f64;
        assert!(accuracy > 0.9, "accuracy = {accuracy}");
    }

    #[test]
    fn fit_grows_configured_tree_count() {
        let (features, labels) = make_separable_data();
        let mut clf = RandomForestClassifier::new(RandomForestConfig::default());
        assert!(!clf.is_fitted());
        assert!(clf.trees().is_empty());
        clf.fit(&features, &labels, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert!(clf.is_fitted());
        assert_eq!(clf.trees().len(), 15);
        for tree in clf.trees() {
            assert!(tree.depth() <= 10);
        }
    }

    #[test]
    fn deterministic_with_same_seed() {
        let (features, labels) = make_separable_data();
        let targets: Vec<f64> = labels.iter().map(|&l| l as f64 * 12.5).collect();

        let run = || {
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            let mut reg = RandomForestRegressor::new(RandomForestConfig::new(10).unwrap());
            reg.fit(&features, &targets, &mut rng).unwrap();
            reg.predict_batch(&features).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_dataset_error() {
        let mut clf = RandomForestClassifier::new(RandomForestConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = clf.fit(&[], &[], &mut rng).unwrap_err();
        assert!(matches!(err, RfError::EmptyDataset));
        assert!(!clf.is_fitted());
    }

    #[test]
    fn invalid_sample_ratio_error() {
        let (features, labels) = make_separable_data();
        let config = RandomForestConfig::default().with_sample_ratio(0.0);
        let mut clf = RandomForestClassifier::new(config);
        let err = clf
            .fit(&features, &labels, &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, RfError::InvalidSampleRatio { .. }));
    }
}

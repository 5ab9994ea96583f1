//! Configuration builder for Random Forest training.

use crate::error::RfError;

/// Strategy for determining the number of features to consider at each split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(n_features)))`.
    Sqrt,
    /// `max(1, floor(log2(n_features)))`.
    Log2,
    /// A fraction of total features, rounded up (must be in (0.0, 1.0]).
    Fraction(f64),
    /// A fixed count.
    Fixed(usize),
    /// All features (no subsampling).
    All,
}

impl MaxFeatures {
    /// Resolve to a concrete count for a dataset with `n_features` columns.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidMaxFeatures`] when the count falls outside
    /// `[1, n_features]`.
    pub fn resolve(self, n_features: usize) -> Result<usize, RfError> {
        let n = n_features as f64;
        let resolved = match self {
            MaxFeatures::Sqrt => (n.sqrt().floor() as usize).max(1),
            MaxFeatures::Log2 => (n.log2().floor().max(0.0) as usize).max(1),
            MaxFeatures::Fraction(f) => (n * f).ceil() as usize,
            MaxFeatures::Fixed(count) => count,
            MaxFeatures::All => n_features,
        };
        if resolved == 0 || resolved > n_features {
            return Err(RfError::InvalidMaxFeatures {
                max_features: resolved,
                n_features,
            });
        }
        Ok(resolved)
    }
}

/// Configuration shared by [`RandomForestClassifier`](crate::RandomForestClassifier)
/// and [`RandomForestRegressor`](crate::RandomForestRegressor).
///
/// Construct via [`RandomForestConfig::new`] or [`Default`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter      | Default |
/// |----------------|---------|
/// | `n_trees`      | 15      |
/// | `max_depth`    | 10      |
/// | `min_size`     | 2       |
/// | `sample_ratio` | 1.0     |
/// | `max_features` | `Sqrt`  |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_depth: usize,
    pub(crate) min_size: usize,
    pub(crate) sample_ratio: f64,
    pub(crate) max_features: MaxFeatures,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, RfError> {
        if n_trees == 0 {
            return Err(RfError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_depth: 10,
            min_size: 2,
            sample_ratio: 1.0,
            max_features: MaxFeatures::Sqrt,
        })
    }

    // --- Setters ---

    /// Set the maximum tree depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the partition size at or below which a child becomes a leaf.
    #[must_use]
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the bootstrap sample size as a proportion of the dataset.
    #[must_use]
    pub fn with_sample_ratio(mut self, sample_ratio: f64) -> Self {
        self.sample_ratio = sample_ratio;
        self
    }

    /// Set the max features strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the leaf size threshold.
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Return the bootstrap sample ratio.
    #[must_use]
    pub fn sample_ratio(&self) -> f64 {
        self.sample_ratio
    }

    /// Return the max features strategy.
    #[must_use]
    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    /// Number of rows drawn for each tree's bootstrap sample.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidSampleRatio`] if `sample_ratio` is not in (0.0, 1.0].
    pub(crate) fn draw_count(&self, n_samples: usize) -> Result<usize, RfError> {
        if !(self.sample_ratio > 0.0 && self.sample_ratio <= 1.0) {
            return Err(RfError::InvalidSampleRatio {
                ratio: self.sample_ratio,
            });
        }
        Ok(((n_samples as f64 * self.sample_ratio).round() as usize).max(1))
    }
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 15,
            max_depth: 10,
            min_size: 2,
            sample_ratio: 1.0,
            max_features: MaxFeatures::Sqrt,
        }
    }
}

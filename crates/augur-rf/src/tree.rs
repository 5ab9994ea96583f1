use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    RfError,
    dataset::Dataset,
    node::Node,
    split::find_best_split,
    tally::LabelTally,
};

/// Configuration for a single CART decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter      | Default               |
/// |----------------|-----------------------|
/// | `max_depth`    | 10                    |
/// | `min_size`     | 2                     |
/// | `max_features` | `None` (all features) |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) max_depth: usize,
    pub(crate) min_size: usize,
    pub(crate) max_features: Option<usize>,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: 10,
            min_size: 2,
            max_features: None,
        }
    }

    /// Set the maximum depth. The root split sits at depth 1; a split at
    /// depth `max_depth` always gets leaf children.
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

    /// Set the number of features drawn at each split.
    ///
    /// `None` means consider all features.
    #[must_use]
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
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

    /// Return the per-split feature count, if set.
    #[must_use]
    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    /// Grow a tree on `dataset`, drawing split features from `rng`.
    ///
    /// # Errors
    ///
    /// | Variant                          | When                                            |
    /// |----------------------------------|-------------------------------------------------|
    /// | [`RfError::InvalidMaxDepth`]     | `max_depth` is 0                                |
    /// | [`RfError::InvalidMinSize`]      | `min_size` is 0                                 |
    /// | [`RfError::InvalidMaxFeatures`]  | `max_features` resolves outside [1, n_features] |
    #[instrument(skip(self, dataset, rng), fields(n_samples = dataset.n_samples()))]
    pub fn fit(&self, dataset: &Dataset, rng: &mut impl Rng) -> Result<DecisionTree, RfError> {
        if self.max_depth == 0 {
            return Err(RfError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_size == 0 {
            return Err(RfError::InvalidMinSize { min_size: 0 });
        }

        let n_features = dataset.n_features();
        let max_features = self.max_features.unwrap_or(n_features);
        if max_features == 0 || max_features > n_features {
            return Err(RfError::InvalidMaxFeatures {
                max_features,
                n_features,
            });
        }

        let builder = TreeBuilder {
            rows: dataset.rows(),
            n_features,
            max_depth: self.max_depth,
            min_size: self.min_size,
            max_features,
        };
        let indices: Vec<usize> = (0..dataset.n_samples()).collect();
        let root = builder.grow(&indices, 1, rng);

        let tree = DecisionTree { root, n_features };
        debug!(
            n_nodes = tree.n_nodes(),
            depth = tree.depth(),
            "decision tree built"
        );
        Ok(tree)
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed state shared by every recursive step of one tree's induction.
struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    n_features: usize,
    max_depth: usize,
    min_size: usize,
    max_features: usize,
}

impl TreeBuilder<'_> {
    fn tally(&self, indices: &[usize]) -> LabelTally {
        LabelTally::from_labels(indices.iter().map(|&i| self.rows[i][self.n_features]))
    }

    fn leaf(&self, indices: &[usize]) -> Node {
        leaf_from(&self.tally(indices))
    }

    /// Split the rows in `indices` at `depth`, or return a leaf when a
    /// stopping rule applies.
    fn grow(&self, indices: &[usize], depth: usize, rng: &mut impl Rng) -> Node {
        let tally = self.tally(indices);
        if tally.is_pure() {
            return leaf_from(&tally);
        }

        let Some(split) = find_best_split(
            self.rows,
            self.n_features,
            indices,
            &tally,
            self.max_features,
            rng,
        ) else {
            return leaf_from(&tally);
        };

        if split.left.is_empty() || split.right.is_empty() {
            return leaf_from(&tally);
        }
        debug!(
            depth,
            feature = %split.feature,
            threshold = split.threshold,
            score = %split.score,
            n_left = split.left.len(),
            n_right = split.right.len(),
            "node split"
        );

        let (left, right) = if depth >= self.max_depth {
            (self.leaf(&split.left), self.leaf(&split.right))
        } else {
            let left = if split.left.len() <= self.min_size {
                self.leaf(&split.left)
            } else {
                self.grow(&split.left, depth + 1, rng)
            };
            let right = if split.right.len() <= self.min_size {
                self.leaf(&split.right)
            } else {
                self.grow(&split.right, depth + 1, rng)
            };
            (left, right)
        };

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// Callers only pass non-empty partitions; 0.0 is never observed.
fn leaf_from(tally: &LabelTally) -> Node {
    Node::Leaf {
        value: tally.mode().unwrap_or(0.0),
    }
}

/// A fitted CART decision tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) root: Node,
    pub(crate) n_features: usize,
}

impl DecisionTree {
    /// Predict the label for a single sample.
    ///
    /// At each `Split`, goes left when `sample[feature] < threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<f64, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(self.root.predict(sample))
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Return the number of features this tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the total number of nodes (splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.root.count()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.count_leaves()
    }

    /// Return the depth in edges; a single-leaf tree has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.height()
    }
}

//! Random Forest classification and regression over dense numeric features.
//!
//! CART trees are grown on bootstrap samples with random feature
//! subsampling at each split and scored by Gini impurity. The classifier
//! takes the plurality vote across trees; the regressor averages them.
//! All randomness flows through a caller-supplied [`rand::Rng`], so a seeded
//! generator gives reproducible forests.

mod config;
mod dataset;
mod error;
mod eval;
mod forest;
mod node;
mod predict;
mod split;
mod tally;
mod tree;

pub use config::{MaxFeatures, RandomForestConfig};
pub use dataset::Dataset;
pub use error::RfError;
pub use eval::{TrainTestSplit, accuracy, mean_absolute_error, train_test_split};
pub use forest::{RandomForestClassifier, RandomForestRegressor};
pub use node::{FeatureIndex, Impurity, Node};
pub use split::{gini_impurity, partition_gini};
pub use tree::{DecisionTree, DecisionTreeConfig};

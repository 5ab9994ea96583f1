/// Errors from Random Forest operations.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when min_size is zero.
    #[error("min_size must be at least 1, got {min_size}")]
    InvalidMinSize {
        /// The invalid min_size value provided.
        min_size: usize,
    },

    /// Returned when max_features resolves to 0 or exceeds n_features.
    #[error("max_features resolved to {max_features}, but must be in [1, {n_features}]")]
    InvalidMaxFeatures {
        /// The resolved max_features value.
        max_features: usize,
        /// The number of features in the dataset.
        n_features: usize,
    },

    /// Returned when sample_ratio is not in (0.0, 1.0].
    #[error("sample_ratio must be in (0.0, 1.0], got {ratio}")]
    InvalidSampleRatio {
        /// The invalid sample_ratio value provided.
        ratio: f64,
    },

    /// Returned when a train/test split ratio is not in [0.0, 1.0).
    #[error("test_ratio must be in [0.0, 1.0), got {ratio}")]
    InvalidTestRatio {
        /// The invalid test_ratio value provided.
        ratio: f64,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when the number of labels differs from the number of samples.
    #[error("got {n_labels} labels for {n_samples} samples")]
    LabelCountMismatch {
        /// Number of feature rows.
        n_samples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a training value or label is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, column {column_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based column index (the label is the last column).
        column_index: usize,
    },

    /// Returned when predicting with an ensemble that was never fit.
    #[error("{model} used for prediction before fit")]
    NotFitted {
        /// Which ensemble was used.
        model: &'static str,
    },
}

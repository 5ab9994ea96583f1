use rand::Rng;

use crate::error::RfError;

/// A validated training set.
///
/// Each row holds the feature values followed by the label as a trailing
/// column, so a row carries everything the split search needs.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<Vec<f64>>,
    n_features: usize,
}

impl Dataset {
    /// Build a dataset from row-major features and one label per row.
    ///
    /// # Errors
    ///
    /// | Variant                           | When                                   |
    /// |-----------------------------------|----------------------------------------|
    /// | [`RfError::EmptyDataset`]         | `features` is empty                    |
    /// | [`RfError::ZeroFeatures`]         | rows have zero feature columns         |
    /// | [`RfError::LabelCountMismatch`]   | `labels.len() != features.len()`       |
    /// | [`RfError::FeatureCountMismatch`] | rows have inconsistent lengths         |
    /// | [`RfError::NonFiniteValue`]       | any value or label is NaN or infinite  |
    pub fn new(features: &[Vec<f64>], labels: &[f64]) -> Result<Self, RfError> {
        if features.is_empty() {
            return Err(RfError::EmptyDataset);
        }
        let n_features = features[0].len();
        if n_features == 0 {
            return Err(RfError::ZeroFeatures);
        }
        if labels.len() != features.len() {
            return Err(RfError::LabelCountMismatch {
                n_samples: features.len(),
                n_labels: labels.len(),
            });
        }

        let mut rows = Vec::with_capacity(features.len());
        for (sample_index, (row, &label)) in features.iter().zip(labels).enumerate() {
            if row.len() != n_features {
                return Err(RfError::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    sample_index,
                });
            }
            let mut full = Vec::with_capacity(n_features + 1);
            full.extend_from_slice(row);
            full.push(label);
            if let Some(column_index) = full.iter().position(|v| !v.is_finite()) {
                return Err(RfError::NonFiniteValue {
                    sample_index,
                    column_index,
                });
            }
            rows.push(full);
        }

        Ok(Self { rows, n_features })
    }

    /// Number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns (the label column is not counted).
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Full rows, label last.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Label of row `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> f64 {
        self.rows[index][self.n_features]
    }

    /// Draw `draw_count` rows uniformly with replacement.
    pub(crate) fn bootstrap(&self, draw_count: usize, rng: &mut impl Rng) -> Dataset {
        let n_samples = self.rows.len();
        let rows = (0..draw_count)
            .map(|_| self.rows[rng.gen_range(0..n_samples)].clone())
            .collect();
        Dataset {
            rows,
            n_features: self.n_features,
        }
    }
}

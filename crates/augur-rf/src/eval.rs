//! Hold-out evaluation helpers.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::RfError;

/// Rows of a dataset divided into a training part and a test part.
#[derive(Debug, Clone)]
pub struct TrainTestSplit<L> {
    /// Training features.
    pub train_features: Vec<Vec<f64>>,
    /// Test features.
    pub test_features: Vec<Vec<f64>>,
    /// Training labels, aligned with `train_features`.
    pub train_labels: Vec<L>,
    /// Test labels, aligned with `test_features`.
    pub test_labels: Vec<L>,
}

/// Shuffle row indices with a seeded generator and hold out the first
/// `floor(n × test_ratio)` of them as the test set.
///
/// The same `seed` always produces the same split.
///
/// # Errors
///
/// | Variant                         | When                                   |
/// |---------------------------------|----------------------------------------|
/// | [`RfError::InvalidTestRatio`]   | `test_ratio` is not in [0.0, 1.0)      |
/// | [`RfError::LabelCountMismatch`] | `labels.len() != features.len()`       |
pub fn train_test_split<L: Clone>(
    features: &[Vec<f64>],
    labels: &[L],
    test_ratio: f64,
    seed: u64,
) -> Result<TrainTestSplit<L>, RfError> {
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(RfError::InvalidTestRatio { ratio: test_ratio });
    }
    if labels.len() != features.len() {
        return Err(RfError::LabelCountMismatch {
            n_samples: features.len(),
            n_labels: labels.len(),
        });
    }

    let mut indices: Vec<usize> = (0..features.len()).collect();
    indices.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    let test_size = (features.len() as f64 * test_ratio).floor() as usize;
    let (test_idx, train_idx) = indices.split_at(test_size);

    let pick_features = |idx: &[usize]| idx.iter().map(|&i| features[i].clone()).collect();
    let pick_labels = |idx: &[usize]| idx.iter().map(|&i| labels[i].clone()).collect();

    Ok(TrainTestSplit {
        train_features: pick_features(train_idx),
        test_features: pick_features(test_idx),
        train_labels: pick_labels(train_idx),
        test_labels: pick_labels(test_idx),
    })
}

/// Fraction of positions where `predicted` equals `truth`.
///
/// Returns 0.0 for empty input.
#[must_use]
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|&(t, p)| t == p)
        .count();
    correct as f64 / truth.len() as f64
}

/// Mean of `|truth - predicted|`.
///
/// Returns 0.0 for empty input.
#[must_use]
pub fn mean_absolute_error(truth: &[f64], predicted: &[f64]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let total: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).abs())
        .sum();
    total / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::{accuracy, mean_absolute_error, train_test_split};
    use crate::RfError;

    fn rows(n: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
        let features = (0..n).map(|i| vec![i as f64]).collect();
        let labels = (0..n).collect();
        (features, labels)
    }

    #[test]
    fn split_sizes_and_alignment() {
        let (features, labels) = rows(10);
        let split = train_test_split(&features, &labels, 0.25, 0).unwrap();
        assert_eq!(split.test_features.len(), 2);
        assert_eq!(split.train_features.len(), 8);
        for (row, &label) in split
            .train_features
            .iter()
            .zip(&split.train_labels)
            .chain(split.test_features.iter().zip(&split.test_labels))
        {
            assert_eq!(row[0] as usize, label);
        }
    }

    #[test]
    fn split_is_a_partition() {
        let (features, labels) = rows(37);
        let split = train_test_split(&features, &labels, 0.2, 5).unwrap();
        let mut all: Vec<usize> = split
            .train_labels
            .iter()
            .chain(&split.test_labels)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, labels);
    }

    #[test]
    fn same_seed_same_split() {
        let (features, labels) = rows(50);
        let a = train_test_split(&features, &labels, 0.3, 17).unwrap();
        let b = train_test_split(&features, &labels, 0.3, 17).unwrap();
        assert_eq!(a.test_labels, b.test_labels);
        assert_eq!(a.train_labels, b.train_labels);
    }

    #[test]
    fn invalid_ratio_rejected() {
        let (features, labels) = rows(4);
        assert!(matches!(
            train_test_split(&features, &labels, 1.0, 0),
            Err(RfError::InvalidTestRatio { .. })
        ));
        assert!(train_test_split(&features, &labels, -0.1, 0).is_err());
    }

    #[test]
    fn metrics() {
        assert_eq!(accuracy(&[1, 2, 3, 4], &[1, 2, 0, 0]), 0.5);
        assert_eq!(accuracy(&[], &[]), 0.0);
        assert_eq!(mean_absolute_error(&[1.0, 5.0], &[2.0, 2.0]), 2.0);
    }
}

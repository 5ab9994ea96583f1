use rand::Rng;

use crate::node::{FeatureIndex, Impurity};
use crate::tally::LabelTally;

/// Weighted Gini contribution of one group: `(1 - Σ p²) · size / total`.
///
/// `square_sum` is `Σ count²` over the group's classes. Empty groups
/// contribute nothing.
fn group_term(square_sum: usize, size: usize, total: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    let n = size as f64;
    (1.0 - square_sum as f64 / (n * n)) * (n / total as f64)
}

fn square_sum(class_counts: &[usize]) -> usize {
    class_counts.iter().map(|&c| c * c).sum()
}

/// Gini impurity of a single group from its class counts: `1 - Σ p_i²`.
///
/// Returns `0.0` for an empty group.
#[must_use]
pub fn gini_impurity(class_counts: &[usize]) -> Impurity {
    let n: usize = class_counts.iter().sum();
    Impurity::new(group_term(square_sum(class_counts), n, n))
}

/// Gini index of a two-way partition: each group's impurity weighted by its
/// share of the rows, summed.
#[must_use]
pub fn partition_gini(left_counts: &[usize], right_counts: &[usize]) -> Impurity {
    let n_left: usize = left_counts.iter().sum();
    let n_right: usize = right_counts.iter().sum();
    PartitionScore::new(
        square_sum(left_counts),
        n_left,
        square_sum(right_counts),
        n_right,
    )
    .impurity(n_left + n_right)
}

/// Partition Gini scaled by the node size, held as an exact fraction.
///
/// `n · gini = Σ_groups (s² − Σc²) / s`, so two candidates of one node compare
/// without rounding and equal scores stay equal.
#[derive(Debug, Clone, Copy)]
struct PartitionScore {
    num: u128,
    den: u128,
}

impl PartitionScore {
    fn new(left_sq: usize, n_left: usize, right_sq: usize, n_right: usize) -> Self {
        let spread = |sq: usize, size: usize| (size as u128) * (size as u128) - sq as u128;
        match (n_left, n_right) {
            (0, 0) => Self { num: 0, den: 1 },
            (0, n) => Self {
                num: spread(right_sq, n),
                den: n as u128,
            },
            (n, 0) => Self {
                num: spread(left_sq, n),
                den: n as u128,
            },
            (l, r) => Self {
                num: spread(left_sq, l) * r as u128 + spread(right_sq, r) * l as u128,
                den: l as u128 * r as u128,
            },
        }
    }

    fn is_lower_than(self, other: Self) -> bool {
        self.num * other.den < other.num * self.den
    }

    fn impurity(self, n_samples: usize) -> Impurity {
        if n_samples == 0 {
            return Impurity::new(0.0);
        }
        Impurity::new(self.num as f64 / (self.den as f64 * n_samples as f64))
    }
}

/// Best partition found for a node.
///
/// `left` and `right` hold row indices in their original order and together
/// contain every row of the node exactly once. Either side may be empty.
#[derive(Debug, Clone)]
pub(crate) struct SplitCandidate {
    pub(crate) feature: FeatureIndex,
    pub(crate) threshold: f64,
    pub(crate) score: Impurity,
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
}

/// Draw `take` distinct feature indices in random order (partial Fisher-Yates).
pub(crate) fn sample_features(n_features: usize, take: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n_features).collect();
    let take = take.min(n_features);
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        order.swap(i, j);
    }
    order.truncate(take);
    order
}

/// Find the lowest-Gini split among `max_features` randomly drawn features.
///
/// Candidates are evaluated feature by feature in draw order, and within a
/// feature in row order, using each row's own value as the threshold
/// (`value < threshold` goes left). Only a strictly lower score replaces the
/// current best, so the first of several equally good candidates is kept.
///
/// Scores are computed once per distinct value: the node's rows are sorted by
/// the feature and scanned with incremental class counts, then the row-order
/// pass looks the scores up. Scores are compared as exact fractions.
///
/// `tally` must be built from the labels of `indices`, in the same order.
/// Returns `None` only when `indices` is empty.
pub(crate) fn find_best_split(
    rows: &[Vec<f64>],
    n_features: usize,
    indices: &[usize],
    tally: &LabelTally,
    max_features: usize,
    rng: &mut impl Rng,
) -> Option<SplitCandidate> {
    let n_samples = indices.len();
    if n_samples == 0 {
        return None;
    }

    let class_of = tally.class_of();
    let parent_counts = tally.counts();
    let parent_square_sum = square_sum(parent_counts);

    let mut best: Option<(usize, f64, PartitionScore)> = None;
    let mut scores = vec![PartitionScore { num: 0, den: 1 }; n_samples];

    for feat_idx in sample_features(n_features, max_features, rng) {
        let value = |pos: usize| rows[indices[pos]][feat_idx];

        let mut order: Vec<usize> = (0..n_samples).collect();
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        let mut left_counts = vec![0usize; parent_counts.len()];
        let mut right_counts = parent_counts.to_vec();
        let mut left_sq = 0usize;
        let mut right_sq = parent_square_sum;

        let mut start = 0;
        while start < n_samples {
            let v = value(order[start]);
            let mut end = start + 1;
            while end < n_samples && value(order[end]) == v {
                end += 1;
            }

            // Everything before `start` is strictly below `v`.
            let n_left = start;
            let score = PartitionScore::new(left_sq, n_left, right_sq, n_samples - n_left);
            for &pos in &order[start..end] {
                scores[pos] = score;
            }

            for &pos in &order[start..end] {
                let class = class_of[pos];
                left_sq += 2 * left_counts[class] + 1;
                left_counts[class] += 1;
                right_sq -= 2 * right_counts[class] - 1;
                right_counts[class] -= 1;
            }
            start = end;
        }

        for (pos, &score) in scores.iter().enumerate() {
            if best.is_none_or(|(_, _, best_score)| score.is_lower_than(best_score)) {
                best = Some((feat_idx, value(pos), score));
            }
        }
    }

    let (feat_idx, threshold, score) = best?;
    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&row| rows[row][feat_idx] < threshold);

    Some(SplitCandidate {
        feature: FeatureIndex::new(feat_idx),
        threshold,
        score: score.impurity(n_samples),
        left,
        right,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{
        PartitionScore, find_best_split, gini_impurity, partition_gini, sample_features, square_sum,
    };
    use crate::tally::LabelTally;

    fn tally_for(rows: &[Vec<f64>], indices: &[usize]) -> LabelTally {
        LabelTally::from_labels(indices.iter().map(|&i| *rows[i].last().unwrap()))
    }

    #[test]
    fn gini_pure() {
        assert_eq!(gini_impurity(&[10]).value(), 0.0);
    }

    #[test]
    fn gini_binary_balanced() {
        assert!((gini_impurity(&[5, 5]).value() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn gini_three_class_uniform() {
        let imp = gini_impurity(&[100, 100, 100]);
        assert!((imp.value() - (1.0 - 3.0 * (1.0 / 3.0_f64).powi(2))).abs() < 1e-10);
    }

    #[test]
    fn gini_empty_group() {
        assert_eq!(gini_impurity(&[]).value(), 0.0);
    }

    #[test]
    fn partition_gini_weights_by_group_size() {
        // left pure (2 rows), right 50/50 (2 rows) -> 0 * 0.5 + 0.5 * 0.5
        let score = partition_gini(&[2, 0], &[1, 1]);
        assert!((score.value() - 0.25).abs() < 1e-12);
        // perfect separation
        assert_eq!(partition_gini(&[3, 0], &[0, 3]).value(), 0.0);
    }

    #[test]
    fn sampled_features_are_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let mut picked = sample_features(6, 2, &mut rng);
            assert_eq!(picked.len(), 2);
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 2);
            assert!(picked.iter().all(|&f| f < 6));
        }
    }

    #[test]
    fn separable_data_finds_correct_split() {
        let rows: Vec<Vec<f64>> = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0]
            .iter()
            .zip([0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .map(|(&x, y)| vec![x, y])
            .collect();
        let indices: Vec<usize> = (0..6).collect();
        let tally = tally_for(&rows, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let split = find_best_split(&rows, 1, &indices, &tally, 1, &mut rng).unwrap();

        assert_eq!(split.feature.index(), 0);
        assert_eq!(split.threshold, 10.0);
        assert_eq!(split.score.value(), 0.0);
        assert_eq!(split.left, vec![0, 1, 2]);
        assert_eq!(split.right, vec![3, 4, 5]);
    }

    #[test]
    fn ties_keep_first_row_in_order() {
        // Threshold 4.0 (row 0) gives {1}|{4,5}, threshold 5.0 (row 2) gives
        // {1,4}|{5}. Both score 1/3; row 0 is evaluated first.
        let rows = vec![
            vec![4.0, 0.0],
            vec![1.0, 1.0],
            vec![5.0, 1.0],
        ];
        let indices: Vec<usize> = (0..3).collect();
        let tally = tally_for(&rows, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let split = find_best_split(&rows, 1, &indices, &tally, 1, &mut rng).unwrap();
        assert_eq!(split.threshold, 4.0);
        assert_eq!(split.left, vec![1]);
        assert_eq!(split.right, vec![0, 2]);
    }

    fn score_of(left: &[usize], right: &[usize]) -> PartitionScore {
        PartitionScore::new(
            square_sum(left),
            left.iter().sum(),
            square_sum(right),
            right.iter().sum(),
        )
    }

    #[test]
    fn equal_gini_with_different_counts_compares_equal() {
        // Both partitions of 18 rows score 21/36.
        let a = score_of(&[3, 6, 5], &[3, 1]);
        let b = score_of(&[2, 2, 2], &[1, 7, 4]);
        assert!(!a.is_lower_than(b));
        assert!(!b.is_lower_than(a));
        assert_eq!(a.impurity(18).value(), b.impurity(18).value());
        assert!(score_of(&[3, 0], &[0, 3]).is_lower_than(a));
    }

    #[test]
    fn exact_tie_keeps_first_threshold_in_row_order() {
        // Thresholds 2.0 and 10.0 both score 1/2 exactly; a rearranged float
        // formula rounds the first one up and would switch to 10.0.
        let labels = [1.0, 2.0, 2.0, 2.0, 1.0, 2.0, 2.0, 1.0, 2.0, 1.0, 0.0, 2.0, 1.0];
        let values = [2.0, 10.0, 1.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 11.0, 12.0, 13.0];
        let rows: Vec<Vec<f64>> = values
            .iter()
            .map(|&v: &f64| vec![v, labels[v as usize - 1]])
            .collect();
        let indices: Vec<usize> = (0..rows.len()).collect();
        let tally = tally_for(&rows, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let split = find_best_split(&rows, 1, &indices, &tally, 1, &mut rng).unwrap();
        assert_eq!(split.threshold, 2.0);
        assert_eq!(split.left, vec![2]);
        assert_eq!(split.score.value(), 0.5);
    }

    #[test]
    fn constant_feature_leaves_one_side_empty() {
        let rows = vec![
            vec![5.0, 0.0],
            vec![5.0, 0.0],
            vec![5.0, 1.0],
            vec![5.0, 1.0],
        ];
        let indices: Vec<usize> = (0..4).collect();
        let tally = tally_for(&rows, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let split = find_best_split(&rows, 1, &indices, &tally, 1, &mut rng).unwrap();
        assert!(split.left.is_empty());
        assert_eq!(split.right.len(), 4);
        assert!((split.score.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn partition_covers_every_row_once() {
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![(i % 7) as f64, (i % 3) as f64, (i % 2) as f64])
            .collect();
        let indices: Vec<usize> = (0..20).step_by(2).collect();
        let tally = tally_for(&rows, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let split = find_best_split(&rows, 2, &indices, &tally, 2, &mut rng).unwrap();
        let mut all: Vec<usize> = split.left.iter().chain(&split.right).copied().collect();
        all.sort_unstable();
        assert_eq!(all, indices);
    }

    #[test]
    fn empty_indices_returns_none() {
        let rows = vec![vec![1.0, 0.0]];
        let tally = LabelTally::from_labels(std::iter::empty());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(find_best_split(&rows, 1, &[], &tally, 1, &mut rng).is_none());
    }
}

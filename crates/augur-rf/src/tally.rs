use std::collections::HashMap;

/// Counts of distinct label values, kept in first-encountered order.
///
/// Labels are compared by value; `-0.0` and `0.0` count as the same label.
/// The position of a label in [`LabelTally::values`] is its class index.
#[derive(Debug, Clone)]
pub(crate) struct LabelTally {
    values: Vec<f64>,
    counts: Vec<usize>,
    class_of: Vec<usize>,
}

fn label_key(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

impl LabelTally {
    /// Tally labels in iteration order. `class_of()[i]` is the class of the i-th label.
    pub(crate) fn from_labels(labels: impl IntoIterator<Item = f64>) -> Self {
        let mut index: HashMap<u64, usize> = HashMap::new();
        let mut values = Vec::new();
        let mut counts = Vec::new();
        let mut class_of = Vec::new();
        for label in labels {
            let class = *index.entry(label_key(label)).or_insert_with(|| {
                values.push(label);
                counts.push(0);
                values.len() - 1
            });
            counts[class] += 1;
            class_of.push(class);
        }
        Self {
            values,
            counts,
            class_of,
        }
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub(crate) fn class_of(&self) -> &[usize] {
        &self.class_of
    }

    /// `true` when at most one distinct label was seen.
    pub(crate) fn is_pure(&self) -> bool {
        self.values.len() <= 1
    }

    /// Most frequent label; on equal counts the one seen first wins.
    ///
    /// Returns `None` for an empty tally.
    pub(crate) fn mode(&self) -> Option<f64> {
        let mut best: Option<(f64, usize)> = None;
        for (&value, &count) in self.values.iter().zip(&self.counts) {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }
}

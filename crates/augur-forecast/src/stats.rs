//! Summary statistics over a type's history.

use std::collections::HashMap;

use augur_io::{CategoryTables, TransactionRecord, TxType};

/// Median of `values`: middle element for odd lengths, mean of the two
/// middle elements for even lengths, 0.0 for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Finite amounts of every record of `tx_type`, in record order.
pub(crate) fn amounts_of(records: &[TransactionRecord], tx_type: TxType) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.tx_type == tx_type && r.amount.is_finite())
        .map(|r| r.amount)
        .collect()
}

/// Most frequent known fine category among records of `tx_type`.
///
/// Ties go to the category seen first. Returns `None` when no record of the
/// type has a known category.
#[must_use]
pub fn most_frequent_fine_category<'a>(
    records: &'a [TransactionRecord],
    tx_type: TxType,
    tables: &CategoryTables,
) -> Option<&'a str> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if record.tx_type != tx_type || !tables.contains(&record.category) {
            continue;
        }
        let count = counts.entry(record.category.as_str()).or_insert(0);
        if *count == 0 {
            order.push(&record.category);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for category in order {
        let count = counts[category];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category)
}

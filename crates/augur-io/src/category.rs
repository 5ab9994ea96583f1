//! Static category tables: fine categories, their coarse groups, and the
//! numeric ids both are encoded as.
//!
//! The tables come from fixed lists, never from data, so ids are identical
//! across runs and across histories.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::TxType;

const EXPENSE_MAP: &[(&str, &str)] = &[
    ("Groceries", "Living"),
    ("Rent", "Living"),
    ("Dining", "Leisure"),
    ("Entertainment", "Leisure"),
    ("Travel", "Leisure"),
    ("Merchandise", "Shopping"),
    ("Other", "Other"),
    ("Other Services", "Other"),
];

const INCOME_MAP: &[(&str, &str)] = &[
    ("Salary", "Regular Income"),
    ("Allowance", "Regular Income"),
    ("Stocks", "Investments"),
    ("Interest & Dividends", "Investments"),
    ("Reimbursements", "Other Income"),
    ("Gifts", "Other Income"),
    ("Sales", "Other Income"),
];

const EXPENSE_DEFAULT: &str = "Other";
const INCOME_DEFAULT: &str = "Other Income";

/// A coarse group name together with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoarseCategory {
    /// Group name, e.g. `Living`.
    pub name: &'static str,
    /// Position of `name` among the sorted coarse names.
    pub id: usize,
}

/// Fine-to-coarse maps plus the id encodings derived from them.
#[derive(Debug)]
pub struct CategoryTables {
    coarse_names: Vec<&'static str>,
    coarse_ids: HashMap<&'static str, usize>,
    expense: HashMap<&'static str, CoarseCategory>,
    income: HashMap<&'static str, CoarseCategory>,
    expense_default: CoarseCategory,
    income_default: CoarseCategory,
    fine_names: Vec<&'static str>,
    fine_ids: HashMap<&'static str, usize>,
}

static TABLES: LazyLock<CategoryTables> = LazyLock::new(CategoryTables::build);

/// Where a coarse name occurrence came from while ids are assigned.
#[derive(Clone, Copy)]
enum Slot {
    Expense(usize),
    Income(usize),
    ExpenseDefault,
    IncomeDefault,
}

impl CategoryTables {
    fn build() -> Self {
        let mut occurrences: Vec<(&'static str, Slot)> = EXPENSE_MAP
            .iter()
            .enumerate()
            .map(|(i, &(_, coarse))| (coarse, Slot::Expense(i)))
            .chain(
                INCOME_MAP
                    .iter()
                    .enumerate()
                    .map(|(i, &(_, coarse))| (coarse, Slot::Income(i))),
            )
            .chain([
                (EXPENSE_DEFAULT, Slot::ExpenseDefault),
                (INCOME_DEFAULT, Slot::IncomeDefault),
            ])
            .collect();
        occurrences.sort_by_key(|&(name, _)| name);

        // Walk the sorted occurrences once, numbering each distinct name.
        let mut coarse_names: Vec<&'static str> = Vec::new();
        let mut expense_ids = vec![0; EXPENSE_MAP.len()];
        let mut income_ids = vec![0; INCOME_MAP.len()];
        let mut expense_default_id = 0;
        let mut income_default_id = 0;
        for (name, slot) in occurrences {
            if coarse_names.last() != Some(&name) {
                coarse_names.push(name);
            }
            let id = coarse_names.len() - 1;
            match slot {
                Slot::Expense(i) => expense_ids[i] = id,
                Slot::Income(i) => income_ids[i] = id,
                Slot::ExpenseDefault => expense_default_id = id,
                Slot::IncomeDefault => income_default_id = id,
            }
        }
        let coarse_ids = coarse_names.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let resolve = |map: &[(&'static str, &'static str)], ids: &[usize]| {
            map.iter()
                .zip(ids)
                .map(|(&(fine, name), &id)| (fine, CoarseCategory { name, id }))
                .collect::<HashMap<_, _>>()
        };

        let mut fine_names = Vec::with_capacity(EXPENSE_MAP.len() + INCOME_MAP.len());
        for &(fine, _) in EXPENSE_MAP.iter().chain(INCOME_MAP) {
            if !fine_names.contains(&fine) {
                fine_names.push(fine);
            }
        }
        let fine_ids = fine_names.iter().enumerate().map(|(i, &f)| (f, i)).collect();

        Self {
            coarse_names,
            coarse_ids,
            expense: resolve(EXPENSE_MAP, &expense_ids),
            income: resolve(INCOME_MAP, &income_ids),
            expense_default: CoarseCategory {
                name: EXPENSE_DEFAULT,
                id: expense_default_id,
            },
            income_default: CoarseCategory {
                name: INCOME_DEFAULT,
                id: income_default_id,
            },
            fine_names,
            fine_ids,
        }
    }

    /// Return the process-wide tables.
    pub fn global() -> &'static CategoryTables {
        &TABLES
    }

    /// Return `true` if `category` appears in either fine map.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.fine_ids.contains_key(category)
    }

    /// Coarse group and id for `category` under `tx_type`'s map.
    ///
    /// A category from the other type's map falls into the type's default
    /// bucket (`Other` for expenses, `Other Income` for income).
    #[must_use]
    pub fn coarse_for(&self, tx_type: TxType, category: &str) -> CoarseCategory {
        let (map, default) = match tx_type {
            TxType::Expense => (&self.expense, self.expense_default),
            TxType::Income => (&self.income, self.income_default),
        };
        map.get(category).copied().unwrap_or(default)
    }

    /// Id of a coarse group name.
    #[must_use]
    pub fn coarse_id(&self, coarse: &str) -> Option<usize> {
        self.coarse_ids.get(coarse).copied()
    }

    /// Coarse group name for an id.
    #[must_use]
    pub fn coarse_name(&self, id: usize) -> Option<&'static str> {
        self.coarse_names.get(id).copied()
    }

    /// Id of a fine category name.
    #[must_use]
    pub fn fine_id(&self, fine: &str) -> Option<usize> {
        self.fine_ids.get(fine).copied()
    }

    /// Fine category name for an id.
    #[must_use]
    pub fn fine_name(&self, id: usize) -> Option<&'static str> {
        self.fine_names.get(id).copied()
    }

    /// Coarse names in id order.
    #[must_use]
    pub fn coarse_names(&self) -> &[&'static str] {
        &self.coarse_names
    }

    /// Fine names in id order.
    #[must_use]
    pub fn fine_names(&self) -> &[&'static str] {
        &self.fine_names
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryTables;
    use crate::TxType;

    #[test]
    fn coarse_ids_follow_sorted_names() {
        let tables = CategoryTables::global();
        assert_eq!(
            tables.coarse_names(),
            [
                "Investments",
                "Leisure",
                "Living",
                "Other",
                "Other Income",
                "Regular Income",
                "Shopping"
            ]
        );
        assert_eq!(tables.coarse_id("Living"), Some(2));
        assert_eq!(tables.coarse_name(6), Some("Shopping"));
        assert_eq!(tables.coarse_name(7), None);
    }

    #[test]
    fn fine_ids_follow_insertion_order() {
        let tables = CategoryTables::global();
        assert_eq!(tables.fine_names().len(), 15);
        assert_eq!(tables.fine_id("Groceries"), Some(0));
        assert_eq!(tables.fine_id("Other Services"), Some(7));
        assert_eq!(tables.fine_id("Salary"), Some(8));
        assert_eq!(tables.fine_id("Sales"), Some(14));
        assert_eq!(tables.fine_name(11), Some("Interest & Dividends"));
    }

    #[test]
    fn ids_stable_across_builds() {
        let a = CategoryTables::build();
        let b = CategoryTables::build();
        assert_eq!(a.coarse_names, b.coarse_names);
        assert_eq!(a.fine_names, b.fine_names);
    }

    #[test]
    fn cross_type_category_falls_into_default_bucket() {
        let tables = CategoryTables::global();
        assert_eq!(tables.coarse_for(TxType::Expense, "Dining").name, "Leisure");
        assert_eq!(tables.coarse_for(TxType::Expense, "Salary").name, "Other");
        assert_eq!(tables.coarse_for(TxType::Income, "Groceries").name, "Other Income");
        assert_eq!(tables.coarse_for(TxType::Income, "Stocks").name, "Investments");
    }

    #[test]
    fn resolved_ids_match_coarse_names() {
        let tables = CategoryTables::global();
        for tx_type in [TxType::Expense, TxType::Income] {
            for &fine in tables.fine_names() {
                let coarse = tables.coarse_for(tx_type, fine);
                assert_eq!(tables.coarse_name(coarse.id), Some(coarse.name));
                assert_eq!(tables.coarse_id(coarse.name), Some(coarse.id));
            }
        }
        assert_eq!(tables.coarse_for(TxType::Expense, "Salary").id, 3);
        assert_eq!(tables.coarse_for(TxType::Income, "Rent").id, 4);
        assert_eq!(tables.coarse_for(TxType::Expense, "Rent").id, 2);
    }

    #[test]
    fn membership_is_the_union() {
        let tables = CategoryTables::global();
        assert!(tables.contains("Rent"));
        assert!(tables.contains("Gifts"));
        assert!(!tables.contains("Crypto"));
        assert!(!tables.contains("groceries"));
    }
}

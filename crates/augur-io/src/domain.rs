//! Domain types for augur-io.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IoError;

/// Opaque transaction identifier, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of a transaction.
///
/// Deserialization goes through [`FromStr`], so `Income` and ` EXPENSE `
/// are accepted wherever `"income"` and `"expense"` are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    /// Money going out.
    Expense,
    /// Money coming in.
    Income,
}

impl TxType {
    /// Return the lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TxType::Expense => "expense",
            TxType::Income => "income",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TxType::Expense),
            "income" => Ok(TxType::Income),
            _ => Err(IoError::UnknownTxType { raw: s.to_owned() }),
        }
    }
}

impl<'de> Deserialize<'de> for TxType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One historical transaction as supplied by the record store.
///
/// The date is kept as the raw string; it is parsed during feature
/// engineering so a malformed value skips the record instead of failing
/// the whole load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRecord {
    /// Record identifier.
    pub id: TransactionId,
    /// Calendar date, `YYYY-MM-DD` or an ISO 8601 timestamp.
    pub date: String,
    /// Non-negative magnitude of the transaction.
    pub amount: f64,
    /// Fine category name, e.g. `Groceries`.
    pub category: String,
    /// Expense or income.
    #[serde(rename = "type")]
    pub tx_type: TxType,
    /// Free-text note.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

impl TransactionRecord {
    /// Build a record without a description.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        tx_type: TxType,
    ) -> Self {
        Self {
            id: TransactionId::new(id),
            date: date.into(),
            amount,
            category: category.into(),
            tx_type,
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Anything that can hand over the full transaction history.
pub trait TransactionSource {
    /// Load every stored transaction, both types, in storage order.
    ///
    /// # Errors
    ///
    /// Implementation-specific [`IoError`]s.
    fn load(&self) -> Result<Vec<TransactionRecord>, IoError>;
}

impl TransactionSource for Vec<TransactionRecord> {
    fn load(&self) -> Result<Vec<TransactionRecord>, IoError> {
        Ok(self.clone())
    }
}

impl TransactionSource for [TransactionRecord] {
    fn load(&self) -> Result<Vec<TransactionRecord>, IoError> {
        Ok(self.to_vec())
    }
}

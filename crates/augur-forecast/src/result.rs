//! Forecast result types.

use augur_io::TxType;
use serde::{Serialize, Serializer};

/// The predicted next transaction of one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Requested transaction type.
    #[serde(rename = "type")]
    pub tx_type: TxType,
    /// Predicted coarse category, e.g. `Living`.
    pub coarse_category: String,
    /// Predicted amount.
    pub amount: f64,
}

/// Outcome of a forecast call.
///
/// Serializes as
/// `{"success": bool, "n_transactions": int, "pred": {"type", "coarse_category", "amount"} | {}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// `false` when the history was too small to attempt a forecast.
    pub success: bool,
    /// Number of stored transactions of the requested type.
    pub n_transactions: usize,
    /// The prediction, absent when no model could be trained.
    #[serde(serialize_with = "prediction_or_empty")]
    pub pred: Option<Prediction>,
}

impl ForecastResult {
    pub(crate) fn insufficient(n_transactions: usize) -> Self {
        Self {
            success: false,
            n_transactions,
            pred: None,
        }
    }

    pub(crate) fn untrained(n_transactions: usize) -> Self {
        Self {
            success: true,
            n_transactions,
            pred: None,
        }
    }

    pub(crate) fn predicted(n_transactions: usize, prediction: Prediction) -> Self {
        Self {
            success: true,
            n_transactions,
            pred: Some(prediction),
        }
    }
}

#[derive(Serialize)]
struct Empty {}

fn prediction_or_empty<S: Serializer>(
    pred: &Option<Prediction>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match pred {
        Some(prediction) => prediction.serialize(serializer),
        None => Empty {}.serialize(serializer),
    }
}

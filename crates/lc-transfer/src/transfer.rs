use serde::{Deserialize, Serialize};

use crate::TransferError;

/// A single value movement from `sender` to `receiver`.
///
/// Transfers sit in the ledger's pending buffer until a block is mined, then
/// belong to that block for good.  Nothing here checks that the parties exist
/// or that `amount` is positive; the ledger records whatever it is given.
///
/// `amount` must be finite: NaN and infinities serialize as JSON `null`, so
/// block digests could not tell them apart.  [`PartialTransfer::complete`]
/// enforces this for client input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

impl Transfer {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

/// A transfer as it arrives from a client, before every field is known to be
/// present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTransfer {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl PartialTransfer {
    /// Turn the request into a [`Transfer`], naming the first absent field.
    /// A non-finite amount is rejected.
    pub fn complete(self) -> Result<Transfer, TransferError> {
        let sender = self.sender.ok_or(TransferError::MissingField("sender"))?;
        let receiver = self
            .receiver
            .ok_or(TransferError::MissingField("receiver"))?;
        let amount = self.amount.ok_or(TransferError::MissingField("amount"))?;
        if !amount.is_finite() {
            return Err(TransferError::NonFiniteAmount(amount));
        }
        Ok(Transfer {
            sender,
            receiver,
            amount,
        })
    }
}

//! Types describing a user's claim that they deposited into the watched account.

use serde::{Deserialize, Serialize};

use crate::commitment::CommitmentHash;

/// A deposit claim as relayed by the smart contract.
///
/// The three fields are kept as the exact strings the contract hashed at registration time. Any
/// normalization here (trimming, re-formatting the value) would make the commitment diverge from
/// the one stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositClaim {
    /// The txid the user says carries the deposit.
    txid: String,

    /// The bitcoin address the user says the deposit was sent from.
    counterparty: String,

    /// The deposited amount in satoshis, as decimal text.
    value: String,
}

impl DepositClaim {
    /// Creates a new [`DepositClaim`].
    pub fn new(
        txid: impl Into<String>,
        counterparty: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            txid: txid.into(),
            counterparty: counterparty.into(),
            value: value.into(),
        }
    }

    /// The claimed txid.
    pub fn txid(&self) -> &str {
        &self.txid
    }

    /// The claimed sender address.
    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    /// The claimed value in satoshis as decimal text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Computes the commitment the on-chain verifier expects for this claim.
    pub fn commitment(&self) -> CommitmentHash {
        CommitmentHash::compute(&self.txid, &self.counterparty, &self.value)
    }
}

//! Snapshot types for the transaction activity the ledger service reports for an address.
//!
//! Field names follow the ledger service's JSON so that these types can be decoded directly from
//! its responses. Only the fields the validator reads are modelled; everything else is ignored.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A transaction as reported by the ledger service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// The transaction hash (txid) in the ledger service's display order.
    pub hash: String,

    /// Number of blocks mined on top of (and including) the block that contains this transaction.
    #[serde(default)]
    pub confirmations: u32,

    /// Height of the containing block, `-1` while the transaction is unconfirmed.
    #[serde(default = "unconfirmed_height")]
    pub block_height: i64,

    /// The inputs, in transaction order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: Vec<TxInput>,

    /// The outputs, in transaction order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: Vec<TxOutput>,
}

impl LedgerTransaction {
    /// Returns `true` if the transaction has been included in a block.
    pub const fn is_confirmed(&self) -> bool {
        self.block_height >= 0
    }

    /// Returns every distinct address that appears on any input.
    pub fn input_addresses(&self) -> BTreeSet<&str> {
        self.inputs
            .iter()
            .flat_map(|input| input.addresses.iter().map(String::as_str))
            .collect()
    }
}

/// A transaction input, reduced to the addresses that funded it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Addresses that signed for this input. Empty for coinbase and non-standard inputs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<String>,
}

/// A transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Addresses this output pays to. Empty for `OP_RETURN` and non-standard outputs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<String>,

    /// Value in satoshis.
    pub value: u64,
}

impl TxOutput {
    /// Returns `true` if this output pays (at least partly) to `address`.
    pub fn pays_to(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }
}

const fn unconfirmed_height() -> i64 {
    -1
}

/// The ledger service emits `null` instead of an empty list in a few places.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

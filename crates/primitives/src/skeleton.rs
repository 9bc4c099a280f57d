//! Types exchanged with the ledger service while building, signing and sending a multisig payout.
//!
//! A payout goes through three stages:
//!
//! 1. a [`MultisigTemplate`] describing what to spend and where, built locally;
//! 2. an unsigned [`TransactionSkeleton`] returned by the ledger service, carrying the digests
//!    each signer must sign;
//! 3. a partially-signed [`TransactionSkeleton`] sent back to the service, which waits for the
//!    remaining signer nodes before broadcasting.

use bitcoin::Amount;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{errors::TemplateError, ledger::null_as_default, quorum::QuorumPolicy};

/// A request to pay `amount` out of the multisig locker to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigSpendRequest {
    /// Address that receives the payout.
    pub destination: String,

    /// Amount to pay out.
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub amount: Amount,
}

impl MultisigSpendRequest {
    /// Creates a new [`MultisigSpendRequest`].
    pub fn new(destination: impl Into<String>, amount: Amount) -> Self {
        Self {
            destination: destination.into(),
            amount,
        }
    }
}

/// Partial transaction the ledger service expands into a [`TransactionSkeleton`].
///
/// The input side names the quorum's public keys instead of an address so that the service can
/// select UTXOs of the multisig locker derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigTemplate {
    /// The spending side, always a single multisig input specification.
    pub inputs: Vec<TemplateInput>,

    /// The receiving side.
    pub outputs: Vec<TemplateOutput>,
}

/// Input specification of a [`MultisigTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInput {
    /// Hex-encoded public keys of the quorum, in consensus order.
    pub addresses: Vec<String>,

    /// The multisig script type, e.g. `multisig-2-of-3`.
    pub script_type: String,
}

/// Output specification of a [`MultisigTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOutput {
    /// The receiving addresses.
    pub addresses: Vec<String>,

    /// Value in satoshis.
    pub value: u64,
}

impl MultisigTemplate {
    /// Builds the template that spends `request.amount` from the locker guarded by `policy`.
    pub fn new(
        request: &MultisigSpendRequest,
        policy: &QuorumPolicy,
    ) -> Result<Self, TemplateError> {
        if request.destination.trim().is_empty() {
            return Err(TemplateError::EmptyDestination);
        }

        if request.amount == Amount::ZERO {
            return Err(TemplateError::ZeroAmount);
        }

        Ok(Self {
            inputs: vec![TemplateInput {
                addresses: policy.pubkeys().iter().map(ToString::to_string).collect(),
                script_type: policy.script_type(),
            }],
            outputs: vec![TemplateOutput {
                addresses: vec![request.destination.clone()],
                value: request.amount.to_sat(),
            }],
        })
    }
}

/// A transaction skeleton as handed out and accepted by the ledger service.
///
/// The embedded transaction is kept opaque and every field this crate does not know about is
/// preserved, so the skeleton can be sent back exactly as it was received plus our signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSkeleton {
    /// The embedded transaction.
    pub tx: Value,

    /// Hex-encoded 32-byte digests, one per input, that every signer must sign.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tosign: Vec<String>,

    /// Hex-encoded DER signatures, positionally matching [`Self::pubkeys`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub signatures: Vec<String>,

    /// Hex-encoded public keys of the signers that produced [`Self::signatures`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub pubkeys: Vec<String>,

    /// Problems the ledger service found while building or sending the skeleton.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<SkeletonError>,

    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An error entry reported inside a [`TransactionSkeleton`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonError {
    /// The message reported by the ledger service.
    pub error: String,
}

/// Where a [`TransactionSkeleton`] is in its lifecycle, as far as this node can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonStage {
    /// No signatures attached.
    Unsigned,

    /// At least one signature attached, waiting for the rest of the quorum.
    PartiallySigned,
}

impl TransactionSkeleton {
    /// The hash of the embedded transaction, if the ledger service has assigned one.
    pub fn tx_hash(&self) -> Option<&str> {
        self.tx
            .get("hash")
            .and_then(Value::as_str)
            .filter(|hash| !hash.is_empty())
    }

    /// Returns the current [`SkeletonStage`].
    pub fn stage(&self) -> SkeletonStage {
        if self.signatures.is_empty() {
            SkeletonStage::Unsigned
        } else {
            SkeletonStage::PartiallySigned
        }
    }

    /// Joins the reported errors into a single message.
    pub fn error_message(&self) -> Option<String> {
        (!self.errors.is_empty()).then(|| {
            self.errors
                .iter()
                .map(|e| e.error.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        })
    }
}

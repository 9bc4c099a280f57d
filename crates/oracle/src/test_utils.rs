//! Stub ledger service and fixtures shared by the unit tests.

use std::sync::Mutex;

use linkedbtc_ledger_client::{ActivityOptions, LedgerClient, LedgerError, LedgerResult};
use linkedbtc_primitives::{
    ledger::{LedgerTransaction, TxInput, TxOutput},
    quorum::QuorumPolicy,
    skeleton::{MultisigTemplate, TransactionSkeleton},
};
use secp256k1::SecretKey;
use serde_json::json;

use crate::{config::OracleConfig, signer::SignerKey};

/// A call observed by [`StubLedger`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LedgerCall {
    FetchActivity(String),
    RequestSkeleton(MultisigTemplate),
    SubmitSkeleton(TransactionSkeleton),
}

/// In-memory ledger service that replays canned answers and records every call.
#[derive(Debug, Default)]
pub(crate) struct StubLedger {
    /// Activity returned for any address; `None` makes the lookup fail.
    pub(crate) activity: Option<Vec<LedgerTransaction>>,

    /// Skeleton returned by `request_skeleton`; `None` makes the build step fail.
    pub(crate) skeleton: Option<TransactionSkeleton>,

    /// Hash the submitted skeleton comes back with; `None` makes the send step fail.
    pub(crate) broadcast_hash: Option<String>,

    pub(crate) calls: Mutex<Vec<LedgerCall>>,
}

impl StubLedger {
    pub(crate) fn with_activity(activity: Vec<LedgerTransaction>) -> Self {
        Self {
            activity: Some(activity),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: LedgerCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

fn service_down() -> LedgerError {
    LedgerError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

impl LedgerClient for StubLedger {
    async fn fetch_address_activity(
        &self,
        address: &str,
        _options: &ActivityOptions,
    ) -> LedgerResult<Vec<LedgerTransaction>> {
        self.record(LedgerCall::FetchActivity(address.to_string()));
        self.activity.clone().ok_or_else(service_down)
    }

    async fn request_skeleton(
        &self,
        template: &MultisigTemplate,
    ) -> LedgerResult<TransactionSkeleton> {
        self.record(LedgerCall::RequestSkeleton(template.clone()));
        self.skeleton.clone().ok_or_else(service_down)
    }

    async fn submit_skeleton(
        &self,
        mut skeleton: TransactionSkeleton,
    ) -> LedgerResult<TransactionSkeleton> {
        self.record(LedgerCall::SubmitSkeleton(skeleton.clone()));
        let hash = self.broadcast_hash.clone().ok_or_else(service_down)?;
        skeleton.tx["hash"] = json!(hash);
        Ok(skeleton)
    }
}

/// The signer built from the secret `[1; 32]`, which is the first quorum key.
pub(crate) fn test_signer() -> SignerKey {
    SecretKey::from_slice(&[1; 32])
        .expect("valid secret key")
        .into()
}

/// 2-of-3 quorum over the keys derived from `[1; 32]`, `[2; 32]`, `[3; 32]`.
pub(crate) fn test_quorum() -> QuorumPolicy {
    let keys = [1u8, 2, 3].map(|b| {
        SignerKey::from(SecretKey::from_slice(&[b; 32]).expect("valid secret key")).public_key()
    });
    QuorumPolicy::two_of_three(keys).expect("valid quorum")
}

pub(crate) fn test_config(deposit_account: &str, required_confirmations: u32) -> OracleConfig {
    OracleConfig {
        deposit_account: deposit_account.to_string(),
        required_confirmations,
        quorum: test_quorum(),
    }
}

/// Builds a ledger transaction from `(addresses)` inputs and `(address, value)` outputs.
pub(crate) fn ledger_tx(
    hash: &str,
    confirmations: u32,
    inputs: &[&[&str]],
    outputs: &[(&str, u64)],
) -> LedgerTransaction {
    LedgerTransaction {
        hash: hash.to_string(),
        confirmations,
        block_height: if confirmations == 0 { -1 } else { 100 },
        inputs: inputs
            .iter()
            .map(|addrs| TxInput {
                addresses: addrs.iter().map(ToString::to_string).collect(),
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(addr, value)| TxOutput {
                addresses: vec![addr.to_string()],
                value: *value,
            })
            .collect(),
    }
}

pub(crate) fn unsigned_skeleton(hash: &str, tosign: &[String]) -> TransactionSkeleton {
    serde_json::from_value(json!({
        "tx": { "hash": hash, "inputs": [], "outputs": [] },
        "tosign": tosign,
    }))
    .expect("valid skeleton")
}

//! The capability the oracle core needs from the ledger service.

use std::future::Future;

use linkedbtc_primitives::{
    errors::TemplateError,
    ledger::LedgerTransaction,
    quorum::QuorumPolicy,
    skeleton::{MultisigSpendRequest, MultisigTemplate, TransactionSkeleton},
};

use crate::errors::LedgerResult;

/// Options for [`LedgerClient::fetch_address_activity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityOptions {
    /// Skip the wallet metadata the service would otherwise attach to each transaction.
    pub omit_wallet_addresses: bool,
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self {
            omit_wallet_addresses: true,
        }
    }
}

/// Access to the external ledger service.
///
/// Every call is a single round trip (or a bounded series of them for paginated reads). No call
/// retries internally; errors are returned to the caller as-is.
pub trait LedgerClient: Send + Sync {
    /// Fetches the transactions that touch `address`, newest first.
    fn fetch_address_activity(
        &self,
        address: &str,
        options: &ActivityOptions,
    ) -> impl Future<Output = LedgerResult<Vec<LedgerTransaction>>> + Send;

    /// Builds the unsigned template that spends from the quorum's multisig locker.
    ///
    /// This is a local computation; the ledger service first sees the template in
    /// [`Self::request_skeleton`].
    fn build_multisig_template(
        &self,
        request: &MultisigSpendRequest,
        policy: &QuorumPolicy,
    ) -> Result<MultisigTemplate, TemplateError> {
        MultisigTemplate::new(request, policy)
    }

    /// Asks the ledger service to expand `template` into an unsigned skeleton. Nothing is
    /// broadcast.
    fn request_skeleton(
        &self,
        template: &MultisigTemplate,
    ) -> impl Future<Output = LedgerResult<TransactionSkeleton>> + Send;

    /// Hands a (partially) signed skeleton to the ledger service for collation and broadcast.
    ///
    /// The returned skeleton carries the transaction hash.
    fn submit_skeleton(
        &self,
        skeleton: TransactionSkeleton,
    ) -> impl Future<Output = LedgerResult<TransactionSkeleton>> + Send;
}

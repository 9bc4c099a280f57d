use linkedbtc_ledger_client::LedgerConfig;
use serde::{Deserialize, Serialize};

/// The configuration values that dictate the behavior of the adapter node.
///
/// These values are not consensus-critical and can be changed by the operator of each signer
/// node. Secrets (the ledger-service token and the signing key) are never read from this file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The RPC server addr the bridge layer connects to.
    pub rpc_addr: String,

    /// Confirmations a deposit needs before it is accepted.
    pub required_confirmations: u32,

    /// The deposit account whose activity is searched for claimed deposits.
    pub deposit_account: String,

    /// The number of tokio worker threads.
    pub num_threads: Option<u8>,

    /// The stack size of each tokio worker thread in bytes.
    pub thread_stack_size: Option<usize>,

    /// The configuration required to connect to the ledger service.
    pub ledger: LedgerConfig,
}

//! Read-only configuration shared by the oracle components.

use linkedbtc_primitives::quorum::QuorumPolicy;

/// Configuration loaded once at startup and shared, immutably, by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// The deposit account whose activity is searched for claimed deposits.
    pub deposit_account: String,

    /// Confirmations a deposit needs before it is accepted.
    pub required_confirmations: u32,

    /// The quorum guarding the payout locker.
    pub quorum: QuorumPolicy,
}

//! Constants that are fixed across every deployment of the adapter.

/// Number of partial signatures required before the ledger service can finalize a payout.
pub const DEFAULT_REQUIRED_SIGNATURES: usize = 2;

/// Number of independently operated signer nodes.
pub const DEFAULT_TOTAL_SIGNERS: usize = 3;

/// Prefix of every hex-encoded commitment hash handed back to the on-chain verifier.
pub const COMMITMENT_HEX_PREFIX: &str = "0x";

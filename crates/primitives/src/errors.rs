//! Errors raised while constructing or parsing the shared primitives.

use thiserror::Error;

/// Error parsing a hex-encoded [`CommitmentHash`](crate::commitment::CommitmentHash).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitmentParseError {
    /// The string does not start with `0x`.
    #[error("commitment hash must be prefixed with 0x")]
    MissingPrefix,

    /// The digits after the prefix are not valid hex.
    #[error("invalid hex in commitment hash: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The decoded digest is not 32 bytes long.
    #[error("commitment hash must be 32 bytes but got {0}")]
    InvalidLength(usize),
}

/// Error constructing a [`QuorumPolicy`](crate::quorum::QuorumPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuorumError {
    /// A quorum of zero signatures would let anyone spend the locked funds.
    #[error("quorum must require at least one signature")]
    ZeroThreshold,

    /// More signatures are required than there are signers.
    #[error("quorum requires {required} signatures but only {total} signers are configured")]
    ThresholdTooHigh {
        /// The configured threshold.
        required: usize,

        /// The number of configured public keys.
        total: usize,
    },

    /// The same public key is listed twice.
    #[error("duplicate signer public key at position {0}")]
    DuplicateKey(usize),
}

/// Error building an unsigned [`MultisigTemplate`](crate::skeleton::MultisigTemplate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The payout has nowhere to go.
    #[error("destination address must not be empty")]
    EmptyDestination,

    /// A zero-value payout cannot be relayed.
    #[error("payout amount must be greater than zero")]
    ZeroAmount,
}

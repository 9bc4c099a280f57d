//! Errors raised at the ledger service boundary.

use thiserror::Error;

/// Result alias for ledger service calls.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Everything that can go wrong while talking to the ledger service.
///
/// All of these are transient from the oracle's point of view: the caller may retry the whole
/// operation from scratch.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request never produced a response (connection failure, timeout, TLS error).
    #[error("ledger service transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("ledger service returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,

        /// The error message from the response body, or the raw body if it had none.
        message: String,
    },

    /// The service accepted the request but reported errors inside the returned skeleton.
    #[error("ledger service rejected the transaction: {0}")]
    Rejected(String),

    /// The response body could not be decoded.
    #[error("could not decode ledger service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A sent skeleton came back without a transaction hash.
    #[error("ledger service did not report a transaction hash")]
    MissingTxHash,

    /// The client could not be constructed from the given configuration.
    #[error("invalid ledger client configuration: {0}")]
    InvalidConfig(String),
}

//! Error types for the oracle core.

use std::fmt;

use linkedbtc_ledger_client::LedgerError;
use linkedbtc_primitives::errors::TemplateError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Unified error type for everything that can happen while serving a request.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The claimed transaction is not part of the watched account's activity.
    #[error("transaction {0} not found in the deposit account's activity")]
    NotFound(String),

    /// The claimed transaction exists but is not buried deep enough yet.
    #[error("transaction {txid} has {confirmations} confirmations but {required} are required")]
    InsufficientConfirmations {
        /// The claimed txid.
        txid: String,

        /// Confirmations reported by the ledger service.
        confirmations: u32,

        /// The configured threshold.
        required: u32,
    },

    /// The transaction does not back the claim.
    #[error("deposit does not match the claim: {0}")]
    MismatchedDeposit(String),

    /// The transaction's shape does not identify a single counterparty and payment.
    #[error("deposit transaction is ambiguous: {0}")]
    AmbiguousDeposit(String),

    /// Producing this node's partial signature failed.
    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    /// The ledger service call failed.
    #[error("ledger service error: {0}")]
    ExternalService(#[from] LedgerError),

    /// The requested function is not one the oracle serves.
    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),

    /// The parameters do not fit the requested function.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<TemplateError> for OracleError {
    fn from(err: TemplateError) -> Self {
        OracleError::InvalidParameters(err.to_string())
    }
}

impl OracleError {
    /// The coarse category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            OracleError::NotFound(_) => ErrorKind::NotFound,
            OracleError::InsufficientConfirmations { .. } => ErrorKind::InsufficientConfirmations,
            OracleError::MismatchedDeposit(_) => ErrorKind::MismatchedDeposit,
            OracleError::AmbiguousDeposit(_) => ErrorKind::AmbiguousDeposit,
            OracleError::Signing(_) => ErrorKind::SigningError,
            OracleError::ExternalService(_) => ErrorKind::ExternalServiceError,
            OracleError::UnsupportedFunction(_) => ErrorKind::UnsupportedFunction,
            OracleError::InvalidParameters(_) => ErrorKind::InvalidParameters,
        }
    }
}

/// The error categories surfaced to the bridge layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// See [`OracleError::NotFound`].
    NotFound,

    /// See [`OracleError::InsufficientConfirmations`].
    InsufficientConfirmations,

    /// See [`OracleError::MismatchedDeposit`].
    MismatchedDeposit,

    /// See [`OracleError::AmbiguousDeposit`].
    AmbiguousDeposit,

    /// See [`OracleError::Signing`].
    SigningError,

    /// See [`OracleError::ExternalService`].
    ExternalServiceError,

    /// See [`OracleError::UnsupportedFunction`].
    UnsupportedFunction,

    /// See [`OracleError::InvalidParameters`].
    InvalidParameters,
}

impl ErrorKind {
    /// Returns `true` if re-invoking the same request later may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::InsufficientConfirmations | ErrorKind::ExternalServiceError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Errors from the local signer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// This node was started without a signing key.
    #[error("no signing key is configured on this node")]
    MissingKey,

    /// The configured key could not be parsed.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// The configured key is not one of the quorum's keys.
    #[error("signing key {0} is not part of the quorum")]
    KeyNotInQuorum(String),

    /// The skeleton carries nothing to sign.
    #[error("skeleton has no digests to sign")]
    EmptySkeleton,

    /// One of the skeleton's digests is not 32 bytes of hex.
    #[error("digest {index} is malformed: {reason}")]
    MalformedDigest {
        /// Position of the digest in the skeleton.
        index: usize,

        /// What is wrong with it.
        reason: String,
    },
}

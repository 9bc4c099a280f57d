//! The oracle core of the LinkedBTC adapter.
//!
//! Two operations are exposed to the bridge layer through the [`Oracle`] dispatcher:
//!
//! - `deposit`: [`DepositValidator`] checks a claimed deposit against the ledger activity of the
//!   watched account and returns the commitment hash the on-chain verifier expects.
//! - `transaction`: [`PayoutOrchestrator`] builds a multisig payout, attaches this node's partial
//!   signature and hands it to the ledger service, which collates the quorum.
//!
//! Nothing here keeps state between calls; all components only read the [`OracleConfig`] they
//! were built with.

pub mod config;
pub mod deposit;
pub mod dispatch;
pub mod errors;
pub mod payout;
pub mod signer;

#[cfg(test)]
mod test_utils;

pub use config::OracleConfig;
pub use deposit::DepositValidator;
pub use dispatch::{FunctionName, Oracle, OracleRequest, OracleResponse};
pub use errors::{ErrorKind, OracleError, OracleResult, SigningError};
pub use payout::PayoutOrchestrator;
pub use signer::SignerKey;

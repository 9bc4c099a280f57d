//! # `linkedbtc-ledger-client`
//!
//! A thin capability over the external blockchain data/transaction service: fetching the
//! transaction activity of an address, and turning multisig templates into skeletons that get
//! signed locally and sent back for collation and broadcast.
//!
//! The oracle core only depends on the [`LedgerClient`] trait. [`BlockCypherClient`] implements it
//! over HTTP for BlockCypher-compatible services.

pub mod blockcypher;
pub mod config;
pub mod errors;
mod traits;
mod wire;

pub use blockcypher::BlockCypherClient;
pub use config::LedgerConfig;
pub use errors::{LedgerError, LedgerResult};
pub use traits::{ActivityOptions, LedgerClient};

//! Provides the JSON-RPC interface the bridge layer uses to reach the oracle.
//!
//! The bridge layer relays smart-contract calls as a function name plus positional parameters;
//! [`traits::LinkedBtcOracleApi`] carries them verbatim and [`types::RpcRunResponse`] is the
//! envelope the contract-side adapter reads the result from.

pub mod traits;
pub mod types;

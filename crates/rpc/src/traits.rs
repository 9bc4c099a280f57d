//! Traits for the RPC server.

use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use serde_json::Value;

use crate::types::RpcRunResponse;

/// RPCs related to information about the node itself.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "linkedbtc"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "linkedbtc"))]
pub trait LinkedBtcControlApi {
    /// Get the uptime for the node in seconds assuming the clock is strictly monotonically
    /// increasing.
    #[method(name = "uptime")]
    async fn get_uptime(&self) -> RpcResult<u64>;
}

/// RPCs the bridge layer calls on behalf of the smart contract.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "linkedbtc"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "linkedbtc"))]
pub trait LinkedBtcOracleApi {
    /// Run an oracle function (`deposit` or `transaction`) with positional parameters.
    ///
    /// Operation failures are reported inside the [`RpcRunResponse`], not as JSON-RPC errors, so
    /// that the contract always gets a payload with an (empty) result field.
    #[method(name = "run")]
    async fn run(&self, function: String, params: Vec<Value>) -> RpcResult<RpcRunResponse>;
}

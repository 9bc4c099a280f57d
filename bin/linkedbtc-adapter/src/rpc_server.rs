//! Bootstraps the RPC server the bridge layer talks to.

use std::fmt;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonrpsee::{
    core::RpcResult,
    types::{ErrorCode, ErrorObjectOwned},
    RpcModule,
};
use linkedbtc_ledger_client::LedgerClient;
use linkedbtc_oracle::Oracle;
use linkedbtc_rpc::{
    traits::{LinkedBtcControlApiServer, LinkedBtcOracleApiServer},
    types::RpcRunResponse,
};
use serde::Serialize;
use serde_json::Value;
use tokio::signal;
use tracing::{debug, info, warn};

/// Starts the RPC server and serves until the process receives ctrl-c.
pub(crate) async fn start_rpc<T>(rpc_impl: &T, rpc_addr: &str) -> anyhow::Result<()>
where
    T: LinkedBtcControlApiServer + LinkedBtcOracleApiServer + Clone + Sync + Send,
{
    let mut rpc_module = RpcModule::new(rpc_impl.clone());

    let control_api = LinkedBtcControlApiServer::into_rpc(rpc_impl.clone());
    let oracle_api = LinkedBtcOracleApiServer::into_rpc(rpc_impl.clone());

    rpc_module.merge(control_api).context("merge control api")?;
    rpc_module.merge(oracle_api).context("merge oracle api")?;

    info!("starting adapter rpc server at {rpc_addr}");
    let rpc_server = jsonrpsee::server::ServerBuilder::new()
        .build(&rpc_addr)
        .await
        .with_context(|| format!("bind adapter rpc server to {rpc_addr}"))?;

    let rpc_handle = rpc_server.start(rpc_module);
    debug!("adapter rpc server started");

    signal::ctrl_c().await.context("listen for shutdown signal")?;
    info!("stopping rpc server");

    if rpc_handle.stop().is_err() {
        warn!("rpc server already stopped");
    }
    rpc_handle.stopped().await;

    Ok(())
}

/// RPC server for the adapter node.
///
/// Holds the [`Oracle`] every `run` call is dispatched to.
pub(crate) struct AdapterRpc<L> {
    /// Node start time.
    start_time: DateTime<Utc>,

    /// The oracle serving `deposit` and `transaction`.
    oracle: Oracle<L>,
}

impl<L> Clone for AdapterRpc<L> {
    fn clone(&self) -> Self {
        Self {
            start_time: self.start_time,
            oracle: self.oracle.clone(),
        }
    }
}

impl<L: fmt::Debug> fmt::Debug for AdapterRpc<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRpc")
            .field("start_time", &self.start_time)
            .field("oracle", &self.oracle)
            .finish()
    }
}

impl<L> AdapterRpc<L> {
    /// Creates a new [`AdapterRpc`] that reports uptime from now on.
    pub(crate) fn new(oracle: Oracle<L>) -> Self {
        Self {
            start_time: Utc::now(),
            oracle,
        }
    }
}

#[async_trait]
impl<L> LinkedBtcControlApiServer for AdapterRpc<L>
where
    L: LedgerClient + 'static,
{
    async fn get_uptime(&self) -> RpcResult<u64> {
        let current_time = Utc::now().timestamp();
        let start_time = self.start_time.timestamp();

        // The user might care about their system time being incorrect.
        if current_time < start_time {
            return Err(rpc_error(
                ErrorCode::InternalError,
                "system time may be inaccurate",
                current_time.saturating_sub(start_time),
            ));
        }

        Ok(current_time.abs_diff(start_time))
    }
}

#[async_trait]
impl<L> LinkedBtcOracleApiServer for AdapterRpc<L>
where
    L: LedgerClient + 'static,
{
    async fn run(&self, function: String, params: Vec<Value>) -> RpcResult<RpcRunResponse> {
        let outcome = self.oracle.handle(&function, &params).await;

        if let Err(e) = &outcome {
            let kind = e.kind();
            if kind.is_retryable() {
                info!(%function, %kind, %e, "oracle call not ready, caller may retry");
            } else {
                warn!(%function, %kind, %e, "oracle call failed");
            }
        }

        Ok(RpcRunResponse::from_outcome(function.parse().ok(), outcome))
    }
}

fn rpc_error<T: fmt::Display + Serialize>(
    err_code: ErrorCode,
    message: &str,
    data: T,
) -> ErrorObjectOwned {
    ErrorObjectOwned::owned::<_>(err_code.code(), message, Some(data))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use linkedbtc_ledger_client::{ActivityOptions, LedgerError, LedgerResult};
    use linkedbtc_oracle::{ErrorKind, OracleConfig};
    use linkedbtc_primitives::{
        ledger::LedgerTransaction,
        quorum::QuorumPolicy,
        skeleton::{MultisigTemplate, TransactionSkeleton},
    };
    use linkedbtc_rpc::types::RpcAdapterData;
    use serde_json::json;

    use super::*;

    /// A ledger service that is down.
    #[derive(Debug)]
    struct UnreachableLedger;

    fn unreachable() -> LedgerError {
        LedgerError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        }
    }

    impl LedgerClient for UnreachableLedger {
        async fn fetch_address_activity(
            &self,
            _address: &str,
            _options: &ActivityOptions,
        ) -> LedgerResult<Vec<LedgerTransaction>> {
            Err(unreachable())
        }

        async fn request_skeleton(
            &self,
            _template: &MultisigTemplate,
        ) -> LedgerResult<TransactionSkeleton> {
            Err(unreachable())
        }

        async fn submit_skeleton(
            &self,
            _skeleton: TransactionSkeleton,
        ) -> LedgerResult<TransactionSkeleton> {
            Err(unreachable())
        }
    }

    fn rpc() -> AdapterRpc<UnreachableLedger> {
        let params = toml::from_str::<crate::params::Params>(include_str!("../params.toml"))
            .expect("sample params must parse");
        let quorum: QuorumPolicy = params.quorum;

        let config = OracleConfig {
            deposit_account: "S".to_string(),
            required_confirmations: 6,
            quorum,
        };

        AdapterRpc::new(Oracle::new(
            Arc::new(UnreachableLedger),
            Arc::new(config),
            None,
        ))
    }

    #[tokio::test]
    async fn ledger_outage_is_a_retryable_response() {
        let resp = rpc()
            .run(
                "deposit".to_string(),
                vec![json!("abc"), json!("D"), json!("100")],
            )
            .await
            .expect("operation errors are not rpc errors");

        assert_eq!(
            resp.data,
            Some(RpcAdapterData::Deposit {
                tx_valid: String::new()
            })
        );
        assert_eq!(resp.error_kind, Some(ErrorKind::ExternalServiceError));
        assert!(resp.is_retryable());
    }

    #[tokio::test]
    async fn payout_without_a_key_is_a_signing_error() {
        let resp = rpc()
            .run("transaction".to_string(), vec![json!("dest123"), json!(50_000)])
            .await
            .expect("operation errors are not rpc errors");

        assert_eq!(
            resp.data,
            Some(RpcAdapterData::Transaction {
                tx_hash: String::new()
            })
        );
        assert_eq!(resp.error_kind, Some(ErrorKind::SigningError));
    }

    #[tokio::test]
    async fn unknown_function_is_reported() {
        let resp = rpc()
            .run("withdraw".to_string(), vec![])
            .await
            .expect("operation errors are not rpc errors");

        assert_eq!(resp.data, None);
        assert_eq!(resp.error_kind, Some(ErrorKind::UnsupportedFunction));
    }

    #[tokio::test]
    async fn uptime_counts_from_construction() {
        let uptime = rpc().get_uptime().await.expect("clock moves forward");
        assert!(uptime <= 1);
    }
}

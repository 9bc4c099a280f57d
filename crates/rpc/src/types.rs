//! Types for the RPC server.

use linkedbtc_oracle::{ErrorKind, FunctionName, OracleError, OracleResponse, OracleResult};
use serde::{Deserialize, Serialize};

/// The result field handed back to the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcAdapterData {
    /// Outcome of `deposit`: the commitment hash, or an empty string on failure.
    Deposit {
        /// `0x`-prefixed commitment hash.
        #[serde(rename = "txValid")]
        tx_valid: String,
    },

    /// Outcome of `transaction`: the ledger-service transaction hash, or an empty string on
    /// failure.
    Transaction {
        /// Transaction hash reported by the ledger service.
        #[serde(rename = "txHash")]
        tx_hash: String,
    },
}

impl RpcAdapterData {
    /// The empty result for `function`.
    pub fn empty(function: FunctionName) -> Self {
        match function {
            FunctionName::Deposit => RpcAdapterData::Deposit {
                tx_valid: String::new(),
            },
            FunctionName::Transaction => RpcAdapterData::Transaction {
                tx_hash: String::new(),
            },
        }
    }
}

impl From<OracleResponse> for RpcAdapterData {
    fn from(resp: OracleResponse) -> Self {
        match resp {
            OracleResponse::Deposit(commitment) => RpcAdapterData::Deposit {
                tx_valid: commitment.to_string(),
            },
            OracleResponse::Transaction(tx_hash) => RpcAdapterData::Transaction { tx_hash },
        }
    }
}

/// Response envelope of `linkedbtc_run`.
///
/// Exactly one of `data` carrying a non-empty value or `error` is meaningful. `data` is `None`
/// only when the function name itself was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRunResponse {
    /// The function's result field.
    pub data: Option<RpcAdapterData>,

    /// Human-readable error message.
    pub error: Option<String>,

    /// Machine-readable error category.
    pub error_kind: Option<ErrorKind>,
}

impl RpcRunResponse {
    /// Shapes the outcome of running `function` for the bridge layer.
    ///
    /// `function` is `None` when the requested name is not a known function.
    pub fn from_outcome(
        function: Option<FunctionName>,
        outcome: OracleResult<OracleResponse>,
    ) -> Self {
        match outcome {
            Ok(resp) => Self {
                data: Some(resp.into()),
                error: None,
                error_kind: None,
            },
            Err(err) => Self::failure(function, &err),
        }
    }

    fn failure(function: Option<FunctionName>, err: &OracleError) -> Self {
        Self {
            data: function.map(RpcAdapterData::empty),
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }

    /// Returns `true` if the caller may re-submit the same call later.
    pub fn is_retryable(&self) -> bool {
        self.error_kind.is_some_and(|kind| kind.is_retryable())
    }
}

//! Maps bridge-layer calls onto the oracle operations.

use std::{fmt, str::FromStr, sync::Arc};

use bitcoin::Amount;
use linkedbtc_ledger_client::LedgerClient;
use linkedbtc_primitives::{
    commitment::CommitmentHash, deposit::DepositClaim, skeleton::MultisigSpendRequest,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::OracleConfig,
    deposit::DepositValidator,
    errors::{OracleError, OracleResult},
    payout::PayoutOrchestrator,
    signer::SignerKey,
};

/// The functions the bridge layer may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    /// Validate a claimed deposit.
    Deposit,

    /// Pay out from the multisig locker.
    Transaction,
}

impl FunctionName {
    /// The name the bridge layer uses for this function.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FunctionName::Deposit => "deposit",
            FunctionName::Transaction => "transaction",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionName {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "transaction" => Ok(Self::Transaction),
            other => Err(OracleError::UnsupportedFunction(other.to_string())),
        }
    }
}

/// A fully decoded bridge-layer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleRequest {
    /// `deposit(txid, address, value)`.
    Deposit(DepositClaim),

    /// `transaction(destination, amount)`.
    Transaction(MultisigSpendRequest),
}

impl OracleRequest {
    /// Decodes a function name and its positional parameters.
    ///
    /// Parameters beyond the ones a function takes are ignored.
    pub fn parse(function: &str, params: &[Value]) -> OracleResult<Self> {
        match function.parse::<FunctionName>()? {
            FunctionName::Deposit => Ok(Self::Deposit(DepositClaim::new(
                string_param(params, 0, "txid")?,
                string_param(params, 1, "address")?,
                decimal_param(params, 2, "value")?,
            ))),
            FunctionName::Transaction => Ok(Self::Transaction(MultisigSpendRequest::new(
                string_param(params, 0, "destination address")?,
                Amount::from_sat(amount_param(params, 1, "amount")?),
            ))),
        }
    }

    /// The function this request targets.
    pub const fn function(&self) -> FunctionName {
        match self {
            OracleRequest::Deposit(_) => FunctionName::Deposit,
            OracleRequest::Transaction(_) => FunctionName::Transaction,
        }
    }
}

/// The successful outcome of an [`OracleRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleResponse {
    /// The deposit checked out; the commitment goes back to the contract.
    Deposit(CommitmentHash),

    /// The partially signed payout was accepted by the ledger service under this hash.
    Transaction(String),
}

fn param<'a>(params: &'a [Value], index: usize, name: &str) -> OracleResult<&'a Value> {
    params.get(index).ok_or_else(|| {
        OracleError::InvalidParameters(format!(
            "missing parameter {index} ({name}), got {} parameters",
            params.len()
        ))
    })
}

fn string_param(params: &[Value], index: usize, name: &str) -> OracleResult<String> {
    match param(params, index, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(OracleError::InvalidParameters(format!(
            "parameter {index} ({name}) must be a string, got {other}"
        ))),
    }
}

/// Accepts decimal text as-is and renders unsigned integers as decimal text.
fn decimal_param(params: &[Value], index: usize, name: &str) -> OracleResult<String> {
    match param(params, index, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(OracleError::InvalidParameters(format!(
            "parameter {index} ({name}) must be decimal text or an unsigned integer, got {other}"
        ))),
    }
}

fn amount_param(params: &[Value], index: usize, name: &str) -> OracleResult<u64> {
    let value = param(params, index, name)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        OracleError::InvalidParameters(format!(
            "parameter {index} ({name}) must be an unsigned integer, got {value}"
        ))
    })
}

/// Entry point for bridge-layer calls.
///
/// Stateless: every call is dispatched on its own, and concurrent calls share nothing but the
/// read-only configuration and the ledger client.
#[derive(Debug)]
pub struct Oracle<L> {
    deposits: DepositValidator<L>,
    payouts: PayoutOrchestrator<L>,
}

impl<L> Clone for Oracle<L> {
    fn clone(&self) -> Self {
        Self {
            deposits: self.deposits.clone(),
            payouts: self.payouts.clone(),
        }
    }
}

impl<L: LedgerClient> Oracle<L> {
    /// Creates a new [`Oracle`] whose components share `ledger` and `config`.
    pub fn new(ledger: Arc<L>, config: Arc<OracleConfig>, signer: Option<Arc<SignerKey>>) -> Self {
        Self {
            deposits: DepositValidator::new(ledger.clone(), config.clone()),
            payouts: PayoutOrchestrator::new(ledger, config, signer),
        }
    }

    /// Decodes and executes a bridge-layer call.
    pub async fn handle(&self, function: &str, params: &[Value]) -> OracleResult<OracleResponse> {
        let request = OracleRequest::parse(function, params)?;
        self.execute(request).await
    }

    /// Executes an already decoded request.
    pub async fn execute(&self, request: OracleRequest) -> OracleResult<OracleResponse> {
        debug!(function = %request.function(), "dispatching request");

        match request {
            OracleRequest::Deposit(claim) => self
                .deposits
                .validate(&claim)
                .await
                .map(OracleResponse::Deposit),
            OracleRequest::Transaction(spend) => self
                .payouts
                .send_payout(&spend)
                .await
                .map(OracleResponse::Transaction),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        errors::ErrorKind,
        test_utils::{ledger_tx, test_config, test_signer, unsigned_skeleton, StubLedger},
    };

    fn oracle(ledger: StubLedger) -> Oracle<StubLedger> {
        Oracle::new(
            Arc::new(ledger),
            Arc::new(test_config("S", 2)),
            Some(Arc::new(test_signer())),
        )
    }

    #[test]
    fn parses_deposit_params() {
        let req = OracleRequest::parse("deposit", &[json!("abc"), json!("D"), json!("100")])
            .expect("valid");
        assert_eq!(req, OracleRequest::Deposit(DepositClaim::new("abc", "D", "100")));
        assert_eq!(req.function(), FunctionName::Deposit);

        let numeric = OracleRequest::parse("deposit", &[json!("abc"), json!("D"), json!(100)])
            .expect("numeric value is accepted");
        assert_eq!(numeric, req);
    }

    #[test]
    fn parses_transaction_params() {
        let expected = OracleRequest::Transaction(MultisigSpendRequest::new(
            "dest123",
            Amount::from_sat(50_000),
        ));

        for amount in [json!(50_000), json!("50000")] {
            let params = [json!("dest123"), amount, json!("extra")];
            let req = OracleRequest::parse("transaction", &params).expect("valid");
            assert_eq!(req, expected);
        }
    }

    #[test]
    fn short_or_mistyped_params_are_invalid() {
        let cases: [(&str, Vec<Value>); 6] = [
            ("deposit", vec![]),
            ("deposit", vec![json!("abc"), json!("D")]),
            ("deposit", vec![json!("abc"), json!(7), json!("100")]),
            ("deposit", vec![json!("abc"), json!("D"), json!(-5)]),
            ("transaction", vec![json!("dest123")]),
            ("transaction", vec![json!("dest123"), json!(-1)]),
        ];

        for (function, params) in cases {
            let err = OracleRequest::parse(function, &params).expect_err("must be invalid");
            assert_eq!(err.kind(), ErrorKind::InvalidParameters, "{function} {params:?}");
        }
    }

    #[test]
    fn unknown_function_is_unsupported() {
        let err = OracleRequest::parse("withdraw", &[]).expect_err("unsupported");
        assert!(matches!(err, OracleError::UnsupportedFunction(f) if f == "withdraw"));
        assert_eq!(FunctionName::Transaction.to_string(), "transaction");
    }

    #[tokio::test]
    async fn routes_deposit_calls() {
        let tx = ledger_tx("abc", 6, &[&["S"]], &[("S", 900), ("D", 100)]);
        let oracle = oracle(StubLedger::with_activity(vec![tx]));

        let resp = oracle
            .handle("deposit", &[json!("abc"), json!("D"), json!("100")])
            .await
            .expect("valid deposit");

        assert_eq!(
            resp,
            OracleResponse::Deposit(CommitmentHash::compute("abc", "D", "100"))
        );
    }

    #[tokio::test]
    async fn routes_transaction_calls() {
        let oracle = oracle(StubLedger {
            skeleton: Some(unsigned_skeleton("", &["cd".repeat(32)])),
            broadcast_hash: Some("txhashABC".to_string()),
            ..Default::default()
        });

        let resp = oracle
            .handle("transaction", &[json!("dest123"), json!(50_000)])
            .await
            .expect("valid payout");

        assert_eq!(resp, OracleResponse::Transaction("txhashABC".to_string()));
    }

    #[tokio::test]
    async fn bad_requests_never_reach_the_ledger() {
        let ledger = Arc::new(StubLedger::default());
        let oracle = Oracle::new(
            ledger.clone(),
            Arc::new(test_config("S", 2)),
            Some(Arc::new(test_signer())),
        );

        let err = oracle
            .handle("deposit", &[json!("abc")])
            .await
            .expect_err("too few params");
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);

        let err = oracle.handle("balance", &[]).await.expect_err("unsupported");
        assert_eq!(err.kind(), ErrorKind::UnsupportedFunction);

        assert!(ledger.calls().is_empty());
    }
}

//! Multisig payouts out of the bridge's locker.
//!
//! Each of the signer nodes runs this independently for the same request. This node contributes
//! one partial signature; collecting the others and broadcasting once the quorum is reached is
//! up to the ledger service.

use std::sync::Arc;

use linkedbtc_ledger_client::{LedgerClient, LedgerError};
use linkedbtc_primitives::skeleton::MultisigSpendRequest;
use tracing::{error, info};

use crate::{
    config::OracleConfig,
    errors::{OracleResult, SigningError},
    signer::SignerKey,
};

/// Builds, partially signs and submits multisig payouts.
#[derive(Debug)]
pub struct PayoutOrchestrator<L> {
    ledger: Arc<L>,
    config: Arc<OracleConfig>,
    signer: Option<Arc<SignerKey>>,
}

impl<L> Clone for PayoutOrchestrator<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            config: self.config.clone(),
            signer: self.signer.clone(),
        }
    }
}

impl<L: LedgerClient> PayoutOrchestrator<L> {
    /// Creates a new [`PayoutOrchestrator`].
    ///
    /// A node without a `signer` can still validate deposits but every payout fails with
    /// [`SigningError::MissingKey`].
    pub const fn new(
        ledger: Arc<L>,
        config: Arc<OracleConfig>,
        signer: Option<Arc<SignerKey>>,
    ) -> Self {
        Self {
            ledger,
            config,
            signer,
        }
    }

    /// Pays `request.amount` to `request.destination` and returns the ledger's transaction hash.
    ///
    /// Any failure aborts the attempt and discards the skeleton built so far; re-invoking from
    /// scratch is the recovery path.
    pub async fn send_payout(&self, request: &MultisigSpendRequest) -> OracleResult<String> {
        let quorum = &self.config.quorum;
        let signer = self.signer.as_deref().ok_or(SigningError::MissingKey)?;
        signer.ensure_in_quorum(quorum)?;

        info!(destination = %request.destination, amount = %request.amount, "starting payout");

        let template = self.ledger.build_multisig_template(request, quorum)?;
        let mut skeleton = self.ledger.request_skeleton(&template).await.inspect_err(|e| {
            error!(%e, destination = %request.destination, "could not build payout skeleton");
        })?;

        signer.sign_skeleton(&mut skeleton, quorum)?;

        let sent = self.ledger.submit_skeleton(skeleton).await.inspect_err(|e| {
            error!(%e, destination = %request.destination, "could not submit payout skeleton");
        })?;
        let tx_hash = sent.tx_hash().ok_or(LedgerError::MissingTxHash)?.to_string();

        info!(
            %tx_hash,
            required = quorum.required_signatures(),
            "partial signature submitted for collation"
        );

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::Amount;
    use linkedbtc_primitives::skeleton::{MultisigTemplate, SkeletonStage};

    use super::*;
    use crate::{
        errors::{ErrorKind, OracleError},
        test_utils::{
            test_config, test_quorum, test_signer, unsigned_skeleton, LedgerCall, StubLedger,
        },
    };

    fn orchestrator(
        ledger: StubLedger,
        signer: Option<SignerKey>,
    ) -> PayoutOrchestrator<StubLedger> {
        PayoutOrchestrator::new(
            Arc::new(ledger),
            Arc::new(test_config("D", 2)),
            signer.map(Arc::new),
        )
    }

    fn request() -> MultisigSpendRequest {
        MultisigSpendRequest::new("dest123", Amount::from_sat(50_000))
    }

    #[tokio::test]
    async fn partially_signed_payout_returns_ledger_hash() {
        let ledger = StubLedger {
            skeleton: Some(unsigned_skeleton("", &["ab".repeat(32)])),
            broadcast_hash: Some("txhashABC".to_string()),
            ..Default::default()
        };
        let payout = orchestrator(ledger, Some(test_signer()));

        let tx_hash = payout.send_payout(&request()).await.expect("payout succeeds");
        assert_eq!(tx_hash, "txhashABC");

        let calls = payout.ledger.calls();
        let expected_template =
            MultisigTemplate::new(&request(), &test_quorum()).expect("valid template");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], LedgerCall::RequestSkeleton(expected_template));

        let LedgerCall::SubmitSkeleton(submitted) = &calls[1] else {
            panic!("second call must submit the skeleton, got {:?}", calls[1]);
        };
        assert_eq!(submitted.stage(), SkeletonStage::PartiallySigned);
        assert_eq!(submitted.signatures.len(), 1);
        assert_eq!(
            submitted.pubkeys,
            vec![test_signer().public_key().to_string()]
        );
    }

    #[tokio::test]
    async fn build_failure_submits_nothing() {
        let ledger = StubLedger {
            skeleton: None,
            broadcast_hash: Some("txhashABC".to_string()),
            ..Default::default()
        };
        let payout = orchestrator(ledger, Some(test_signer()));

        let err = payout.send_payout(&request()).await.expect_err("build fails");
        assert!(matches!(
            err,
            OracleError::ExternalService(LedgerError::Api { status: 503, .. })
        ));

        let calls = payout.ledger.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], LedgerCall::RequestSkeleton(_)));
    }

    #[tokio::test]
    async fn send_failure_is_surfaced() {
        let ledger = StubLedger {
            skeleton: Some(unsigned_skeleton("", &["ab".repeat(32)])),
            broadcast_hash: None,
            ..Default::default()
        };
        let payout = orchestrator(ledger, Some(test_signer()));

        let err = payout.send_payout(&request()).await.expect_err("send fails");
        assert_eq!(err.kind(), ErrorKind::ExternalServiceError);
        assert_eq!(payout.ledger.calls().len(), 2);
    }

    #[tokio::test]
    async fn malformed_skeleton_is_never_submitted() {
        let ledger = StubLedger {
            skeleton: Some(unsigned_skeleton("", &[])),
            broadcast_hash: Some("txhashABC".to_string()),
            ..Default::default()
        };
        let payout = orchestrator(ledger, Some(test_signer()));

        let err = payout.send_payout(&request()).await.expect_err("nothing to sign");
        assert!(matches!(
            err,
            OracleError::Signing(SigningError::EmptySkeleton)
        ));
        assert_eq!(payout.ledger.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_call() {
        let payout = orchestrator(StubLedger::default(), None);

        let err = payout.send_payout(&request()).await.expect_err("no key");
        assert!(matches!(err, OracleError::Signing(SigningError::MissingKey)));
        assert!(payout.ledger.calls().is_empty());
    }

    #[tokio::test]
    async fn degenerate_request_is_invalid() {
        let payout = orchestrator(StubLedger::default(), Some(test_signer()));

        let err = payout
            .send_payout(&MultisigSpendRequest::new("dest123", Amount::ZERO))
            .await
            .expect_err("zero amount");
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        assert!(payout.ledger.calls().is_empty());
    }
}

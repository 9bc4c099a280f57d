//! Validation of claimed deposits into the watched account.

use std::sync::Arc;

use linkedbtc_ledger_client::{ActivityOptions, LedgerClient};
use linkedbtc_primitives::{
    commitment::CommitmentHash,
    deposit::DepositClaim,
    ledger::{LedgerTransaction, TxOutput},
};
use tracing::{debug, info, warn};

use crate::{
    config::OracleConfig,
    errors::{OracleError, OracleResult},
};

/// What a ledger transaction actually moved, seen from the watched account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedPayment<'tx> {
    /// The address on the other side of the watched account.
    pub counterparty: &'tx str,

    /// The amount paid, in satoshis.
    pub value: u64,
}

/// Decides whether a claimed deposit is backed by the ledger.
#[derive(Debug)]
pub struct DepositValidator<L> {
    ledger: Arc<L>,
    config: Arc<OracleConfig>,
}

impl<L> Clone for DepositValidator<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            config: self.config.clone(),
        }
    }
}

impl<L: LedgerClient> DepositValidator<L> {
    /// Creates a new [`DepositValidator`].
    pub const fn new(ledger: Arc<L>, config: Arc<OracleConfig>) -> Self {
        Self { ledger, config }
    }

    /// Validates `claim` and returns the commitment the on-chain verifier expects.
    ///
    /// Insufficient confirmations are reported, not waited for; the caller polls again later.
    pub async fn validate(&self, claim: &DepositClaim) -> OracleResult<CommitmentHash> {
        let account = self.config.deposit_account.as_str();
        debug!(txid = %claim.txid(), %account, "looking up claimed deposit");

        let activity = self
            .ledger
            .fetch_address_activity(account, &ActivityOptions::default())
            .await?;

        let tx = activity
            .iter()
            .find(|tx| tx.hash == claim.txid())
            .ok_or_else(|| OracleError::NotFound(claim.txid().to_string()))?;

        let required = self.config.required_confirmations;
        if tx.confirmations < required {
            info!(
                txid = %tx.hash,
                confirmations = tx.confirmations,
                %required,
                "deposit not buried yet"
            );
            return Err(OracleError::InsufficientConfirmations {
                txid: tx.hash.clone(),
                confirmations: tx.confirmations,
                required,
            });
        }

        let payment = observe_payment(tx, account)?;
        if let Err(err) = match_claim(claim, &payment) {
            warn!(txid = %tx.hash, %err, "rejected deposit claim");
            return Err(err);
        }

        let commitment = claim.commitment();
        info!(txid = %tx.hash, %commitment, "deposit validated");

        Ok(commitment)
    }
}

/// Extracts the counterparty and value of `tx` relative to `account`.
///
/// - All inputs must come from one address, the sender.
/// - Exactly one output must pay somewhere other than the sender; that is the payment, the rest
///   is change.
/// - If `account` sent the transaction, the counterparty is the payment's recipient. Otherwise
///   the payment must land on `account` and the counterparty is the sender.
pub fn observe_payment<'tx>(
    tx: &'tx LedgerTransaction,
    account: &str,
) -> OracleResult<ObservedPayment<'tx>> {
    let senders = tx.input_addresses();
    let sender_count = senders.len();
    let mut senders = senders.into_iter();
    let sender = match (senders.next(), senders.next()) {
        (Some(sender), None) => sender,
        (None, _) => {
            return Err(OracleError::AmbiguousDeposit(
                "inputs carry no sender address".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(OracleError::AmbiguousDeposit(format!(
                "inputs come from {sender_count} different addresses"
            )))
        }
    };

    let payments: Vec<&TxOutput> = tx.outputs.iter().filter(|o| !o.pays_to(sender)).collect();
    let payment = match payments.as_slice() {
        [payment] => *payment,
        [] => {
            return Err(OracleError::MismatchedDeposit(
                "transaction only returns funds to its sender".to_string(),
            ))
        }
        many => {
            return Err(OracleError::AmbiguousDeposit(format!(
                "transaction has {} payment outputs",
                many.len()
            )))
        }
    };

    let counterparty = if sender == account {
        match payment.addresses.as_slice() {
            [recipient] => recipient.as_str(),
            _ => {
                return Err(OracleError::AmbiguousDeposit(
                    "payment output does not name a single recipient".to_string(),
                ))
            }
        }
    } else {
        if !payment.pays_to(account) {
            return Err(OracleError::MismatchedDeposit(
                "payment does not go to the deposit account".to_string(),
            ));
        }
        sender
    };

    Ok(ObservedPayment {
        counterparty,
        value: payment.value,
    })
}

/// Compares the claim against what the ledger shows, as exact strings.
fn match_claim(claim: &DepositClaim, payment: &ObservedPayment<'_>) -> OracleResult<()> {
    let observed_value = payment.value.to_string();

    if claim.value() != observed_value {
        return Err(OracleError::MismatchedDeposit(format!(
            "claimed value {} but {} was paid",
            claim.value(),
            observed_value
        )));
    }

    if claim.counterparty() != payment.counterparty {
        return Err(OracleError::MismatchedDeposit(format!(
            "claimed counterparty {} but the transaction was with {}",
            claim.counterparty(),
            payment.counterparty
        )));
    }

    Ok(())
}

//! Response bodies of the ledger service that never leave this crate.

use linkedbtc_primitives::{ledger::LedgerTransaction, skeleton::SkeletonError};
use serde::Deserialize;

/// One page of `GET /addrs/{address}/full`.
#[derive(Debug, Deserialize)]
pub(crate) struct AddressFull {
    #[serde(default)]
    pub(crate) txs: Vec<LedgerTransaction>,

    #[serde(default, rename = "hasMore")]
    pub(crate) has_more: bool,
}

/// The body the service sends alongside a non-success status.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    errors: Vec<SkeletonError>,
}

/// Extracts a human-readable message from an error response body, falling back to the raw body.
pub(crate) fn api_error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).unwrap_or_default();

    let mut messages: Vec<String> = parsed.error.into_iter().collect();
    messages.extend(parsed.errors.into_iter().map(|e| e.error));

    if messages.is_empty() {
        body.trim().to_string()
    } else {
        messages.join("; ")
    }
}

/// Computes the `before` cursor for the page after `txs`.
///
/// The service returns transactions strictly below `before`, so the cursor is one past the lowest
/// confirmed height on this page; that re-reads the partially consumed block and relies on
/// deduplication by hash. Returns `None` when no progress would be made.
pub(crate) fn next_cursor(txs: &[LedgerTransaction], previous: Option<i64>) -> Option<i64> {
    let lowest = txs
        .iter()
        .filter(|tx| tx.is_confirmed())
        .map(|tx| tx.block_height)
        .min()?;
    let cursor = lowest + 1;

    match previous {
        Some(prev) if cursor >= prev => None,
        _ => Some(cursor),
    }
}

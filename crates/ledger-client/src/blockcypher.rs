//! [`LedgerClient`] implementation for BlockCypher-compatible REST services.

use std::{collections::HashSet, fmt};

use linkedbtc_primitives::{
    ledger::LedgerTransaction,
    skeleton::{MultisigTemplate, TransactionSkeleton},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    config::LedgerConfig,
    errors::{LedgerError, LedgerResult},
    traits::{ActivityOptions, LedgerClient},
    wire::{api_error_message, next_cursor, AddressFull},
};

/// HTTP client for the ledger service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct BlockCypherClient {
    http: reqwest::Client,
    root: String,
    token: Option<String>,
    page_limit: u8,
    max_pages: u8,
}

// The API token must not end up in logs.
impl fmt::Debug for BlockCypherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCypherClient")
            .field("root", &self.root)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("page_limit", &self.page_limit)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl BlockCypherClient {
    /// Creates a new client for the coin/chain in `config`, authenticating with `token` if given.
    pub fn new(config: &LedgerConfig, token: Option<String>) -> LedgerResult<Self> {
        if config.coin.trim().is_empty() || config.chain.trim().is_empty() {
            return Err(LedgerError::InvalidConfig(
                "coin and chain must both be set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            root: config.chain_root(),
            token: token.filter(|t| !t.is_empty()),
            page_limit: config.page_limit(),
            max_pages: config.max_pages(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.root, path)
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        self.token
            .iter()
            .map(|token| ("token", token.clone()))
            .collect()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        mut query: Vec<(&'static str, String)>,
    ) -> LedgerResult<T> {
        trace!(%path, ?query, "sending GET to ledger service");
        query.extend(self.auth_query());

        let response = self.http.get(self.url(path)).query(&query).send().await?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> LedgerResult<T> {
        trace!(%path, "sending POST to ledger service");

        let response = self
            .http
            .post(self.url(path))
            .query(&self.auth_query())
            .json(body)
            .send()
            .await?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> LedgerResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = api_error_message(&body);
        warn!(status = status.as_u16(), %message, "ledger service returned an error");
        return Err(LedgerError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

fn reject_on_errors(skeleton: TransactionSkeleton) -> LedgerResult<TransactionSkeleton> {
    match skeleton.error_message() {
        Some(message) => Err(LedgerError::Rejected(message)),
        None => Ok(skeleton),
    }
}

impl LedgerClient for BlockCypherClient {
    async fn fetch_address_activity(
        &self,
        address: &str,
        options: &ActivityOptions,
    ) -> LedgerResult<Vec<LedgerTransaction>> {
        let path = format!("addrs/{address}/full");
        let mut seen = HashSet::new();
        let mut txs = Vec::new();
        let mut before: Option<i64> = None;

        for page in 0..self.max_pages {
            let mut query = vec![("limit", self.page_limit.to_string())];
            if options.omit_wallet_addresses {
                query.push(("omitWalletAddresses", "true".to_string()));
            }
            if let Some(height) = before {
                query.push(("before", height.to_string()));
            }

            let resp: AddressFull = self.get_json(&path, query).await?;
            debug!(
                %address,
                %page,
                count = resp.txs.len(),
                has_more = resp.has_more,
                "fetched address page"
            );

            let cursor = next_cursor(&resp.txs, before);
            txs.extend(
                resp.txs
                    .into_iter()
                    .filter(|tx| seen.insert(tx.hash.clone())),
            );

            if !resp.has_more {
                return Ok(txs);
            }

            match cursor {
                Some(height) => before = Some(height),
                None => {
                    warn!(%address, "address activity has more pages but no cursor to follow");
                    return Ok(txs);
                }
            }
        }

        warn!(
            %address,
            max_pages = self.max_pages,
            count = txs.len(),
            "address activity truncated at the page cap, older transactions are not visible"
        );
        Ok(txs)
    }

    async fn request_skeleton(
        &self,
        template: &MultisigTemplate,
    ) -> LedgerResult<TransactionSkeleton> {
        let skeleton: TransactionSkeleton = self.post_json("txs/new", template).await?;
        let skeleton = reject_on_errors(skeleton)?;
        debug!(tosign = skeleton.tosign.len(), "received unsigned skeleton");

        Ok(skeleton)
    }

    async fn submit_skeleton(
        &self,
        skeleton: TransactionSkeleton,
    ) -> LedgerResult<TransactionSkeleton> {
        let sent: TransactionSkeleton = self.post_json("txs/send", &skeleton).await?;
        let sent = reject_on_errors(sent)?;

        if sent.tx_hash().is_none() {
            return Err(LedgerError::MissingTxHash);
        }
        debug!(tx_hash = ?sent.tx_hash(), "skeleton accepted by ledger service");

        Ok(sent)
    }
}

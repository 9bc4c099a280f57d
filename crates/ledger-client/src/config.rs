//! Connection settings for the ledger service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default REST root of the ledger service.
pub const DEFAULT_BASE_URL: &str = "https://api.blockcypher.com/v1";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Maximum number of transactions the service returns per address page.
pub const MAX_PAGE_LIMIT: u8 = 50;

/// Default cap on the number of address pages followed per lookup.
pub const DEFAULT_MAX_PAGES: u8 = 4;

/// The configuration required to connect to the ledger service.
///
/// The API token is deliberately not part of this struct; it is a secret and is handed to
/// [`BlockCypherClient::new`](crate::BlockCypherClient::new) separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// REST root of the service, defaults to [`DEFAULT_BASE_URL`].
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Coin ticker, e.g. `btc`.
    pub coin: String,

    /// Chain of the coin, e.g. `main` or `test3`.
    pub chain: String,

    /// Request timeout in milliseconds.
    pub timeout: Option<u64>,

    /// Transactions per address page, capped at [`MAX_PAGE_LIMIT`].
    pub page_limit: Option<u8>,

    /// Maximum number of address pages to follow, defaults to [`DEFAULT_MAX_PAGES`].
    pub max_pages: Option<u8>,
}

impl LedgerConfig {
    /// Creates a config for the given coin/chain pair with every optional value defaulted.
    pub fn new(coin: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            coin: coin.into(),
            chain: chain.into(),
            timeout: None,
            page_limit: None,
            max_pages: None,
        }
    }

    /// The effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// The effective page size, always within `1..=MAX_PAGE_LIMIT`.
    pub fn page_limit(&self) -> u8 {
        self.page_limit.unwrap_or(MAX_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
    }

    /// The effective page cap, at least one.
    pub fn max_pages(&self) -> u8 {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1)
    }

    /// The root every endpoint path is appended to, e.g. `https://api.blockcypher.com/v1/btc/main`.
    pub fn chain_root(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.coin,
            self.chain
        )
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

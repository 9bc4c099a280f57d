//! The LinkedBTC adapter is the oracle node behind the LinkedBTC bridge contract.
//!
//! It answers two calls relayed from the contract: whether a claimed bitcoin deposit is real, and
//! a request to pay out of the multisig locker, which it partially signs as one of the quorum.

use std::{fs, path::Path};

use bootstrap::Secrets;
use clap::Parser;
use config::Config;
use constants::{DEFAULT_THREAD_COUNT, DEFAULT_THREAD_STACK_SIZE, SERVICE_NAME};
use linkedbtc_common::{logging, logging::LoggerConfig};
use params::Params;
use serde::de::DeserializeOwned;
use tokio::runtime;
use tracing::{debug, info, trace};

mod args;
mod bootstrap;
mod config;
mod params;
mod rpc_server;

mod constants;

fn main() {
    // A missing `.env` is fine; the variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    logging::init(LoggerConfig::with_base_name(SERVICE_NAME).with_otlp_from_env());
    if let Ok(path) = dotenv {
        debug!(?path, "loaded environment file");
    }

    let cli = args::Cli::parse();
    info!(config = ?cli.config, params = ?cli.params, "starting adapter node");

    let params = parse_toml::<Params>(&cli.params);
    let config = parse_toml::<Config>(&cli.config);
    let secrets = Secrets {
        ledger_token: cli.ledger_token,
        signer_key: cli.signer_key,
    };

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.num_threads.unwrap_or(DEFAULT_THREAD_COUNT).into())
        .thread_stack_size(
            config
                .thread_stack_size
                .unwrap_or(DEFAULT_THREAD_STACK_SIZE),
        )
        .enable_all()
        .build()
        .expect("must be able to create runtime");

    if let Err(e) = runtime.block_on(bootstrap::bootstrap(params, config, secrets)) {
        panic!("adapter node crashed: {e:?}");
    }

    info!("adapter node shutdown complete");
}

/// Reads and parses a TOML file from the given path into the given type `T`.
///
/// # Panics
///
/// 1. If the file is not readable.
/// 2. If the contents of the file cannot be deserialized into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> T
where
    T: std::fmt::Debug + DeserializeOwned,
{
    let path = path.as_ref();
    fs::read_to_string(path)
        .map(|p| {
            trace!(?p, "read file");

            let parsed = toml::from_str::<T>(&p).unwrap_or_else(|e| {
                panic!("failed to parse TOML file {}: {e:?}", path.display());
            });
            debug!(?parsed, "parsed TOML file");

            parsed
        })
        .unwrap_or_else(|e| {
            panic!("failed to read TOML file {}: {e}", path.display());
        })
}

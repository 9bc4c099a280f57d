//! Wires the ledger client, signer and oracle together and serves them over RPC.

use std::sync::Arc;

use anyhow::Context;
use linkedbtc_ledger_client::BlockCypherClient;
use linkedbtc_oracle::{Oracle, OracleConfig, SignerKey};
use tracing::{info, warn};

use crate::{
    config::Config,
    params::Params,
    rpc_server::{start_rpc, AdapterRpc},
};

/// Secrets read from the environment, never from the config files.
pub(crate) struct Secrets {
    pub(crate) ledger_token: Option<String>,
    pub(crate) signer_key: Option<String>,
}

pub(crate) async fn bootstrap(
    params: Params,
    config: Config,
    secrets: Secrets,
) -> anyhow::Result<()> {
    let ledger = BlockCypherClient::new(&config.ledger, secrets.ledger_token)
        .context("build ledger client")?;

    let signer = load_signer(secrets.signer_key.as_deref(), &params)?;

    let oracle_config = OracleConfig {
        deposit_account: config.deposit_account,
        required_confirmations: config.required_confirmations,
        quorum: params.quorum,
    };
    info!(
        deposit_account = %oracle_config.deposit_account,
        required_confirmations = oracle_config.required_confirmations,
        quorum = %oracle_config.quorum.script_type(),
        "oracle configured"
    );

    let oracle = Oracle::new(Arc::new(ledger), Arc::new(oracle_config), signer);
    let rpc = AdapterRpc::new(oracle);

    start_rpc(&rpc, config.rpc_addr.as_str()).await
}

/// Parses the signing key and checks it belongs to the quorum.
fn load_signer(
    signer_key: Option<&str>,
    params: &Params,
) -> anyhow::Result<Option<Arc<SignerKey>>> {
    let Some(signer_key) = signer_key.filter(|k| !k.trim().is_empty()) else {
        warn!("no signing key configured, payouts will be refused");
        return Ok(None);
    };

    let signer = signer_key
        .parse::<SignerKey>()
        .context("parse signing key")?;
    signer
        .ensure_in_quorum(&params.quorum)
        .context("check signing key against quorum")?;

    info!(pubkey = %signer.public_key(), "loaded signing key");
    Ok(Some(Arc::new(signer)))
}

//! Parses command-line arguments for the adapter CLI.

use std::{fmt, path::PathBuf};

use clap::{crate_version, Parser};

#[derive(Parser)]
#[clap(
    name = "linkedbtc-adapter",
    about = "Oracle adapter that backs the LinkedBTC bridge contract with bitcoin ledger data",
    version = crate_version!()
)]
pub(crate) struct Cli {
    #[clap(
        long,
        short = 'p',
        env = "LINKEDBTC_PARAMS",
        help = "The file containing the consensus-critical params shared by all signer nodes",
        default_value = "params.toml"
    )]
    pub params: PathBuf,

    #[clap(
        long,
        short = 'c',
        env = "LINKEDBTC_CONFIG",
        help = "The file containing the configuration for this node",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    #[clap(
        long,
        env = "LINKEDBTC_LEDGER_TOKEN",
        hide_env_values = true,
        help = "API token for the ledger service"
    )]
    pub ledger_token: Option<String>,

    #[clap(
        long,
        env = "LINKEDBTC_SIGNER_KEY",
        hide_env_values = true,
        help = "Hex-encoded secp256k1 secret key; without it the node only validates deposits"
    )]
    pub signer_key: Option<String>,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("params", &self.params)
            .field("config", &self.config)
            .field("ledger_token", &self.ledger_token.as_ref().map(|_| "<redacted>"))
            .field("signer_key", &self.signer_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_secrets() {
        let cli = Cli::try_parse_from([
            "linkedbtc-adapter",
            "-c",
            "node/config.toml",
            "--params",
            "node/params.toml",
            "--signer-key",
            "0101010101010101010101010101010101010101010101010101010101010101",
        ])
        .expect("valid args");

        assert_eq!(cli.config, PathBuf::from("node/config.toml"));
        assert_eq!(cli.params, PathBuf::from("node/params.toml"));
        assert!(cli.signer_key.is_some());

        let debug = format!("{cli:?}");
        assert!(!debug.contains("0101"), "secret leaked: {debug}");
    }
}

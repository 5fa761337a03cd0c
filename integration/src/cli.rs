//! Definition of the CLI arguments for integration tests

use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEVNET_HOSTPORT, DEFAULT_DEVNET_MNEMONIC};

/// CLI tool for running integration tests against a running Anvil devnet.
///
/// Every test deploys its own fixture from the compiled artifacts, nothing
/// needs to be deployed beforehand.
#[derive(Debug, Clone, Parser)]
pub(crate) struct Cli {
    /// The test to run, all tests are run if omitted
    #[arg(short, long)]
    pub(crate) test: Option<String>,

    /// Directory holding the compiled contract artifacts
    #[arg(short, long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub(crate) artifacts_dir: PathBuf,

    /// Mnemonic the devnet accounts are derived from
    #[arg(short, long, env = "MNEMONIC", default_value = DEFAULT_DEVNET_MNEMONIC)]
    pub(crate) mnemonic: String,

    /// Devnet RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_DEVNET_HOSTPORT)]
    pub(crate) rpc_url: String,
}

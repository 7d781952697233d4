//! Definitions of CLI arguments and commands for deploy scripts

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, verify},
    constants::{
        DEFAULT_ADDRESSES_DIR, DEFAULT_ARTIFACTS_DIR, DEFAULT_NETWORKS_PATH,
        ETHERSCAN_API_KEY_ENV_VAR,
    },
    errors::ScriptError,
    types::DiamondModule,
};

/// Deploy, cut, and verify the diamond
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: String,

    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Path to the network configuration file
    #[arg(long, default_value = DEFAULT_NETWORKS_PATH)]
    pub networks: PathBuf,

    /// Directory the deployed addresses are recorded in
    #[arg(long, default_value = DEFAULT_ADDRESSES_DIR)]
    pub addresses_dir: PathBuf,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy and cut a new diamond
    DeployDiamond(DeployDiamondArgs),
    /// Verify a deployed module's source
    Verify(VerifyArgs),
}

impl Command {
    /// Run the selected script
    pub async fn run(
        self,
        priv_key: &str,
        rpc_url: &str,
        artifacts: &Path,
        networks: &Path,
        addresses_dir: &Path,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployDiamond(args) => {
                deploy(args, priv_key, rpc_url, artifacts, networks, addresses_dir).await
            }
            Command::Verify(args) => verify(args, artifacts),
        }
    }
}

/// Deploy the diamond proxy and its facets, then cut and initialize it
/// in a single transaction.
///
/// Every deployed address is appended to `<addresses-dir>/<network>_<timestamp>.txt`
/// unless `--test` is set.
#[derive(Args)]
pub struct DeployDiamondArgs {
    /// Initialize the diamond with test parameters and skip the address ledger
    #[arg(short, long)]
    pub test: bool,

    /// Submit every deployed module for source verification after the cut
    #[arg(long)]
    pub verify: bool,

    /// Block explorer API key used for verification
    #[arg(long, env = ETHERSCAN_API_KEY_ENV_VAR)]
    pub etherscan_api_key: Option<String>,
}

/// Verify the source of a deployed module on a block explorer
#[derive(Args)]
pub struct VerifyArgs {
    /// The module deployed at the address
    #[arg(short, long)]
    pub module: DiamondModule,

    /// Address of the deployed module in hex
    #[arg(short, long)]
    pub address: Address,

    /// The chain the module is deployed on
    #[arg(short, long)]
    pub chain_id: u64,

    /// ABI-encoded constructor arguments in hex, if the module takes any
    #[arg(long)]
    pub constructor_args: Option<String>,

    /// Block explorer API key
    #[arg(long, env = ETHERSCAN_API_KEY_ENV_VAR)]
    pub etherscan_api_key: Option<String>,
}

//! Entry point of the diamond deploy scripts

use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        artifacts,
        networks,
        addresses_dir,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .pretty()
        .init();

    command
        .run(&priv_key, &rpc_url, &artifacts, &networks, &addresses_dir)
        .await
}

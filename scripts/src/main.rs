use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        rpc_url,
        signer,
        contracts_file,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .pretty()
        .init();

    command.run(&rpc_url, &signer, &contracts_file).await
}

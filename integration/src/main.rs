//! Integration tests for the DEX contracts. These assume that an Anvil devnet
//! is already running locally and that the contracts have been compiled.

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use eyre::{bail, Result};
use test_inventory::{IntegrationTest, TestArgs};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod constants;
mod test_inventory;
mod tests;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = TestArgs::new(&cli).await?;
    info!(
        "actors: wallet={:#x} feeTo={:#x} lisa={:#x} lily={:#x} tim={:#x}",
        args.wallet.address,
        args.fee_to.address,
        args.lisa.address,
        args.lily.address,
        args.tim.address
    );

    let mut passed = 0;
    let mut failed = Vec::new();
    for test in inventory::iter::<IntegrationTest> {
        if cli.test.as_deref().is_some_and(|name| name != test.name) {
            continue;
        }

        match (test.test_fn)(args.clone()).await {
            Ok(()) => {
                println!("{} {}", "PASSED".green().bold(), test.name);
                passed += 1;
            }
            Err(e) => {
                println!("{} {}: {e:?}", "FAILED".red().bold(), test.name);
                failed.push(test.name);
            }
        }
    }

    if passed + failed.len() == 0 {
        bail!("no test matches {:?}", cli.test);
    }

    println!(
        "\n{} passed, {} failed",
        passed.to_string().green(),
        failed.len().to_string().red()
    );
    if !failed.is_empty() {
        bail!("failed tests: {}", failed.join(", "));
    }

    Ok(())
}

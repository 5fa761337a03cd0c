//! Defines types and utilities for managing the inventory of integration tests

use std::{future::Future, path::PathBuf, pin::Pin};

use alloy::{
    primitives::{utils::parse_ether, Address},
    providers::{ext::AnvilApi, DynProvider},
};
use eyre::Result;
use scripts::utils::{setup_client, signer_from_mnemonic};

use crate::{cli::Cli, constants::ACTOR_ETH_BALANCE};

/// A devnet account taking part in the tests
#[derive(Clone)]
pub struct Actor {
    /// The name the actor is reported under
    pub name: &'static str,
    /// The actor's address
    pub address: Address,
    /// A client signing with the actor's key
    pub client: DynProvider,
}

impl Actor {
    /// Derive the actor at `index` from the mnemonic and fund it with ETH
    async fn new(name: &'static str, index: u32, cli: &Cli) -> Result<Self> {
        let signer = signer_from_mnemonic(&cli.mnemonic, index)?;
        let address = signer.address();
        let client = setup_client(&cli.rpc_url, signer).await?;

        client
            .anvil_set_balance(address, parse_ether(ACTOR_ETH_BALANCE)?)
            .await?;

        Ok(Self {
            name,
            address,
            client,
        })
    }
}

/// The arguments provided to each integration test
#[derive(Clone)]
pub struct TestArgs {
    /// Directory holding the compiled contract artifacts
    pub artifacts_dir: PathBuf,
    /// Deploys the fixture and receives the minted test tokens
    pub wallet: Actor,
    /// Receives the protocol fee
    pub fee_to: Actor,
    /// The first, small liquidity provider
    pub lisa: Actor,
    /// The second, large liquidity provider
    pub lily: Actor,
    /// The trader
    pub tim: Actor,
}

impl TestArgs {
    /// Derive and fund the actors, in mnemonic order
    pub async fn new(cli: &Cli) -> Result<Self> {
        Ok(Self {
            artifacts_dir: cli.artifacts_dir.clone(),
            wallet: Actor::new("wallet", 0, cli).await?,
            fee_to: Actor::new("feeTo", 1, cli).await?,
            lisa: Actor::new("lisa", 2, cli).await?,
            lily: Actor::new("lily", 3, cli).await?,
            tim: Actor::new("tim", 4, cli).await?,
        })
    }
}

/// The signature of an integration test
type TestFn = fn(TestArgs) -> Pin<Box<dyn Future<Output = Result<()>>>>;

/// A struct representing an integration test
pub struct IntegrationTest {
    /// The name of the test
    pub name: &'static str,
    /// The test function
    pub test_fn: TestFn,
}

// Collect the integration tests into an iterable
inventory::collect!(IntegrationTest);

/// Macro to register an integration test
#[macro_export]
macro_rules! integration_test {
    ($test_fn:ident) => {
        inventory::submit!($crate::test_inventory::IntegrationTest {
            name: stringify!($test_fn),
            test_fn: move |args| std::boxed::Box::pin($test_fn(args)),
        });
    };
}

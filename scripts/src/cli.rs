//! Definitions of CLI arguments and commands for deploy scripts

use std::path::{Path, PathBuf};

use alloy::{primitives::Address, providers::DynProvider, signers::local::PrivateKeySigner};
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{create_pair, deploy, set_light_reward_params, transfer_owner, verify},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACTS_FILE, DEFAULT_RPC_URL, DEFAULT_SOURCES_DIR,
        INTER_CONTRACT_DELAY_SECS, NUM_DEPLOY_CONFIRMATIONS, VERIFY_STATUS_DELAY_SECS,
    },
    errors::ScriptError,
    utils::{setup_client, signer_from_key, signer_from_mnemonic},
};

/// Deploy, administer and verify the DEX contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// The key the transactions are signed with
    #[command(flatten)]
    pub signer: SignerArgs,

    /// Path to the file recording the deployed contracts
    #[arg(short, long, env = "CONTRACTS_FILE", default_value = DEFAULT_CONTRACTS_FILE)]
    pub contracts_file: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where the signing key comes from
///
/// A private key takes precedence over a mnemonic. Only commands that send
/// transactions need either.
#[derive(Args, Clone, Default)]
pub struct SignerArgs {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// BIP-39 mnemonic of the deployer, the first derived account is used
    #[arg(short, long, env = "MNEMONIC")]
    pub mnemonic: Option<String>,
}

impl SignerArgs {
    /// Build the configured signer
    pub fn signer(&self) -> Result<PrivateKeySigner, ScriptError> {
        match (&self.priv_key, &self.mnemonic) {
            (Some(key), _) => signer_from_key(key),
            (None, Some(phrase)) => signer_from_mnemonic(phrase, 0),
            (None, None) => Err(ScriptError::Config(
                "either a private key (PKEY) or a mnemonic (MNEMONIC) is required".to_string(),
            )),
        }
    }

    /// Build the configured signer and a client signing with it, returning
    /// the client and the signer's address
    pub async fn connect(&self, rpc_url: &str) -> Result<(DynProvider, Address), ScriptError> {
        let signer = self.signer()?;
        let sender = signer.address();
        let client = setup_client(rpc_url, signer).await?;
        Ok((client, sender))
    }
}

/// The available scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the approved token manager, factory and router
    Deploy(DeployArgs),
    /// Set the light reward parameters on the factory
    SetLightRewardParams(SetLightRewardParamsArgs),
    /// Hand factory and token manager ownership to a new address
    TransferOwner(TransferOwnerArgs),
    /// Approve two tokens and seed their pair with liquidity
    CreatePair(CreatePairArgs),
    /// Submit every deployed contract to the block explorer for verification
    Verify(VerifyArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        rpc_url: &str,
        signer: &SignerArgs,
        contracts_file: &Path,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                let (client, sender) = signer.connect(rpc_url).await?;
                deploy(args, client, sender, contracts_file).await
            }
            Command::SetLightRewardParams(args) => {
                let (client, _) = signer.connect(rpc_url).await?;
                set_light_reward_params(args, client).await
            }
            Command::TransferOwner(args) => {
                let (client, _) = signer.connect(rpc_url).await?;
                transfer_owner(args, client).await
            }
            Command::CreatePair(args) => {
                let (client, sender) = signer.connect(rpc_url).await?;
                create_pair(args, client, sender).await
            }
            Command::Verify(args) => verify(args, contracts_file).await,
        }
    }
}

/// Deploy the full set of DEX contracts
///
/// The approved token manager is deployed first and allowlists every
/// configured token, then the factory is deployed and wired to it, and
/// finally the router is deployed against the factory and WETH.
#[derive(Args)]
pub struct DeployArgs {
    /// The tokens to allowlist
    #[command(flatten)]
    pub tokens: TokenArgs,

    /// Directory holding the compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Directory holding the flattened contract sources, recorded for verification
    #[arg(long, env = "SOURCES_DIR", default_value = DEFAULT_SOURCES_DIR)]
    pub sources_dir: PathBuf,

    /// Confirmations to wait for on each deployment
    #[arg(long, default_value_t = NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,
}

/// The token addresses allowlisted at deployment
#[derive(Args, Clone, Default)]
pub struct TokenArgs {
    /// WETH address, also the router's wrapped native token
    #[arg(long, env = "WETH_TOKEN")]
    pub weth_token: Option<Address>,
    /// HOPE address
    #[arg(long, env = "HOPE_TOKEN")]
    pub hope_token: Option<Address>,
    /// USDT address
    #[arg(long, env = "USDT_TOKEN")]
    pub usdt_token: Option<Address>,
    /// USDC address
    #[arg(long, env = "USDC_TOKEN")]
    pub usdc_token: Option<Address>,
    /// DAI address
    #[arg(long, env = "DAI_TOKEN")]
    pub dai_token: Option<Address>,
    /// LT address
    #[arg(long, env = "LT_TOKEN")]
    pub lt_token: Option<Address>,
    /// veLT address
    #[arg(long, env = "VELT_TOKEN")]
    pub velt_token: Option<Address>,
}

impl TokenArgs {
    /// The tokens in allowlisting order, paired with their symbols
    pub fn listed(&self) -> [(&'static str, Option<Address>); 7] {
        [
            ("WETH", self.weth_token),
            ("HOPE", self.hope_token),
            ("USDT", self.usdt_token),
            ("USDC", self.usdc_token),
            ("DAI", self.dai_token),
            ("LT", self.lt_token),
            ("VELT", self.velt_token),
        ]
    }
}

/// Configure the light reward parameters on an existing factory
#[derive(Args)]
pub struct SetLightRewardParamsArgs {
    /// Address of the factory
    #[arg(long, env = "FACTORY_ADDRESS")]
    pub factory: Address,
    /// Address of the staked HOPE contract
    #[arg(long)]
    pub st_hope: Address,
    /// Address of the LT minter
    #[arg(long)]
    pub minter: Address,
    /// Address of the LT token
    #[arg(long, env = "LT_TOKEN")]
    pub lt_token: Address,
}

/// Transfer ownership of the factory and approved token manager
#[derive(Args)]
pub struct TransferOwnerArgs {
    /// The new owner
    #[arg(long)]
    pub new_owner: Address,
    /// Address of the factory
    #[arg(long, env = "FACTORY_ADDRESS")]
    pub factory: Address,
    /// Address of the approved token manager
    #[arg(long, env = "APPROVED_TOKEN_MANAGER_ADDRESS")]
    pub approved_token_manager: Address,
}

/// Add the initial liquidity to a pair through the router, creating the
/// pair if it does not exist yet
#[derive(Args)]
pub struct CreatePairArgs {
    /// Address of the router
    #[arg(long, env = "ROUTER_ADDRESS")]
    pub router: Address,
    /// The first token of the pair
    #[arg(long)]
    pub token0: Address,
    /// The second token of the pair
    #[arg(long)]
    pub token1: Address,
    /// Amount of the first token, in whole tokens (e.g. `1.5`)
    #[arg(long)]
    pub amount0: String,
    /// Amount of the second token, in whole tokens
    #[arg(long)]
    pub amount1: String,
}

/// Verify the deployed contracts on a block explorer
#[derive(Args)]
pub struct VerifyArgs {
    /// The explorer API endpoint
    #[arg(long, env = "ETHERSCAN_URL")]
    pub etherscan_url: String,
    /// The explorer API key
    #[arg(long, env = "ETHERSCAN_APIKEY")]
    pub etherscan_api_key: String,
    /// Seconds to wait before polling a submission's status
    #[arg(long, default_value_t = VERIFY_STATUS_DELAY_SECS)]
    pub status_delay: u64,
    /// Seconds to wait between contracts
    #[arg(long, default_value_t = INTER_CONTRACT_DELAY_SECS)]
    pub interval: u64,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_key_takes_precedence_over_mnemonic() {
        let args = SignerArgs {
            priv_key: Some(
                "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d".to_string(),
            ),
            mnemonic: Some(
                "test test test test test test test test test test test junk".to_string(),
            ),
        };

        // the second default dev account, not the mnemonic's first
        assert_eq!(
            args.signer().unwrap().address(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_missing_signer() {
        let res = SignerArgs::default().signer();
        assert!(matches!(res, Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_parse_deploy_with_tokens() {
        let cli = Cli::try_parse_from([
            "scripts",
            "--priv-key",
            "0x01",
            "deploy",
            "--weth-token",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "--dai-token",
            "0x6b175474e89094c44da98b954eedeac495271d0f",
        ])
        .unwrap();

        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy command");
        };
        let listed = args.tokens.listed();
        let symbols: Vec<&str> = listed.iter().map(|(s, _)| *s).collect();
        assert_eq!(symbols, ["WETH", "HOPE", "USDT", "USDC", "DAI", "LT", "VELT"]);
        assert!(listed[0].1.is_some());
        assert!(listed[1].1.is_none());
        assert!(listed[4].1.is_some());
        assert_eq!(args.artifacts_dir, PathBuf::from(DEFAULT_ARTIFACTS_DIR));
    }

    #[tokio::test]
    async fn test_verify_runs_without_signer() {
        let cli = Cli::try_parse_from([
            "scripts",
            "--contracts-file",
            "/nonexistent/contract.json",
            "verify",
            "--etherscan-url",
            "http://127.0.0.1:1/api",
            "--etherscan-api-key",
            "KEY",
        ])
        .unwrap();

        // Fails on the missing contracts file, not on the missing signer
        let res = cli
            .command
            .run(&cli.rpc_url, &SignerArgs::default(), &cli.contracts_file)
            .await;
        assert!(matches!(res, Err(ScriptError::ReadContracts(_))));
    }

    #[tokio::test]
    async fn test_on_chain_command_requires_signer() {
        let cli = Cli::try_parse_from([
            "scripts",
            "deploy",
            "--weth-token",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        ])
        .unwrap();

        let res = cli
            .command
            .run(&cli.rpc_url, &SignerArgs::default(), &cli.contracts_file)
            .await;
        assert!(matches!(res, Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_parse_rejects_bad_address() {
        let res = Cli::try_parse_from([
            "scripts",
            "transfer-owner",
            "--new-owner",
            "0x1234",
            "--factory",
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f",
            "--approved-token-manager",
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f",
        ]);
        assert!(res.is_err());
    }
}

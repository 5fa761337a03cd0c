//! Constants used in the integration tests

/// The default hostport that the Anvil devnet runs on
pub(crate) const DEFAULT_DEVNET_HOSTPORT: &str = "http://127.0.0.1:8545";

/// The mnemonic the devnet accounts are derived from
pub(crate) const DEFAULT_DEVNET_MNEMONIC: &str =
    "horn horn horn horn horn horn horn horn horn horn horn horn";

/// The default directory holding the compiled contract artifacts
pub(crate) const DEFAULT_ARTIFACTS_DIR: &str = "build";

/// The artifact name of the mintable test token, `ERC20(uint256 _totalSupply)`
pub(crate) const TEST_ERC20_CONTRACT: &str = "ERC20";

/// The supply, in whole tokens, minted to the deployer for each test token
pub(crate) const TEST_TOKEN_SUPPLY: u64 = 10_000;

/// The ETH balance, in whole ether, each actor is funded with
pub(crate) const ACTOR_ETH_BALANCE: &str = "100";

/// The gas limit sent with router calls
pub(crate) const ROUTER_GAS_LIMIT: u64 = 9_999_999;

/// Scales every amount transferred in the walkthrough
pub(crate) const WALKTHROUGH_SCALE: u64 = 10;

/// The number of swap-in / swap-out rounds tim trades
pub(crate) const SWAP_ROUNDS: usize = 1;

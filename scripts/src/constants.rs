//! Constants used in the deploy scripts

/// The default JSON-RPC endpoint, a local Anvil / Hardhat node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default path of the file recording deployed contracts
pub const DEFAULT_CONTRACTS_FILE: &str = "contract.json";

/// The default directory holding the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "build";

/// The default directory holding the flattened Solidity sources
pub const DEFAULT_SOURCES_DIR: &str = "contracts";

/// The extension of a compiled artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The extension of a Solidity source file
pub const SOURCE_EXTENSION: &str = "sol";

/// The number of confirmations to wait for on each deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The number of decimals of ETH and of every token handled by the scripts
pub const TOKEN_DECIMALS: u8 = 18;

/// The gas limit used when adding liquidity, which may also create the pair
pub const ADD_LIQUIDITY_GAS_LIMIT: u64 = 9_999_999;

// -------------
// | Contracts |
// -------------

/// The name of the approved token manager contract, in artifacts and in the
/// contracts file
pub const APPROVED_TOKEN_MANAGER_CONTRACT: &str = "ApprovedTokenManager";

/// The name of the factory contract
pub const FACTORY_CONTRACT: &str = "UniswapV2Factory";

/// The name of the router contract
pub const ROUTER_CONTRACT: &str = "UniswapV2Router02";

// ----------------
// | Verification |
// ----------------

/// Seconds to wait between submitting a verification and polling its status
pub const VERIFY_STATUS_DELAY_SECS: u64 = 10;

/// Seconds to wait between verifying two contracts
pub const INTER_CONTRACT_DELAY_SECS: u64 = 1;

/// The timeout applied to each request made to the block explorer
pub const EXPLORER_REQUEST_TIMEOUT_SECS: u64 = 30;

/// The explorer API module for contract actions
pub const EXPLORER_MODULE: &str = "contract";

/// The explorer action submitting source code for verification
pub const VERIFY_SOURCE_ACTION: &str = "verifysourcecode";

/// The explorer action querying the status of a verification job
pub const CHECK_STATUS_ACTION: &str = "checkverifystatus";

/// The code format of a flattened, single-file Solidity source
pub const SINGLE_FILE_CODE_FORMAT: &str = "solidity-single-file";

/// The explorer's license type code for GPL-3.0
pub const GPL3_LICENSE_TYPE: &str = "5";

/// The optimizer run count assumed when the metadata does not carry one
pub const DEFAULT_OPTIMIZER_RUNS: u64 = 200;

//! Utilities for the deploy scripts.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{
    errors::ScriptError,
    types::{Artifact, ContractMap},
};

/// The call builder type used by the scripts
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a DynProvider, C, Ethereum>;

/// One thousandth of a whole 18-decimal token
const MILLI_TOKEN: u64 = 1_000_000_000_000_000;

// ----------
// | Client |
// ----------

/// Sets up a signing client for the given RPC url, checking that the node is reachable
pub async fn setup_client(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<DynProvider, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!("connected to {rpc_url} (chain id {chain_id})");

    Ok(DynProvider::new(provider))
}

/// Build a signer from a hex-encoded private key
pub fn signer_from_key(priv_key: &str) -> Result<PrivateKeySigner, ScriptError> {
    PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Derive the signer at `index` along the default Ethereum path of a BIP-39 mnemonic
pub fn signer_from_mnemonic(phrase: &str, index: u32) -> Result<PrivateKeySigner, ScriptError> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .index(index)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .build()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

// ----------------
// | Transactions |
// ----------------

/// Deploy a contract from its artifact, returning the deployed address
///
/// `constructor_args` must already be ABI encoded; they are appended to the
/// creation bytecode.
pub async fn deploy_contract(
    client: &DynProvider,
    artifact: &Artifact,
    constructor_args: &[u8],
    confirmations: u64,
) -> Result<Address, ScriptError> {
    let mut init_code = artifact.bytecode.to_vec();
    init_code.extend_from_slice(constructor_args);
    let tx = TransactionRequest::default().with_deploy_code(init_code);

    let receipt = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment of {} reverted in tx {:#x}",
            artifact.name, receipt.transaction_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!("no contract address in receipt for {}", artifact.name))
    })
}

/// Send a transaction and wait for it to be mined successfully
pub async fn send_tx<C: CallDecoder>(
    tx: ScriptCallBuilder<'_, C>,
) -> Result<TransactionReceipt, ScriptError> {
    let receipt = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "tx {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(receipt)
}

// ------------------
// | Contracts File |
// ------------------

/// Read the full contracts file
pub fn read_contract_map(path: &Path) -> Result<ContractMap, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ReadContracts(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadContracts(format!("{}: {}", path.display(), e)))
}

/// Write the contracts file, replacing any previous deployment run
pub fn write_contract_map(path: &Path, contracts: &ContractMap) -> Result<(), ScriptError> {
    let contents = serde_json::to_string_pretty(contracts)
        .map_err(|e| ScriptError::WriteContracts(e.to_string()))?;

    fs::write(path, contents)
        .map_err(|e| ScriptError::WriteContracts(format!("{}: {}", path.display(), e)))
}

// --------------
// | Formatting |
// --------------

/// Format an 18-decimal amount with three decimals, truncating the rest
pub fn format_amount(amount: U256) -> String {
    format_milli(amount / U256::from(MILLI_TOKEN))
}

/// Format an 18-decimal amount with three decimals, rounding half up
pub fn format_amount_rounded(amount: U256) -> String {
    let half = U256::from(MILLI_TOKEN / 2);
    format_milli(amount.saturating_add(half) / U256::from(MILLI_TOKEN))
}

/// Format a count of thousandths as a decimal string
fn format_milli(milli: U256) -> String {
    let thousand = U256::from(1000u64);
    let frac = (milli % thousand).to::<u64>();
    format!("{}.{:03}", milli / thousand, frac)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy::primitives::{address, utils::parse_ether, Bytes};

    use crate::types::ContractInstance;

    use super::*;

    /// The first default Anvil / Hardhat account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    /// The mnemonic the first default account derives from
    const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

    /// A path in the system temp dir unique to this test process
    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_key_and_mnemonic_signers_agree() {
        let expected = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        assert_eq!(signer_from_key(DEV_KEY).unwrap().address(), expected);
        assert_eq!(
            signer_from_mnemonic(DEV_MNEMONIC, 0).unwrap().address(),
            expected
        );
        assert_ne!(
            signer_from_mnemonic(DEV_MNEMONIC, 1).unwrap().address(),
            expected
        );
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(
            signer_from_key("0x1234"),
            Err(ScriptError::ClientInitialization(_))
        ));
    }

    #[test]
    fn test_contract_map_round_trip() {
        let path = temp_path("contract-map-round-trip");
        let artifact = Artifact {
            name: "UniswapV2Router02".to_string(),
            bytecode: Bytes::from_static(&[0x60, 0x80]),
            metadata: r#"{"compiler":{"version":"0.6.6+commit.6c089d02"}}"#.to_string(),
        };

        let mut contracts = ContractMap::new();
        contracts.insert(
            artifact.name.clone(),
            ContractInstance::new(
                address!("0x7a250d5630b4cf539739df2c5dacb4c659f2488d"),
                Path::new("contracts"),
                &artifact,
                &[0x01; 64],
            ),
        );

        write_contract_map(&path, &contracts).unwrap();
        let read = read_contract_map(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read, contracts);
    }

    #[test]
    fn test_write_contract_map_overwrites() {
        let path = temp_path("contract-map-overwrite");
        fs::write(&path, r#"{"Stale": 1}"#).unwrap();

        write_contract_map(&path, &ContractMap::new()).unwrap();
        let read = read_contract_map(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(read.is_empty());
    }

    #[test]
    fn test_read_missing_contract_map() {
        let res = read_contract_map(Path::new("/nonexistent/contract.json"));
        assert!(matches!(res, Err(ScriptError::ReadContracts(_))));
    }

    #[test]
    fn test_format_amount_truncates() {
        assert_eq!(format_amount(parse_ether("1.23456").unwrap()), "1.234");
        assert_eq!(format_amount(U256::ZERO), "0.000");
        assert_eq!(format_amount(parse_ether("10000").unwrap()), "10000.000");
    }

    #[test]
    fn test_format_amount_rounded() {
        assert_eq!(format_amount_rounded(parse_ether("1.2345").unwrap()), "1.235");
        assert_eq!(format_amount_rounded(parse_ether("1.2344").unwrap()), "1.234");
        // dust left in the pair after all liquidity is removed
        assert_eq!(format_amount_rounded(U256::from(1694u64)), "0.000");
    }
}

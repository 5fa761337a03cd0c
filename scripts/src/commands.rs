//! Implementations of the various deploy scripts

use std::{path::Path, time::Duration};

use alloy::{
    primitives::{utils::parse_ether, Address, U256},
    providers::{DynProvider, Provider},
    rpc::types::TransactionReceipt,
};
use dex_abi::{
    constructor::{factory_args, router_args},
    IApprovedTokenManager, IUniswapV2Factory, IUniswapV2Router02, IERC20,
};
use tracing::{info, warn};

use crate::{
    cli::{CreatePairArgs, DeployArgs, SetLightRewardParamsArgs, TransferOwnerArgs, VerifyArgs},
    constants::{
        ADD_LIQUIDITY_GAS_LIMIT, APPROVED_TOKEN_MANAGER_CONTRACT, FACTORY_CONTRACT,
        ROUTER_CONTRACT,
    },
    errors::ScriptError,
    types::{Artifact, ContractInstance, ContractMap},
    utils::{deploy_contract, format_amount, send_tx, write_contract_map},
    verify::{verify_all, ExplorerClient},
};

/// Deploy the approved token manager, factory and router, recording them in
/// the contracts file
pub async fn deploy(
    args: DeployArgs,
    client: DynProvider,
    deployer: Address,
    contracts_file: &Path,
) -> Result<(), ScriptError> {
    // The router cannot be deployed without WETH, fail before spending gas
    let weth = args.tokens.weth_token.ok_or_else(|| {
        ScriptError::Config("a WETH token address is required to deploy the router".to_string())
    })?;

    let atm_artifact = Artifact::load(&args.artifacts_dir, APPROVED_TOKEN_MANAGER_CONTRACT)?;
    let factory_artifact = Artifact::load(&args.artifacts_dir, FACTORY_CONTRACT)?;
    let router_artifact = Artifact::load(&args.artifacts_dir, ROUTER_CONTRACT)?;

    let balance = client
        .get_balance(deployer)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("address: {deployer:#x}");
    info!("ETH: {}", format_amount(balance));

    let mut contracts = ContractMap::new();

    // --- Approved Token Manager --- //

    let atm_address = deploy_contract(&client, &atm_artifact, &[], args.confirmations).await?;
    info!("approvedTokenManager: {atm_address:#x}");
    contracts.insert(
        atm_artifact.name.clone(),
        ContractInstance::new(atm_address, &args.sources_dir, &atm_artifact, &[]),
    );

    let atm = IApprovedTokenManager::new(atm_address, client.clone());
    for (symbol, token) in args.tokens.listed() {
        let Some(token) = token else {
            warn!("no {symbol} address configured, skipping approval");
            continue;
        };

        let receipt = send_tx(atm.approveToken(token, true)).await?;
        log_approve_token_events(&receipt);

        let approved = atm
            .isApprovedToken(token)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        info!("approvedTokenManager approved {symbol}: {approved}");
    }

    // --- Factory --- //

    let factory_ctor = factory_args(deployer);
    let factory_address =
        deploy_contract(&client, &factory_artifact, &factory_ctor, args.confirmations).await?;
    info!("uniswapV2Factory: {factory_address:#x}");
    contracts.insert(
        factory_artifact.name.clone(),
        ContractInstance::new(
            factory_address,
            &args.sources_dir,
            &factory_artifact,
            &factory_ctor,
        ),
    );

    let factory = IUniswapV2Factory::new(factory_address, client.clone());
    send_tx(factory.setFeeTo(deployer)).await?;
    let fee_to = factory
        .feeTo()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("setFeeTo: {fee_to:#x}");

    send_tx(factory.setApprovedTokenManager(atm_address)).await?;
    let manager = factory
        .approvedTokenManager()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("setApprovedTokenManager: {manager:#x}");

    // --- Router --- //

    let router_ctor = router_args(factory_address, weth);
    let router_address =
        deploy_contract(&client, &router_artifact, &router_ctor, args.confirmations).await?;
    info!("uniswapV2Router: {router_address:#x}");
    contracts.insert(
        router_artifact.name.clone(),
        ContractInstance::new(
            router_address,
            &args.sources_dir,
            &router_artifact,
            &router_ctor,
        ),
    );

    write_contract_map(contracts_file, &contracts)?;
    info!("wrote {} contracts to {}", contracts.len(), contracts_file.display());

    Ok(())
}

/// Log every `ApproveToken` event emitted in the receipt
fn log_approve_token_events(receipt: &TransactionReceipt) {
    for log in receipt.inner.logs() {
        if let Ok(event) = log.log_decode::<IApprovedTokenManager::ApproveToken>() {
            let IApprovedTokenManager::ApproveToken { token, approved } = event.inner.data;
            info!("received event: ApproveToken({token:#x}, {approved})");
        }
    }
}

/// Set the light reward parameters on the factory
pub async fn set_light_reward_params(
    args: SetLightRewardParamsArgs,
    client: DynProvider,
) -> Result<(), ScriptError> {
    let factory = IUniswapV2Factory::new(args.factory, client);

    send_tx(factory.setLightRewardParams(args.st_hope, args.minter, args.lt_token)).await?;
    info!(
        "set light reward params: stHope={:#x}, minter={:#x}, ltToken={:#x}",
        args.st_hope, args.minter, args.lt_token
    );

    Ok(())
}

/// Hand the factory's fee setter role and the token manager's ownership to a
/// new owner
pub async fn transfer_owner(
    args: TransferOwnerArgs,
    client: DynProvider,
) -> Result<(), ScriptError> {
    let factory = IUniswapV2Factory::new(args.factory, client.clone());
    send_tx(factory.setFeeToSetter(args.new_owner)).await?;
    info!("factory feeToSetter transferred to {:#x}", args.new_owner);

    let atm = IApprovedTokenManager::new(args.approved_token_manager, client);
    send_tx(atm.transferOwnership(args.new_owner)).await?;
    info!(
        "approvedTokenManager ownership transferred to {:#x}",
        args.new_owner
    );

    Ok(())
}

/// Approve the router for both amounts and add them as liquidity
pub async fn create_pair(
    args: CreatePairArgs,
    client: DynProvider,
    sender: Address,
) -> Result<(), ScriptError> {
    let amount0 = parse_ether(&args.amount0)
        .map_err(|e| ScriptError::CalldataConstruction(format!("amount0: {e}")))?;
    let amount1 = parse_ether(&args.amount1)
        .map_err(|e| ScriptError::CalldataConstruction(format!("amount1: {e}")))?;

    let router = IUniswapV2Router02::new(args.router, client.clone());
    let token0 = IERC20::new(args.token0, client.clone());
    let token1 = IERC20::new(args.token1, client.clone());

    send_tx(token0.approve(args.router, amount0)).await?;
    send_tx(token1.approve(args.router, amount1)).await?;

    let receipt = send_tx(
        router
            .addLiquidity(
                args.token0,
                args.token1,
                amount0,
                amount1,
                U256::ZERO, // amountAMin
                U256::ZERO, // amountBMin
                sender,
                U256::MAX, // deadline
            )
            .gas(ADD_LIQUIDITY_GAS_LIMIT),
    )
    .await?;

    for log in receipt.inner.logs() {
        if let Ok(event) = log.log_decode::<IUniswapV2Factory::PairCreated>() {
            info!("received event: PairCreated({:#x})", event.inner.data.pair);
        }
    }

    let factory_address = router
        .factory()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let pair = IUniswapV2Factory::new(factory_address, client)
        .getPair(args.token0, args.token1)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!(
        "added {} / {} liquidity to pair {pair:#x}",
        format_amount(amount0),
        format_amount(amount1)
    );

    Ok(())
}

/// Verify every contract recorded in the contracts file
pub async fn verify(args: VerifyArgs, contracts_file: &Path) -> Result<(), ScriptError> {
    let client = ExplorerClient::new(&args.etherscan_url, &args.etherscan_api_key)?;

    verify_all(
        &client,
        contracts_file,
        Duration::from_secs(args.status_delay),
        Duration::from_secs(args.interval),
    )
    .await?;

    Ok(())
}

//! Utilities for sending and waiting on transactions

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::Ethereum,
    primitives::Address,
    providers::DynProvider,
    rpc::types::TransactionReceipt,
};
use eyre::Result;
use scripts::utils::send_tx;

use crate::{constants::ROUTER_GAS_LIMIT, util::events::log_pair_events};

/// The call builder type for the tests
pub type TestCallBuilder<'a, C> = CallBuilder<&'a DynProvider, C, Ethereum>;

/// Send a transaction, wait for it to succeed, and log the events the pair
/// emitted in it
pub async fn wait_for_tx_success<C: CallDecoder>(
    tx: TestCallBuilder<'_, C>,
    pair: Address,
) -> Result<TransactionReceipt> {
    let receipt = send_tx(tx).await?;
    log_pair_events(&receipt, pair);
    Ok(receipt)
}

/// Send a router transaction with the fixed router gas limit
pub async fn send_router_tx<C: CallDecoder>(
    tx: TestCallBuilder<'_, C>,
    pair: Address,
) -> Result<TransactionReceipt> {
    wait_for_tx_success(tx.gas(ROUTER_GAS_LIMIT), pair).await
}

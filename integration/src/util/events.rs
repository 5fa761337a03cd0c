//! Decoding and logging of the events emitted by the pair

use alloy::{
    primitives::{Address, U256},
    rpc::types::{Log, TransactionReceipt},
};
use dex_abi::IUniswapV2Pair::{Burn, Mint, Swap, Sync};
use scripts::utils::format_amount_rounded;
use tracing::info;

/// Log every pair event in the receipt, in emission order
pub fn log_pair_events(receipt: &TransactionReceipt, pair: Address) {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == pair)
        .filter_map(describe_pair_event)
        .for_each(|event| info!("received event: {event}"));
}

/// Render a `Sync`, `Mint`, `Burn` or `Swap` event, amounts to three decimals
///
/// Returns `None` for any other log.
pub fn describe_pair_event(log: &Log) -> Option<String> {
    if let Ok(event) = log.log_decode::<Sync>() {
        let Sync { reserve0, reserve1 } = event.inner.data;
        return Some(format!(
            "Sync({}, {})",
            format_amount_rounded(U256::from(reserve0)),
            format_amount_rounded(U256::from(reserve1)),
        ));
    }

    if let Ok(event) = log.log_decode::<Mint>() {
        let Mint {
            sender,
            amount0,
            amount1,
        } = event.inner.data;
        return Some(format!(
            "Mint({sender:#x}, {}, {})",
            format_amount_rounded(amount0),
            format_amount_rounded(amount1),
        ));
    }

    if let Ok(event) = log.log_decode::<Burn>() {
        let Burn {
            sender,
            amount0,
            amount1,
            to,
        } = event.inner.data;
        return Some(format!(
            "Burn({sender:#x}, {}, {}, {to:#x})",
            format_amount_rounded(amount0),
            format_amount_rounded(amount1),
        ));
    }

    if let Ok(event) = log.log_decode::<Swap>() {
        let Swap {
            sender,
            amount0In,
            amount1In,
            amount0Out,
            amount1Out,
            to,
        } = event.inner.data;
        return Some(format!(
            "Swap({sender:#x}, {}, {}, {}, {}, {to:#x})",
            format_amount_rounded(amount0In),
            format_amount_rounded(amount1In),
            format_amount_rounded(amount0Out),
            format_amount_rounded(amount1Out),
        ));
    }

    None
}

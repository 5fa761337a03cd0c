//! Test utilities

pub mod events;
pub mod fixture;
pub mod positions;
pub mod transactions;

use alloy::primitives::U256;
use scripts::constants::TOKEN_DECIMALS;

/// Scale a whole-token amount to the token's base units
pub fn expand_to_18_decimals(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(TOKEN_DECIMALS))
}

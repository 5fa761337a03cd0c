//! Solidity bindings for the DEX contracts driven by the deploy scripts and
//! the integration tests
//!
//! The contracts themselves are compiled elsewhere; only their external
//! interfaces are declared here.

pub mod approved_token_manager;
pub mod constructor;
pub mod erc20;
pub mod v2;

pub use approved_token_manager::IApprovedTokenManager;
pub use erc20::IERC20;
pub use v2::{IUniswapV2Factory, IUniswapV2Pair, IUniswapV2Router02};

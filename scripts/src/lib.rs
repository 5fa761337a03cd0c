//! Scripts for deploying, administering and verifying the DEX contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;
pub mod verify;

//! Definitions of errors that can occur during the execution of the contract management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading the contracts file
    ReadContracts(String),
    /// Error writing the contracts file
    WriteContracts(String),
    /// Error reading a contract's source file
    ReadSource(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client or its signer
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error talking to the block explorer's verification API
    Verification(String),
    /// Missing or invalid configuration
    Config(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadContracts(s) => write!(f, "error reading contracts file: {}", s),
            ScriptError::WriteContracts(s) => write!(f, "error writing contracts file: {}", s),
            ScriptError::ReadSource(s) => write!(f, "error reading source file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
            ScriptError::Config(s) => write!(f, "invalid configuration: {}", s),
        }
    }
}

impl Error for ScriptError {}

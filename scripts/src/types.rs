//! Type definitions used throughout the scripts

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{ARTIFACT_EXTENSION, DEFAULT_OPTIMIZER_RUNS, SOURCE_EXTENSION},
    errors::ScriptError,
};

/// The contents of the contracts file, keyed by the contract's logical name
pub type ContractMap = BTreeMap<String, ContractInstance>;

/// A single contract deployed during a deployment run, with everything the
/// block explorer needs to verify it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractInstance {
    /// The address the contract was deployed to
    pub address: Address,
    /// The path of the contract's flattened source file
    pub source_file: PathBuf,
    /// The solc metadata JSON emitted alongside the bytecode
    #[serde(rename = "MetaData")]
    pub metadata: String,
    /// The ABI-encoded constructor arguments, hex without a `0x` prefix
    ///
    /// The misspelling matches the block explorer's parameter name
    #[serde(rename = "ConstructorArguements")]
    pub constructor_arguments: String,
}

impl ContractInstance {
    /// Record a contract deployed from `artifact` with the given constructor args
    pub fn new(
        address: Address,
        sources_dir: &Path,
        artifact: &Artifact,
        constructor_args: &[u8],
    ) -> Self {
        Self {
            address,
            source_file: sources_dir
                .join(&artifact.name)
                .with_extension(SOURCE_EXTENSION),
            metadata: artifact.metadata.clone(),
            constructor_arguments: hex::encode(constructor_args),
        }
    }

    /// Parse the compiler settings out of the recorded metadata
    pub fn compiler_metadata(&self) -> Result<CompilerMetadata, ScriptError> {
        CompilerMetadata::parse(&self.metadata)
    }
}

// -------------
// | Artifacts |
// -------------

/// A compiled contract, as emitted by the Solidity build
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The contract name, also the artifact's file stem
    pub name: String,
    /// The creation bytecode
    pub bytecode: Bytes,
    /// The solc metadata JSON string, empty if the build did not emit one
    pub metadata: String,
}

impl Artifact {
    /// Load `<dir>/<name>.json`
    pub fn load(dir: &Path, name: &str) -> Result<Self, ScriptError> {
        let path = dir.join(name).with_extension(ARTIFACT_EXTENSION);
        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

        Self::from_json(name, &contents)
    }

    /// Parse an artifact from its JSON contents
    ///
    /// Accepts both the flat `bytecode` layout and the nested
    /// `bytecode.object` / `evm.bytecode.object` layouts. The metadata may be
    /// either a JSON string or an inline object.
    pub fn from_json(name: &str, contents: &str) -> Result<Self, ScriptError> {
        let json: Value = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;

        let bytecode_hex = json["bytecode"]
            .as_str()
            .or_else(|| json["bytecode"]["object"].as_str())
            .or_else(|| json["evm"]["bytecode"]["object"].as_str())
            .ok_or_else(|| ScriptError::ArtifactParsing(format!("{name}: missing bytecode")))?;

        let bytecode = hex::decode(bytecode_hex.trim_start_matches("0x"))
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: empty bytecode, is the contract abstract?"
            )));
        }

        let metadata = match &json["metadata"] {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };

        Ok(Self {
            name: name.to_string(),
            bytecode: bytecode.into(),
            metadata,
        })
    }
}

/// The subset of the solc metadata read when verifying a contract
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerMetadata {
    /// The compiler that produced the bytecode
    pub compiler: CompilerInfo,
    /// The settings the compiler was invoked with
    pub settings: CompilerSettings,
}

/// The `compiler` section of the solc metadata
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerInfo {
    /// The full solc version, e.g. `0.5.16+commit.9c3226ce`
    pub version: String,
}

/// The `settings` section of the solc metadata
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerSettings {
    /// The optimizer configuration
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

/// The optimizer configuration from the solc metadata
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerSettings {
    /// Whether the optimizer was enabled
    #[serde(default)]
    pub enabled: bool,
    /// The number of optimizer runs
    #[serde(default = "default_optimizer_runs")]
    pub runs: u64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// Serde default for [`OptimizerSettings::runs`]
fn default_optimizer_runs() -> u64 {
    DEFAULT_OPTIMIZER_RUNS
}

impl CompilerMetadata {
    /// Parse the solc metadata JSON string
    pub fn parse(metadata: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(metadata).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// The compiler version in the form the block explorer expects
    pub fn explorer_compiler_version(&self) -> String {
        format!("v{}", self.compiler.version)
    }

    /// The optimizer flag in the form the block explorer expects
    pub fn explorer_optimization_used(&self) -> &'static str {
        if self.settings.optimizer.enabled {
            "1"
        } else {
            "0"
        }
    }
}

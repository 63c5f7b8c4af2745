//! Network, toolchain and wallet configuration.
//!
//! A static record: which network the suites target, where contract sources
//! and compiled artifacts live, which arguments the build tool receives and
//! which wallet bindings provision accounts. Beyond parsing, validation is
//! left to the tools that consume it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Default suite timeout, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Name of the wallet binding used when none is given.
pub const DEFAULT_WALLET: &str = "default";

/// Target network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name.
    pub name: String,
    /// RPC endpoint.
    pub url: String,
    /// Extra arguments handed to the build tool for this network.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "standalone".to_string(),
            url: "http://localhost:8000/soroban/rpc".to_string(),
            args: vec![
                "--network-passphrase".to_string(),
                "Standalone Network ; February 2017".to_string(),
            ],
        }
    }
}

/// Source and artifact locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Contract sources.
    pub sources: PathBuf,
    /// Compiled `.wasm` artifacts.
    pub artifacts: PathBuf,
    /// Additional directories searched by the build tool.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: PathBuf::from("contracts"),
            artifacts: PathBuf::from("target/wasm32-unknown-unknown/release"),
            search_paths: Vec::new(),
        }
    }
}

/// Named account binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Label given to accounts provisioned from this binding.
    pub account_name: String,
    /// Account implementation backing the binding.
    pub module_path: String,
    /// Directory holding the account keys on disk.
    pub account_path: PathBuf,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            account_name: DEFAULT_WALLET.to_string(),
            module_path: "soroban_sdk::testutils::Address".to_string(),
            account_path: PathBuf::from("~/.config/stellar/identity"),
        }
    }
}

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default = "default_wallets")]
    pub wallets: BTreeMap<String, WalletConfig>,

    /// Ceiling on the wall-clock time of a whole suite.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            paths: PathsConfig::default(),
            wallets: default_wallets(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

fn default_wallets() -> BTreeMap<String, WalletConfig> {
    let mut wallets = BTreeMap::new();
    wallets.insert(DEFAULT_WALLET.to_string(), WalletConfig::default());
    wallets
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl HarnessConfig {
    /// Loads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Location of the compiled artifact for `contract_name`.
    pub fn artifact_path(&self, contract_name: &str) -> PathBuf {
        self.paths.artifacts.join(format!("{contract_name}.wasm"))
    }

    pub fn wallet(&self, name: &str) -> Result<&WalletConfig> {
        self.wallets
            .get(name)
            .ok_or_else(|| HarnessError::UnknownWallet(name.to_string()))
    }
}

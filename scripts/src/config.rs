//! Per-network constants consumed by the deploy scripts

use std::{collections::BTreeMap, fs, path::Path};

use alloy_primitives::Address;
use serde::Deserialize;

use crate::errors::ScriptError;

/// The constants for a single network
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Human-readable network name, used to key ledger files
    pub name: String,
    /// The automation agent allowed to trigger scheduled work on the diamond
    pub automation_agent: Address,
    /// The stable assets the diamond tracks from genesis
    pub tracked_assets: Vec<Address>,
    /// The price oracle, if the network has one
    #[serde(default)]
    pub oracle: Option<Address>,
}

impl NetworkConfig {
    /// Check that every field needed by a deployment is present and non-zero
    fn validate(&self, chain_id: u64) -> Result<(), ScriptError> {
        if self.name.trim().is_empty() {
            return Err(ScriptError::Configuration(format!(
                "chain {chain_id} has an empty network name"
            )));
        }
        if self.automation_agent.is_zero() {
            return Err(ScriptError::Configuration(format!(
                "{} has a zero automation agent",
                self.name
            )));
        }
        if self.tracked_assets.is_empty() {
            return Err(ScriptError::Configuration(format!(
                "{} tracks no assets",
                self.name
            )));
        }
        if self.tracked_assets.iter().any(|a| a.is_zero()) {
            return Err(ScriptError::Configuration(format!(
                "{} tracks the zero address",
                self.name
            )));
        }

        Ok(())
    }
}

/// The network constants of every supported chain, keyed by chain id
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct NetworkConfigs(BTreeMap<u64, NetworkConfig>);

impl NetworkConfigs {
    /// Parse the network constants from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|e| ScriptError::Configuration(e.to_string()))
    }

    /// Read the network constants from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::Configuration(format!("reading {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Resolve and validate the constants for the given chain
    pub fn resolve(&self, chain_id: u64) -> Result<NetworkConfig, ScriptError> {
        let config = self.0.get(&chain_id).ok_or_else(|| {
            ScriptError::Configuration(format!("no network configured for chain {chain_id}"))
        })?;
        config.validate(chain_id)?;

        Ok(config.clone())
    }

    /// Resolve the constants for the given chain, falling back to another chain's
    /// entry when the first is not configured
    pub fn resolve_or(&self, chain_id: u64, fallback: u64) -> Result<NetworkConfig, ScriptError> {
        if self.0.contains_key(&chain_id) {
            self.resolve(chain_id)
        } else {
            self.resolve(fallback)
        }
    }
}

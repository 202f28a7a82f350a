//! Chain endpoint configuration
//!
//! Endpoints come from outside the SDK: either an explicit URL and chain id,
//! a named entry in a [`ChainRegistry`] (usually loaded from JSON), or
//! environment variables.

use crate::constants::default_chain_name;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A node endpoint the SDK can connect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEndpoint {
    /// Human readable name used in log lines
    pub name: String,
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Chain ID transactions are signed for
    pub chain_id: u64,
}

impl ChainEndpoint {
    /// Create a named endpoint
    pub fn new(name: impl Into<String>, rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            rpc_url: rpc_url.into(),
            chain_id,
        }
    }

    /// Create an endpoint from a bare URL, named `chain {id}`
    pub fn from_url(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self::new(default_chain_name(chain_id), rpc_url, chain_id)
    }

    /// Read `RPC_URL`, `CHAIN_ID` and optionally `CHAIN_NAME` from the
    /// environment (a `.env` file is loaded first if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let rpc_url = std::env::var("RPC_URL").context("RPC_URL environment variable must be set")?;
        let chain_id: u64 = std::env::var("CHAIN_ID")
            .context("CHAIN_ID environment variable must be set")?
            .parse()
            .context("CHAIN_ID must be an unsigned integer")?;

        Ok(match std::env::var("CHAIN_NAME") {
            Ok(name) => Self::new(name, rpc_url, chain_id),
            Err(_) => Self::from_url(rpc_url, chain_id),
        })
    }
}

/// How a caller identifies the endpoint to connect to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointTarget {
    /// Explicit URL plus chain id
    Url { rpc_url: String, chain_id: u64 },
    /// Name looked up in a [`ChainRegistry`]
    Named(String),
}

impl EndpointTarget {
    /// Target an explicit URL
    pub fn url(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self::Url {
            rpc_url: rpc_url.into(),
            chain_id,
        }
    }

    /// Target a registry entry by name
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChainEntry {
    rpc_url: String,
    chain_id: u64,
}

/// Mapping from chain name to RPC endpoint and chain id
///
/// The JSON form is an object keyed by chain name:
///
/// ```json
/// { "bsc": { "rpc_url": "https://bsc-dataseed.binance.org", "chain_id": 56 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainEntry>,
}

impl ChainRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse chain registry")
    }

    /// Load a registry from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chain registry {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Add or replace a chain
    pub fn with_chain(
        mut self,
        name: impl Into<String>,
        rpc_url: impl Into<String>,
        chain_id: u64,
    ) -> Self {
        self.chains.insert(
            name.into(),
            ChainEntry {
                rpc_url: rpc_url.into(),
                chain_id,
            },
        );
        self
    }

    /// Look up a chain by name
    pub fn get(&self, name: &str) -> Option<ChainEndpoint> {
        self.chains
            .get(name)
            .map(|entry| ChainEndpoint::new(name, entry.rpc_url.clone(), entry.chain_id))
    }

    /// Names of all configured chains
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Turn a target into a concrete endpoint
    pub fn resolve(&self, target: &EndpointTarget) -> Result<ChainEndpoint> {
        match target {
            EndpointTarget::Url { rpc_url, chain_id } => {
                Ok(ChainEndpoint::from_url(rpc_url.clone(), *chain_id))
            }
            EndpointTarget::Named(name) => self
                .get(name)
                .ok_or_else(|| eyre::eyre!("Chain {} not found in registry", name)),
        }
    }
}

//! Supported chains and their per-chain endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything the sources need to know about one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// Decimal EVM chain id as a string, e.g. `"1"` or `"8453"`.
    pub chain_id: String,
    /// Human-readable slug, e.g. `"ethereum"`.
    pub name: String,
    /// Blockscout-compatible explorer base URL. `None` = explorer lookup skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer: Option<String>,
    /// JSON-RPC endpoints, tried in order.
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,
}

impl ChainProfile {
    pub fn new(
        chain_id: impl Into<String>,
        name: impl Into<String>,
        explorer: Option<&str>,
        rpc_endpoints: &[&str],
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            name: name.into(),
            explorer: explorer.map(str::to_string),
            rpc_endpoints: rpc_endpoints.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for ChainProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.chain_id)
    }
}

/// The fixed set of chains a deployment accepts queries for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainTable {
    chains: Vec<ChainProfile>,
}

impl ChainTable {
    pub fn new(chains: Vec<ChainProfile>) -> Self {
        Self { chains }
    }

    pub fn get(&self, chain_id: &str) -> Option<&ChainProfile> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    pub fn supports(&self, chain_id: &str) -> bool {
        self.get(chain_id).is_some()
    }

    /// Explorer base URL for a chain, if it has one.
    pub fn explorer(&self, chain_id: &str) -> Option<&str> {
        self.get(chain_id)?.explorer.as_deref()
    }

    /// Ordered RPC endpoints for a chain (empty for unknown chains).
    pub fn rpc_endpoints(&self, chain_id: &str) -> &[String] {
        self.get(chain_id)
            .map(|c| c.rpc_endpoints.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainProfile> {
        self.chains.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChainProfile> {
        self.chains.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Default for ChainTable {
    fn default() -> Self {
        Self::new(vec![
            chains::ethereum(),
            chains::base(),
            chains::optimism(),
            chains::polygon(),
            chains::arbitrum(),
        ])
    }
}

/// Built-in chain profiles with public endpoints.
pub mod chains {
    use super::ChainProfile;

    pub fn ethereum() -> ChainProfile {
        ChainProfile::new(
            "1",
            "ethereum",
            Some("https://eth.blockscout.com"),
            &["https://eth.llamarpc.com", "https://cloudflare-eth.com"],
        )
    }

    pub fn base() -> ChainProfile {
        ChainProfile::new(
            "8453",
            "base",
            Some("https://base.blockscout.com"),
            &["https://mainnet.base.org"],
        )
    }

    pub fn optimism() -> ChainProfile {
        ChainProfile::new(
            "10",
            "optimism",
            Some("https://optimism.blockscout.com"),
            &["https://mainnet.optimism.io"],
        )
    }

    pub fn polygon() -> ChainProfile {
        ChainProfile::new(
            "137",
            "polygon",
            Some("https://polygon.blockscout.com"),
            &["https://polygon-rpc.com"],
        )
    }

    pub fn arbitrum() -> ChainProfile {
        ChainProfile::new(
            "42161",
            "arbitrum",
            Some("https://arbitrum.blockscout.com"),
            &["https://arb1.arbitrum.io/rpc"],
        )
    }
}

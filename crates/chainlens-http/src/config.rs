//! Deployment configuration: YAML file + environment overrides.
//!
//! ```yaml
//! sources:
//!   sourcify_url: https://repo.sourcify.dev
//!   fourbyte_url: https://www.4byte.directory
//!   rpc_timeout_ms: 6000
//! resolver:
//!   cache: { capacity: 500, ttl_secs: 600 }
//!   enrich: { max_selectors: 32, max_candidates: 3, concurrency: 6 }
//! oracle:
//!   url: http://127.0.0.1:8000
//! chains:
//!   - chain_id: "1"
//!     name: ethereum
//!     explorer: https://eth.blockscout.com
//!     rpc_endpoints: [https://eth.llamarpc.com]
//! ```
//!
//! Environment variables applied on top:
//! `CHAINLENS_ORACLE_URL`, `CHAINLENS_SOURCIFY_URL`, `CHAINLENS_FOURBYTE_URL`
//! and `CHAINLENS_RPC_<CHAIN NAME>` (comma-separated endpoints prepended to
//! that chain's list).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chainlens_core::{ChainTable, ContractResolver, ResolverConfig, Sources, SummaryOracle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockscout::BlockscoutSource;
use crate::bytecode::RpcBytecodeSource;
use crate::client::build_client;
use crate::fourbyte::{FourByteDirectory, DEFAULT_FOURBYTE_URL};
use crate::oracle::HttpOracle;
use crate::sourcify::{SourcifySource, DEFAULT_SOURCIFY_URL};

pub const ENV_ORACLE_URL: &str = "CHAINLENS_ORACLE_URL";
pub const ENV_SOURCIFY_URL: &str = "CHAINLENS_SOURCIFY_URL";
pub const ENV_FOURBYTE_URL: &str = "CHAINLENS_FOURBYTE_URL";
pub const ENV_RPC_PREFIX: &str = "CHAINLENS_RPC_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Base URLs and per-call deadlines of the external sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_sourcify_url")]
    pub sourcify_url: String,
    #[serde(default = "default_fourbyte_url")]
    pub fourbyte_url: String,
    #[serde(default = "default_sourcify_timeout_ms")]
    pub sourcify_timeout_ms: u64,
    #[serde(default = "default_explorer_timeout_ms")]
    pub explorer_timeout_ms: u64,
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    #[serde(default = "default_fourbyte_timeout_ms")]
    pub fourbyte_timeout_ms: u64,
}

fn default_sourcify_url() -> String { DEFAULT_SOURCIFY_URL.into() }
fn default_fourbyte_url() -> String { DEFAULT_FOURBYTE_URL.into() }
fn default_sourcify_timeout_ms() -> u64 { 5_000 }
fn default_explorer_timeout_ms() -> u64 { 6_000 }
fn default_rpc_timeout_ms() -> u64 { 6_000 }
fn default_fourbyte_timeout_ms() -> u64 { 5_000 }

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            sourcify_url: default_sourcify_url(),
            fourbyte_url: default_fourbyte_url(),
            sourcify_timeout_ms: default_sourcify_timeout_ms(),
            explorer_timeout_ms: default_explorer_timeout_ms(),
            rpc_timeout_ms: default_rpc_timeout_ms(),
            fourbyte_timeout_ms: default_fourbyte_timeout_ms(),
        }
    }
}

/// Optional summary oracle. No `url` = local summaries only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_oracle_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
}

fn default_oracle_timeout_ms() -> u64 { 10_000 }
fn default_health_timeout_ms() -> u64 { 3_000 }

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_oracle_timeout_ms(),
            health_timeout_ms: default_health_timeout_ms(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainLensConfig {
    #[serde(default)]
    pub chains: ChainTable,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

impl ChainLensConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Defaults or `path`, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = set(ENV_ORACLE_URL) {
            self.oracle.url = Some(url);
        }
        if let Some(url) = set(ENV_SOURCIFY_URL) {
            self.sources.sourcify_url = url;
        }
        if let Some(url) = set(ENV_FOURBYTE_URL) {
            self.sources.fourbyte_url = url;
        }
        for chain in self.chains.iter_mut() {
            let Some(list) = set(&rpc_env_key(&chain.name)) else {
                continue;
            };
            let mut endpoints: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            endpoints.extend(
                chain
                    .rpc_endpoints
                    .drain(..)
                    .filter(|e| !list.split(',').any(|n| n.trim() == e.as_str())),
            );
            tracing::debug!(chain = %chain, endpoints = endpoints.len(), "RPC endpoints overridden from environment");
            chain.rpc_endpoints = endpoints;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::Invalid("at least one chain must be configured".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for chain in self.chains.iter() {
            if chain.chain_id.is_empty() || !chain.chain_id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::Invalid(format!(
                    "chain id {:?} must be a decimal number",
                    chain.chain_id
                )));
            }
            if !seen.insert(chain.chain_id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "chain {} is configured twice",
                    chain.chain_id
                )));
            }
        }
        if self.resolver.cache.capacity == 0 {
            return Err(ConfigError::Invalid("resolver.cache.capacity must be at least 1".into()));
        }
        if self.resolver.enrich.concurrency == 0 {
            return Err(ConfigError::Invalid("resolver.enrich.concurrency must be at least 1".into()));
        }
        Ok(())
    }

    /// The oracle client, when one is configured.
    pub fn build_oracle(&self, client: &reqwest::Client) -> Option<Arc<dyn SummaryOracle>> {
        let url = self.oracle.url.as_deref()?;
        let oracle = HttpOracle::new(client.clone(), url).with_timeouts(
            Duration::from_millis(self.oracle.timeout_ms),
            Duration::from_millis(self.oracle.health_timeout_ms),
        );
        Some(Arc::new(oracle))
    }

    /// Wire every HTTP source into a resolver.
    pub fn build_resolver(&self) -> Result<ContractResolver, ConfigError> {
        let client = build_client()?;
        let s = &self.sources;
        let sources = Sources {
            verified: Arc::new(SourcifySource::new(
                client.clone(),
                &s.sourcify_url,
                Duration::from_millis(s.sourcify_timeout_ms),
            )),
            explorer: Arc::new(BlockscoutSource::new(
                client.clone(),
                self.chains.clone(),
                Duration::from_millis(s.explorer_timeout_ms),
            )),
            bytecode: Arc::new(RpcBytecodeSource::new(
                client.clone(),
                self.chains.clone(),
                Duration::from_millis(s.rpc_timeout_ms),
            )),
            directory: Arc::new(FourByteDirectory::new(
                client.clone(),
                &s.fourbyte_url,
                Duration::from_millis(s.fourbyte_timeout_ms),
            )),
            oracle: self.build_oracle(&client),
        };
        tracing::info!(
            chains = self.chains.len(),
            oracle = self.oracle.url.is_some(),
            cache_capacity = self.resolver.cache.capacity,
            "resolver configured"
        );
        Ok(ContractResolver::new(self.chains.clone(), sources, &self.resolver))
    }
}

/// `CHAINLENS_RPC_<NAME>`, with the chain name upper-cased and anything
/// outside `[A-Z0-9]` replaced by `_`.
pub fn rpc_env_key(chain_name: &str) -> String {
    let name: String = chain_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{ENV_RPC_PREFIX}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let cfg = ChainLensConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg.chains.len(), 5);
        assert_eq!(cfg.sources, SourcesConfig::default());
        assert_eq!(cfg.resolver.cache.capacity, 500);
        assert_eq!(cfg.resolver.cache.ttl_secs, 600);
        assert_eq!(cfg.resolver.enrich.max_selectors, 32);
        assert!(cfg.oracle.url.is_none());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = ChainLensConfig::from_yaml_str(
            r#"
resolver:
  cache:
    capacity: 10
oracle:
  url: http://127.0.0.1:8000
chains:
  - chain_id: "8453"
    name: base
    rpc_endpoints: [http://localhost:8545]
"#,
        )
        .unwrap();
        assert_eq!(cfg.resolver.cache.capacity, 10);
        assert_eq!(cfg.resolver.cache.ttl_secs, 600);
        assert_eq!(cfg.oracle.timeout_ms, 10_000);
        assert_eq!(cfg.chains.len(), 1);
        assert!(cfg.chains.explorer("8453").is_none());
        assert_eq!(cfg.oracle.url.as_deref(), Some("http://127.0.0.1:8000"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ChainLensConfig::from_yaml_str("chains: []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ChainLensConfig::from_yaml_str("chains: [{chain_id: \"eth\", name: x}]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ChainLensConfig::from_yaml_str("resolver: {cache: {capacity: 0}}"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ChainLensConfig::from_yaml_str("sources: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn env_overrides_urls() {
        let mut cfg = ChainLensConfig::default();
        cfg.apply_env(env(&[
            (ENV_ORACLE_URL, "http://oracle:8000"),
            (ENV_SOURCIFY_URL, "http://sourcify.local"),
            (ENV_FOURBYTE_URL, "  "),
        ]));
        assert_eq!(cfg.oracle.url.as_deref(), Some("http://oracle:8000"));
        assert_eq!(cfg.sources.sourcify_url, "http://sourcify.local");
        assert_eq!(cfg.sources.fourbyte_url, DEFAULT_FOURBYTE_URL);
    }

    #[test]
    fn env_rpc_endpoints_are_prepended() {
        let mut cfg = ChainLensConfig::default();
        cfg.apply_env(env(&[(
            "CHAINLENS_RPC_ETHEREUM",
            "https://my-node.example, https://cloudflare-eth.com",
        )]));
        assert_eq!(
            cfg.chains.rpc_endpoints("1"),
            &[
                "https://my-node.example".to_string(),
                "https://cloudflare-eth.com".to_string(),
                "https://eth.llamarpc.com".to_string(),
            ]
        );
        assert_eq!(cfg.chains.rpc_endpoints("8453"), &["https://mainnet.base.org".to_string()]);
    }

    #[test]
    fn rpc_key_normalization() {
        assert_eq!(rpc_env_key("ethereum"), "CHAINLENS_RPC_ETHEREUM");
        assert_eq!(rpc_env_key("bnb-chain"), "CHAINLENS_RPC_BNB_CHAIN");
    }

    #[test]
    fn builds_resolver_with_optional_oracle() {
        let cfg = ChainLensConfig::default();
        let resolver = cfg.build_resolver().unwrap();
        assert!(resolver.oracle().is_none());
        assert_eq!(resolver.chains().len(), 5);

        let mut cfg = ChainLensConfig::default();
        cfg.oracle.url = Some("http://127.0.0.1:1".into());
        assert!(cfg.build_resolver().unwrap().oracle().is_some());
    }
}

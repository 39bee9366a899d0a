//! Traits for the external collaborators of the pipeline.
//!
//! Every method returns an absence value instead of an error: the
//! implementation decides what went wrong, logs it, and folds it into
//! `None` / an empty list so the orchestrator can move on.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` and are shared as `Arc<dyn Trait>`.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::abi::{AbiEntry, ParsedAbi};
use crate::query::ContractQuery;
use crate::selector::Selector;

/// ABI returned by a verified-metadata repository or a block explorer.
#[derive(Debug, Clone)]
pub struct AbiHit {
    pub abi: Vec<AbiEntry>,
    /// Entries of the source array that could not be read.
    pub skipped: usize,
    /// Full compiler metadata document, when the source has one.
    pub metadata: Option<Value>,
}

impl AbiHit {
    pub fn new(parsed: ParsedAbi, metadata: Option<Value>) -> Self {
        Self {
            abi: parsed.entries,
            skipped: parsed.skipped,
            metadata,
        }
    }
}

/// Deployed code returned by a JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeHit {
    /// `0x`-prefixed hex, never the empty-code sentinel `0x`.
    pub bytecode: String,
    /// Endpoint that answered.
    pub endpoint: String,
}

/// A source that can return a contract ABI.
#[async_trait]
pub trait AbiSource: Send + Sync + 'static {
    /// Short identifier used in logs, e.g. `"sourcify"`.
    fn name(&self) -> &str;

    /// `None` covers unverified contracts, unsupported chains and any failure.
    async fn fetch_abi(&self, query: &ContractQuery) -> Option<AbiHit>;
}

/// A source that can return deployed bytecode.
#[async_trait]
pub trait BytecodeSource: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// `None` when no endpoint returned non-empty code.
    async fn fetch_code(&self, query: &ContractQuery) -> Option<BytecodeHit>;
}

/// A function-signature directory keyed by selector.
#[async_trait]
pub trait SignatureDirectory: Send + Sync + 'static {
    /// Text signatures in directory order; empty on any failure.
    async fn lookup(&self, selector: Selector) -> Vec<String>;
}

/// What the oracle is asked to explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleMode {
    Abi,
    Selectors,
}

/// Request body sent to the summary oracle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    pub mode: OracleMode,
    pub address: String,
    pub chain_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abi: Option<Vec<AbiEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectors: Option<Vec<Selector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<IndexMap<Selector, Vec<String>>>,
}

impl OracleRequest {
    pub fn for_abi(query: &ContractQuery, abi: Vec<AbiEntry>, metadata: Option<Value>) -> Self {
        Self {
            mode: OracleMode::Abi,
            address: query.address().to_string(),
            chain_id: query.chain_id().to_string(),
            abi: Some(abi),
            metadata,
            selectors: None,
            candidates: None,
        }
    }

    pub fn for_selectors(
        query: &ContractQuery,
        selectors: Vec<Selector>,
        candidates: IndexMap<Selector, Vec<String>>,
    ) -> Self {
        Self {
            mode: OracleMode::Selectors,
            address: query.address().to_string(),
            chain_id: query.chain_id().to_string(),
            abi: None,
            metadata: None,
            selectors: Some(selectors),
            candidates: Some(candidates),
        }
    }
}

/// Oracle answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSummary {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result of probing the oracle's health endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleHealth {
    /// Reachable; carries the oracle's own health body.
    Online(Value),
    Offline,
}

/// Optional natural-language enrichment service.
#[async_trait]
pub trait SummaryOracle: Send + Sync + 'static {
    /// `None` on any non-success response, timeout or transport failure.
    async fn explain(&self, request: &OracleRequest) -> Option<OracleSummary>;

    async fn health(&self) -> OracleHealth;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainTable;

    #[test]
    fn selectors_request_shape() {
        let q = ContractQuery::parse(
            Some("8453"),
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            &ChainTable::default(),
        )
        .unwrap();
        let sel: Selector = "0x70a08231".parse().unwrap();
        let mut candidates = IndexMap::new();
        candidates.insert(sel, vec![]);
        let req = OracleRequest::for_selectors(&q, vec![sel], candidates);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mode"], "selectors");
        assert_eq!(json["chainId"], "8453");
        assert_eq!(json["address"], "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913");
        assert_eq!(json["selectors"][0], "0x70a08231");
        assert!(json["candidates"]["0x70a08231"].as_array().unwrap().is_empty());
        assert!(json.get("abi").is_none());
    }

    #[test]
    fn summary_source_is_optional() {
        let s: OracleSummary = serde_json::from_str(r#"{"summary":"An ERC-20 token"}"#).unwrap();
        assert_eq!(s.source, None);
    }
}

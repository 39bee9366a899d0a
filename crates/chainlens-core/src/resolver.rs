//! The resolution orchestrator.
//!
//! ```text
//! INVALID_INPUT ◄── validate
//!                     │
//!               CACHE_CHECK ── hit ──────────────────────────────► DONE
//!                     │
//!             VERIFIED_LOOKUP ── abi ──┐
//!                     │                │
//!             EXPLORER_LOOKUP ── abi ──┤
//!                     │                ▼
//!             BYTECODE_LOOKUP       SUMMARIZE ──► CACHE_WRITE ──► DONE
//!                │        │            ▲
//!   NOT_FOUND ◄──┘   EXTRACT_AND_ENRICH┘
//! ```
//!
//! Sources are tried strictly in order and the first usable answer wins.
//! Source and oracle failures never leave this module as errors.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::abi::{self, FunctionDescriptor};
use crate::cache::{CacheConfig, ResponseCache};
use crate::chain::ChainTable;
use crate::enrich::{EnrichConfig, SignatureEnricher};
use crate::error::ResolveError;
use crate::interface::{bytecode_preview, InterfaceBody, ResolvedInterface, SourceKind};
use crate::known;
use crate::query::ContractQuery;
use crate::selector::extract_selectors;
use crate::source::{
    AbiHit, AbiSource, BytecodeSource, OracleRequest, OracleSummary, SignatureDirectory,
    SummaryOracle,
};
use crate::summary::{summarize_abi, summarize_selectors, GENERIC_ABI_SUMMARY};

/// Pipeline stages, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    CacheCheck,
    VerifiedLookup,
    ExplorerLookup,
    BytecodeLookup,
    ExtractAndEnrich,
    Summarize,
    CacheWrite,
    Done,
    NotFound,
    InvalidInput,
}

impl fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CacheCheck => "cache_check",
            Self::VerifiedLookup => "verified_lookup",
            Self::ExplorerLookup => "explorer_lookup",
            Self::BytecodeLookup => "bytecode_lookup",
            Self::ExtractAndEnrich => "extract_and_enrich",
            Self::Summarize => "summarize",
            Self::CacheWrite => "cache_write",
            Self::Done => "done",
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
        };
        f.write_str(s)
    }
}

/// Tunables for the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

/// The external collaborators, in fallback order.
#[derive(Clone)]
pub struct Sources {
    pub verified: Arc<dyn AbiSource>,
    pub explorer: Arc<dyn AbiSource>,
    pub bytecode: Arc<dyn BytecodeSource>,
    pub directory: Arc<dyn SignatureDirectory>,
    pub oracle: Option<Arc<dyn SummaryOracle>>,
}

/// Drives the fallback chain and owns all cache writes.
///
/// One instance is built at startup and shared (`Arc`) by every request;
/// the response cache inside it lives for the whole process.
pub struct ContractResolver {
    chains: ChainTable,
    verified: Arc<dyn AbiSource>,
    explorer: Arc<dyn AbiSource>,
    bytecode: Arc<dyn BytecodeSource>,
    enricher: SignatureEnricher,
    oracle: Option<Arc<dyn SummaryOracle>>,
    cache: Arc<ResponseCache>,
}

impl ContractResolver {
    pub fn new(chains: ChainTable, sources: Sources, config: &ResolverConfig) -> Self {
        Self::with_cache(
            chains,
            sources,
            config,
            Arc::new(ResponseCache::new(&config.cache)),
        )
    }

    /// Build around an existing cache (shared between resolvers or inspected in tests).
    pub fn with_cache(
        chains: ChainTable,
        sources: Sources,
        config: &ResolverConfig,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            chains,
            verified: sources.verified,
            explorer: sources.explorer,
            bytecode: sources.bytecode,
            enricher: SignatureEnricher::new(sources.directory, config.enrich.clone()),
            oracle: sources.oracle,
            cache,
        }
    }

    pub fn chains(&self) -> &ChainTable {
        &self.chains
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn oracle(&self) -> Option<&Arc<dyn SummaryOracle>> {
        self.oracle.as_ref()
    }

    /// Resolve a raw `(chainId, address)` pair.
    ///
    /// `chain_id` defaults to Ethereum mainnet. Invalid input is rejected
    /// before any network call or cache access.
    pub async fn resolve(
        &self,
        chain_id: Option<&str>,
        address: &str,
    ) -> Result<Arc<ResolvedInterface>, ResolveError> {
        let query = match ContractQuery::parse(chain_id, address, &self.chains) {
            Ok(q) => q,
            Err(e) => {
                tracing::debug!(stage = %ResolveStage::InvalidInput, error = %e, "query rejected");
                return Err(e);
            }
        };
        self.resolve_query(&query).await
    }

    /// Resolve an already validated query.
    pub async fn resolve_query(
        &self,
        query: &ContractQuery,
    ) -> Result<Arc<ResolvedInterface>, ResolveError> {
        let key = query.cache_key();

        stage(ResolveStage::CacheCheck, query);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(%query, stage = %ResolveStage::Done, "cache hit");
            return Ok(hit);
        }

        stage(ResolveStage::VerifiedLookup, query);
        if let Some(hit) = self.verified.fetch_abi(query).await {
            return Ok(self.finish_abi(query, SourceKind::VerifiedMetadata, hit).await);
        }

        stage(ResolveStage::ExplorerLookup, query);
        if let Some(hit) = self.explorer.fetch_abi(query).await {
            return Ok(self.finish_abi(query, SourceKind::BlockExplorer, hit).await);
        }

        stage(ResolveStage::BytecodeLookup, query);
        let Some(code) = self.bytecode.fetch_code(query).await else {
            tracing::info!(%query, stage = %ResolveStage::NotFound, "no source returned data");
            return Err(ResolveError::NotFound {
                chain_id: query.chain_id().to_string(),
                address: query.address().to_string(),
            });
        };

        stage(ResolveStage::ExtractAndEnrich, query);
        let selectors = extract_selectors(&code.bytecode);
        let candidates = self.enricher.enrich(&selectors).await;

        stage(ResolveStage::Summarize, query);
        let request = OracleRequest::for_selectors(query, selectors.clone(), candidates.clone());
        let oracle = self.ask_oracle(&request).await;
        let summary = match &oracle {
            Some(o) => o.summary.clone(),
            None => summarize_selectors(&candidates),
        };

        let resolved = ResolvedInterface {
            chain_id: query.chain_id().to_string(),
            address: query.address().to_string(),
            source: SourceKind::RawBytecode,
            body: InterfaceBody::Inferred {
                bytecode_preview: bytecode_preview(&code.bytecode),
                selectors,
                candidates,
                rpc_endpoint: code.endpoint,
            },
            known: known::lookup(query.address()),
            oracle,
            summary,
        };
        Ok(self.store(query, resolved))
    }

    async fn finish_abi(
        &self,
        query: &ContractQuery,
        source: SourceKind,
        hit: AbiHit,
    ) -> Arc<ResolvedInterface> {
        stage(ResolveStage::Summarize, query);
        let AbiHit {
            abi,
            skipped,
            metadata,
        } = hit;
        if skipped > 0 {
            tracing::debug!(%query, skipped, "ABI carried unreadable entries");
        }
        let request = OracleRequest::for_abi(query, abi.clone(), metadata);
        let oracle = self.ask_oracle(&request).await;
        let summary = match &oracle {
            Some(o) => o.summary.clone(),
            None if skipped > 0 => GENERIC_ABI_SUMMARY.to_string(),
            None => summarize_abi(&abi),
        };

        let resolved = ResolvedInterface {
            chain_id: query.chain_id().to_string(),
            address: query.address().to_string(),
            source,
            body: InterfaceBody::Abi { abi },
            known: known::lookup(query.address()),
            oracle,
            summary,
        };
        self.store(query, resolved)
    }

    async fn ask_oracle(&self, request: &OracleRequest) -> Option<OracleSummary> {
        let oracle = self.oracle.as_ref()?;
        let answer = oracle.explain(request).await;
        if answer.is_none() {
            tracing::warn!(
                address = %request.address,
                "oracle unavailable, using local summary"
            );
        }
        answer
    }

    fn store(&self, query: &ContractQuery, resolved: ResolvedInterface) -> Arc<ResolvedInterface> {
        stage(ResolveStage::CacheWrite, query);
        let source = resolved.source;
        let stored = self.cache.set(query.cache_key(), resolved);
        tracing::info!(%query, %source, stage = %ResolveStage::Done, "contract resolved");
        stored
    }
}

fn stage(stage: ResolveStage, query: &ContractQuery) {
    tracing::debug!(%query, %stage, "resolution stage");
}

/// Function descriptors of a verified result; empty for inferred ones.
pub fn abi_functions(resolved: &ResolvedInterface) -> Vec<FunctionDescriptor> {
    resolved.abi().map(abi::functions).unwrap_or_default()
}

//! chainlens-core: the contract interface resolution pipeline.
//!
//! # Overview
//!
//! ChainLens turns an opaque contract address into a readable description of
//! its interface. The core crate is transport-agnostic; it defines:
//!
//! - [`ContractQuery`]: validated `(chain, address)` input
//! - [`ResolvedInterface`]: normalized output (verified ABI or inferred selectors)
//! - [`source`]: traits for every external collaborator (metadata repository,
//!   block explorer, JSON-RPC bytecode, signature directory, summary oracle)
//! - [`selector`]: bytecode scan for `PUSH4` selectors
//! - [`enrich`]: bounded-fanout selector → signature lookups
//! - [`summary`]: local fallback summaries
//! - [`cache`]: LRU + TTL response cache
//! - [`resolver`]: the orchestrator driving the fallback chain

pub mod abi;
pub mod cache;
pub mod chain;
pub mod enrich;
pub mod error;
pub mod interface;
pub mod known;
pub mod query;
pub mod resolver;
pub mod selector;
pub mod source;
pub mod summary;

pub use abi::{AbiEntry, AbiEntryKind, AbiParam, FunctionDescriptor, Mutability, ParsedAbi};
pub use cache::{CacheConfig, ResponseCache};
pub use chain::{ChainProfile, ChainTable};
pub use enrich::{EnrichConfig, SignatureEnricher};
pub use error::{ResolveError, SourceError};
pub use interface::{InterfaceBody, ResolvedInterface, SourceKind};
pub use known::KnownContract;
pub use query::ContractQuery;
pub use resolver::{ContractResolver, ResolveStage, ResolverConfig, Sources};
pub use selector::{extract_selectors, Selector};
pub use source::{
    AbiHit, AbiSource, BytecodeHit, BytecodeSource, OracleHealth, OracleMode, OracleRequest,
    OracleSummary, SignatureDirectory, SummaryOracle,
};

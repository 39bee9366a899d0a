//! # chainlens-http
//!
//! `reqwest`-backed implementations of the ChainLens source traits.
//!
//! | Source | Trait | Default timeout |
//! |--------|-------|-----------------|
//! | [`SourcifySource`] | `AbiSource` | 5 s |
//! | [`BlockscoutSource`] | `AbiSource` | 6 s |
//! | [`RpcBytecodeSource`] | `BytecodeSource` | 6 s per endpoint |
//! | [`FourByteDirectory`] | `SignatureDirectory` | 5 s |
//! | [`HttpOracle`] | `SummaryOracle` | 10 s (3 s health) |
//!
//! [`ChainLensConfig`] loads YAML plus environment overrides and wires all of
//! the above into a `ContractResolver`.

pub mod blockscout;
pub mod bytecode;
pub mod client;
pub mod config;
pub mod fourbyte;
pub mod oracle;
pub mod request;
pub mod sourcify;

pub use blockscout::BlockscoutSource;
pub use bytecode::RpcBytecodeSource;
pub use client::build_client;
pub use config::{ChainLensConfig, ConfigError, OracleConfig, SourcesConfig};
pub use fourbyte::FourByteDirectory;
pub use oracle::HttpOracle;
pub use sourcify::SourcifySource;

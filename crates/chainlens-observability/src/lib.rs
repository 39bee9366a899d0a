//! # chainlens-observability
//!
//! Structured logging for ChainLens.
//!
//! Every crate logs through `tracing`; binaries call [`init_tracing`] once at
//! startup. Output is human-readable text or JSON lines (ELK, Loki,
//! CloudWatch), with the level configurable per component.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};

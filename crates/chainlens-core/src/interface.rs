//! The normalized resolution result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::abi::AbiEntry;
use crate::known::KnownContract;
use crate::selector::Selector;
use crate::source::OracleSummary;

/// Hex characters of code kept in [`InterfaceBody::Inferred::bytecode_preview`].
pub const BYTECODE_PREVIEW_CHARS: usize = 120;

/// Which source produced the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    VerifiedMetadata,
    BlockExplorer,
    RawBytecode,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VerifiedMetadata => write!(f, "verified-metadata"),
            Self::BlockExplorer => write!(f, "block-explorer"),
            Self::RawBytecode => write!(f, "raw-bytecode"),
        }
    }
}

/// Either a verified ABI or the selectors inferred from bytecode. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterfaceBody {
    Abi {
        abi: Vec<AbiEntry>,
    },
    #[serde(rename_all = "camelCase")]
    Inferred {
        bytecode_preview: String,
        selectors: Vec<Selector>,
        /// Total over `selectors`; no candidates = empty list.
        candidates: IndexMap<Selector, Vec<String>>,
        rpc_endpoint: String,
    },
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInterface {
    pub chain_id: String,
    pub address: String,
    pub source: SourceKind,
    #[serde(flatten)]
    pub body: InterfaceBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known: Option<KnownContract>,
    /// Oracle response, when the oracle answered.
    #[serde(default)]
    pub oracle: Option<OracleSummary>,
    pub summary: String,
}

impl ResolvedInterface {
    pub fn abi(&self) -> Option<&[AbiEntry]> {
        match &self.body {
            InterfaceBody::Abi { abi } => Some(abi),
            InterfaceBody::Inferred { .. } => None,
        }
    }

    pub fn selectors(&self) -> Option<&[Selector]> {
        match &self.body {
            InterfaceBody::Inferred { selectors, .. } => Some(selectors),
            InterfaceBody::Abi { .. } => None,
        }
    }

    pub fn candidates(&self) -> Option<&IndexMap<Selector, Vec<String>>> {
        match &self.body {
            InterfaceBody::Inferred { candidates, .. } => Some(candidates),
            InterfaceBody::Abi { .. } => None,
        }
    }
}

/// First [`BYTECODE_PREVIEW_CHARS`] characters of the code followed by `...`.
pub fn bytecode_preview(bytecode: &str) -> String {
    let head: String = bytecode.chars().take(BYTECODE_PREVIEW_CHARS).collect();
    format!("{head}...")
}

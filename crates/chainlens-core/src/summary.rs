//! Local fallback summaries, used when the oracle is absent or fails.

use indexmap::IndexMap;
use serde_json::Value;

use crate::abi::{AbiEntry, Mutability};
use crate::selector::Selector;

/// Returned when a raw ABI cannot be interpreted.
pub const GENERIC_ABI_SUMMARY: &str = "ABI parsed. Explore the sections for details.";

/// Returned when no selector matched a known signature.
pub const NO_SIGNATURES_SUMMARY: &str =
    "Unverified contract. Functions inferred from bytecode. No common signatures found.";

/// Signatures listed in a selector summary.
pub const MAX_LISTED_SIGNATURES: usize = 8;

/// Counts and signals extracted from an ABI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbiStats {
    pub functions: usize,
    pub read: usize,
    pub write: usize,
    pub events: usize,
    pub has_ownership: bool,
    pub has_pause: bool,
}

impl AbiStats {
    pub fn collect(abi: &[AbiEntry]) -> Self {
        let mut stats = Self::default();
        for entry in abi {
            if entry.is_event() {
                stats.events += 1;
            }
            if !entry.is_function() {
                continue;
            }
            stats.functions += 1;
            match entry.mutability() {
                Mutability::Read => stats.read += 1,
                Mutability::Write => stats.write += 1,
            }
            let name = entry.name.to_lowercase();
            stats.has_ownership |= name.contains("owner");
            stats.has_pause |= name.contains("pause");
        }
        stats
    }
}

/// Fixed-template summary of a verified ABI.
pub fn summarize_abi(abi: &[AbiEntry]) -> String {
    let s = AbiStats::collect(abi);
    let mut parts = vec![format!(
        "Functions total: {}. Read: {}. Write: {}. Events: {}.",
        s.functions, s.read, s.write, s.events
    )];
    if s.has_ownership {
        parts.push("Ownership functions detected.".into());
    }
    if s.has_pause {
        parts.push("Pause or emergency controls detected.".into());
    }
    parts.push("Review functions and events below for a clearer idea of purpose.".into());
    parts.join(" ")
}

/// Summary of an ABI still in JSON form; malformed input gets the generic line.
pub fn summarize_abi_json(abi: &Value) -> String {
    match AbiEntry::parse_lenient(abi) {
        Some(parsed) if parsed.is_complete() => summarize_abi(&parsed.entries),
        _ => {
            tracing::debug!("ABI not summarizable, using generic summary");
            GENERIC_ABI_SUMMARY.to_string()
        }
    }
}

/// Best-effort summary of enrichment results.
pub fn summarize_selectors(candidates: &IndexMap<Selector, Vec<String>>) -> String {
    let listed: Vec<&str> = candidates
        .values()
        .flatten()
        .take(MAX_LISTED_SIGNATURES)
        .map(String::as_str)
        .collect();
    if listed.is_empty() {
        return NO_SIGNATURES_SUMMARY.to_string();
    }
    format!(
        "Unverified contract. Likely functions include: {}. This is a best effort inference from 4byte signatures.",
        listed.join(", ")
    )
}

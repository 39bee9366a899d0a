//! Verified-metadata lookups against a Sourcify repository.
//!
//! `GET {base}/contracts/full_match/{chainId}/{address}/metadata.json`
//! returns the compiler metadata document; the ABI lives at `output.abi`.

use std::time::Duration;

use async_trait::async_trait;
use chainlens_core::{AbiEntry, AbiHit, AbiSource, ContractQuery, SourceError};
use serde_json::Value;

use crate::client::{send_json, trim_base};

pub const DEFAULT_SOURCIFY_URL: &str = "https://repo.sourcify.dev";
pub const DEFAULT_SOURCIFY_TIMEOUT: Duration = Duration::from_secs(5);

const NAME: &str = "sourcify";

pub struct SourcifySource {
    client: reqwest::Client,
    base: String,
    timeout: Duration,
}

impl SourcifySource {
    pub fn new(client: reqwest::Client, base: &str, timeout: Duration) -> Self {
        Self {
            client,
            base: trim_base(base),
            timeout,
        }
    }

    pub fn metadata_url(&self, query: &ContractQuery) -> String {
        format!(
            "{}/contracts/full_match/{}/{}/metadata.json",
            self.base,
            query.chain_id(),
            query.address()
        )
    }

    async fn try_fetch(&self, query: &ContractQuery) -> Result<Option<AbiHit>, SourceError> {
        let request = self.client.get(self.metadata_url(query));
        let Some(metadata) = send_json::<Value>(NAME, request, self.timeout).await? else {
            return Ok(None);
        };
        Ok(abi_from_metadata(metadata))
    }
}

/// Pull `output.abi` out of a metadata document. A document without an ABI
/// array is "no data"; any ABI array is a hit, unreadable entries included.
pub fn abi_from_metadata(metadata: Value) -> Option<AbiHit> {
    let raw = metadata.get("output").and_then(|o| o.get("abi"))?;
    let parsed = AbiEntry::parse_lenient(raw)?;
    Some(AbiHit::new(parsed, Some(metadata)))
}

#[async_trait]
impl AbiSource for SourcifySource {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_abi(&self, query: &ContractQuery) -> Option<AbiHit> {
        match self.try_fetch(query).await {
            Ok(Some(hit)) => {
                tracing::debug!(%query, entries = hit.abi.len(), "sourcify: verified metadata found");
                Some(hit)
            }
            Ok(None) => {
                tracing::debug!(%query, "sourcify: no verified metadata");
                None
            }
            Err(e) => {
                tracing::debug!(%query, error = %e, "sourcify: lookup failed");
                None
            }
        }
    }
}

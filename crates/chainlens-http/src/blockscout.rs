//! Block-explorer ABI lookups (Etherscan-compatible `getabi` endpoint).
//!
//! The explorer base URL comes from the chain table; chains without one are
//! answered with "no data" before any request is made.

use std::time::Duration;

use async_trait::async_trait;
use chainlens_core::{AbiEntry, AbiHit, AbiSource, ChainTable, ContractQuery, SourceError};
use serde::Deserialize;
use serde_json::Value;

use crate::client::{send_json, trim_base};

pub const DEFAULT_EXPLORER_TIMEOUT: Duration = Duration::from_secs(6);

const NAME: &str = "blockscout";

/// `{"status": "1", "message": "OK", "result": "[...abi json...]"}`
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

pub struct BlockscoutSource {
    client: reqwest::Client,
    chains: ChainTable,
    timeout: Duration,
}

impl BlockscoutSource {
    pub fn new(client: reqwest::Client, chains: ChainTable, timeout: Duration) -> Self {
        Self {
            client,
            chains,
            timeout,
        }
    }

    async fn try_fetch(&self, query: &ContractQuery) -> Result<Option<AbiHit>, SourceError> {
        let Some(base) = self.chains.explorer(query.chain_id()) else {
            return Err(SourceError::Unsupported {
                source_name: NAME.into(),
                chain_id: query.chain_id().to_string(),
            });
        };

        let request = self
            .client
            .get(format!("{}/api", trim_base(base)))
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", query.address()),
            ]);
        let Some(resp) = send_json::<ExplorerResponse>(NAME, request, self.timeout).await? else {
            return Ok(None);
        };
        parse_response(resp)
    }
}

fn parse_response(resp: ExplorerResponse) -> Result<Option<AbiHit>, SourceError> {
    if resp.status != "1" {
        tracing::debug!(message = %resp.message, "blockscout: explorer reported failure");
        return Ok(None);
    }
    let decoded;
    let raw = match &resp.result {
        Value::String(encoded) => {
            decoded = serde_json::from_str::<Value>(encoded)
                .map_err(|e| SourceError::malformed(NAME, e))?;
            &decoded
        }
        // some explorers inline the array instead of a JSON string
        other => other,
    };
    let parsed = AbiEntry::parse_lenient(raw)
        .ok_or_else(|| SourceError::malformed(NAME, "result is not an ABI array"))?;
    Ok(Some(AbiHit::new(parsed, None)))
}

#[async_trait]
impl AbiSource for BlockscoutSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_abi(&self, query: &ContractQuery) -> Option<AbiHit> {
        match self.try_fetch(query).await {
            Ok(Some(hit)) => {
                tracing::debug!(%query, entries = hit.abi.len(), "blockscout: ABI found");
                Some(hit)
            }
            Ok(None) => {
                tracing::debug!(%query, "blockscout: no verified ABI");
                None
            }
            Err(e) => {
                tracing::debug!(%query, error = %e, "blockscout: lookup failed");
                None
            }
        }
    }
}

//! Deployed-code lookups over an ordered list of JSON-RPC endpoints.
//!
//! Endpoints are tried in order; the first one returning code other than the
//! empty value `0x` wins. Failing endpoints are skipped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chainlens_core::{BytecodeHit, BytecodeSource, ChainTable, ContractQuery, SourceError};
use serde_json::Value;

use crate::client::send_json;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(6);

const NAME: &str = "rpc";

pub struct RpcBytecodeSource {
    client: reqwest::Client,
    chains: ChainTable,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcBytecodeSource {
    pub fn new(client: reqwest::Client, chains: ChainTable, timeout: Duration) -> Self {
        Self {
            client,
            chains,
            timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// `Ok(None)` when the endpoint answered but holds no code at the address.
    async fn get_code(&self, endpoint: &str, address: &str) -> Result<Option<String>, SourceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = self
            .client
            .post(endpoint)
            .json(&JsonRpcRequest::get_code(id, address));
        let Some(resp) = send_json::<JsonRpcResponse>(NAME, request, self.timeout).await? else {
            return Err(SourceError::Status {
                source_name: NAME.into(),
                status: 404,
            });
        };
        let result = resp.into_result().map_err(|e| SourceError::Rpc {
            code: e.code,
            message: e.message,
        })?;
        match result {
            Value::String(code) => Ok(non_empty_code(code)),
            Value::Null => Ok(None),
            other => Err(SourceError::malformed(
                NAME,
                format!("eth_getCode returned {other}"),
            )),
        }
    }
}

fn non_empty_code(code: String) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("0x") {
        None
    } else {
        Some(code)
    }
}

#[async_trait]
impl BytecodeSource for RpcBytecodeSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_code(&self, query: &ContractQuery) -> Option<BytecodeHit> {
        let endpoints = self.chains.rpc_endpoints(query.chain_id());
        if endpoints.is_empty() {
            tracing::debug!(%query, "rpc: no endpoints configured for chain");
            return None;
        }

        for endpoint in endpoints {
            match self.get_code(endpoint, query.address()).await {
                Ok(Some(bytecode)) => {
                    tracing::debug!(%query, endpoint = %endpoint, bytes = bytecode.len() / 2, "rpc: code found");
                    return Some(BytecodeHit {
                        bytecode,
                        endpoint: endpoint.clone(),
                    });
                }
                Ok(None) => {
                    tracing::debug!(%query, endpoint = %endpoint, "rpc: empty code");
                }
                Err(e) => {
                    tracing::debug!(%query, endpoint = %endpoint, error = %e, "rpc: endpoint failed");
                }
            }
        }
        None
    }
}

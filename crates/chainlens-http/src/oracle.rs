//! Client for the optional summary oracle.
//!
//! - `POST {base}/explain` with an [`OracleRequest`] → `{summary, source?}`
//! - `GET {base}/health` → any JSON body on success

use std::time::Duration;

use async_trait::async_trait;
use chainlens_core::{OracleHealth, OracleRequest, OracleSummary, SourceError, SummaryOracle};
use serde_json::Value;

use crate::client::{send_json, trim_base};

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

const NAME: &str = "oracle";

pub struct HttpOracle {
    client: reqwest::Client,
    base: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpOracle {
    pub fn new(client: reqwest::Client, base: &str) -> Self {
        Self {
            client,
            base: trim_base(base),
            timeout: DEFAULT_ORACLE_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, health_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.health_timeout = health_timeout;
        self
    }

    async fn try_explain(&self, request: &OracleRequest) -> Result<Option<OracleSummary>, SourceError> {
        let http = self.client.post(format!("{}/explain", self.base)).json(request);
        let answer = send_json::<OracleSummary>(NAME, http, self.timeout).await?;
        Ok(answer.filter(|a| !a.summary.trim().is_empty()))
    }

    async fn try_health(&self) -> Result<Option<Value>, SourceError> {
        let http = self.client.get(format!("{}/health", self.base));
        send_json::<Value>(NAME, http, self.health_timeout).await
    }
}

#[async_trait]
impl SummaryOracle for HttpOracle {
    async fn explain(&self, request: &OracleRequest) -> Option<OracleSummary> {
        match self.try_explain(request).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!(address = %request.address, error = %e, "oracle: explain failed");
                None
            }
        }
    }

    async fn health(&self) -> OracleHealth {
        match self.try_health().await {
            Ok(Some(body)) => OracleHealth::Online(body),
            Ok(None) => OracleHealth::Offline,
            Err(e) => {
                tracing::debug!(base = %self.base, error = %e, "oracle: health check failed");
                OracleHealth::Offline
            }
        }
    }
}

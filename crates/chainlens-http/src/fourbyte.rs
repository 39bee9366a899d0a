//! Function-signature lookups against 4byte.directory.

use std::time::Duration;

use async_trait::async_trait;
use chainlens_core::{Selector, SignatureDirectory, SourceError};
use serde::Deserialize;

use crate::client::{send_json, trim_base};

pub const DEFAULT_FOURBYTE_URL: &str = "https://www.4byte.directory";
pub const DEFAULT_FOURBYTE_TIMEOUT: Duration = Duration::from_secs(5);

const NAME: &str = "4byte";

#[derive(Debug, Deserialize)]
struct FourByteResponse {
    #[serde(default)]
    results: Vec<FourByteResult>,
}

#[derive(Debug, Deserialize)]
struct FourByteResult {
    text_signature: String,
}

pub struct FourByteDirectory {
    client: reqwest::Client,
    base: String,
    timeout: Duration,
}

impl FourByteDirectory {
    pub fn new(client: reqwest::Client, base: &str, timeout: Duration) -> Self {
        Self {
            client,
            base: trim_base(base),
            timeout,
        }
    }

    async fn try_lookup(&self, selector: Selector) -> Result<Vec<String>, SourceError> {
        let request = self
            .client
            .get(format!("{}/api/v1/signatures/", self.base))
            .query(&[("hex_signature", selector.to_string())]);
        let resp = send_json::<FourByteResponse>(NAME, request, self.timeout).await?;
        Ok(resp
            .map(|r| r.results.into_iter().map(|x| x.text_signature).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SignatureDirectory for FourByteDirectory {
    async fn lookup(&self, selector: Selector) -> Vec<String> {
        match self.try_lookup(selector).await {
            Ok(sigs) => sigs,
            Err(e) => {
                tracing::debug!(%selector, error = %e, "4byte: lookup failed");
                Vec::new()
            }
        }
    }
}

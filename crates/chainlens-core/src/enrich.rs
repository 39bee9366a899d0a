//! Selector → signature enrichment with a hard fan-out cap.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::selector::Selector;
use crate::source::SignatureDirectory;

/// Limits for one enrichment batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Only the first `max_selectors` selectors are looked up.
    #[serde(default = "default_max_selectors")]
    pub max_selectors: usize,
    /// Signatures kept per selector, in directory order.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Lookups in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_max_selectors() -> usize { 32 }
fn default_max_candidates() -> usize { 3 }
fn default_concurrency() -> usize { 6 }

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_selectors: default_max_selectors(),
            max_candidates: default_max_candidates(),
            concurrency: default_concurrency(),
        }
    }
}

/// Maps selectors to candidate signatures through a [`SignatureDirectory`].
#[derive(Clone)]
pub struct SignatureEnricher {
    directory: Arc<dyn SignatureDirectory>,
    config: EnrichConfig,
}

impl SignatureEnricher {
    pub fn new(directory: Arc<dyn SignatureDirectory>, config: EnrichConfig) -> Self {
        Self { directory, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Look up the first `max_selectors` selectors.
    ///
    /// The returned map has one key per input selector, in input order.
    /// Selectors past the cap, and lookups that failed, map to an empty list.
    pub async fn enrich(&self, selectors: &[Selector]) -> IndexMap<Selector, Vec<String>> {
        let limit = self.config.max_selectors.min(selectors.len());
        let keep = self.config.max_candidates;

        let found: Vec<(Selector, Vec<String>)> = stream::iter(selectors[..limit].iter().copied())
            .map(|selector| {
                let directory = Arc::clone(&self.directory);
                async move {
                    let mut sigs = directory.lookup(selector).await;
                    sigs.truncate(keep);
                    (selector, sigs)
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut out: IndexMap<Selector, Vec<String>> =
            selectors.iter().map(|s| (*s, Vec::new())).collect();
        for (selector, sigs) in found {
            out.insert(selector, sigs);
        }

        if selectors.len() > limit {
            tracing::debug!(
                total = selectors.len(),
                queried = limit,
                "selector list truncated before signature lookup"
            );
        }
        out
    }
}

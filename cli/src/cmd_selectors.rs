//! `chainlens selectors`: offline PUSH4 scan, optionally enriched.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chainlens_core::{extract_selectors, SignatureEnricher};
use chainlens_http::{build_client, ChainLensConfig, FourByteDirectory};

pub async fn run(bytecode: &str, lookup: Option<&ChainLensConfig>) -> Result<()> {
    let selectors = extract_selectors(bytecode);
    if selectors.is_empty() {
        println!("no PUSH4 selectors found");
        return Ok(());
    }

    let Some(config) = lookup else {
        for s in &selectors {
            println!("{s}");
        }
        return Ok(());
    };

    let directory = FourByteDirectory::new(
        build_client()?,
        &config.sources.fourbyte_url,
        Duration::from_millis(config.sources.fourbyte_timeout_ms),
    );
    let enricher = SignatureEnricher::new(Arc::new(directory), config.resolver.enrich.clone());
    let candidates = enricher.enrich(&selectors).await;
    for (s, sigs) in &candidates {
        if sigs.is_empty() {
            println!("{s}");
        } else {
            println!("{s}  {}", sigs.join(" | "));
        }
    }
    Ok(())
}

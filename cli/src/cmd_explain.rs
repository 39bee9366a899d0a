//! `chainlens explain`: resolve one contract and print it.

use anyhow::{Context, Result};
use chainlens_core::resolver::abi_functions;
use chainlens_core::{InterfaceBody, Mutability, ResolveError, ResolvedInterface};
use chainlens_http::ChainLensConfig;

pub async fn run(
    config: &ChainLensConfig,
    chain_id: Option<&str>,
    address: &str,
    as_json: bool,
) -> Result<()> {
    let resolver = config.build_resolver().context("building resolver")?;
    let resolved = match resolver.resolve(chain_id, address).await {
        Ok(r) => r,
        Err(e @ ResolveError::InvalidInput { .. }) => anyhow::bail!(e),
        Err(e @ ResolveError::NotFound { .. }) => {
            anyhow::bail!("{e} ({address} on chain {})", chain_id.unwrap_or("1"))
        }
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&*resolved)?);
    } else {
        print_human(&resolved);
    }
    Ok(())
}

fn print_human(r: &ResolvedInterface) {
    println!("Address: {}", r.address);
    println!("Chain:   {}", r.chain_id);
    println!("Source:  {}", r.source);
    if let Some(known) = &r.known {
        println!("Known:   {} ({})", known.name, known.category);
        println!("         {}", known.description);
    }
    println!();
    println!("{}", r.summary);
    if let Some(source) = r.oracle.as_ref().and_then(|o| o.source.as_deref()) {
        println!("  (oracle: {source})");
    }
    println!();

    match &r.body {
        InterfaceBody::Abi { abi } => {
            let functions = abi_functions(r);
            println!("Functions ({}):", functions.len());
            for f in &functions {
                let tag = match f.mutability {
                    Mutability::Read => "read ",
                    Mutability::Write => "write",
                };
                println!("  [{tag}] {}  {}", f.selector(), f.signature());
            }
            let events: Vec<_> = abi.iter().filter(|e| e.is_event()).collect();
            if !events.is_empty() {
                println!("Events ({}):", events.len());
                for e in events {
                    println!("  {}", e.signature());
                }
            }
        }
        InterfaceBody::Inferred {
            selectors,
            candidates,
            rpc_endpoint,
            ..
        } => {
            println!("Selectors ({}), code from {rpc_endpoint}:", selectors.len());
            for s in selectors {
                let names = candidates.get(s).map(|c| c.join(" | ")).unwrap_or_default();
                if names.is_empty() {
                    println!("  {s}");
                } else {
                    println!("  {s}  {names}");
                }
            }
        }
    }
}

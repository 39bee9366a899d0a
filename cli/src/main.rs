//! ChainLens CLI.
//!
//! # Commands
//! ```text
//! chainlens serve     [--bind 0.0.0.0:8080] [--config chainlens.yaml]
//! chainlens explain   --address <addr> [--chain-id 1] [--json] [--config <file>]
//! chainlens selectors --bytecode <hex> | --file <path> [--lookup]
//! chainlens summarize --abi <path.json>
//! chainlens chains    [--config <file>]
//! chainlens info
//! ```

use anyhow::{Context, Result};
use chainlens_http::ChainLensConfig;
use chainlens_observability::{init_tracing, LogConfig};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

mod cmd_explain;
mod cmd_selectors;

#[derive(Parser)]
#[command(
    name = "chainlens",
    about = "Explain what a smart contract does from its address",
    long_about = "
ChainLens: resolve a contract's interface from verified metadata (Sourcify),
a block explorer (Blockscout) or raw bytecode, and summarize it.

ENVIRONMENT VARIABLES:
  CHAINLENS_ORACLE_URL       Summary oracle base URL (optional)
  CHAINLENS_SOURCIFY_URL     Sourcify repository base URL
  CHAINLENS_FOURBYTE_URL     4byte.directory base URL
  CHAINLENS_RPC_<CHAIN>      Comma-separated RPC endpoints tried before the defaults
  RUST_LOG                   Overrides --log-level
",
    version
)]
struct Cli {
    /// Global log level: trace | debug | info | warn | error
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Per-crate level override, repeatable: --log-component chainlens-http=debug
    #[arg(long = "log-component", global = true, value_parser = parse_component)]
    log_components: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
        /// YAML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Resolve and summarize one contract
    Explain {
        /// Contract address (0x + 40 hex chars)
        #[arg(long)]
        address: String,
        /// EVM chain id (default: 1 = Ethereum mainnet)
        #[arg(long)]
        chain_id: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
        /// YAML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Extract PUSH4 selectors from bytecode
    Selectors {
        /// Hex bytecode, 0x prefix optional
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        bytecode: Option<String>,
        /// File containing hex bytecode
        #[arg(long)]
        file: Option<PathBuf>,
        /// Look up candidate signatures on 4byte.directory
        #[arg(long)]
        lookup: bool,
        /// YAML config file (for --lookup)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Summarize an ABI JSON file (bare array or compiler metadata)
    Summarize {
        #[arg(long)]
        abi: PathBuf,
    },

    /// List configured chains and their endpoints
    Chains {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show build and capability info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = cli
        .log_components
        .iter()
        .fold(LogConfig::default().with_level(&cli.log_level), |log, (component, level)| {
            log.with_component(component, level)
        });
    init_tracing(&log.json(cli.json_logs));

    match cli.command {
        Commands::Serve { bind, config } => cmd_serve(bind, config.as_deref()).await,

        Commands::Explain { address, chain_id, json, config } => {
            let config = load_config(config.as_deref())?;
            cmd_explain::run(&config, chain_id.as_deref(), &address, json).await
        }

        Commands::Selectors { bytecode, file, lookup, config } => {
            let code = match (bytecode, file) {
                (Some(hex), _) => hex,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?,
                (None, None) => anyhow::bail!("one of --bytecode or --file is required"),
            };
            let config = if lookup { Some(load_config(config.as_deref())?) } else { None };
            cmd_selectors::run(code.trim(), config.as_ref()).await
        }

        Commands::Summarize { abi } => cmd_summarize(&abi),

        Commands::Chains { config } => cmd_chains(&load_config(config.as_deref())?),

        Commands::Info => cmd_info(),
    }
}

fn parse_component(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((component, level)) if !component.is_empty() && !level.is_empty() => {
            Ok((component.to_string(), level.to_string()))
        }
        _ => Err(format!("expected <component>=<level>, got {raw:?}")),
    }
}

fn load_config(path: Option<&Path>) -> Result<ChainLensConfig> {
    ChainLensConfig::load(path).with_context(|| match path {
        Some(p) => format!("loading config from {}", p.display()),
        None => "loading default config".to_string(),
    })
}

// ─── Command implementations ─────────────────────────────────────────────────

async fn cmd_serve(bind: SocketAddr, config: Option<&Path>) -> Result<()> {
    use chainlens_server::{serve, shutdown_signal, AppState};
    use std::sync::Arc;

    let config = load_config(config)?;
    let resolver = config.build_resolver().context("building resolver")?;
    let state = AppState::new(Arc::new(resolver));
    serve(bind, state, shutdown_signal())
        .await
        .with_context(|| format!("serving on {bind}"))
}

fn cmd_summarize(path: &Path) -> Result<()> {
    use chainlens_core::summary::summarize_abi_json;

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let doc: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not JSON", path.display()))?;
    // compiler metadata keeps the ABI under output.abi
    let abi = doc.pointer("/output/abi").unwrap_or(&doc);
    println!("{}", summarize_abi_json(abi));
    Ok(())
}

fn cmd_chains(config: &ChainLensConfig) -> Result<()> {
    for chain in config.chains.iter() {
        println!("{chain}");
        println!(
            "  explorer: {}",
            chain.explorer.as_deref().unwrap_or("(none)")
        );
        for (i, rpc) in chain.rpc_endpoints.iter().enumerate() {
            println!("  rpc[{i}]:   {rpc}");
        }
    }
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("ChainLens v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Resolution order:");
    println!("  1. Verified metadata        (Sourcify full match)");
    println!("  2. Block explorer ABI       (Blockscout getabi)");
    println!("  3. Raw bytecode             (eth_getCode over RPC fallbacks)");
    println!("     + PUSH4 selector scan    + 4byte.directory candidates");
    println!();
    println!("Summaries:                    summary oracle when configured, local otherwise");
    println!("Cache:                        in-process LRU + TTL");
    println!("Known contracts:              {}", chainlens_core::known::len());
    println!("Default chains:               Ethereum, Base, Optimism, Polygon, Arbitrum");
    Ok(())
}

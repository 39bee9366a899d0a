//! Local axum stub servers standing in for the remote services.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chainlens_core::{ChainProfile, ChainTable, ContractQuery};
use tokio::net::TcpListener;

pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const USDC_LOWER: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn client() -> reqwest::Client {
    chainlens_http::build_client().expect("client")
}

pub fn chain(explorer: Option<&str>, rpc: &[&str]) -> ChainTable {
    ChainTable::new(vec![ChainProfile::new("1", "ethereum", explorer, rpc)])
}

pub fn query(chains: &ChainTable) -> ContractQuery {
    ContractQuery::parse(Some("1"), USDC, chains).expect("valid query")
}

pub const SHORT: Duration = Duration::from_millis(200);
pub const LONG: Duration = Duration::from_secs(5);

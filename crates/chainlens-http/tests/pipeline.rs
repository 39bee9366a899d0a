//! Config-built resolver against stubbed remote services.

mod common;

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chainlens_core::{ChainProfile, ChainTable, SourceKind};
use chainlens_http::ChainLensConfig;
use serde_json::{json, Value};

use common::*;

async fn stub_world(with_abi: bool, hits: Hits) -> String {
    let router = Router::new()
        .route(
            "/contracts/full_match/:chain/:address/metadata.json",
            get(|| async { StatusCode::NOT_FOUND }),
        )
        .route(
            "/api",
            get(move || async move {
                if with_abi {
                    Json(json!({
                        "status": "1",
                        "message": "OK",
                        "result": "[{\"type\":\"function\",\"name\":\"owner\",\"stateMutability\":\"view\",\"inputs\":[]}]"
                    }))
                } else {
                    Json(json!({"status": "0", "message": "NOTOK", "result": ""}))
                }
            }),
        )
        .route(
            "/rpc",
            post(|State(hits): State<Hits>, Json(body): Json<Value>| async move {
                hits.bump();
                Json(json!({"jsonrpc": "2.0", "id": body["id"].clone(), "result": "0x6000600063a9059cbb600052"}))
            }),
        )
        .route(
            "/api/v1/signatures/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let results = if params.get("hex_signature").map(String::as_str) == Some("0xa9059cbb") {
                    json!([{"text_signature": "transfer(address,uint256)"}])
                } else {
                    json!([])
                };
                Json(json!({"results": results}))
            }),
        )
        .with_state(hits);
    spawn(router).await
}

fn config(base: &str) -> ChainLensConfig {
    let mut cfg = ChainLensConfig::default();
    cfg.chains = ChainTable::new(vec![ChainProfile::new(
        "1",
        "ethereum",
        Some(base),
        &[format!("{base}/rpc").as_str()],
    )]);
    cfg.sources.sourcify_url = base.to_string();
    cfg.sources.fourbyte_url = base.to_string();
    cfg
}

#[tokio::test]
async fn unverified_contract_resolves_from_bytecode() {
    let hits = Hits::default();
    let base = stub_world(false, hits.clone()).await;
    let resolver = config(&base).build_resolver().unwrap();

    let r = resolver.resolve(Some("1"), USDC).await.unwrap();
    assert_eq!(r.source, SourceKind::RawBytecode);
    let json = serde_json::to_value(&*r).unwrap();
    assert_eq!(json["source"], "raw-bytecode");
    assert_eq!(json["selectors"], json!(["0xa9059cbb"]));
    assert_eq!(json["candidates"]["0xa9059cbb"], json!(["transfer(address,uint256)"]));
    assert_eq!(json["rpcEndpoint"], format!("{base}/rpc"));
    assert_eq!(json["known"]["name"], "USDC");
    assert!(json["oracle"].is_null());
    assert!(json["summary"].as_str().unwrap().contains("transfer(address,uint256)"));

    // served from cache: no second RPC call
    let again = resolver.resolve(None, USDC_LOWER).await.unwrap();
    assert_eq!(*again, *r);
    assert_eq!(hits.get(), 1);
}

#[tokio::test]
async fn explorer_abi_wins_over_bytecode() {
    let hits = Hits::default();
    let base = stub_world(true, hits.clone()).await;
    let resolver = config(&base).build_resolver().unwrap();

    let r = resolver.resolve(Some("1"), USDC).await.unwrap();
    assert_eq!(r.source, SourceKind::BlockExplorer);
    assert_eq!(r.abi().unwrap()[0].name, "owner");
    assert!(r.summary.contains("Ownership functions detected."));
    assert_eq!(hits.get(), 0);
}

#[tokio::test]
async fn nothing_anywhere_is_not_found() {
    let dead = dead_url().await;
    let mut cfg = config(&dead);
    cfg.sources.sourcify_timeout_ms = 200;
    cfg.sources.explorer_timeout_ms = 200;
    cfg.sources.rpc_timeout_ms = 200;
    let resolver = cfg.build_resolver().unwrap();

    let err = resolver.resolve(Some("1"), USDC).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Contract not found or no data available");
}

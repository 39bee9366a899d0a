//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chainlens_core::{OracleHealth, ResolvedInterface};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub const SERVICE_NAME: &str = "chainlens";

/// Body of `POST /api/explain`. `chainId` may be a string or a number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub chain_id: Option<Value>,
}

impl ExplainRequest {
    fn chain_id(&self) -> Result<Option<String>, ApiError> {
        match &self.chain_id {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) if n.is_u64() => Ok(Some(n.to_string())),
            Some(other) => Err(ApiError::bad_request(format!(
                "Invalid input: chainId must be a decimal chain id, got {other}"
            ))),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/explain", post(explain))
        .route("/api/oracle-health", get(oracle_health))
        .route("/health", get(health))
}

/// POST /api/explain
async fn explain(
    State(state): State<AppState>,
    body: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ResolvedInterface>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e.body_text())))?;
    let address = req
        .address
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Invalid input: address is required"))?;
    let chain_id = req.chain_id()?;

    let resolved = state
        .resolver
        .resolve(chain_id.as_deref(), address)
        .await
        .map_err(|e| {
            tracing::debug!(address, error = %e, "explain request failed");
            ApiError::from(e)
        })?;
    Ok(Json(ResolvedInterface::clone(&resolved)))
}

/// GET /api/oracle-health
async fn oracle_health(State(state): State<AppState>) -> Response {
    let health = match state.resolver.oracle() {
        Some(oracle) => oracle.health().await,
        None => OracleHealth::Offline,
    };
    match health {
        OracleHealth::Online(body) => {
            let mut out = json!({ "status": "online" });
            if let (Value::Object(out_map), Value::Object(extra)) = (&mut out, body) {
                for (k, v) in extra {
                    out_map.entry(k).or_insert(v);
                }
            }
            (StatusCode::OK, Json(out)).into_response()
        }
        OracleHealth::Offline => {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "offline" }))).into_response()
        }
    }
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "service": SERVICE_NAME }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use chainlens_core::{
        AbiEntry, AbiHit, AbiSource, BytecodeHit, BytecodeSource, ChainTable, ContractQuery,
        ContractResolver, OracleRequest, OracleSummary, ResolverConfig, Selector,
        SignatureDirectory, Sources, SummaryOracle,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    const ADDR: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    struct Verified {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AbiSource for Verified {
        fn name(&self) -> &str {
            "verified"
        }
        async fn fetch_abi(&self, query: &ContractQuery) -> Option<AbiHit> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.address() != ADDR.to_ascii_lowercase() {
                return None;
            }
            let parsed = AbiEntry::parse_lenient(&serde_json::json!([
                {"type": "function", "name": "totalSupply", "stateMutability": "view", "inputs": []}
            ]))?;
            Some(AbiHit::new(parsed, None))
        }
    }

    struct Nothing;

    #[async_trait]
    impl AbiSource for Nothing {
        fn name(&self) -> &str {
            "nothing"
        }
        async fn fetch_abi(&self, _query: &ContractQuery) -> Option<AbiHit> {
            None
        }
    }

    #[async_trait]
    impl BytecodeSource for Nothing {
        fn name(&self) -> &str {
            "nothing"
        }
        async fn fetch_code(&self, _query: &ContractQuery) -> Option<BytecodeHit> {
            None
        }
    }

    #[async_trait]
    impl SignatureDirectory for Nothing {
        async fn lookup(&self, _selector: Selector) -> Vec<String> {
            Vec::new()
        }
    }

    struct Oracle;

    #[async_trait]
    impl SummaryOracle for Oracle {
        async fn explain(&self, _request: &OracleRequest) -> Option<OracleSummary> {
            None
        }
        async fn health(&self) -> OracleHealth {
            OracleHealth::Online(json!({"model": "stub", "status": "ignored"}))
        }
    }

    fn app_with(oracle: Option<Arc<dyn SummaryOracle>>) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let sources = Sources {
            verified: Arc::new(Verified { calls: calls.clone() }),
            explorer: Arc::new(Nothing),
            bytecode: Arc::new(Nothing),
            directory: Arc::new(Nothing),
            oracle,
        };
        let resolver = ContractResolver::new(ChainTable::default(), sources, &ResolverConfig::default());
        (crate::app(AppState::new(Arc::new(resolver))), calls)
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/explain")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn explain_verified_contract() {
        let (app, _) = app_with(None);
        let (status, body) = call(app, post_json(&format!(r#"{{"address":"{ADDR}","chainId":1}}"#))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "verified-metadata");
        assert_eq!(body["chainId"], "1");
        assert_eq!(body["address"], ADDR.to_ascii_lowercase());
        assert_eq!(body["known"]["name"], "USDT (Tether)");
        assert_eq!(body["abi"][0]["name"], "totalSupply");
        assert!(body["oracle"].is_null());
    }

    #[tokio::test]
    async fn invalid_input_is_400_without_source_calls() {
        let (app, calls) = app_with(None);
        let bodies = vec![
            r#"{"address":"0x1234"}"#.to_string(),
            r#"{"chainId":"1"}"#.to_string(),
            format!(r#"{{"address":"{ADDR}","chainId":"999999"}}"#),
            format!(r#"{{"address":"{ADDR}","chainId":true}}"#),
            "not json".to_string(),
        ];
        for body in &bodies {
            let (status, json) = call(app.clone(), post_json(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert!(json["error"].is_string());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_contract_is_404() {
        let (app, _) = app_with(None);
        let (status, body) = call(
            app,
            post_json(r#"{"address":"0x0000000000000000000000000000000000000001"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Contract not found or no data available"}));
    }

    #[tokio::test]
    async fn oracle_health_offline_without_oracle() {
        let (app, _) = app_with(None);
        let (status, body) = call(app, get_req("/api/oracle-health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({"status": "offline"}));
    }

    #[tokio::test]
    async fn oracle_health_online_merges_body() {
        let (app, _) = app_with(Some(Arc::new(Oracle)));
        let (status, body) = call(app, get_req("/api/oracle-health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["model"], "stub");
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = app_with(None);
        let (status, body) = call(app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "service": "chainlens"}));
    }
}

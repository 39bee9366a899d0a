//! # chainlens-server
//!
//! JSON API over a shared [`ContractResolver`].
//!
//! | Route | Method | Responses |
//! |-------|--------|-----------|
//! | `/api/explain` | POST `{address, chainId?}` | 200 interface, 400 `{error}`, 404 `{error}` |
//! | `/api/oracle-health` | GET | 200 `{status: "online", ..}`, 503 `{status: "offline"}` |
//! | `/health` | GET | 200 `{ok: true, service: "chainlens"}` |

pub mod error;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chainlens_core::ContractResolver;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use routes::{ExplainRequest, SERVICE_NAME};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ContractResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<ContractResolver>) -> Self {
        Self { resolver }
    }
}

/// Full application: routes, permissive CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "chainlens server listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("chainlens server stopped");
    Ok(())
}

/// Resolves on Ctrl-C (and SIGTERM on unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

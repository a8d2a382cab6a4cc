use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::domain::listing::{CloseRequest, UpdateRequest};
use crate::error::Result;
use crate::http::error::{ApiError, panic_response};
use crate::registry::snapshot_cache::SnapshotCache;
use crate::registry::store::{Registry, RemoveOutcome};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared handles passed to every request.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    snapshots: Arc<SnapshotCache>,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, snapshots: Arc<SnapshotCache>, api_key: &str) -> Self {
        Self {
            registry,
            snapshots,
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(read_listings))
        .route("/update", any(update_listing))
        .route("/close", any(close_listing))
        .fallback(unknown_path)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves, then drain.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("Listener on {addr} stopped");
    Ok(())
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .map(HeaderValue::as_bytes);
    if presented != Some(state.api_key.as_bytes()) {
        tracing::debug!(path = %request.uri().path(), "Rejected request without valid API key");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}

async fn read_listings(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    let body = state.snapshots.read().map_err(ApiError::Internal)?;
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response())
}

async fn update_listing(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<&'static str, ApiError> {
    let req = UpdateRequest::from_slice(&body).map_err(ApiError::UpdateRejected)?;
    let outcome = state
        .registry
        .upsert(&req.id, &req.region, req.player_count)
        .map_err(ApiError::UpdateRejected)?;
    tracing::debug!(jobid = %req.id, players = req.player_count, ?outcome, "Listing updated");
    Ok("Updated")
}

async fn close_listing(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<&'static str, ApiError> {
    let req = CloseRequest::from_slice(&body).map_err(ApiError::CloseRejected)?;
    match state.registry.remove(&req.id) {
        RemoveOutcome::Removed => tracing::debug!(jobid = %req.id, "Listing closed"),
        RemoveOutcome::Absent => tracing::debug!(jobid = %req.id, "Close for unknown listing"),
    }
    Ok("Closed")
}

async fn unknown_path() -> ApiError {
    ApiError::UnknownPath
}

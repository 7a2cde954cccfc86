//! HTTP API surface: a single best-stories endpoint over the pipeline.

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::hn::{HnService, ServiceError, DEFAULT_STORY_COUNT, MAX_STORY_COUNT};
use crate::TARGET_HTTP_API;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HnService>,
    pub shutdown: CancellationToken,
}

/// Query parameters for the best-stories endpoint.
#[derive(Deserialize)]
pub struct StoriesQuery {
    count: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/stories/best", get(best_stories))
        .with_state(state)
}

/// Serve the API until the shutdown token is cancelled.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let shutdown = state.shutdown.clone();
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(target: TARGET_HTTP_API, "Server running on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    Ok(())
}

/// Handles `GET /stories/best?count=N`.
async fn best_stories(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Response {
    let count = clamp_count(query.count);

    // Requests in flight during shutdown are cancelled with the server.
    let cancel = state.shutdown.child_token();

    match state.service.get_best_stories(count, &cancel).await {
        Ok(stories) => Json(stories).into_response(),
        Err(ServiceError::Cancelled) => {
            warn!(target: TARGET_HTTP_API, "Best-stories request cancelled during shutdown");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

fn clamp_count(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_STORY_COUNT).clamp(1, MAX_STORY_COUNT)
}

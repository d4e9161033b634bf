//! HTTP API over the chat accessor.
//!
//! Routes:
//! - `GET /api/databases`             registered stores (name -> path)
//! - `GET /api/chats?db=NAME`         chat summaries, newest first
//! - `GET /api/chats/:chat_id?db=NAME` title and messages of one chat
//!
//! Errors are returned as `{"error": "..."}` with 400 for an unknown store,
//! 404 for an unknown chat and 500 for everything else.

use crate::chats::{ChatAccessor, ChatDetail, ChatSummary};
use crate::error::{ChatStoreError, ErrorKind};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct AppState {
    pub accessor: ChatAccessor,
    pub default_store: String,
}

#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    db: Option<String>,
}

impl StoreQuery {
    fn store<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.db.as_deref().unwrap_or(&state.default_store)
    }
}

/// Error response for a failed core call.
#[derive(Debug)]
pub struct ApiError(pub ChatStoreError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ChatStoreError::UnknownStore { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid database selected".to_string())
            }
            ChatStoreError::ChatNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Chat not found".to_string())
            }
            err => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Run a blocking core call off the async workers.
async fn call_blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> Result<T, ChatStoreError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(&state)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            match err.kind() {
                ErrorKind::NotFound => warn!("{}", err),
                _ => error!("{}", err),
            }
            Err(ApiError(err).into_response())
        }
        Err(join_err) => {
            error!("blocking task failed: {}", join_err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": join_err.to_string() })),
            )
                .into_response())
        }
    }
}

async fn api_databases(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, PathBuf>> {
    Json(state.accessor.locator().stores().as_map().clone())
}

async fn api_chats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StoreQuery>,
) -> Result<Json<Vec<ChatSummary>>, Response> {
    let summaries = call_blocking(state, move |s| {
        s.accessor.list_summaries(query.store(s))
    })
    .await?;
    Ok(Json(summaries))
}

async fn api_chat_detail(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Query(query): Query<StoreQuery>,
) -> Result<Json<ChatDetail>, Response> {
    let detail = call_blocking(state, move |s| {
        s.accessor.get_detail(query.store(s), &chat_id)
    })
    .await?;
    Ok(Json(detail))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/databases", get(api_databases))
        .route("/api/chats", get(api_chats))
        .route("/api/chats/:chat_id", get(api_chat_detail))
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    info!("Serving chat API at http://{}", addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

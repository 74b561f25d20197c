//! HTTP server mode for paginated table access

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::codec::parse_query;
use crate::database::DatabaseEngine;
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, Paginator};

/// App state shared across handlers
struct AppState {
    db: DatabaseEngine,
    paginator: Paginator,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router
pub fn router(db: DatabaseEngine, paginator: Paginator) -> Router {
    let state = AppState { db, paginator };

    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tables", get(list_tables))
        .route("/tables/:table", get(table_page))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(db: DatabaseEngine, paginator: Paginator, port: u16) -> Result<()> {
    let app = router(db, paginator);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// List tables of the served database
async fn list_tables(State(state): State<Arc<AppState>>) -> Response {
    let result = tokio::task::spawn_blocking(move || state.db.list_tables()).await;

    match result {
        Ok(Ok(tables)) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({ "tables": tables }))),
        )
            .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => join_error_response(&e),
    }
}

/// One page of a table
///
/// Query parameters: `key` (ordering column, required), `unique`
/// (default true), plus the paginator's page and anchor parameters. Every
/// parameter is carried over into the page links.
async fn table_page(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let query = query.unwrap_or_default();
    let result = tokio::task::spawn_blocking(move || state.page(&table, &query)).await;

    match result {
        Ok(Ok(page)) => (StatusCode::OK, Json(ApiResponse::success(page))).into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => join_error_response(&e),
    }
}

impl AppState {
    fn page(&self, table: &str, query: &str) -> Result<Value> {
        let pairs = parse_query(query);

        let key = param(&pairs, "key")
            .ok_or_else(|| Error::invalid_value("key", "query parameter is required"))?
            .to_string();
        let unique = param(&pairs, "unique").map_or(true, |value| {
            !matches!(value, "false" | "0" | "no")
        });

        let collection = self.db.table(table, &key, unique)?;
        let request: PageRequest<i64> = PageRequest::from_pairs(pairs, self.paginator.config());
        let page = self.paginator.paginate(&collection, &request)?;

        Ok(serde_json::to_value(&page)?)
    }
}

fn param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// HTTP status for an engine error
fn status_for(error: &Error) -> StatusCode {
    if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else if error.is_fatal_config() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(error: &Error) -> Response {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!("Request failed: {}", error);
    }
    (status, Json(ApiResponse::<()>::error(error.to_string()))).into_response()
}

fn join_error_response(error: &tokio::task::JoinError) -> Response {
    tracing::error!("Worker task failed: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(format!("Worker task failed: {error}"))),
    )
        .into_response()
}

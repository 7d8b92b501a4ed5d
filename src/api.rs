use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::registry::execute::execute_named;
use crate::registry::{catalog, CommandOutput};
use crate::state::AppState;

// ── Response types ───────────────────────────────────────────────

#[derive(Serialize)]
struct ApiOk<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ApiErr {
    ok: bool,
    error: AppError,
}

fn ok_json<T: Serialize>(data: T) -> impl IntoResponse {
    Json(ApiOk { ok: true, data })
}

fn err_json(error: AppError) -> impl IntoResponse {
    let status = match &error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::IoError { .. } | AppError::StorageError { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AppError::InvalidIndex { .. }
        | AppError::ValidationError { .. }
        | AppError::NoSelection => StatusCode::BAD_REQUEST,
    };
    (status, Json(ApiErr { ok: false, error }))
}

fn respond(result: Result<CommandOutput, AppError>) -> Response {
    match result {
        Ok(output) => ok_json(output).into_response(),
        Err(e) => err_json(e).into_response(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────

async fn post_command(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    // An empty body means "no params".
    let params = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                return err_json(AppError::ValidationError {
                    message: format!("Invalid JSON body: {e}"),
                })
                .into_response();
            }
        }
    };
    respond(execute_named(&state, &name, &params))
}

async fn get_commands() -> impl IntoResponse {
    ok_json(catalog::to_json_schema())
}

async fn get_script(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    respond(execute_named(&state, "get_script", &Value::Null))
}

// ── Server startup ───────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/command/{name}", post(post_command))
        .route("/api/commands", get(get_commands))
        .route("/api/script", get(get_script))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

/// Serve the session API on 127.0.0.1 until the process exits. Port 0 picks
/// a free port.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<(), String> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;
    let local = listener
        .local_addr()
        .map_err(|e| format!("Failed to get API server port: {e}"))?;
    tracing::info!(addr = %local, "API server listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| format!("API server error: {e}"))
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use tracing::warn;

use crate::board::models::{CardOrderRequest, ColumnOrderRequest};
use crate::board::store::StoreHandle;
use crate::errors::StoreError;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub store: StoreHandle,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ColumnNotFound { .. } => ApiError::NotFound(err.to_string()),
            e if e.is_invalid_request() => ApiError::BadRequest(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        }
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/board", get(get_board))
        .route("/api/columns/order", put(update_columns_order))
        .route(
            "/api/columns/{column_id}/cards/order",
            put(update_cards_order),
        )
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn get_board(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let board = state.store.call(|s| Ok(s.board().clone())).await?;
    Ok(Json(board))
}

async fn update_columns_order(
    State(state): State<SharedState>,
    Json(req): Json<ColumnOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .call(move |s| s.replace_column_order(&req.columns))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_cards_order(
    State(state): State<SharedState>,
    Path(column_id): Path<String>,
    Json(req): Json<CardOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .call(move |s| s.replace_card_order(&column_id, &req.cards))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

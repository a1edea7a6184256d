//! HTTP surface: `GET /health` and `POST /analyze`.
//!
//! Error bodies are `{"detail": "<message>"}`, which is what existing word-cloud frontends read.

use crate::config::ServerConfig;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wordcloud_core::{Error, FetchBackend, KeywordEntry};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn FetchBackend>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn FetchBackend>, config: ServerConfig) -> Self {
        Self {
            fetcher,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub words: Vec<KeywordEntry>,
}

/// Request failures, each mapped to one status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Upstream page could not be fetched (400).
    #[error("{0}")]
    BadRequest(String),
    /// Body, URL or page content is unusable (422).
    #[error("{0}")]
    Unprocessable(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        if !e.is_client_input() {
            return ApiError::BadRequest(format!("Failed to fetch article: {e}"));
        }
        match e {
            Error::InsufficientText => {
                ApiError::Unprocessable("Not enough text to analyze".to_string())
            }
            other => ApiError::Unprocessable(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let analysis = wordcloud_local::analyze(
        state.fetcher.as_ref(),
        &req.url,
        &state.config.analyze_config(),
    )
    .await?;
    Ok(Json(AnalyzeResponse {
        words: analysis.words,
    }))
}

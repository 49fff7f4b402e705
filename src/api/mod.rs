pub mod jobs;
pub mod search;
pub mod server;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::search::SearchError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

/// API error, rendered as an `ApiResponse` with a matching status / API错误
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or invalid input (400)
    BadRequest(String),
    /// Unknown job id (404)
    NotFound(String),
    /// Engine failure or unreachable (502)
    BadGateway(String),
    /// Engine did not answer in time (504)
    GatewayTimeout(String),
    /// Stored data could not be read (500)
    Internal(String),
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        let message = e.to_string();
        match e {
            SearchError::NotFound(_) => ApiError::NotFound(message),
            SearchError::Engine(_) => ApiError::BadGateway(message),
            SearchError::Timeout(_) => ApiError::GatewayTimeout(message),
            SearchError::Decode(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = ApiResponse::<()> {
            code: i32::from(status.as_u16()),
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the HTTP router / 构建路由
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/jobs", post(jobs::create_job))
        .route("/api/jobs/search", post(search::search_jobs))
        .route("/api/jobs/:id", get(jobs::get_job).delete(jobs::delete_job))
        .route("/api/jobs/:id/delete", post(jobs::delete_job))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse};
use crate::models::{SearchCriteria, SearchResult};
use crate::state::AppState;

/// POST /api/jobs/search - 搜索职位
///
/// Every criteria field is optional; `{}` lists all jobs.
pub async fn search_jobs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let Json(criteria) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    tracing::info!(
        "Searching jobs with query: {:?}, location: {:?}, skills: {:?}",
        criteria.query,
        criteria.location,
        criteria.skills
    );

    let result = state.gateway.search(&criteria).await.map_err(|e| {
        tracing::error!("Error searching jobs: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ApiResponse::success(result)))
}

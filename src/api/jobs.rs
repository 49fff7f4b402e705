use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse};
use crate::models::{Job, NewJob};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub id: String,
    pub message: String,
}

/// POST /api/jobs - 创建职位
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<Json<ApiResponse<CreateJobResponse>>, ApiError> {
    let Json(new_job) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    tracing::info!("Creating job: {}", new_job.title);

    new_job.validate().map_err(ApiError::BadRequest)?;

    let job = Job::from_new(new_job);
    state.gateway.create(&job).await.map_err(|e| {
        tracing::error!("Error creating job: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ApiResponse::success(CreateJobResponse {
        id: job.id,
        message: "Job created successfully".to_string(),
    })))
}

/// GET /api/jobs/:id - 获取职位详情
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Job>>, ApiError> {
    tracing::info!("Getting job with ID: {}", id);

    let job = state.gateway.get_by_id(&id).await.map_err(|e| {
        tracing::warn!("Error getting job: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ApiResponse::success(job)))
}

/// DELETE /api/jobs/:id, POST /api/jobs/:id/delete - 删除职位
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    tracing::info!("Deleting job with ID: {}", id);

    state.gateway.delete(&id).await.map_err(|e| {
        tracing::warn!("Error deleting job: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ApiResponse::success(()).with_message("Job deleted successfully")))
}

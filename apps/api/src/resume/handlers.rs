//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeStatistics};
use crate::resume::service::{
    CreateAiResumeRequest, CreateResumeRequest, ImportResumeRequest, UpdateResumeRequest,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Signed-in caller, if any. Absent means an anonymous visitor.
#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub set: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProfileImportRequest {
    pub profile_url: String,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.create(params.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// POST /api/v1/resumes/ai
pub async fn handle_create_ai(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<CreateAiResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.create_from_ai(params.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// POST /api/v1/resumes/import
pub async fn handle_import(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<ImportResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.import(params.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// POST /api/v1/resumes/import/profile
pub async fn handle_import_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileImportRequest>,
) -> Result<Json<Value>, AppError> {
    let profile = state.enricher.fetch_profile(&req.profile_url).await?;
    Ok(Json(profile))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.resumes.find_all(params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.find_one(id, Some(params.user_id)).await?))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.update(params.user_id, id, req).await?))
}

/// PATCH /api/v1/resumes/:id/lock
pub async fn handle_lock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<LockRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.lock(params.user_id, id, req.set).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.remove(params.user_id, id).await?))
}

/// GET /api/v1/resumes/:id/statistics
pub async fn handle_statistics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeStatistics>, AppError> {
    let resume = state.resumes.find_one(id, Some(params.user_id)).await?;
    Ok(Json(state.resumes.find_statistics(resume.id).await?))
}

/// GET /api/v1/resumes/:id/print
pub async fn handle_print(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ViewerQuery>,
) -> Result<Json<UrlResponse>, AppError> {
    let resume = state.resumes.find_readable(id, params.viewer_id).await?;
    let url = state.resumes.print_resume(&resume, params.viewer_id).await?;
    Ok(Json(UrlResponse { url }))
}

/// GET /api/v1/resumes/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UrlResponse>, AppError> {
    let resume = state.resumes.find_one(id, Some(params.user_id)).await?;
    let url = state.resumes.print_preview(&resume).await?;
    Ok(Json(UrlResponse { url }))
}

/// GET /api/v1/resumes/public/:username/:slug
pub async fn handle_get_public(
    State(state): State<AppState>,
    Path((username, slug)): Path<(String, String)>,
    Query(params): Query<ViewerQuery>,
) -> Result<Json<Resume>, AppError> {
    let resume = state
        .resumes
        .find_public_by_slug(&username, &slug, params.viewer_id)
        .await?;
    Ok(Json(resume))
}

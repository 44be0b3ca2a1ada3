use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::matching::handlers::DataResponse;
use crate::matching::service::{CandidateDetail, JobDetail};
use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::models::skill::{SkillEdge, SkillRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SkillDetail {
    #[serde(flatten)]
    pub skill: SkillRow,
    pub related_skills: Vec<SkillEdge>,
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<SkillRow>>>, AppError> {
    let data = state.store.list_skills().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<SkillDetail>>, AppError> {
    let skill = state
        .store
        .get_skill(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {id} not found")))?;
    let related_skills = state.store.related_skills(&[id]).await?;
    Ok(Json(DataResponse {
        data: SkillDetail {
            skill,
            related_skills,
        },
    }))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<CandidateRow>>>, AppError> {
    let data = state.store.list_candidates().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<CandidateDetail>>, AppError> {
    let data = state.matcher.candidate_detail(id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<JobRow>>>, AppError> {
    let data = state.store.list_jobs().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<JobDetail>>, AppError> {
    let data = state.matcher.job_detail(id).await?;
    Ok(Json(DataResponse { data }))
}

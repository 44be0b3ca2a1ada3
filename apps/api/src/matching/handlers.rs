//! Axum route handlers for the Match API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::batch::PairFailure;
use crate::matching::service::{MatchDetail, RankedCandidate, RankedJob};
use crate::models::match_result::MatchResultRow;
use crate::state::AppState;

const MAX_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CalculateMatchRequest {
    pub candidate_id: i64,
    pub job_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub candidate_ids: Vec<i64>,
    pub job_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub data: Vec<MatchResultRow>,
    pub failures: Vec<PairFailure>,
}

fn resolve_limit(requested: Option<i64>, default_limit: i64) -> Result<i64, AppError> {
    let limit = requested.unwrap_or(default_limit);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matches/calculate
pub async fn handle_calculate_match(
    State(state): State<AppState>,
    Json(request): Json<CalculateMatchRequest>,
) -> Result<Json<DataResponse<MatchResultRow>>, AppError> {
    let data = state
        .matcher
        .calculate_match(request.candidate_id, request.job_id)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/matches/batch-calculate
///
/// Scores every (candidate, job) pair. Pairs that fail to persist are listed
/// under `failures`; the rest are still returned.
pub async fn handle_batch_calculate(
    State(state): State<AppState>,
    Json(request): Json<BatchMatchRequest>,
) -> Result<Json<BatchMatchResponse>, AppError> {
    let outcome = state
        .matcher
        .calculate_batch(&request.candidate_ids, &request.job_ids)
        .await?;
    Ok(Json(BatchMatchResponse {
        data: outcome.results,
        failures: outcome.failures,
    }))
}

/// GET /api/v1/matches/:id
pub async fn handle_get_match(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<MatchDetail>>, AppError> {
    let data = state.matcher.match_details(id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/jobs/:id/matching-candidates
pub async fn handle_matching_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<DataResponse<Vec<RankedCandidate>>>, AppError> {
    let limit = resolve_limit(query.limit, state.config.top_matches_default_limit)?;
    let data = state.matcher.top_candidates_for_job(job_id, limit).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/candidates/:id/matching-jobs
pub async fn handle_matching_jobs(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<DataResponse<Vec<RankedJob>>>, AppError> {
    let limit = resolve_limit(query.limit, state.config.top_matches_default_limit)?;
    let data = state
        .matcher
        .top_jobs_for_candidate(candidate_id, limit)
        .await?;
    Ok(Json(DataResponse { data }))
}

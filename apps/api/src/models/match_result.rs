use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::matching::engine::MatchBreakdown;

/// Persisted match between one candidate and one job. Unique per (candidate_id, job_id).
/// `breakdown` is stored opaquely as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchResultRow {
    pub id: i64,
    pub candidate_id: i64,
    pub job_id: i64,
    pub overall_score: f64,
    pub required_score: f64,
    pub preferred_score: f64,
    pub experience_score: f64,
    pub breakdown: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by an upsert. Timestamps are managed by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMatchResult {
    pub candidate_id: i64,
    pub job_id: i64,
    pub overall_score: f64,
    pub required_score: f64,
    pub preferred_score: f64,
    pub experience_score: f64,
    pub breakdown: MatchBreakdown,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub years_experience: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `candidate_skills` row joined with the skill name.
/// Unique per (candidate_id, skill_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateSkillEntry {
    pub candidate_id: i64,
    pub skill_id: i64,
    pub skill_name: String,
    /// 1 – 5
    pub proficiency_level: i32,
    pub years_experience: i32,
    pub last_used_date: Option<NaiveDate>,
}

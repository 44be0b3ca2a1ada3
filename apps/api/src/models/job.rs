use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub years_experience_required: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of `job_required_skills` or `job_preferred_skills`, joined with the skill name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSkillRequirement {
    pub job_id: i64,
    pub skill_id: i64,
    pub skill_name: String,
    pub importance_weight: i32,
    pub minimum_years: i32,
}

/// Both requirement sets of a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    pub required: Vec<JobSkillRequirement>,
    pub preferred: Vec<JobSkillRequirement>,
}

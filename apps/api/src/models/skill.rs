use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub popularity: f64,
    pub is_growing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One directed row of `skill_relationships`, joined with the related skill's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillEdge {
    pub skill_id: i64,
    pub related_skill_id: i64,
    pub related_skill_name: String,
    pub similarity_score: f64,
}

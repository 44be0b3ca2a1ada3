use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use crate::models::candidate::{CandidateRow, CandidateSkillEntry};
use crate::models::job::{JobRequirements, JobRow, JobSkillRequirement};
use crate::models::match_result::{MatchResultRow, NewMatchResult};
use crate::models::skill::{SkillEdge, SkillRow};
use crate::store::{MatchStore, StoreError};

/// `MatchStore` backed by the PostgreSQL schema (`skills`, `skill_relationships`,
/// `candidates`, `candidate_skills`, `jobs`, `job_required_skills`,
/// `job_preferred_skills`, `match_results`).
#[derive(Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn requirements_from(
        &self,
        table: &str,
        job_id: i64,
    ) -> Result<Vec<JobSkillRequirement>, StoreError> {
        let sql = format!(
            r#"
            SELECT r.job_id, r.skill_id, s.name AS skill_name,
                   r.importance_weight, r.minimum_years
            FROM {table} r
            JOIN skills s ON s.id = r.skill_id
            WHERE r.job_id = $1
            ORDER BY r.skill_id
            "#
        );
        Ok(sqlx::query_as::<_, JobSkillRequirement>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn list_skills(&self) -> Result<Vec<SkillRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, SkillRow>("SELECT * FROM skills ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_skill(&self, skill_id: i64) -> Result<Option<SkillRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = $1")
                .bind(skill_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn related_skills(&self, skill_ids: &[i64]) -> Result<Vec<SkillEdge>, StoreError> {
        if skill_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, SkillEdge>(
            r#"
            SELECT sr.skill_id, sr.related_skill_id, s.name AS related_skill_name,
                   sr.similarity_score
            FROM skill_relationships sr
            JOIN skills s ON s.id = sr.related_skill_id
            WHERE sr.skill_id = ANY($1)
            ORDER BY sr.skill_id, sr.related_skill_id
            "#,
        )
        .bind(skill_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_candidate(&self, candidate_id: i64) -> Result<Option<CandidateRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_candidates(&self, ids: &[i64]) -> Result<Vec<CandidateRow>, StoreError> {
        Ok(sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn candidate_skills(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateSkillEntry>, StoreError> {
        Ok(sqlx::query_as::<_, CandidateSkillEntry>(
            r#"
            SELECT cs.candidate_id, cs.skill_id, s.name AS skill_name,
                   cs.proficiency_level, cs.years_experience, cs.last_used_date
            FROM candidate_skills cs
            JOIN skills s ON s.id = cs.skill_id
            WHERE cs.candidate_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_job(&self, job_id: i64) -> Result<Option<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_jobs(&self, ids: &[i64]) -> Result<Vec<JobRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn job_requirements(&self, job_id: i64) -> Result<JobRequirements, StoreError> {
        Ok(JobRequirements {
            required: self.requirements_from("job_required_skills", job_id).await?,
            preferred: self.requirements_from("job_preferred_skills", job_id).await?,
        })
    }

    #[instrument(skip(self, result), fields(candidate_id = result.candidate_id, job_id = result.job_id))]
    async fn upsert_match_result(
        &self,
        result: &NewMatchResult,
    ) -> Result<MatchResultRow, StoreError> {
        Ok(sqlx::query_as::<_, MatchResultRow>(
            r#"
            INSERT INTO match_results
                (candidate_id, job_id, overall_score, required_score,
                 preferred_score, experience_score, breakdown)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (candidate_id, job_id) DO UPDATE SET
                overall_score = EXCLUDED.overall_score,
                required_score = EXCLUDED.required_score,
                preferred_score = EXCLUDED.preferred_score,
                experience_score = EXCLUDED.experience_score,
                breakdown = EXCLUDED.breakdown,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(result.candidate_id)
        .bind(result.job_id)
        .bind(result.overall_score)
        .bind(result.required_score)
        .bind(result.preferred_score)
        .bind(result.experience_score)
        .bind(Json(&result.breakdown))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_match_result(&self, id: i64) -> Result<Option<MatchResultRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, MatchResultRow>("SELECT * FROM match_results WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn top_results_for_job(
        &self,
        job_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchResultRow>, StoreError> {
        Ok(sqlx::query_as::<_, MatchResultRow>(
            r#"
            SELECT * FROM match_results
            WHERE job_id = $1
            ORDER BY overall_score DESC, id ASC
            LIMIT $2
            "#,
        )
        .bind(job_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn top_results_for_candidate(
        &self,
        candidate_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchResultRow>, StoreError> {
        Ok(sqlx::query_as::<_, MatchResultRow>(
            r#"
            SELECT * FROM match_results
            WHERE candidate_id = $1
            ORDER BY overall_score DESC, id ASC
            LIMIT $2
            "#,
        )
        .bind(candidate_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}

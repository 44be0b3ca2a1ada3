//! Persistence boundary for the matcher.
//!
//! Scoring never touches the database directly: the service reads read-only
//! snapshots through `MatchStore` and writes back exactly one upsert per pair.
//! `AppState` carries an `Arc<dyn MatchStore>`; production uses `PgMatchStore`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::candidate::{CandidateRow, CandidateSkillEntry};
use crate::models::job::{JobRequirements, JobRow};
use crate::models::match_result::{MatchResultRow, NewMatchResult};
use crate::models::skill::{SkillEdge, SkillRow};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgMatchStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Raised by the in-memory store used in tests.
    #[cfg(test)]
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn list_skills(&self) -> Result<Vec<SkillRow>, StoreError>;

    async fn get_skill(&self, skill_id: i64) -> Result<Option<SkillRow>, StoreError>;

    /// 1-hop outgoing edges for every skill in `skill_ids`.
    async fn related_skills(&self, skill_ids: &[i64]) -> Result<Vec<SkillEdge>, StoreError>;

    async fn list_candidates(&self) -> Result<Vec<CandidateRow>, StoreError>;

    async fn get_candidate(&self, candidate_id: i64) -> Result<Option<CandidateRow>, StoreError>;

    /// Candidates whose id is in `ids`. Unknown ids are simply absent from the result.
    async fn get_candidates(&self, ids: &[i64]) -> Result<Vec<CandidateRow>, StoreError>;

    /// Skill entries of one candidate, ordered by skill name.
    async fn candidate_skills(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateSkillEntry>, StoreError>;

    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError>;

    async fn get_job(&self, job_id: i64) -> Result<Option<JobRow>, StoreError>;

    async fn get_jobs(&self, ids: &[i64]) -> Result<Vec<JobRow>, StoreError>;

    async fn job_requirements(&self, job_id: i64) -> Result<JobRequirements, StoreError>;

    /// Inserts or replaces the result keyed by (candidate_id, job_id).
    /// Must be a single atomic write.
    async fn upsert_match_result(
        &self,
        result: &NewMatchResult,
    ) -> Result<MatchResultRow, StoreError>;

    async fn get_match_result(&self, id: i64) -> Result<Option<MatchResultRow>, StoreError>;

    /// Stored results for a job, highest overall score first.
    async fn top_results_for_job(
        &self,
        job_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchResultRow>, StoreError>;

    /// Stored results for a candidate, highest overall score first.
    async fn top_results_for_candidate(
        &self,
        candidate_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchResultRow>, StoreError>;
}

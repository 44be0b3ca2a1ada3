// Skill matching engine.
// Scoring (recency → skill → category → overall) is pure; only `engine::calculate_match`
// writes, through the `MatchStore` boundary.

pub mod batch;
pub mod category;
pub mod engine;
pub mod experience;
pub mod graph;
pub mod handlers;
pub mod profile;
pub mod recency;
pub mod service;
pub mod skill_scorer;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Candidate {0} not found")]
    CandidateNotFound(i64),

    #[error("Job {0} not found")]
    JobNotFound(i64),

    #[error("Match result {0} not found")]
    MatchNotFound(i64),

    #[error("Unknown {entity} ids: {ids:?}")]
    MissingIds { entity: &'static str, ids: Vec<i64> },

    #[error("{0}")]
    InvalidInput(String),

    /// The store error stays in `source`; the message only names the pair.
    #[error("failed to persist match for candidate {candidate_id} / job {job_id}")]
    Persistence {
        candidate_id: i64,
        job_id: i64,
        #[source]
        source: StoreError,
    },

    #[error("batch worker pool unavailable: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

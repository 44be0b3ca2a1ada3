//! MatchService: loads read-only snapshots through the store, hands them to the
//! engine or the batch matcher, and serves ranked lookups of stored results.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::matching::batch::{BatchInput, BatchMatcher, BatchMode, BatchOutcome};
use crate::matching::engine::{CandidateSnapshot, JobSnapshot, MatchEngine};
use crate::matching::graph::SkillGraph;
use crate::matching::MatchError;
use crate::models::candidate::{CandidateRow, CandidateSkillEntry};
use crate::models::job::{JobRow, JobSkillRequirement};
use crate::models::match_result::MatchResultRow;
use crate::store::MatchStore;

/// Upper bound on candidates × jobs (after de-duplication) for one batch call.
pub const MAX_BATCH_PAIRS: usize = 10_000;

/// A stored result joined with the candidate it ranks.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub result: MatchResultRow,
    pub candidate: CandidateRow,
}

/// A stored result joined with the job it ranks.
#[derive(Debug, Clone, Serialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub result: MatchResultRow,
    pub job: JobRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub result: MatchResultRow,
    pub candidate: CandidateRow,
    pub job: JobRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub skills: Vec<CandidateSkillEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobRow,
    pub required_skills: Vec<JobSkillRequirement>,
    pub preferred_skills: Vec<JobSkillRequirement>,
}

pub struct MatchService {
    store: Arc<dyn MatchStore>,
    engine: Arc<MatchEngine>,
    batch: BatchMatcher,
}

impl MatchService {
    pub fn new(store: Arc<dyn MatchStore>, engine: MatchEngine, mode: BatchMode) -> Self {
        let engine = Arc::new(engine);
        let batch = BatchMatcher::new(Arc::clone(&engine), Arc::clone(&store), mode);
        Self {
            store,
            engine,
            batch,
        }
    }

    pub fn batch_mode(&self) -> BatchMode {
        self.batch.mode()
    }

    /// CalculateMatch: score one pair and upsert the result.
    #[instrument(skip(self))]
    pub async fn calculate_match(
        &self,
        candidate_id: i64,
        job_id: i64,
    ) -> Result<MatchResultRow, MatchError> {
        let candidate = self.load_candidate(candidate_id).await?;
        let job = self.load_job(job_id).await?;
        let graph = self
            .load_graph(job.requirement_skill_ids().collect())
            .await?;
        let today = Utc::now().date_naive();

        self.engine
            .calculate_match(self.store.as_ref(), &candidate, &job, &graph, today)
            .await
    }

    /// CalculateBatchMatches: score the full cross product of the given ids.
    ///
    /// Every id must exist; snapshots and the skill graph are loaded before any
    /// pair is scored. Per-pair write failures come back in `BatchOutcome::failures`.
    pub async fn calculate_batch(
        &self,
        candidate_ids: &[i64],
        job_ids: &[i64],
    ) -> Result<BatchOutcome, MatchError> {
        if candidate_ids.is_empty() {
            return Err(MatchError::InvalidInput(
                "candidate_ids cannot be empty".to_string(),
            ));
        }
        if job_ids.is_empty() {
            return Err(MatchError::InvalidInput(
                "job_ids cannot be empty".to_string(),
            ));
        }

        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        let candidate_ids = unique_ids(candidate_ids);
        let job_ids = unique_ids(job_ids);
        let requested_pairs = candidate_ids.len().saturating_mul(job_ids.len());
        if requested_pairs > MAX_BATCH_PAIRS {
            return Err(MatchError::InvalidInput(format!(
                "batch of {requested_pairs} pairs exceeds the limit of {MAX_BATCH_PAIRS}"
            )));
        }

        let candidates = self.store.get_candidates(&candidate_ids).await?;
        ensure_all_found("candidate", &candidate_ids, candidates.iter().map(|c| c.id))?;
        let jobs = self.store.get_jobs(&job_ids).await?;
        ensure_all_found("job", &job_ids, jobs.iter().map(|j| j.id))?;

        let mut candidate_snapshots = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let skills = self.store.candidate_skills(candidate.id).await?;
            candidate_snapshots.push(Arc::new(CandidateSnapshot { candidate, skills }));
        }

        let mut job_snapshots = Vec::with_capacity(jobs.len());
        for job in jobs {
            let requirements = self.store.job_requirements(job.id).await?;
            job_snapshots.push(Arc::new(JobSnapshot {
                job,
                required: requirements.required,
                preferred: requirements.preferred,
            }));
        }

        let skill_ids = job_snapshots
            .iter()
            .flat_map(|j| j.requirement_skill_ids())
            .collect();
        let graph = self.load_graph(skill_ids).await?;

        let input = BatchInput {
            candidates: candidate_snapshots,
            jobs: job_snapshots,
            graph: Arc::new(graph),
            today: Utc::now().date_naive(),
        };
        let pairs = input.pair_count();
        let outcome = self.batch.run(input).await;

        info!(
            %batch_id,
            pairs,
            succeeded = outcome.results.len(),
            failed = outcome.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch match complete"
        );
        Ok(outcome)
    }

    /// TopCandidatesForJob: stored results for the job, best first.
    pub async fn top_candidates_for_job(
        &self,
        job_id: i64,
        limit: i64,
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or(MatchError::JobNotFound(job_id))?;

        let results = self.store.top_results_for_job(job_id, limit).await?;
        let ids: Vec<i64> = results.iter().map(|r| r.candidate_id).collect();
        let mut candidates: HashMap<i64, CandidateRow> = self
            .store
            .get_candidates(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(results
            .into_iter()
            .filter_map(|result| {
                let candidate = candidates.remove(&result.candidate_id)?;
                Some(RankedCandidate { result, candidate })
            })
            .collect())
    }

    /// TopJobsForCandidate: stored results for the candidate, best first.
    pub async fn top_jobs_for_candidate(
        &self,
        candidate_id: i64,
        limit: i64,
    ) -> Result<Vec<RankedJob>, MatchError> {
        self.store
            .get_candidate(candidate_id)
            .await?
            .ok_or(MatchError::CandidateNotFound(candidate_id))?;

        let results = self
            .store
            .top_results_for_candidate(candidate_id, limit)
            .await?;
        let ids: Vec<i64> = results.iter().map(|r| r.job_id).collect();
        let mut jobs: HashMap<i64, JobRow> = self
            .store
            .get_jobs(&ids)
            .await?
            .into_iter()
            .map(|j| (j.id, j))
            .collect();

        Ok(results
            .into_iter()
            .filter_map(|result| {
                let job = jobs.remove(&result.job_id)?;
                Some(RankedJob { result, job })
            })
            .collect())
    }

    pub async fn match_details(&self, id: i64) -> Result<MatchDetail, MatchError> {
        let result = self
            .store
            .get_match_result(id)
            .await?
            .ok_or(MatchError::MatchNotFound(id))?;
        let candidate = self
            .store
            .get_candidate(result.candidate_id)
            .await?
            .ok_or(MatchError::CandidateNotFound(result.candidate_id))?;
        let job = self
            .store
            .get_job(result.job_id)
            .await?
            .ok_or(MatchError::JobNotFound(result.job_id))?;
        Ok(MatchDetail {
            result,
            candidate,
            job,
        })
    }

    pub async fn candidate_detail(&self, candidate_id: i64) -> Result<CandidateDetail, MatchError> {
        let snapshot = self.load_candidate(candidate_id).await?;
        Ok(CandidateDetail {
            candidate: snapshot.candidate,
            skills: snapshot.skills,
        })
    }

    pub async fn job_detail(&self, job_id: i64) -> Result<JobDetail, MatchError> {
        let snapshot = self.load_job(job_id).await?;
        Ok(JobDetail {
            job: snapshot.job,
            required_skills: snapshot.required,
            preferred_skills: snapshot.preferred,
        })
    }

    async fn load_candidate(&self, candidate_id: i64) -> Result<CandidateSnapshot, MatchError> {
        let candidate = self
            .store
            .get_candidate(candidate_id)
            .await?
            .ok_or(MatchError::CandidateNotFound(candidate_id))?;
        let skills = self.store.candidate_skills(candidate_id).await?;
        Ok(CandidateSnapshot { candidate, skills })
    }

    async fn load_job(&self, job_id: i64) -> Result<JobSnapshot, MatchError> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or(MatchError::JobNotFound(job_id))?;
        let requirements = self.store.job_requirements(job_id).await?;
        Ok(JobSnapshot {
            job,
            required: requirements.required,
            preferred: requirements.preferred,
        })
    }

    async fn load_graph(&self, skill_ids: BTreeSet<i64>) -> Result<SkillGraph, MatchError> {
        let skill_ids: Vec<i64> = skill_ids.into_iter().collect();
        let edges = self.store.related_skills(&skill_ids).await?;
        let graph = SkillGraph::from_edges(edges);
        debug!(
            skills = skill_ids.len(),
            edges = graph.edge_count(),
            "skill graph loaded"
        );
        Ok(graph)
    }
}

/// Deduplicated, ascending.
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

fn ensure_all_found(
    entity: &'static str,
    requested: &[i64],
    found: impl Iterator<Item = i64>,
) -> Result<(), MatchError> {
    let found: BTreeSet<i64> = found.collect();
    let missing: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MatchError::MissingIds {
            entity,
            ids: missing,
        })
    }
}

//! BatchMatcher: fans the candidate × job cross product out over a bounded worker pool.
//!
//! Pairs are independent: each one builds its own profile, reads the shared
//! read-only graph, and performs its own upsert. Failed pairs are collected next
//! to the successful ones so `results.len() + failures.len()` always equals the
//! number of pairs.
//!
//! Dropping the future returned by `run` aborts outstanding workers (the `JoinSet`
//! is dropped with it). Each upsert is one atomic statement, so an aborted pair
//! leaves either its previous result or nothing.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::matching::engine::{CandidateSnapshot, JobSnapshot, MatchEngine};
use crate::matching::graph::SkillGraph;
use crate::matching::MatchError;
use crate::models::match_result::MatchResultRow;
use crate::store::MatchStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Sequential,
    Concurrent { workers: usize },
}

impl BatchMode {
    /// 1 (or 0) worker runs pairs inline; anything larger uses a pool of that size.
    pub fn from_workers(workers: usize) -> Self {
        if workers <= 1 {
            BatchMode::Sequential
        } else {
            BatchMode::Concurrent { workers }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairFailure {
    pub candidate_id: i64,
    pub job_id: i64,
    pub error: String,
}

/// Results sorted by (candidate_id, job_id), independent of execution order.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<MatchResultRow>,
    pub failures: Vec<PairFailure>,
}

impl BatchOutcome {
    fn push(&mut self, candidate_id: i64, job_id: i64, outcome: Result<MatchResultRow, MatchError>) {
        match outcome {
            Ok(row) => self.results.push(row),
            Err(err) => {
                warn!(candidate_id, job_id, error = %err, "batch pair failed");
                self.failures.push(PairFailure {
                    candidate_id,
                    job_id,
                    error: err.to_string(),
                });
            }
        }
    }

    fn sort(&mut self) {
        self.results.sort_by_key(|r| (r.candidate_id, r.job_id));
        self.failures.sort_by_key(|f| (f.candidate_id, f.job_id));
    }
}

/// Everything a batch needs, loaded up front and shared read-only.
pub struct BatchInput {
    pub candidates: Vec<Arc<CandidateSnapshot>>,
    pub jobs: Vec<Arc<JobSnapshot>>,
    pub graph: Arc<SkillGraph>,
    pub today: NaiveDate,
}

impl BatchInput {
    pub fn pair_count(&self) -> usize {
        self.candidates.len() * self.jobs.len()
    }
}

pub struct BatchMatcher {
    engine: Arc<MatchEngine>,
    store: Arc<dyn MatchStore>,
    mode: BatchMode,
}

impl BatchMatcher {
    pub fn new(engine: Arc<MatchEngine>, store: Arc<dyn MatchStore>, mode: BatchMode) -> Self {
        Self {
            engine,
            store,
            mode,
        }
    }

    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    pub async fn run(&self, input: BatchInput) -> BatchOutcome {
        let mut outcome = match self.mode {
            BatchMode::Sequential => self.run_sequential(&input).await,
            BatchMode::Concurrent { workers } => self.run_concurrent(&input, workers).await,
        };
        outcome.sort();
        outcome
    }

    async fn run_sequential(&self, input: &BatchInput) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for candidate in &input.candidates {
            for job in &input.jobs {
                let result = self
                    .engine
                    .calculate_match(
                        self.store.as_ref(),
                        candidate,
                        job,
                        &input.graph,
                        input.today,
                    )
                    .await;
                outcome.push(candidate.candidate.id, job.job.id, result);
            }
        }
        outcome
    }

    async fn run_concurrent(&self, input: &BatchInput, workers: usize) -> BatchOutcome {
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        let mut pending: HashSet<(i64, i64)> = HashSet::with_capacity(input.pair_count());

        for candidate in &input.candidates {
            for job in &input.jobs {
                let key = (candidate.candidate.id, job.job.id);
                pending.insert(key);

                let semaphore = Arc::clone(&semaphore);
                let engine = Arc::clone(&self.engine);
                let store = Arc::clone(&self.store);
                let candidate = Arc::clone(candidate);
                let job = Arc::clone(job);
                let graph = Arc::clone(&input.graph);
                let today = input.today;

                tasks.spawn(async move {
                    let result = match semaphore.acquire_owned().await {
                        Ok(_permit) => {
                            engine
                                .calculate_match(store.as_ref(), &candidate, &job, &graph, today)
                                .await
                        }
                        Err(closed) => Err(MatchError::WorkerPool(closed.to_string())),
                    };
                    (key, result)
                });
            }
        }

        let mut outcome = BatchOutcome::default();
        let mut worker_errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(((candidate_id, job_id), result)) => {
                    pending.remove(&(candidate_id, job_id));
                    outcome.push(candidate_id, job_id, result);
                }
                Err(join_err) => worker_errors.push(join_err.to_string()),
            }
        }

        // A panicked worker loses its key; whatever is still pending belongs to one.
        let reason = worker_errors
            .first()
            .cloned()
            .unwrap_or_else(|| "worker task failed".to_string());
        for (candidate_id, job_id) in pending {
            warn!(candidate_id, job_id, %reason, "batch worker did not complete");
            outcome.failures.push(PairFailure {
                candidate_id,
                job_id,
                error: format!("worker task failed: {reason}"),
            });
        }

        outcome
    }
}

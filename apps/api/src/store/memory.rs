//! In-memory `MatchStore` used by unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::models::candidate::{CandidateRow, CandidateSkillEntry};
use crate::models::job::{JobRequirements, JobRow, JobSkillRequirement};
use crate::models::match_result::{MatchResultRow, NewMatchResult};
use crate::models::skill::{SkillEdge, SkillRow};
use crate::store::{MatchStore, StoreError};

#[derive(Default)]
struct State {
    skills: BTreeMap<i64, SkillRow>,
    edges: Vec<(i64, i64, f64)>,
    candidates: BTreeMap<i64, CandidateRow>,
    candidate_skills: Vec<CandidateSkillEntry>,
    jobs: BTreeMap<i64, JobRow>,
    required: Vec<JobSkillRequirement>,
    preferred: Vec<JobSkillRequirement>,
    results: BTreeMap<(i64, i64), MatchResultRow>,
    next_result_id: i64,
    upserts: usize,
    failing_pairs: HashSet<(i64, i64)>,
    failing_reads: HashSet<Read>,
}

/// Read paths that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Read {
    CandidateSkills,
    JobRequirements,
    RelatedSkills,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    // Kept apart from `state` so a panicking upsert never poisons the main lock.
    panicking_pairs: Mutex<HashSet<(i64, i64)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store lock poisoned")
    }

    pub fn add_skill(&self, id: i64, name: &str) {
        let now = Utc::now();
        self.state().skills.insert(
            id,
            SkillRow {
                id,
                name: name.to_string(),
                category: "general".to_string(),
                popularity: 0.5,
                is_growing: false,
                created_at: now,
                updated_at: now,
            },
        );
    }

    /// Inserts both directions, the way seeded data is laid out.
    pub fn relate(&self, a: i64, b: i64, similarity: f64) {
        let mut state = self.state();
        state.edges.push((a, b, similarity));
        state.edges.push((b, a, similarity));
    }

    pub fn add_candidate(&self, id: i64, years_experience: i32) {
        let now = Utc::now();
        self.state().candidates.insert(
            id,
            CandidateRow {
                id,
                name: format!("Candidate {id}"),
                email: format!("candidate{id}@example.com"),
                years_experience,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn add_candidate_skill(
        &self,
        candidate_id: i64,
        skill_id: i64,
        proficiency_level: i32,
        years_experience: i32,
        last_used_date: Option<NaiveDate>,
    ) {
        let mut state = self.state();
        let skill_name = skill_name(&state, skill_id);
        state.candidate_skills.push(CandidateSkillEntry {
            candidate_id,
            skill_id,
            skill_name,
            proficiency_level,
            years_experience,
            last_used_date,
        });
    }

    pub fn add_job(&self, id: i64, years_experience_required: i32) {
        let now = Utc::now();
        self.state().jobs.insert(
            id,
            JobRow {
                id,
                title: format!("Job {id}"),
                description: String::new(),
                years_experience_required,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn require(&self, job_id: i64, skill_id: i64, weight: i32, minimum_years: i32) {
        let mut state = self.state();
        let requirement = requirement(&state, job_id, skill_id, weight, minimum_years);
        state.required.push(requirement);
    }

    pub fn prefer(&self, job_id: i64, skill_id: i64, weight: i32, minimum_years: i32) {
        let mut state = self.state();
        let requirement = requirement(&state, job_id, skill_id, weight, minimum_years);
        state.preferred.push(requirement);
    }

    /// Makes every upsert for this pair fail.
    pub fn fail_upserts_for(&self, candidate_id: i64, job_id: i64) {
        self.state().failing_pairs.insert((candidate_id, job_id));
    }

    pub fn fail_reads_of(&self, read: Read) {
        self.state().failing_reads.insert(read);
    }

    /// Makes the upsert for this pair panic, standing in for a crashed worker.
    pub fn panic_on_upsert_for(&self, candidate_id: i64, job_id: i64) {
        self.panicking_pairs
            .lock()
            .expect("panic list lock poisoned")
            .insert((candidate_id, job_id));
    }

    pub fn upsert_count(&self) -> usize {
        self.state().upserts
    }

    pub fn stored_results(&self) -> Vec<MatchResultRow> {
        self.state().results.values().cloned().collect()
    }
}

fn check_read(state: &State, read: Read) -> Result<(), StoreError> {
    if state.failing_reads.contains(&read) {
        return Err(StoreError::Unavailable(format!("simulated {read:?} read failure")));
    }
    Ok(())
}

fn skill_name(state: &State, skill_id: i64) -> String {
    state
        .skills
        .get(&skill_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("skill-{skill_id}"))
}

fn requirement(
    state: &State,
    job_id: i64,
    skill_id: i64,
    importance_weight: i32,
    minimum_years: i32,
) -> JobSkillRequirement {
    JobSkillRequirement {
        job_id,
        skill_id,
        skill_name: skill_name(state, skill_id),
        importance_weight,
        minimum_years,
    }
}

fn top_by_score(mut rows: Vec<MatchResultRow>, limit: i64) -> Vec<MatchResultRow> {
    rows.sort_by(|a, b| {
        b.overall_score
            .total_cmp(&a.overall_score)
            .then(a.id.cmp(&b.id))
    });
    rows.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
    rows
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn list_skills(&self) -> Result<Vec<SkillRow>, StoreError> {
        Ok(self.state().skills.values().cloned().collect())
    }

    async fn get_skill(&self, skill_id: i64) -> Result<Option<SkillRow>, StoreError> {
        Ok(self.state().skills.get(&skill_id).cloned())
    }

    async fn related_skills(&self, skill_ids: &[i64]) -> Result<Vec<SkillEdge>, StoreError> {
        let state = self.state();
        check_read(&state, Read::RelatedSkills)?;
        Ok(state
            .edges
            .iter()
            .filter(|(from, _, _)| skill_ids.contains(from))
            .map(|&(from, to, similarity)| SkillEdge {
                skill_id: from,
                related_skill_id: to,
                related_skill_name: skill_name(&state, to),
                similarity_score: similarity,
            })
            .collect())
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateRow>, StoreError> {
        Ok(self.state().candidates.values().cloned().collect())
    }

    async fn get_candidate(&self, candidate_id: i64) -> Result<Option<CandidateRow>, StoreError> {
        Ok(self.state().candidates.get(&candidate_id).cloned())
    }

    async fn get_candidates(&self, ids: &[i64]) -> Result<Vec<CandidateRow>, StoreError> {
        Ok(self
            .state()
            .candidates
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn candidate_skills(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateSkillEntry>, StoreError> {
        let state = self.state();
        check_read(&state, Read::CandidateSkills)?;
        let mut entries: Vec<_> = state
            .candidate_skills
            .iter()
            .filter(|e| e.candidate_id == candidate_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.skill_name.cmp(&b.skill_name));
        Ok(entries)
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError> {
        Ok(self.state().jobs.values().cloned().collect())
    }

    async fn get_job(&self, job_id: i64) -> Result<Option<JobRow>, StoreError> {
        Ok(self.state().jobs.get(&job_id).cloned())
    }

    async fn get_jobs(&self, ids: &[i64]) -> Result<Vec<JobRow>, StoreError> {
        Ok(self
            .state()
            .jobs
            .values()
            .filter(|j| ids.contains(&j.id))
            .cloned()
            .collect())
    }

    async fn job_requirements(&self, job_id: i64) -> Result<JobRequirements, StoreError> {
        let state = self.state();
        check_read(&state, Read::JobRequirements)?;
        let for_job = |set: &[JobSkillRequirement]| {
            set.iter()
                .filter(|r| r.job_id == job_id)
                .cloned()
                .collect::<Vec<_>>()
        };
        Ok(JobRequirements {
            required: for_job(&state.required),
            preferred: for_job(&state.preferred),
        })
    }

    async fn upsert_match_result(
        &self,
        result: &NewMatchResult,
    ) -> Result<MatchResultRow, StoreError> {
        let key = (result.candidate_id, result.job_id);
        let panics = self
            .panicking_pairs
            .lock()
            .expect("panic list lock poisoned")
            .contains(&key);
        if panics {
            panic!("simulated worker crash for {key:?}");
        }
        let breakdown = serde_json::to_value(&result.breakdown)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut state = self.state();
        if state.failing_pairs.contains(&key) {
            return Err(StoreError::Unavailable(format!(
                "simulated write failure for {key:?}"
            )));
        }
        state.upserts += 1;

        let now = Utc::now();
        let (id, created_at) = match state.results.get(&key) {
            Some(existing) => (existing.id, existing.created_at),
            None => {
                state.next_result_id += 1;
                (state.next_result_id, now)
            }
        };
        let row = MatchResultRow {
            id,
            candidate_id: result.candidate_id,
            job_id: result.job_id,
            overall_score: result.overall_score,
            required_score: result.required_score,
            preferred_score: result.preferred_score,
            experience_score: result.experience_score,
            breakdown,
            created_at,
            updated_at: now,
        };
        state.results.insert(key, row.clone());
        Ok(row)
    }

    async fn get_match_result(&self, id: i64) -> Result<Option<MatchResultRow>, StoreError> {
        Ok(self
            .state()
            .results
            .values()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn top_results_for_job(
        &self,
        job_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchResultRow>, StoreError> {
        let rows = self
            .state()
            .results
            .values()
            .filter(|r| r.job_id == job_id)
            .cloned()
            .collect();
        Ok(top_by_score(rows, limit))
    }

    async fn top_results_for_candidate(
        &self,
        candidate_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchResultRow>, StoreError> {
        let rows = self
            .state()
            .results
            .values()
            .filter(|r| r.candidate_id == candidate_id)
            .cloned()
            .collect();
        Ok(top_by_score(rows, limit))
    }
}

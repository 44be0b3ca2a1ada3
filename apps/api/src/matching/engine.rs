//! MatchEngine: one candidate against one job.
//!
//! `compute` is pure: the same snapshots, graph and `today` always produce the
//! same numbers. `calculate_match` adds the single upsert that persists them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::matching::category::{aggregate, SkillBreakdown};
use crate::matching::experience::experience_score;
use crate::matching::graph::SkillGraph;
use crate::matching::profile::CandidateProfile;
use crate::matching::MatchError;
use crate::models::candidate::{CandidateRow, CandidateSkillEntry};
use crate::models::job::{JobRow, JobSkillRequirement};
use crate::models::match_result::{MatchResultRow, NewMatchResult};
use crate::store::MatchStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWeights {
    pub required: f64,
    pub preferred: f64,
    pub experience: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            required: 0.6,
            preferred: 0.3,
            experience: 0.1,
        }
    }
}

impl MatchWeights {
    pub fn combine(&self, required: f64, preferred: f64, experience: f64) -> f64 {
        self.required * required + self.preferred * preferred + self.experience * experience
    }
}

/// Read-only snapshot of a candidate and their skill entries.
#[derive(Debug, Clone)]
pub struct CandidateSnapshot {
    pub candidate: CandidateRow,
    pub skills: Vec<CandidateSkillEntry>,
}

/// Read-only snapshot of a job and both of its requirement sets.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub job: JobRow,
    pub required: Vec<JobSkillRequirement>,
    pub preferred: Vec<JobSkillRequirement>,
}

impl JobSnapshot {
    pub fn requirement_skill_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.required
            .iter()
            .chain(self.preferred.iter())
            .map(|r| r.skill_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBreakdown {
    pub candidate_years: i32,
    pub job_required_years: i32,
    pub score: f64,
}

/// Structured explanation persisted with each match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub required_skills: Vec<SkillBreakdown>,
    pub preferred_skills: Vec<SkillBreakdown>,
    pub experience: ExperienceBreakdown,
}

#[derive(Debug, Default)]
pub struct MatchEngine {
    weights: MatchWeights,
}

impl MatchEngine {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn compute(
        &self,
        candidate: &CandidateSnapshot,
        job: &JobSnapshot,
        graph: &SkillGraph,
        today: NaiveDate,
    ) -> NewMatchResult {
        let profile = CandidateProfile::build(&candidate.candidate, &candidate.skills, today);
        trace!(
            candidate_id = profile.candidate_id,
            skills = profile.skill_count(),
            "candidate profile built"
        );

        let required = aggregate(&job.required, &profile, graph);
        let preferred = aggregate(&job.preferred, &profile, graph);
        let experience = experience_score(
            profile.years_experience,
            job.job.years_experience_required,
        );
        let overall = self
            .weights
            .combine(required.score, preferred.score, experience);

        NewMatchResult {
            candidate_id: candidate.candidate.id,
            job_id: job.job.id,
            overall_score: overall,
            required_score: required.score,
            preferred_score: preferred.score,
            experience_score: experience,
            breakdown: MatchBreakdown {
                required_skills: required.breakdown,
                preferred_skills: preferred.breakdown,
                experience: ExperienceBreakdown {
                    candidate_years: profile.years_experience,
                    job_required_years: job.job.years_experience_required,
                    score: experience,
                },
            },
        }
    }

    /// Computes the match and writes it with exactly one upsert.
    pub async fn calculate_match(
        &self,
        store: &dyn MatchStore,
        candidate: &CandidateSnapshot,
        job: &JobSnapshot,
        graph: &SkillGraph,
        today: NaiveDate,
    ) -> Result<MatchResultRow, MatchError> {
        let result = self.compute(candidate, job, graph, today);
        debug!(
            candidate_id = result.candidate_id,
            job_id = result.job_id,
            overall = result.overall_score,
            required = result.required_score,
            preferred = result.preferred_score,
            experience = result.experience_score,
            "match computed"
        );

        store
            .upsert_match_result(&result)
            .await
            .map_err(|source| {
                error!(
                    candidate_id = result.candidate_id,
                    job_id = result.job_id,
                    error = %source,
                    "match upsert failed"
                );
                MatchError::Persistence {
                    candidate_id: result.candidate_id,
                    job_id: result.job_id,
                    source,
                }
            })
    }
}

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::matching::recency::recency_factor;
use crate::models::candidate::{CandidateRow, CandidateSkillEntry};

/// A candidate skill with its recency factor already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSkill {
    pub skill_id: i64,
    pub name: String,
    pub proficiency: i32,
    pub years: i32,
    pub recency: f64,
}

/// Per-computation view of a candidate's skills keyed by skill id.
/// Derived for one match and then dropped.
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub candidate_id: i64,
    pub years_experience: i32,
    skills: HashMap<i64, ProfileSkill>,
}

impl CandidateProfile {
    pub fn build(
        candidate: &CandidateRow,
        entries: &[CandidateSkillEntry],
        today: NaiveDate,
    ) -> Self {
        let skills = entries
            .iter()
            .map(|entry| {
                (
                    entry.skill_id,
                    ProfileSkill {
                        skill_id: entry.skill_id,
                        name: entry.skill_name.clone(),
                        proficiency: entry.proficiency_level,
                        years: entry.years_experience,
                        recency: recency_factor(entry.last_used_date, today),
                    },
                )
            })
            .collect();

        Self {
            candidate_id: candidate.id,
            years_experience: candidate.years_experience,
            skills,
        }
    }

    pub fn skill(&self, skill_id: i64) -> Option<&ProfileSkill> {
        self.skills.get(&skill_id)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    #[cfg(test)]
    pub(crate) fn from_skills(years_experience: i32, skills: Vec<ProfileSkill>) -> Self {
        Self {
            candidate_id: 1,
            years_experience,
            skills: skills.into_iter().map(|s| (s.skill_id, s)).collect(),
        }
    }
}

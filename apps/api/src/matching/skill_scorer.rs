//! Scores a single requirement against a candidate profile.
//!
//! Direct ownership of the skill always wins. Only on a direct miss does the
//! scorer look at the requirement's 1-hop neighbours and keep the single best
//! similarity-weighted match.

use crate::matching::graph::SkillGraph;
use crate::matching::profile::{CandidateProfile, ProfileSkill};
use crate::models::job::JobSkillRequirement;

const PROFICIENCY_WEIGHT: f64 = 0.4;
const YEARS_WEIGHT: f64 = 0.4;
const RECENCY_WEIGHT: f64 = 0.2;
const MAX_PROFICIENCY: f64 = 5.0;

/// How a requirement was satisfied.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillMatch<'p> {
    Direct {
        skill: &'p ProfileSkill,
        combined: f64,
    },
    Related {
        skill: &'p ProfileSkill,
        similarity: f64,
        combined: f64,
    },
    Missing,
}

impl SkillMatch<'_> {
    /// Unweighted contribution in [0, 1].
    pub fn unit_score(&self) -> f64 {
        match self {
            SkillMatch::Direct { combined, .. } => *combined,
            SkillMatch::Related {
                similarity,
                combined,
                ..
            } => similarity * combined,
            SkillMatch::Missing => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillScore<'p> {
    pub matched: SkillMatch<'p>,
    /// Requirement weight, floored at zero.
    pub weight: f64,
    /// In [0, weight].
    pub weighted_score: f64,
}

/// 0.4·proficiency + 0.4·years + 0.2·recency, each term in [0, 1].
///
/// `min_years` is always the requirement's, also when `skill` is a related skill.
pub fn combined_score(skill: &ProfileSkill, min_years: i32) -> f64 {
    let proficiency = (f64::from(skill.proficiency) / MAX_PROFICIENCY).clamp(0.0, 1.0);
    let years = (f64::from(skill.years) / f64::from(min_years.max(1))).clamp(0.0, 1.0);
    let recency = skill.recency.clamp(0.0, 1.0);
    PROFICIENCY_WEIGHT * proficiency + YEARS_WEIGHT * years + RECENCY_WEIGHT * recency
}

pub fn score_requirement<'p>(
    requirement: &JobSkillRequirement,
    profile: &'p CandidateProfile,
    graph: &SkillGraph,
) -> SkillScore<'p> {
    let weight = f64::from(requirement.importance_weight.max(0));

    let matched = match profile.skill(requirement.skill_id) {
        Some(skill) => SkillMatch::Direct {
            skill,
            combined: combined_score(skill, requirement.minimum_years),
        },
        None => best_related_match(requirement, profile, graph),
    };

    SkillScore {
        weighted_score: matched.unit_score() * weight,
        matched,
        weight,
    }
}

fn best_related_match<'p>(
    requirement: &JobSkillRequirement,
    profile: &'p CandidateProfile,
    graph: &SkillGraph,
) -> SkillMatch<'p> {
    graph
        .related_skills(requirement.skill_id)
        .iter()
        .filter_map(|related| {
            profile.skill(related.skill_id).map(|skill| SkillMatch::Related {
                skill,
                similarity: related.similarity,
                combined: combined_score(skill, requirement.minimum_years),
            })
        })
        .fold(SkillMatch::Missing, |best, candidate| {
            if candidate.unit_score() > best.unit_score() {
                candidate
            } else {
                best
            }
        })
}

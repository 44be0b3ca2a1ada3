use serde::{Deserialize, Serialize};

use crate::matching::graph::SkillGraph;
use crate::matching::profile::CandidateProfile;
use crate::matching::skill_scorer::{score_requirement, SkillMatch, SkillScore};
use crate::models::job::JobSkillRequirement;

/// Score for a requirement set with nothing in it.
pub const EMPTY_CATEGORY_SCORE: f64 = 100.0;

/// Per-requirement diagnostic entry stored in the match breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBreakdown {
    pub skill_id: i64,
    pub skill_name: String,
    pub importance_weight: i32,
    pub minimum_years: i32,
    pub direct_match: bool,
    pub related_match: bool,
    pub proficiency: i32,
    pub years: i32,
    pub recency: f64,
    /// This requirement's own 0 – 100 sub-score.
    pub match_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_skill_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_skill_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

impl SkillBreakdown {
    fn from_score(requirement: &JobSkillRequirement, score: &SkillScore<'_>) -> Self {
        let mut entry = SkillBreakdown {
            skill_id: requirement.skill_id,
            skill_name: requirement.skill_name.clone(),
            importance_weight: requirement.importance_weight,
            minimum_years: requirement.minimum_years,
            direct_match: false,
            related_match: false,
            proficiency: 0,
            years: 0,
            recency: 0.0,
            match_score: score.matched.unit_score() * 100.0,
            related_skill_id: None,
            related_skill_name: None,
            similarity_score: None,
        };

        match &score.matched {
            SkillMatch::Direct { skill, .. } => {
                entry.direct_match = true;
                entry.proficiency = skill.proficiency;
                entry.years = skill.years;
                entry.recency = skill.recency;
            }
            SkillMatch::Related {
                skill, similarity, ..
            } => {
                entry.related_match = true;
                entry.proficiency = skill.proficiency;
                entry.years = skill.years;
                entry.recency = skill.recency;
                entry.related_skill_id = Some(skill.skill_id);
                entry.related_skill_name = Some(skill.name.clone());
                entry.similarity_score = Some(*similarity);
            }
            SkillMatch::Missing => {}
        }

        entry
    }
}

/// 0 – 100 score over one requirement set, with one breakdown entry per requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub score: f64,
    pub breakdown: Vec<SkillBreakdown>,
}

/// Weighted mean of requirement scores, scaled to 0 – 100.
///
/// An empty set is vacuously satisfied (100). A set whose weights sum to zero scores 0.
pub fn aggregate(
    requirements: &[JobSkillRequirement],
    profile: &CandidateProfile,
    graph: &SkillGraph,
) -> CategoryScore {
    if requirements.is_empty() {
        return CategoryScore {
            score: EMPTY_CATEGORY_SCORE,
            breakdown: Vec::new(),
        };
    }

    let mut total_weight = 0.0;
    let mut raw_score = 0.0;
    let mut breakdown = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        let scored = score_requirement(requirement, profile, graph);
        total_weight += scored.weight;
        raw_score += scored.weighted_score;
        breakdown.push(SkillBreakdown::from_score(requirement, &scored));
    }

    let score = if total_weight > 0.0 {
        (raw_score / total_weight * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    CategoryScore { score, breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::profile::ProfileSkill;
    use crate::models::skill::SkillEdge;

    fn skill(skill_id: i64, proficiency: i32, years: i32, recency: f64) -> ProfileSkill {
        ProfileSkill {
            skill_id,
            name: format!("skill-{skill_id}"),
            proficiency,
            years,
            recency,
        }
    }

    fn requirement(skill_id: i64, weight: i32, minimum_years: i32) -> JobSkillRequirement {
        JobSkillRequirement {
            job_id: 1,
            skill_id,
            skill_name: format!("skill-{skill_id}"),
            importance_weight: weight,
            minimum_years,
        }
    }

    #[test]
    fn test_empty_set_is_full_score() {
        let profile = CandidateProfile::from_skills(0, vec![]);
        let result = aggregate(&[], &profile, &SkillGraph::default());
        assert_eq!(result.score, 100.0);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn test_zero_total_weight_scores_zero() {
        let profile = CandidateProfile::from_skills(0, vec![skill(1, 5, 5, 1.0)]);
        let result = aggregate(&[requirement(1, 0, 1)], &profile, &SkillGraph::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.breakdown.len(), 1);
    }

    #[test]
    fn test_weighted_mean_over_requirements() {
        // skill 1 fully matched (weight 3), skill 2 missing (weight 1) → 75
        let profile = CandidateProfile::from_skills(0, vec![skill(1, 5, 5, 1.0)]);
        let result = aggregate(
            &[requirement(1, 3, 1), requirement(2, 1, 1)],
            &profile,
            &SkillGraph::default(),
        );
        assert!((result.score - 75.0).abs() < 1e-9, "got {}", result.score);
    }

    #[test]
    fn test_breakdown_marks_direct_related_and_missing() {
        let profile = CandidateProfile::from_skills(
            0,
            vec![skill(1, 5, 5, 1.0), skill(20, 4, 3, 0.9)],
        );
        let graph = SkillGraph::from_edges(vec![SkillEdge {
            skill_id: 2,
            related_skill_id: 20,
            related_skill_name: "skill-20".into(),
            similarity_score: 0.8,
        }]);
        let result = aggregate(
            &[requirement(1, 5, 2), requirement(2, 5, 2), requirement(3, 5, 2)],
            &profile,
            &graph,
        );

        let direct = &result.breakdown[0];
        assert!(direct.direct_match && !direct.related_match);
        assert_eq!(direct.proficiency, 5);
        assert!((direct.match_score - 100.0).abs() < 1e-9);

        let related = &result.breakdown[1];
        assert!(related.related_match && !related.direct_match);
        assert_eq!(related.related_skill_id, Some(20));
        assert_eq!(related.similarity_score, Some(0.8));
        assert!((related.match_score - 72.0).abs() < 1e-9, "got {}", related.match_score);

        let missing = &result.breakdown[2];
        assert!(!missing.direct_match && !missing.related_match);
        assert_eq!(missing.match_score, 0.0);
        assert_eq!(missing.related_skill_id, None);
    }

    #[test]
    fn test_score_always_within_bounds() {
        let profile = CandidateProfile::from_skills(
            0,
            vec![skill(1, 5, 100, 1.0), skill(2, 1, 0, 0.1)],
        );
        let sets = [
            vec![requirement(1, 1, 0)],
            vec![requirement(2, 9, 10)],
            vec![requirement(1, 2, 3), requirement(2, 7, 1), requirement(3, 4, 2)],
            vec![requirement(3, 1, 1)],
        ];
        for set in &sets {
            let result = aggregate(set, &profile, &SkillGraph::default());
            assert!(
                (0.0..=100.0).contains(&result.score),
                "score {} out of range",
                result.score
            );
        }
    }

    #[test]
    fn test_missing_fields_omitted_from_json() {
        let profile = CandidateProfile::from_skills(0, vec![]);
        let result = aggregate(&[requirement(1, 1, 1)], &profile, &SkillGraph::default());
        let json = serde_json::to_value(&result.breakdown[0]).unwrap();
        assert!(json.get("related_skill_id").is_none());
        assert_eq!(json["direct_match"], false);
    }
}

use std::collections::HashMap;

use serde::Serialize;

use crate::models::skill::SkillEdge;

/// A skill reachable in one hop, with its similarity to the source skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedSkill {
    pub skill_id: i64,
    pub name: String,
    /// 0.0 – 1.0
    pub similarity: f64,
}

/// Read-only adjacency lookup over `skill_relationships`.
///
/// Only direct neighbours are ever consulted; there is no transitive closure.
/// Built once per match or batch and shared immutably across workers.
#[derive(Debug, Clone, Default)]
pub struct SkillGraph {
    adjacency: HashMap<i64, Vec<RelatedSkill>>,
}

impl SkillGraph {
    pub fn from_edges(edges: impl IntoIterator<Item = SkillEdge>) -> Self {
        let mut adjacency: HashMap<i64, Vec<RelatedSkill>> = HashMap::new();
        for edge in edges {
            if edge.skill_id == edge.related_skill_id {
                continue;
            }
            let neighbours = adjacency.entry(edge.skill_id).or_default();
            if neighbours
                .iter()
                .any(|n| n.skill_id == edge.related_skill_id)
            {
                continue;
            }
            neighbours.push(RelatedSkill {
                skill_id: edge.related_skill_id,
                name: edge.related_skill_name,
                similarity: edge.similarity_score.clamp(0.0, 1.0),
            });
        }
        Self { adjacency }
    }

    /// Direct neighbours of `skill_id`, in no particular order. Empty if none.
    pub fn related_skills(&self, skill_id: i64) -> &[RelatedSkill] {
        self.adjacency
            .get(&skill_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

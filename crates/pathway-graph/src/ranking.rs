//! Compatibility scoring and relevance ranking.

use pathway_core::Level;
use serde::{Deserialize, Serialize};

use crate::RelationshipGraph;

const LEVEL_WEIGHT: f64 = 0.4;
const LEVEL_STEP_PENALTY: f64 = 0.2;
const CATEGORY_WEIGHT: f64 = 0.3;
const RELATED_BONUS: f64 = 0.2;
const APPROPRIATE_BONUS: f64 = 0.1;
const INTEREST_BONUS: f64 = 0.1;

/// Learner preferences used by [`rank_paths_by_relevance`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Keywords matched case-insensitively against path titles.
    #[serde(default)]
    pub interests: Vec<String>,
}

impl UserPreferences {
    /// Preferences with the given interests.
    pub fn with_interests<I, S>(interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interests: interests.into_iter().map(Into::into).collect(),
        }
    }
}

/// A ranked candidate path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPath {
    /// Candidate path id.
    pub path_id: String,
    /// Relevance in `[0, 1]`.
    pub score: f64,
    /// Title, or the id when the path has none.
    pub title: String,
}

/// Score how well `path_b` fits alongside `path_a`, in `[0, 1]`.
///
/// Level proximity contributes up to 0.4, a shared category 0.3, `path_a`
/// listing `path_b` as related 0.2, and both paths being appropriate for
/// the learner 0.1. Unknown paths score 0.
pub fn calculate_compatibility_score(
    graph: &RelationshipGraph,
    path_a: &str,
    path_b: &str,
    user_level: Level,
) -> f64 {
    let (Some(a), Some(b)) = (graph.get(path_a), graph.get(path_b)) else {
        return 0.0;
    };

    let mut score = 0.0;

    if a.level == b.level {
        score += LEVEL_WEIGHT;
    } else {
        let distance = f64::from(a.level_value().abs_diff(b.level_value()));
        score += (LEVEL_WEIGHT - distance * LEVEL_STEP_PENALTY).max(0.0);
    }

    if a.category == b.category {
        score += CATEGORY_WEIGHT;
    }

    if a.related_paths.iter().any(|r| r == path_b) {
        score += RELATED_BONUS;
    }

    if user_level.admits(a.level) && user_level.admits(b.level) {
        score += APPROPRIATE_BONUS;
    }

    score.min(1.0)
}

/// Rank every unselected path by average compatibility with `selected`.
///
/// Each interest keyword found in a path's title adds 0.1 before the score
/// is clamped to 1. Results are sorted by score, highest first; equal
/// scores keep catalog order.
pub fn rank_paths_by_relevance(
    graph: &RelationshipGraph,
    selected: &[String],
    user_level: Level,
    preferences: &UserPreferences,
) -> Vec<RankedPath> {
    let interests: Vec<String> = preferences
        .interests
        .iter()
        .map(|i| i.to_lowercase())
        .collect();

    let mut rankings: Vec<RankedPath> = graph
        .iter()
        .filter(|(id, _)| !selected.iter().any(|s| s.as_str() == *id))
        .map(|(id, descriptor)| {
            let mut score = if selected.is_empty() {
                0.0
            } else {
                let total: f64 = selected
                    .iter()
                    .map(|s| calculate_compatibility_score(graph, s, id, user_level))
                    .sum();
                total / selected.len() as f64
            };

            if let Some(title) = &descriptor.title {
                let title = title.to_lowercase();
                let matches = interests.iter().filter(|i| title.contains(i.as_str())).count();
                score += INTEREST_BONUS * matches as f64;
            }

            RankedPath {
                path_id: id.to_string(),
                score: score.min(1.0),
                title: descriptor.title.clone().unwrap_or_else(|| id.to_string()),
            }
        })
        .collect();

    rankings.sort_by(|a, b| b.score.total_cmp(&a.score));
    rankings
}

//! Job Scorer — pluggable seam between the match endpoints and the scoring rule.
//!
//! `AppState` holds an `Arc<dyn JobScorer>`. The default backend is
//! `SkillOverlapScorer`; handlers never call `score_skills` directly.

use crate::matching::skill_match::{score_skills, MatchResult, SkillSet, DEFAULT_MATCH_SCORE};

pub trait JobScorer: Send + Sync {
    fn score(&self, candidate: &SkillSet, required: &SkillSet) -> MatchResult;

    /// Score reported for jobs that cannot be scored (no candidate skills or no requirements).
    fn default_score(&self) -> f64;

    /// Short label surfaced in responses for transparency.
    fn backend(&self) -> &'static str;
}

/// Set-overlap scorer: `|matched| / |required|`, with a fixed fallback score.
#[derive(Debug, Clone)]
pub struct SkillOverlapScorer {
    default_score: f64,
}

impl SkillOverlapScorer {
    pub fn new(default_score: f64) -> Self {
        Self { default_score }
    }
}

impl Default for SkillOverlapScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_SCORE)
    }
}

impl JobScorer for SkillOverlapScorer {
    fn score(&self, candidate: &SkillSet, required: &SkillSet) -> MatchResult {
        score_skills(candidate, required, self.default_score)
    }

    fn default_score(&self) -> f64 {
        self.default_score
    }

    fn backend(&self) -> &'static str {
        "skill_overlap"
    }
}

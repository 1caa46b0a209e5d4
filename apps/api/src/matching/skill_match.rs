//! Skill-Match Scorer — the fraction of a job's required skills a candidate covers.
//!
//! Comparison is case-insensitive. Display casing is taken from the first
//! occurrence of each label: `matched` keeps the candidate's casing, `missing`
//! keeps the job's.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Score returned when the job lists no required skills.
pub const DEFAULT_MATCH_SCORE: f64 = 0.5;

/// Case-insensitive, deduplicated set of skill labels.
///
/// Iteration follows first-seen order; the first casing of a label wins.
#[derive(Debug, Clone, Default)]
pub struct SkillSet {
    labels: Vec<String>,
    keys: HashSet<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label. Blank labels and case-insensitive duplicates are ignored.
    /// Returns `true` if the label was added.
    pub fn insert(&mut self, label: &str) -> bool {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return false;
        }
        if !self.keys.insert(trimmed.to_lowercase()) {
            return false;
        }
        self.labels.push(trimmed.to_string());
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.keys.contains(&label.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.labels.clone()
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl Eq for SkillSet {}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for label in iter {
            set.insert(label.as_ref());
        }
        set
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labels.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let labels = Vec::<String>::deserialize(deserializer)?;
        Ok(labels.into_iter().collect())
    }
}

/// Outcome of scoring one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub matched: SkillSet,
    pub missing: SkillSet,
}

/// Scores `candidate` against `required`.
///
/// An empty `required` set yields `default_score` with empty matched/missing sets.
/// Otherwise `score = |candidate ∩ required| / |required|`.
pub fn score_skills(candidate: &SkillSet, required: &SkillSet, default_score: f64) -> MatchResult {
    if required.is_empty() {
        return MatchResult {
            score: default_score,
            matched: SkillSet::new(),
            missing: SkillSet::new(),
        };
    }

    let matched: SkillSet = candidate.iter().filter(|s| required.contains(s)).collect();
    let missing: SkillSet = required.iter().filter(|s| !candidate.contains(s)).collect();
    let score = matched.len() as f64 / required.len() as f64;

    MatchResult {
        score,
        matched,
        missing,
    }
}

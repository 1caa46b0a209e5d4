//! Parsing of the free-form `jobs.requirements` JSON column.
//!
//! Accepted shapes:
//! - `{"skills": [...]}`
//! - a bare array `[...]`
//!
//! where every element is either a skill name or `{"name": ..., "importance": n}`.
//! Anything else is treated as "no requirements".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::matching::skill_match::SkillSet;

/// Importance assigned to requirements listed as plain strings.
pub const DEFAULT_IMPORTANCE: u32 = 1;

/// A required skill together with how much the job cares about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSkill {
    pub name: String,
    pub importance: u32,
}

/// Extracts weighted requirements from a job's `requirements` value.
pub fn parse_requirements(requirements: Option<&Value>) -> Vec<WeightedSkill> {
    let items = match requirements {
        Some(Value::Object(map)) => map.get("skills").and_then(Value::as_array),
        Some(Value::Array(items)) => Some(items),
        _ => None,
    };

    items
        .map(|items| items.iter().filter_map(parse_item).collect())
        .unwrap_or_default()
}

/// Required skills as a case-insensitive set, importance discarded.
pub fn required_skill_set(requirements: Option<&Value>) -> SkillSet {
    parse_requirements(requirements)
        .iter()
        .map(|s| s.name.as_str())
        .collect()
}

fn parse_item(item: &Value) -> Option<WeightedSkill> {
    match item {
        Value::String(name) if !name.trim().is_empty() => Some(WeightedSkill {
            name: name.trim().to_string(),
            importance: DEFAULT_IMPORTANCE,
        }),
        Value::Object(obj) => {
            let name = obj.get("name").and_then(Value::as_str)?.trim();
            if name.is_empty() {
                return None;
            }
            let importance = obj
                .get("importance")
                .and_then(Value::as_u64)
                .map(|i| u32::try_from(i).unwrap_or(u32::MAX))
                .unwrap_or(DEFAULT_IMPORTANCE);
            Some(WeightedSkill {
                name: name.to_string(),
                importance,
            })
        }
        _ => None,
    }
}

//! Skill gap report — which weighted requirements a candidate covers, plus
//! learning resources for known missing skills.

use serde::{Deserialize, Serialize};

use crate::jobs::requirements::WeightedSkill;
use crate::matching::skill_match::SkillSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub skill: String,
    pub importance: u32,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub platform: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapReport {
    /// 0 – 100
    pub match_percentage: f64,
    pub matched_skills: Vec<WeightedSkill>,
    pub missing_skills: Vec<WeightedSkill>,
    pub recommendations: Vec<LearningResource>,
}

/// (skill, type, platform, title, url)
const LEARNING_RESOURCES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "python",
        "Online Course",
        "Coursera",
        "Python for Everybody",
        "https://www.coursera.org/specializations/python",
    ),
    (
        "machine learning",
        "Online Course",
        "Coursera",
        "Machine Learning",
        "https://www.coursera.org/learn/machine-learning",
    ),
    (
        "data analysis",
        "Online Course",
        "Coursera",
        "Data Analysis and Visualization",
        "https://www.coursera.org/specializations/data-analysis",
    ),
    (
        "sql",
        "Online Course",
        "Coursera",
        "SQL for Data Science",
        "https://www.coursera.org/learn/sql-for-data-science",
    ),
];

pub fn analyze_gaps(candidate: &SkillSet, requirements: &[WeightedSkill]) -> GapReport {
    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();

    for requirement in requirements {
        let skill = WeightedSkill {
            name: requirement.name.to_lowercase(),
            importance: requirement.importance,
        };
        if candidate.contains(&skill.name) {
            matched_skills.push(skill);
        } else {
            missing_skills.push(skill);
        }
    }

    let match_percentage = if requirements.is_empty() {
        0.0
    } else {
        matched_skills.len() as f64 / requirements.len() as f64 * 100.0
    };

    let recommendations = missing_skills.iter().filter_map(learning_resource).collect();

    GapReport {
        match_percentage,
        matched_skills,
        missing_skills,
        recommendations,
    }
}

fn learning_resource(missing: &WeightedSkill) -> Option<LearningResource> {
    LEARNING_RESOURCES
        .iter()
        .find(|(skill, ..)| *skill == missing.name)
        .map(|(skill, resource_type, platform, title, url)| LearningResource {
            skill: skill.to_string(),
            importance: missing.importance,
            resource_type: resource_type.to_string(),
            platform: platform.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        })
}

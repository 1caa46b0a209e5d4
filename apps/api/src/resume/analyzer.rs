//! Rule-based resume content scoring.
//!
//! Input is loosely shaped JSON: `{summary, experience: [{details}], education, skills}`.
//! `details` may be a string or a list of strings; `skills` may be a list or a
//! comma-separated string. Points are awarded per section and capped at 100.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

const MAX_SCORE: u32 = 100;

const ACTION_VERBS: &[&str] = &[
    "led", "managed", "developed", "created", "implemented", "designed", "analyzed", "improved",
    "increased", "reduced", "saved", "launched", "initiated", "coordinated", "collaborated",
    "mentored", "supervised", "achieved", "generated", "delivered",
];

const WEAK_PHRASES: &[&str] = &[
    "responsible for",
    "duties included",
    "worked on",
    "helped",
    "assisted",
    "tried",
    "attempted",
    "various",
    "etc",
];

lazy_static! {
    static ref QUANTIFIED_RE: Regex =
        Regex::new(r"\d+%|\$\d+|\d+ years|\d+ team members").unwrap();
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeAnalysis {
    pub score: u32,
    pub feedback: Feedback,
}

#[derive(Default)]
struct Tally {
    score: u32,
    feedback: Feedback,
}

impl Tally {
    fn strength(&mut self, points: u32, msg: &str) {
        self.score += points;
        self.feedback.strengths.push(msg.to_string());
    }

    fn weakness(&mut self, points: u32, msg: &str, suggestion: impl Into<String>) {
        self.score += points;
        self.feedback.weaknesses.push(msg.to_string());
        self.feedback.suggestions.push(suggestion.into());
    }
}

pub fn analyze_resume(resume: &Value) -> ResumeAnalysis {
    let mut tally = Tally::default();

    score_summary(&mut tally, resume.get("summary"));
    score_experience(&mut tally, resume.get("experience"));
    score_skills(&mut tally, resume.get("skills"));

    if is_present(resume.get("education")) {
        tally.score += 15;
    } else {
        tally.weakness(0, "No education listed.", "Add your educational background.");
    }

    ResumeAnalysis {
        score: tally.score.min(MAX_SCORE),
        feedback: tally.feedback,
    }
}

fn score_summary(tally: &mut Tally, summary: Option<&Value>) {
    let Some(summary) = summary.and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        tally.weakness(
            0,
            "Missing professional summary.",
            "Add a professional summary to introduce yourself to recruiters.",
        );
        return;
    };

    match summary.split_whitespace().count() {
        30..=100 => tally.strength(15, "Professional summary is concise and well-length."),
        n if n < 30 => tally.weakness(
            5,
            "Professional summary is too short.",
            "Expand your summary to 3-5 sentences highlighting your key achievements and career goals.",
        ),
        _ => tally.weakness(
            10,
            "Professional summary is a bit too long.",
            "Try to condense your summary to be more punchy and readable.",
        ),
    }
}

fn score_experience(tally: &mut Tally, experience: Option<&Value>) {
    let jobs = match experience.and_then(Value::as_array) {
        Some(jobs) if !jobs.is_empty() => jobs,
        _ => {
            tally.weakness(
                0,
                "No work experience listed.",
                "Add your work history, internships, or relevant volunteer work.",
            );
            return;
        }
    };
    tally.score += 20;

    let details: Vec<&str> = jobs
        .iter()
        .flat_map(|job| detail_lines(job.get("details")))
        .collect();
    let points: Vec<String> = details.iter().map(|p| p.to_lowercase()).collect();

    if !points.is_empty() {
        let with_verbs = points
            .iter()
            .filter(|p| ACTION_VERBS.iter().any(|v| p.contains(v)))
            .count();
        let ratio = with_verbs as f64 / points.len() as f64;

        if ratio >= 0.5 {
            tally.strength(20, "Great use of strong action verbs in your experience.");
        } else if ratio >= 0.2 {
            tally.weakness(
                10,
                "Could use more strong action verbs.",
                format!(
                    "Try starting bullet points with words like: {}.",
                    ACTION_VERBS[..5].join(", ")
                ),
            );
        } else {
            tally.weakness(
                5,
                "Experience descriptions lack impact.",
                "Rewrite bullet points to focus on achievements rather than duties. Start with action verbs.",
            );
        }

        if points.iter().any(|p| WEAK_PHRASES.iter().any(|w| p.contains(w))) {
            tally
                .feedback
                .suggestions
                .push("Avoid passive phrases like 'responsible for'. Use active voice.".to_string());
        }
    }

    // metrics are matched case-sensitively against the original text
    if details.iter().any(|p| QUANTIFIED_RE.is_match(p)) {
        tally.strength(15, "Good use of metrics/numbers to quantify achievements.");
    } else {
        tally.weakness(
            0,
            "Lack of quantified achievements.",
            "Add numbers (%, $, count) to demonstrate the impact of your work (e.g., 'Increased sales by 20%').",
        );
    }
}

fn detail_lines(details: Option<&Value>) -> Vec<&str> {
    match details {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn score_skills(tally: &mut Tally, skills: Option<&Value>) {
    let count = match skills {
        Some(Value::String(s)) => s.split(',').filter(|s| !s.trim().is_empty()).count(),
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    };

    match count {
        0 => tally.weakness(
            0,
            "No skills listed.",
            "Add a skills section to highlight your technical and soft abilities.",
        ),
        n if n >= 5 => tally.strength(15, "Good list of skills provided."),
        _ => tally.weakness(
            5,
            "Skill list is a bit sparse.",
            "Add more relevant technical and soft skills.",
        ),
    }
}

/// JSON truthiness: null, false, 0, "" and empty containers are absent.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_strong_resume_scores_full_marks() {
        let analysis = analyze_resume(&json!({
            "summary": words(40),
            "experience": [
                {"details": ["Led a team of 5 team members", "Increased revenue by 20%"]},
                {"details": "Developed the billing service"}
            ],
            "education": [{"degree": "BSc"}],
            "skills": ["python", "sql", "rust", "go", "react"]
        }));
        // 15 + 20 + 20 + 15 + 15 + 15
        assert_eq!(analysis.score, 100);
        assert!(analysis.feedback.weaknesses.is_empty());
        assert_eq!(analysis.feedback.strengths.len(), 4);
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let analysis = analyze_resume(&json!({}));
        assert_eq!(analysis.score, 0);
        assert_eq!(
            analysis.feedback.weaknesses,
            vec![
                "Missing professional summary.",
                "No work experience listed.",
                "No skills listed.",
                "No education listed."
            ]
        );
    }

    #[test]
    fn test_summary_length_bands() {
        let short = analyze_resume(&json!({"summary": words(10)}));
        assert_eq!(short.score, 5);
        let long = analyze_resume(&json!({"summary": words(150)}));
        assert_eq!(long.score, 10);
        let just_right = analyze_resume(&json!({"summary": words(100)}));
        assert_eq!(just_right.score, 15);
    }

    #[test]
    fn test_weak_experience() {
        let analysis = analyze_resume(&json!({
            "experience": [{"details": [
                "Responsible for reports",
                "Helped the team",
                "Worked on various things",
                "Managed the backlog",
                "Answered tickets"
            ]}]
        }));
        // 20 base + 10 for a 1/5 verb ratio, no numbers
        assert_eq!(analysis.score, 30);
        assert!(analysis
            .feedback
            .suggestions
            .iter()
            .any(|s| s.contains("led, managed, developed, created, implemented")));
        assert!(analysis
            .feedback
            .suggestions
            .iter()
            .any(|s| s.contains("responsible for")));
        assert!(analysis
            .feedback
            .weaknesses
            .contains(&"Lack of quantified achievements.".to_string()));
    }

    #[test]
    fn test_experience_without_details_gets_base_points_only() {
        let analysis = analyze_resume(&json!({"experience": [{"title": "Engineer"}]}));
        assert_eq!(analysis.score, 20);
    }

    #[test]
    fn test_quantified_match_is_case_sensitive() {
        let capitalised = analyze_resume(&json!({
            "experience": [{"details": ["Developed tooling over 5 Years"]}]
        }));
        // 20 base + 20 verbs, "5 Years" is not a metric
        assert_eq!(capitalised.score, 40);

        let lower = analyze_resume(&json!({
            "experience": [{"details": ["Developed tooling over 5 years"]}]
        }));
        assert_eq!(lower.score, 55);
    }

    #[test]
    fn test_comma_separated_skills() {
        let sparse = analyze_resume(&json!({"skills": "python, sql, "}));
        assert_eq!(sparse.score, 5);
        let rich = analyze_resume(&json!({"skills": "a, b, c, d, e"}));
        assert_eq!(rich.score, 15);
    }

    #[test]
    fn test_education_string_counts() {
        assert_eq!(analyze_resume(&json!({"education": "BSc"})).score, 15);
        assert_eq!(analyze_resume(&json!({"education": []})).score, 0);
    }
}

//! Job recommendations — scores every active job for a candidate and keeps the best.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jobs::requirements::required_skill_set;
use crate::matching::scorer::JobScorer;
use crate::matching::skill_match::SkillSet;
use crate::models::job::JobRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub job_id: Uuid,
    pub job: JobRow,
    pub match_score: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
}

/// Ranks `jobs` for `candidate`, highest score first, keeping at most `limit`.
///
/// A candidate without skills cannot be scored: the first `limit` jobs are
/// returned as-is with the scorer's default score. Ties keep the input order.
pub fn recommend_jobs(
    candidate: &SkillSet,
    jobs: Vec<JobRow>,
    scorer: &dyn JobScorer,
    limit: usize,
) -> Vec<Recommendation> {
    if candidate.is_empty() {
        return jobs
            .into_iter()
            .take(limit)
            .map(|job| Recommendation {
                job_id: job.id,
                job,
                match_score: scorer.default_score(),
                matched_skills: SkillSet::new(),
                missing_skills: SkillSet::new(),
            })
            .collect();
    }

    let mut recommendations: Vec<Recommendation> = jobs
        .into_iter()
        .map(|job| {
            let required = required_skill_set(job.requirements.as_ref());
            let result = scorer.score(candidate, &required);
            Recommendation {
                job_id: job.id,
                job,
                match_score: result.score,
                matched_skills: result.matched,
                missing_skills: result.missing,
            }
        })
        .collect();

    // sort_by is stable, so equal scores keep listing order
    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations.truncate(limit);
    recommendations
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::matching::scorer::SkillOverlapScorer;
    use chrono::Utc;
    use serde_json::{json, Value};

    pub(crate) fn make_job(title: &str, requirements: Option<Value>) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Tech Corp".to_string(),
            description: format!("Looking for a {title}"),
            requirements,
            location: Some("San Francisco, CA".to_string()),
            salary_range: None,
            posted_at: Utc::now(),
            active: true,
        }
    }

    fn skills(labels: &[&str]) -> SkillSet {
        labels.iter().collect()
    }

    #[test]
    fn test_ranks_by_score_descending() {
        let jobs = vec![
            make_job("Java Dev", Some(json!({"skills": ["java", "spring"]}))),
            make_job("Data Scientist", Some(json!({"skills": ["python", "machine learning", "sql"]}))),
            make_job("Analyst", Some(json!({"skills": ["sql"]}))),
        ];
        let scorer = SkillOverlapScorer::default();
        let recs = recommend_jobs(&skills(&["python", "sql", "data analysis"]), jobs, &scorer, 10);

        let titles: Vec<&str> = recs.iter().map(|r| r.job.title.as_str()).collect();
        assert_eq!(titles, vec!["Analyst", "Data Scientist", "Java Dev"]);
        assert_eq!(recs[0].match_score, 1.0);
        assert!((recs[1].match_score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(recs[1].missing_skills.to_vec(), vec!["machine learning".to_string()]);
        assert_eq!(recs[2].match_score, 0.0);
    }

    #[test]
    fn test_job_without_requirements_gets_default() {
        let jobs = vec![
            make_job("Mystery", None),
            make_job("Rust Dev", Some(json!(["rust", "tokio", "sql", "kafka"]))),
        ];
        let scorer = SkillOverlapScorer::default();
        let recs = recommend_jobs(&skills(&["rust"]), jobs, &scorer, 10);
        assert_eq!(recs[0].job.title, "Mystery");
        assert_eq!(recs[0].match_score, 0.5);
        assert!(recs[0].matched_skills.is_empty());
        assert_eq!(recs[1].match_score, 0.25);
    }

    #[test]
    fn test_candidate_without_skills_gets_default_listing() {
        let jobs: Vec<JobRow> = (0..15)
            .map(|i| make_job(&format!("Job {i}"), Some(json!(["python"]))))
            .collect();
        let scorer = SkillOverlapScorer::default();
        let recs = recommend_jobs(&SkillSet::new(), jobs, &scorer, 10);
        assert_eq!(recs.len(), 10);
        assert_eq!(recs[0].job.title, "Job 0");
        assert!(recs.iter().all(|r| r.match_score == 0.5));
        assert!(recs.iter().all(|r| r.missing_skills.is_empty()));
    }

    #[test]
    fn test_limit_truncates_ranked_results() {
        let jobs: Vec<JobRow> = (0..12)
            .map(|i| make_job(&format!("Job {i}"), Some(json!(["python"]))))
            .collect();
        let scorer = SkillOverlapScorer::default();
        let recs = recommend_jobs(&skills(&["python"]), jobs, &scorer, 10);
        assert_eq!(recs.len(), 10);
        // equal scores keep listing order
        assert_eq!(recs[0].job.title, "Job 0");
        assert_eq!(recs[9].job.title, "Job 9");
    }

    #[test]
    fn test_recommendation_serializes_job_without_requirements() {
        let job = make_job("Dev", Some(json!(["rust"])));
        let rec = Recommendation {
            job_id: job.id,
            job,
            match_score: 1.0,
            matched_skills: skills(&["Rust"]),
            missing_skills: SkillSet::new(),
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert!(value["job"].get("requirements").is_none());
        assert_eq!(value["matched_skills"], json!(["Rust"]));

        let back: Recommendation = serde_json::from_value(value).unwrap();
        assert_eq!(back.job_id, rec.job_id);
    }
}

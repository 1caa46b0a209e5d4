//! Keyword-based resume parsing.
//!
//! No NLP: contact details come from regexes, skills from a fixed keyword
//! list matched as lower-cased substrings, and experience sections from
//! header lines.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_RE: Regex =
        Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap();
}

pub const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "sql",
    "html",
    "css",
    "react",
    "node.js",
    "machine learning",
    "data analysis",
    "project management",
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "critical thinking",
];

const SUMMARY_HEADERS: &[&str] = &[
    "summary",
    "professional summary",
    "profile",
    "objective",
    "about me",
];
const EXPERIENCE_HEADERS: &[&str] = &["experience", "work history", "employment"];
const SECTION_TERMINATORS: &[&str] = &["education", "skills", "projects", "certifications"];
/// A blank line only closes an experience section holding at least this many lines.
const MAX_SECTION_LINES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub full_name: Option<String>,
    pub summary: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
}

pub fn parse_resume(text: &str) -> ParsedResume {
    ParsedResume {
        full_name: guess_full_name(text),
        summary: extract_summary(text),
        emails: find_all(&EMAIL_RE, text),
        phones: find_all(&PHONE_RE, text),
        skills: extract_skills(text),
        experience: extract_experience(text),
    }
}

fn find_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().trim().to_string()).collect()
}

/// Keywords found anywhere in the text, in keyword-list order.
///
/// Plain substring matching: "javascript" also yields "java".
pub fn extract_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SKILL_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

pub fn extract_experience(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_section = false;

    for line in text.split('\n') {
        let lower = line.trim().to_lowercase();

        if EXPERIENCE_HEADERS.iter().any(|h| lower.contains(h)) {
            if !current.is_empty() {
                sections.push(join_section(&current));
            }
            current = vec![line];
            in_section = true;
        } else if in_section {
            let terminator = SECTION_TERMINATORS.contains(&lower.as_str());
            if terminator || (lower.is_empty() && current.len() >= MAX_SECTION_LINES) {
                sections.push(join_section(&current));
                current.clear();
                in_section = false;
            } else {
                current.push(line);
            }
        }
    }

    if !current.is_empty() {
        sections.push(join_section(&current));
    }
    sections
}

/// Body of the first summary-like section, joined into one paragraph.
///
/// The header must sit on its own line. The body runs until a blank line or
/// the next experience or terminator header.
pub fn extract_summary(text: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim);
    lines.find(|l| {
        let lower = l.trim_end_matches(':').to_lowercase();
        SUMMARY_HEADERS.contains(&lower.as_str())
    })?;

    let body: Vec<&str> = lines
        .skip_while(|l| l.is_empty())
        .take_while(|l| !l.is_empty() && !is_section_header(l))
        .collect();
    (!body.is_empty()).then(|| body.join(" "))
}

fn is_section_header(line: &str) -> bool {
    let lower = line.trim_end_matches(':').to_lowercase();
    SECTION_TERMINATORS.contains(&lower.as_str())
        || lower == "work experience"
        || EXPERIENCE_HEADERS.contains(&lower.as_str())
}

fn join_section(lines: &[&str]) -> String {
    let mut section = lines.join("\n");
    section.push('\n');
    section
}

/// First non-blank line, if it looks like a name: two to four alphabetic words.
fn guess_full_name(text: &str) -> Option<String> {
    let first = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let words: Vec<&str> = first.split_whitespace().collect();
    let looks_like_name = (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|w| w.chars().all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.')));
    looks_like_name.then(|| words.join(" "))
}

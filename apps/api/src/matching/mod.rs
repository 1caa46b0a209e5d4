//! Candidate-to-job matching: the skill-overlap score and everything built on it.

pub mod cache;
pub mod candidate;
pub mod gap;
pub mod handlers;
pub mod recommender;
pub mod scorer;
pub mod skill_match;
pub mod tfidf;

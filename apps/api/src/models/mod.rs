pub mod job;
pub mod job_match;
pub mod portfolio;
pub mod resume;
pub mod user;

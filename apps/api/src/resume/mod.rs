//! Resume upload, text extraction, keyword parsing and content analysis.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod parser;

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];

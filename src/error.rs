//! Error handling for the resume tailor
//!
//! The text pipeline itself is total and never returns these; they come from
//! the caller layer (input validation, file extraction, config, generators).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keyword analysis error: {0}")]
    KeywordAnalysis(String),

    #[error("Rewrite generator error: {0}")]
    RewriteGenerator(String),

    #[error("Rewrite generator returned an unusable response: {0}")]
    InvalidGeneratorResponse(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, TailorError>;

/// Generator adapters are free to use anyhow internally
impl From<anyhow::Error> for TailorError {
    fn from(err: anyhow::Error) -> Self {
        TailorError::RewriteGenerator(err.to_string())
    }
}

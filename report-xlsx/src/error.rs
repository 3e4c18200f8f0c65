//! Error types for a conversion run
//!
//! Every variant is fatal for the run. A missing questionnaire column is not
//! an error at all; the decomposer just skips it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The input path does not exist
    #[error("input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The input is empty or has a header but no data rows
    #[error("input file has no data rows: {}", .path.display())]
    EmptyInput { path: PathBuf },

    /// No candidate encoding produced a valid table
    #[error(
        "could not read {} with any known encoding (tried: {})",
        .path.display(),
        .tried.join(", ")
    )]
    UnreadableFile { path: PathBuf, tried: Vec<String> },

    /// Anything else that went wrong while reading, transforming or writing
    #[error(transparent)]
    Processing(#[from] anyhow::Error),
}

impl ReportError {
    /// Short label used in console diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::NotFound { .. } => "not found",
            ReportError::EmptyInput { .. } => "empty input",
            ReportError::UnreadableFile { .. } => "unreadable file",
            ReportError::Processing(_) => "processing error",
        }
    }
}

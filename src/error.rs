//! Error types with fix suggestions
//!
//! The run table itself never fails; these errors come from loading run
//! files, parsing filter tokens and reading configuration.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum RunboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ─────────────────────────────────────────────────────────────
    // Run file errors (RB-010 to RB-011)
    // ─────────────────────────────────────────────────────────────

    #[error("RB-010: Unsupported run file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("RB-011: Duplicate run id '{run_id}' in run collection")]
    DuplicateRunId { run_id: String },

    // ─────────────────────────────────────────────────────────────
    // Filter errors (RB-020 to RB-021)
    // ─────────────────────────────────────────────────────────────

    #[error("RB-020: Invalid filter token '{raw}'")]
    InvalidFilterToken { raw: String },

    #[error("RB-021: Unknown run status '{raw}'")]
    UnknownStatus { raw: String },

    // ─────────────────────────────────────────────────────────────
    // Config errors (RB-030)
    // ─────────────────────────────────────────────────────────────

    #[error("RB-030: Configuration error: {reason}")]
    Config { reason: String },
}

pub type Result<T> = std::result::Result<T, RunboardError>;

impl FixSuggestion for RunboardError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            RunboardError::Io(_) => Some("Check file path and permissions"),
            RunboardError::Json(_) => Some("Check JSON syntax: the file must hold an array of runs"),
            RunboardError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            RunboardError::UnsupportedFormat { .. } => {
                Some("Use a .json, .yaml or .yml run file")
            }
            RunboardError::DuplicateRunId { .. } => {
                Some("Each run must carry a unique runId")
            }
            RunboardError::InvalidFilterToken { .. } => {
                Some("Use token:value, e.g. tag:dagster/schedule=daily or status:FAILURE")
            }
            RunboardError::UnknownStatus { .. } => Some(
                "Use one of QUEUED, NOT_STARTED, MANAGED, STARTED, SUCCESS, FAILURE, CANCELING, CANCELED",
            ),
            RunboardError::Config { .. } => {
                Some("Fix the named config file or environment variable, or remove the file to use defaults")
            }
        }
    }
}

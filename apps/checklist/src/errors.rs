use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type.
/// Every fallible step returns `Result<T, AppError>`; `main` converts it into a
/// non-zero exit status via `anyhow`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Malformed input file '{}': {source}", .path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing required setting '{0}'")]
    MissingSetting(String),

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Category collection is empty: nothing to measure or lay out")]
    EmptyCollection,

    #[error("Category name '{0}' cannot be converted to a number (numerical fit method)")]
    NonNumericCategory(String),

    #[error("Font '{font}' not found at '{}'", .path.display())]
    FontNotFound { font: String, path: PathBuf },

    #[error("Font '{font}' could not be parsed: {reason}")]
    InvalidFont { font: String, reason: String },

    #[error("Unable to write output file '{}': {reason}", .path.display())]
    Output { path: PathBuf, reason: String },

    #[error("Layout needs {pages} pages, more than the allowed {limit}")]
    PageLimitExceeded { pages: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

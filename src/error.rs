//! Error types for mdtoc operations.
//!
//! Extraction itself never fails; errors only come from configuration,
//! I/O at the command-line edge, fetching remote documents and the
//! regression check.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("heading level {0} is outside 1..=6")]
    InvalidLevel(u8),

    #[error("top-level set must contain at least one heading level")]
    EmptyLevels,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to fetch {0}")]
    Fetch(String),

    #[error("slug regression check failed with {count} mismatch(es)")]
    Regression { count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

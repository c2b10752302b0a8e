use thiserror::Error;

use crate::config::ConfigError;
use crate::navigation::SearchError;

#[derive(Error, Debug)]
pub enum GleanerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Login failed, still on the login page. Check the cookies file or browser profile")]
    AuthenticationFailed,

    #[error("Suspension error: {0}")]
    Suspension(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

impl GleanerError {
    pub fn browser(context: &str, err: impl std::fmt::Display) -> Self {
        GleanerError::Browser(format!("{}: {}", context, err))
    }
}

pub type Result<T> = std::result::Result<T, GleanerError>;

// src/error.rs

//! Unified error handling for the posting tracker.

use std::fmt;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// No posting with the given local id
    #[error("Posting {id} not found")]
    NotFound { id: i64 },

    /// Status value outside the fixed vocabulary
    #[error("Invalid status '{0}'")]
    InvalidStatus(String),

    /// Another posting already owns this external id
    #[error("Duplicate external id: {0}")]
    DuplicateExternalId(String),

    /// Fetching the thread document failed
    #[error("Failed to fetch source thread: {0}")]
    SourceFetch(String),

    /// The thread document does not have the expected structure
    #[error("Malformed thread document: {0}")]
    MalformedDocument(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a source fetch error.
    pub fn source_fetch(message: impl fmt::Display) -> Self {
        Self::SourceFetch(message.to_string())
    }

    /// Create a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// True for the "unknown id" failure mode.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for the "status outside vocabulary" failure mode.
    pub fn is_invalid_status(&self) -> bool {
        matches!(self, Self::InvalidStatus(_))
    }
}

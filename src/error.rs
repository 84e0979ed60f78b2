//! Custom error types for docledger

use thiserror::Error;

/// Main error type for docledger operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required input was empty or whitespace. Raised before any I/O.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Database or table creation failed
    #[error("Failed to provision database: {0}")]
    Provisioning(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Invalid connection descriptor: {0}")]
    Descriptor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Blocking runtime error: {0}")]
    Runtime(String),
}

impl Error {
    /// Build a validation error for an empty required field
    pub(crate) fn empty(field: &'static str) -> Self {
        Error::Validation {
            field,
            reason: "cannot be empty".to_string(),
        }
    }

    /// True when the error came from input validation rather than the database
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

/// Result type alias for docledger
pub type Result<T> = std::result::Result<T, Error>;

/// Reject empty or whitespace-only input
pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::empty(field));
    }
    Ok(())
}

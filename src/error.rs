use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Agent start error: {0}")]
    AgentStart(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, Duration),

    #[error("Extraction cancelled")]
    Cancelled,
}

// Conversion implementations for common error types
impl From<std::io::Error> for ExtractionError {
    fn from(err: std::io::Error) -> Self {
        ExtractionError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ExtractionError {
    fn from(err: toml::de::Error) -> Self {
        ExtractionError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::SchemaViolation(err.to_string())
    }
}

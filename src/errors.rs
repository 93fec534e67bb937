use thiserror::Error;

/// Error type for local failures: configuration, file IO, serialization.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, DeskError>;

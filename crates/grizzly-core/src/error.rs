use thiserror::Error;

/// Top-level error type for Grizzly.
#[derive(Debug, Error)]
pub enum GrizzlyError {
    /// Error from an external AI service.
    #[error("provider error: {0}")]
    Provider(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed or incomplete request from a caller.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

use thiserror::Error;

/// azcost error types
#[derive(Error, Debug)]
pub enum AzcostError {
    /// Token acquisition failed
    #[error("auth error: {0}")]
    Auth(String),

    /// HTTP request failed
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a response or cached document
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate card cache operation failed
    #[error("cache error: {0}")]
    Cache(String),
}

/// Result type alias for azcost
pub type Result<T> = std::result::Result<T, AzcostError>;

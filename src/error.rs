//! Error types for ytmcp.

use thiserror::Error;

/// Library-level error type for ytmcp operations.
#[derive(Error, Debug)]
pub enum YtMcpError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any failure from the captions backend. The upstream error kind is not kept.
    #[error("Error fetching transcript with proxy: {0}")]
    TranscriptFetchFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for ytmcp operations.
pub type Result<T> = std::result::Result<T, YtMcpError>;

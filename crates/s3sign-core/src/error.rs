//! Error types for the s3sign core.

/// Core error type for configuration and region handling.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A region name or endpoint was empty or malformed.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

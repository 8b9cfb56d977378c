//! Client error types.

use s3sign_auth::AuthError;
use s3sign_model::S3Error;
use s3sign_xml::XmlError;

/// Error type returned by a [`Transport`](crate::Transport).
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while building, sending or interpreting a request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Credentials or signing settings are incomplete. Raised before signing.
    #[error("configuration error: {0}")]
    Configuration(#[from] AuthError),

    /// The service answered with an error.
    #[error(transparent)]
    Service(#[from] S3Error),

    /// A response body could not be read.
    #[error("serialization error: {0}")]
    Serialization(#[from] XmlError),

    /// The transport failed to deliver the request.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// A header name or value cannot be sent over HTTP.
    #[error("invalid header {0}")]
    InvalidHeader(String),

    /// The assembled URL is not a valid URI.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl ClientError {
    /// The service error, if the service answered with one.
    #[must_use]
    pub fn as_service_error(&self) -> Option<&S3Error> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;

//! Error types for request signing and signature verification.

/// Errors produced while signing or verifying a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The access key ID is empty.
    #[error("Missing access key ID")]
    MissingAccessKey,

    /// The secret access key is empty.
    #[error("Missing secret access key")]
    MissingSecretKey,

    /// The region name used in the SigV4 credential scope is empty.
    #[error("Missing region for the credential scope")]
    MissingRegion,

    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The signing algorithm is not `AWS4-HMAC-SHA256`.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A header named in `SignedHeaders` is missing.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The `Credential` component is not `AKID/date/region/service/aws4_request`.
    #[error("Invalid credential format")]
    InvalidCredential,

    /// The access key ID is unknown to the credential provider.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The recomputed signature differs from the provided one.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}

impl AuthError {
    /// Whether the error is a configuration problem detected before signing.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingAccessKey | Self::MissingSecretKey | Self::MissingRegion
        )
    }
}

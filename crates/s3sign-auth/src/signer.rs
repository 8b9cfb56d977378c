//! The signing seam shared by both schemes.

use chrono::{DateTime, Utc};
use s3sign_core::{ClientConfig, SignatureVersion};

use crate::canonical::{CONTENT_SHA256_HEADER, CanonicalRequestInput};
use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::{sigv2, sigv4};

/// Headers a signer produces, ready to attach to the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningResult {
    /// Scheme that produced this result.
    pub version: SignatureVersion,
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Request timestamp, sent as `Date` (legacy) or `x-amz-date` (V4).
    pub date: String,
    /// Payload hash, sent as `x-amz-content-sha256`. V4 only.
    pub content_hash: Option<String>,
}

impl SigningResult {
    /// Name of the header that carries [`SigningResult::date`].
    #[must_use]
    pub fn date_header(&self) -> &'static str {
        match self.version {
            SignatureVersion::V2 => "date",
            SignatureVersion::V4 => sigv4::AMZ_DATE_HEADER,
        }
    }

    /// All `(name, value)` pairs to set on the request.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("authorization", self.authorization.clone()),
            (self.date_header(), self.date.clone()),
        ];
        if let Some(hash) = &self.content_hash {
            headers.push((CONTENT_SHA256_HEADER, hash.clone()));
        }
        headers
    }
}

/// Computes the authentication headers for a request.
///
/// Signers are stateless apart from their configuration and can be shared
/// between threads.
pub trait RequestSigner: std::fmt::Debug + Send + Sync {
    /// Which scheme this signer implements.
    fn version(&self) -> SignatureVersion;

    /// Sign `input` at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the credentials or the signer's own
    /// settings are incomplete.
    fn sign(
        &self,
        input: &CanonicalRequestInput,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<SigningResult, AuthError>;
}

/// Legacy HMAC-SHA1 signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SigV2Signer;

impl RequestSigner for SigV2Signer {
    fn version(&self) -> SignatureVersion {
        SignatureVersion::V2
    }

    fn sign(
        &self,
        input: &CanonicalRequestInput,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<SigningResult, AuthError> {
        sigv2::sign(input, credentials, timestamp)
    }
}

/// SigV4 signer bound to a region and service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigV4Signer {
    region: String,
    service: String,
}

impl SigV4Signer {
    /// Create a signer for `region` and `service`.
    #[must_use]
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    /// The region in the credential scope.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The service in the credential scope.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl RequestSigner for SigV4Signer {
    fn version(&self) -> SignatureVersion {
        SignatureVersion::V4
    }

    fn sign(
        &self,
        input: &CanonicalRequestInput,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<SigningResult, AuthError> {
        sigv4::sign(input, credentials, &self.region, &self.service, timestamp)
    }
}

/// Build the signer selected by `config`.
#[must_use]
pub fn signer_for(config: &ClientConfig) -> Box<dyn RequestSigner> {
    match config.signature_version {
        SignatureVersion::V2 => Box::new(SigV2Signer),
        SignatureVersion::V4 => Box::new(SigV4Signer::new(
            config.region.name(),
            config.service.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use http::Method;
    use s3sign_core::Region;

    use super::*;

    fn input() -> CanonicalRequestInput {
        CanonicalRequestInput::new(
            Method::GET,
            "https://bucket.s3.amazonaws.com/key".parse().unwrap(),
        )
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_should_select_signer_from_config() {
        let config = ClientConfig::new(Region::EuWest1, None);
        let signer = signer_for(&config);
        assert_eq!(signer.version(), SignatureVersion::V4);

        let legacy = signer_for(&config.with_signature_version(SignatureVersion::V2));
        assert_eq!(legacy.version(), SignatureVersion::V2);
    }

    #[test]
    fn test_should_emit_v4_headers() {
        let creds = Credentials::new("AKID", "secret");
        let result = SigV4Signer::new("us-east-1", "s3")
            .sign(&input(), &creds, timestamp())
            .unwrap();
        let headers = result.headers();
        let names: Vec<&str> = headers.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["authorization", "x-amz-date", "x-amz-content-sha256"]);
        assert_eq!(headers[1].1, "20240102T030405Z");
    }

    #[test]
    fn test_should_emit_legacy_headers() {
        let creds = Credentials::new("AKID", "secret");
        let result = SigV2Signer.sign(&input(), &creds, timestamp()).unwrap();
        assert_eq!(
            result.headers(),
            vec![
                ("authorization", result.authorization.clone()),
                ("date", "Tue, 02 Jan 2024 03:04:05 GMT".to_owned()),
            ]
        );
        assert!(result.authorization.starts_with("AWS AKID:"));
    }

    #[test]
    fn test_should_reject_v4_signer_without_region() {
        let creds = Credentials::new("AKID", "secret");
        assert_eq!(
            SigV4Signer::new("", "s3").sign(&input(), &creds, timestamp()),
            Err(AuthError::MissingRegion)
        );
    }
}

//! Client configuration.
//!
//! All configuration is driven by environment variables, matching the
//! conventions of the AWS command line tools where one exists.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::Region;

/// The request-signing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum SignatureVersion {
    /// Legacy `AWS AKID:signature` scheme (HMAC-SHA1).
    #[serde(rename = "v2")]
    V2,
    /// `AWS4-HMAC-SHA256` scheme.
    #[default]
    #[serde(rename = "v4")]
    V4,
}

impl SignatureVersion {
    /// Returns the configuration name of this version.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V4 => "v4",
        }
    }
}

impl fmt::Display for SignatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "v2" | "s3" | "legacy" => Ok(Self::V2),
            "4" | "v4" | "s3v4" => Ok(Self::V4),
            other => Err(CoreError::Config(format!(
                "unknown signature version: {other}"
            ))),
        }
    }
}

/// Configuration for building and signing S3 requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Region requests are scoped to and sent to.
    pub region: Region,
    /// Default bucket; when absent the bucket segment is omitted from URLs.
    pub bucket: Option<String>,
    /// Whether to connect over HTTPS.
    pub use_ssl: bool,
    /// Signing scheme.
    pub signature_version: SignatureVersion,
    /// Service name used in the SigV4 credential scope.
    pub service: String,
    /// Log level.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            bucket: None,
            use_ssl: true,
            signature_version: SignatureVersion::default(),
            service: "s3".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given region and bucket.
    #[must_use]
    pub fn new(region: Region, bucket: Option<String>) -> Self {
        Self {
            region,
            bucket,
            ..Self::default()
        }
    }

    /// Set the signing scheme.
    #[must_use]
    pub fn with_signature_version(mut self, version: SignatureVersion) -> Self {
        self.signature_version = version;
        self
    }

    /// Set whether requests use HTTPS.
    #[must_use]
    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// The URL scheme implied by [`ClientConfig::use_ssl`].
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl { "https" } else { "http" }
    }

    /// Load configuration from environment variables, ignoring invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid environment configuration, using defaults");
            Self::default()
        })
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_REGION` / `DEFAULT_REGION` | `us-east-1` |
    /// | `S3_ENDPOINT` | region endpoint |
    /// | `S3_BUCKET` | *(unset)* |
    /// | `S3_USE_SSL` | `true` |
    /// | `S3_SIGNATURE_VERSION` | `v4` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if a variable holds an unusable value.
    pub fn try_from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("AWS_REGION").or_else(|| lookup("DEFAULT_REGION")) {
            config.region = v.parse()?;
        }
        if let Some(v) = lookup("S3_ENDPOINT").filter(|v| !v.is_empty()) {
            config.region = config.region.with_endpoint(v);
        }
        if let Some(v) = lookup("S3_BUCKET").filter(|v| !v.is_empty()) {
            config.bucket = Some(v);
        }
        if let Some(v) = lookup("S3_USE_SSL") {
            config.use_ssl = !(v == "0" || v.eq_ignore_ascii_case("false"));
        }
        if let Some(v) = lookup("S3_SIGNATURE_VERSION") {
            config.signature_version = v.parse()?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        debug!(
            region = %config.region,
            endpoint = config.region.endpoint(),
            signature_version = %config.signature_version,
            "loaded client configuration"
        );

        Ok(config)
    }
}

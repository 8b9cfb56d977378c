//! Region definitions shared across crates.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// An S3 region.
///
/// Each region maps to the identifier used in the SigV4 credential scope
/// ([`Region::name`]) and to the host requests are sent to
/// ([`Region::endpoint`]). The well-known regions use the legacy dash-style
/// S3 endpoints; anything else is expressed as [`Region::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Region {
    /// US East (N. Virginia), the "US Standard" region.
    #[default]
    #[serde(rename = "us-east-1")]
    UsEast1,
    /// US West (N. California).
    #[serde(rename = "us-west-1")]
    UsWest1,
    /// US West (Oregon).
    #[serde(rename = "us-west-2")]
    UsWest2,
    /// EU (Ireland).
    #[serde(rename = "eu-west-1")]
    EuWest1,
    /// EU (Frankfurt).
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    /// Asia Pacific (Singapore).
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    /// Asia Pacific (Sydney).
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    /// Asia Pacific (Tokyo).
    #[serde(rename = "ap-northeast-1")]
    ApNortheast1,
    /// Asia Pacific (Seoul).
    #[serde(rename = "ap-northeast-2")]
    ApNortheast2,
    /// South America (Sao Paulo).
    #[serde(rename = "sa-east-1")]
    SaEast1,
    /// Any other S3-compatible deployment.
    #[serde(rename = "custom")]
    Custom {
        /// Region identifier used in the SigV4 credential scope.
        name: String,
        /// Endpoint host (optionally with a port) requests are sent to.
        endpoint: String,
    },
}

impl Region {
    /// Region used when nothing else is configured.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a custom region from a scope name and an endpoint host.
    #[must_use]
    pub fn custom(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::Custom {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    /// The region identifier used in the SigV4 credential scope.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::UsEast1 => "us-east-1",
            Self::UsWest1 => "us-west-1",
            Self::UsWest2 => "us-west-2",
            Self::EuWest1 => "eu-west-1",
            Self::EuCentral1 => "eu-central-1",
            Self::ApSoutheast1 => "ap-southeast-1",
            Self::ApSoutheast2 => "ap-southeast-2",
            Self::ApNortheast1 => "ap-northeast-1",
            Self::ApNortheast2 => "ap-northeast-2",
            Self::SaEast1 => "sa-east-1",
            Self::Custom { name, .. } => name,
        }
    }

    /// The endpoint host for this region.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::UsEast1 => "s3.amazonaws.com",
            Self::UsWest1 => "s3-us-west-1.amazonaws.com",
            Self::UsWest2 => "s3-us-west-2.amazonaws.com",
            Self::EuWest1 => "s3-eu-west-1.amazonaws.com",
            Self::EuCentral1 => "s3-eu-central-1.amazonaws.com",
            Self::ApSoutheast1 => "s3-ap-southeast-1.amazonaws.com",
            Self::ApSoutheast2 => "s3-ap-southeast-2.amazonaws.com",
            Self::ApNortheast1 => "s3-ap-northeast-1.amazonaws.com",
            Self::ApNortheast2 => "s3-ap-northeast-2.amazonaws.com",
            Self::SaEast1 => "s3-sa-east-1.amazonaws.com",
            Self::Custom { endpoint, .. } => endpoint,
        }
    }

    /// Replace the endpoint while keeping the signing-scope name.
    #[must_use]
    pub fn with_endpoint(self, endpoint: impl Into<String>) -> Self {
        Self::Custom {
            name: self.name().to_owned(),
            endpoint: endpoint.into(),
        }
    }
}

impl FromStr for Region {
    type Err = CoreError;

    /// Parse a region identifier.
    ///
    /// Unknown identifiers become a [`Region::Custom`] pointing at
    /// `s3.<name>.amazonaws.com`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let region = match s {
            "" => return Err(CoreError::InvalidRegion("region name is empty".to_owned())),
            "us-east-1" => Self::UsEast1,
            "us-west-1" => Self::UsWest1,
            "us-west-2" => Self::UsWest2,
            "eu-west-1" => Self::EuWest1,
            "eu-central-1" => Self::EuCentral1,
            "ap-southeast-1" => Self::ApSoutheast1,
            "ap-southeast-2" => Self::ApSoutheast2,
            "ap-northeast-1" => Self::ApNortheast1,
            "ap-northeast-2" => Self::ApNortheast2,
            "sa-east-1" => Self::SaEast1,
            other => Self::custom(other, format!("s3.{other}.amazonaws.com")),
        };
        Ok(region)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

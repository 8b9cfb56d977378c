//! Shared S3 enums.

use serde::{Deserialize, Serialize};

/// Header selecting the storage class of an uploaded object.
pub const STORAGE_CLASS_HEADER: &str = "x-amz-storage-class";

/// Storage class of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StorageClass {
    /// Default storage class.
    #[default]
    #[serde(rename = "STANDARD")]
    Standard,
    /// Infrequent access.
    #[serde(rename = "STANDARD_IA")]
    StandardIa,
    /// Reduced redundancy.
    #[serde(rename = "REDUCED_REDUNDANCY")]
    ReducedRedundancy,
    /// Glacier flexible retrieval.
    #[serde(rename = "GLACIER")]
    Glacier,
    /// Single-zone infrequent access.
    #[serde(rename = "ONEZONE_IA")]
    OnezoneIa,
    /// Automatic tiering.
    #[serde(rename = "INTELLIGENT_TIERING")]
    IntelligentTiering,
    /// Glacier instant retrieval.
    #[serde(rename = "GLACIER_IR")]
    GlacierIr,
    /// Glacier deep archive.
    #[serde(rename = "DEEP_ARCHIVE")]
    DeepArchive,
}

impl StorageClass {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::StandardIa => "STANDARD_IA",
            Self::ReducedRedundancy => "REDUCED_REDUNDANCY",
            Self::Glacier => "GLACIER",
            Self::OnezoneIa => "ONEZONE_IA",
            Self::IntelligentTiering => "INTELLIGENT_TIERING",
            Self::GlacierIr => "GLACIER_IR",
            Self::DeepArchive => "DEEP_ARCHIVE",
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StorageClass {
    fn from(s: &str) -> Self {
        match s {
            "STANDARD_IA" => Self::StandardIa,
            "REDUCED_REDUNDANCY" => Self::ReducedRedundancy,
            "GLACIER" => Self::Glacier,
            "ONEZONE_IA" => Self::OnezoneIa,
            "INTELLIGENT_TIERING" => Self::IntelligentTiering,
            "GLACIER_IR" => Self::GlacierIr,
            "DEEP_ARCHIVE" => Self::DeepArchive,
            _ => Self::default(),
        }
    }
}

//! Operations the client can issue.

/// All supported S3 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3Operation {
    /// The GetObject operation.
    GetObject,
    /// The PutObject operation.
    PutObject,
    /// The HeadObject operation.
    HeadObject,
    /// The CopyObject operation.
    CopyObject,
    /// The DeleteObject operation.
    DeleteObject,
    /// The ListObjectsV2 operation.
    ListObjectsV2,
    /// The GetBucketAcl operation.
    GetBucketAcl,
    /// The PutBucketAcl operation.
    PutBucketAcl,
    /// The GetObjectAcl operation.
    GetObjectAcl,
    /// The PutObjectAcl operation.
    PutObjectAcl,
}

impl S3Operation {
    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetObject => "GetObject",
            Self::PutObject => "PutObject",
            Self::HeadObject => "HeadObject",
            Self::CopyObject => "CopyObject",
            Self::DeleteObject => "DeleteObject",
            Self::ListObjectsV2 => "ListObjectsV2",
            Self::GetBucketAcl => "GetBucketAcl",
            Self::PutBucketAcl => "PutBucketAcl",
            Self::GetObjectAcl => "GetObjectAcl",
            Self::PutObjectAcl => "PutObjectAcl",
        }
    }

    /// Returns the HTTP method the operation is sent with.
    #[must_use]
    pub fn method(&self) -> http::Method {
        match self {
            Self::GetObject | Self::ListObjectsV2 | Self::GetBucketAcl | Self::GetObjectAcl => {
                http::Method::GET
            }
            Self::PutObject | Self::CopyObject | Self::PutBucketAcl | Self::PutObjectAcl => {
                http::Method::PUT
            }
            Self::HeadObject => http::Method::HEAD,
            Self::DeleteObject => http::Method::DELETE,
        }
    }

    /// Returns the subresource marker appended to the URL, if any.
    #[must_use]
    pub fn subresource(&self) -> Option<&'static str> {
        match self {
            Self::GetBucketAcl | Self::PutBucketAcl | Self::GetObjectAcl | Self::PutObjectAcl => {
                Some("acl")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for S3Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

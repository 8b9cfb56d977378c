//! Access control lists expressed as request headers.
//!
//! An [`Acl`] is either one of the canned ACLs S3 predefines, sent as
//! `x-amz-acl`, or a set of explicit grants, sent as one `x-amz-grant-*`
//! header per permission.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Header carrying a canned ACL.
pub const CANNED_ACL_HEADER: &str = "x-amz-acl";

/// ACLs predefined by S3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CannedAcl {
    /// Owner gets full control; nobody else has access.
    #[default]
    #[serde(rename = "private")]
    Private,
    /// Everyone gets read and write access.
    #[serde(rename = "public-read-write")]
    PublicReadWrite,
    /// Everyone gets read access.
    #[serde(rename = "public-read")]
    PublicRead,
    /// Authenticated AWS users get read access.
    #[serde(rename = "authenticated-read")]
    AuthenticatedRead,
    /// The bucket owner gets read access to the object.
    #[serde(rename = "bucket-owner-read")]
    BucketOwnerRead,
    /// The bucket owner gets full control of the object.
    #[serde(rename = "bucket-owner-full-control")]
    BucketOwnerFullControl,
    /// The log delivery group may write access logs to the bucket.
    #[serde(rename = "log-delivery-write")]
    LogDeliveryWrite,
}

impl CannedAcl {
    /// Returns the header value for this ACL.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicReadWrite => "public-read-write",
            Self::PublicRead => "public-read",
            Self::AuthenticatedRead => "authenticated-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
            Self::LogDeliveryWrite => "log-delivery-write",
        }
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CannedAcl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public-read-write" => Ok(Self::PublicReadWrite),
            "public-read" => Ok(Self::PublicRead),
            "authenticated-read" => Ok(Self::AuthenticatedRead),
            "bucket-owner-read" => Ok(Self::BucketOwnerRead),
            "bucket-owner-full-control" => Ok(Self::BucketOwnerFullControl),
            "log-delivery-write" => Ok(Self::LogDeliveryWrite),
            other => Err(format!("unknown canned ACL: {other}")),
        }
    }
}

/// A permission that can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// List a bucket or read an object and its metadata.
    #[serde(rename = "READ")]
    Read,
    /// Create, overwrite and delete objects in a bucket.
    #[serde(rename = "WRITE")]
    Write,
    /// Read the ACL.
    #[serde(rename = "READ_ACP")]
    ReadAcp,
    /// Write the ACL.
    #[serde(rename = "WRITE_ACP")]
    WriteAcp,
    /// All of the above.
    #[serde(rename = "FULL_CONTROL")]
    FullControl,
}

impl Permission {
    /// Returns the permission name used in ACL documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::ReadAcp => "READ_ACP",
            Self::WriteAcp => "WRITE_ACP",
            Self::FullControl => "FULL_CONTROL",
        }
    }

    /// Returns the request header that grants this permission.
    #[must_use]
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::Read => "x-amz-grant-read",
            Self::Write => "x-amz-grant-write",
            Self::ReadAcp => "x-amz-grant-read-acp",
            Self::WriteAcp => "x-amz-grant-write-acp",
            Self::FullControl => "x-amz-grant-full-control",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The receiver of a permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grantee {
    /// Every authenticated AWS account.
    AuthenticatedUsers,
    /// Anyone, signed or anonymous.
    AllUsers,
    /// The S3 log delivery group.
    LogDelivery,
    /// The account registered under an email address.
    EmailAddress(String),
    /// The account with a canonical user ID.
    Id(String),
}

impl Grantee {
    /// Returns the grantee as it appears in an `x-amz-grant-*` header.
    ///
    /// ```
    /// use s3sign_model::Grantee;
    ///
    /// assert_eq!(
    ///     Grantee::EmailAddress("dev@example.com".into()).header_value(),
    ///     r#"emailAddress="dev@example.com""#
    /// );
    /// ```
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::AuthenticatedUsers => {
                r#"uri="http://acs.amazonaws.com/groups/global/AuthenticatedUsers""#.to_owned()
            }
            Self::AllUsers => r#"uri="http://acs.amazonaws.com/groups/global/AllUsers""#.to_owned(),
            Self::LogDelivery => r#"uri="http://acs.amazonaws.com/groups/s3/LogDelivery""#.to_owned(),
            Self::EmailAddress(email) => format!(r#"emailAddress="{email}""#),
            Self::Id(id) => format!(r#"id="{id}""#),
        }
    }
}

/// One permission granted to one or more grantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    permission: Permission,
    grantees: Vec<Grantee>,
}

impl PermissionGrant {
    /// Grant `permission` to every grantee in `grantees`.
    ///
    /// Repeated grantees are kept once, in first-seen order.
    #[must_use]
    pub fn new(permission: Permission, grantees: impl IntoIterator<Item = Grantee>) -> Self {
        let mut unique: Vec<Grantee> = Vec::new();
        for grantee in grantees {
            if !unique.contains(&grantee) {
                unique.push(grantee);
            }
        }
        Self {
            permission,
            grantees: unique,
        }
    }

    /// Grant `permission` to a single grantee.
    #[must_use]
    pub fn single(permission: Permission, grantee: Grantee) -> Self {
        Self::new(permission, [grantee])
    }

    /// The granted permission.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// The grantees.
    #[must_use]
    pub fn grantees(&self) -> &[Grantee] {
        &self.grantees
    }

    /// Returns the `(header, value)` pair for this grant.
    #[must_use]
    pub fn header(&self) -> (&'static str, String) {
        let value = self
            .grantees
            .iter()
            .map(Grantee::header_value)
            .collect::<Vec<_>>()
            .join(", ");
        (self.permission.header_name(), value)
    }
}

/// An access control list to attach to a bucket or object request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acl {
    /// A canned ACL.
    Canned(CannedAcl),
    /// Explicit grants, at most one per permission.
    Custom(BTreeMap<Permission, PermissionGrant>),
}

impl Acl {
    /// Build a custom ACL.
    ///
    /// A later grant for the same permission replaces an earlier one.
    #[must_use]
    pub fn custom(grants: impl IntoIterator<Item = PermissionGrant>) -> Self {
        Self::Custom(
            grants
                .into_iter()
                .map(|grant| (grant.permission, grant))
                .collect(),
        )
    }

    /// Returns the request headers that express this ACL.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Canned(acl) => vec![(CANNED_ACL_HEADER, acl.as_str().to_owned())],
            Self::Custom(grants) => grants.values().map(PermissionGrant::header).collect(),
        }
    }
}

impl From<CannedAcl> for Acl {
    fn from(acl: CannedAcl) -> Self {
        Self::Canned(acl)
    }
}

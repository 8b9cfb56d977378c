//! Value objects shared by the S3 signing and request-assembly crates.
//!
//! Everything here is plain data: error codes returned by the service, the
//! ACL and storage-class values that turn into request headers, and the set
//! of operations the client can issue.

pub mod acl;
pub mod error;
pub mod operations;
pub mod types;

pub use acl::{Acl, CannedAcl, Grantee, Permission, PermissionGrant};
pub use error::{S3Error, S3ErrorCode};
pub use operations::S3Operation;
pub use types::StorageClass;

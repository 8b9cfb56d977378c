//! Request assembly and the S3 client.
//!
//! [`RequestSerializer`] turns a [`RequestParams`] into a fully signed
//! `http::Request`. [`S3Client`] drives one serializer per operation and hands
//! the result to a caller-supplied [`Transport`].
//!
//! ```
//! use bytes::Bytes;
//! use s3sign_auth::Credentials;
//! use s3sign_client::{S3Client, TransportError};
//! use s3sign_core::{ClientConfig, Region};
//!
//! let transport = |req: http::Request<Bytes>| -> Result<http::Response<Bytes>, TransportError> {
//!     assert!(req.headers().contains_key("authorization"));
//!     Ok(http::Response::new(Bytes::from_static(b"contents")))
//! };
//! let config = ClientConfig::new(Region::UsEast1, Some("bucket".to_owned()));
//! let client = S3Client::new(config, Credentials::new("AKID", "secret"), transport);
//!
//! assert_eq!(client.get_object("notes.txt").unwrap().as_ref(), b"contents");
//! ```

pub mod client;
pub mod content_type;
pub mod error;
pub mod serializer;
pub mod transport;

pub use client::{ListObjectsOptions, ObjectMetadata, PutObjectOptions, S3Client, S3Response};
pub use error::{ClientError, ClientResult, TransportError};
pub use serializer::{RequestParams, RequestSerializer};
pub use transport::Transport;

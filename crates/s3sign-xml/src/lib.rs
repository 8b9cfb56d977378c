//! S3 XML handling for the signing client.
//!
//! S3 reports failures as a flat `<Error>` document (`noErrorWrapping`):
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Error>
//!   <Code>NoSuchKey</Code>
//!   <Message>The resource you requested does not exist</Message>
//!   <Resource>/mybucket/myfoto.jpg</Resource>
//!   <RequestId>4442587FB7D0A2F9</RequestId>
//! </Error>
//! ```
//!
//! # Key components
//!
//! - [`S3Deserialize`] trait and [`from_xml`] function for parsing XML bodies into structs
//! - [`parse_error_response`] for turning an error body into an [`s3sign_model::S3Error`]
//! - [`error_to_xml`] for formatting an error body, used to stage canned responses

pub mod deserialize;
pub mod error;

pub use deserialize::{S3Deserialize, from_xml, parse_error_response};
pub use error::{XmlError, error_to_xml};

//! The HTTP seam.
//!
//! The client never opens connections itself. A [`Transport`] receives the
//! fully signed request and returns the raw response.

use bytes::Bytes;

use crate::error::TransportError;

/// Sends a signed request and returns the response.
///
/// Any closure with the right signature is a transport:
///
/// ```
/// use bytes::Bytes;
/// use s3sign_client::{Transport, TransportError};
///
/// let transport = |_req: http::Request<Bytes>| -> Result<http::Response<Bytes>, TransportError> {
///     Ok(http::Response::new(Bytes::from_static(b"hello")))
/// };
/// let response = transport.send(http::Request::new(Bytes::new())).unwrap();
/// assert_eq!(response.body().as_ref(), b"hello");
/// ```
pub trait Transport: Send + Sync {
    /// Deliver `request`.
    ///
    /// Non-2xx responses are returned as `Ok`; only delivery failures are
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the request could not be delivered.
    fn send(&self, request: http::Request<Bytes>) -> Result<http::Response<Bytes>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(http::Request<Bytes>) -> Result<http::Response<Bytes>, TransportError> + Send + Sync,
{
    fn send(&self, request: http::Request<Bytes>) -> Result<http::Response<Bytes>, TransportError> {
        self(request)
    }
}

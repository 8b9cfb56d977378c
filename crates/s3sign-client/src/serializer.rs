//! Request assembly.
//!
//! [`RequestSerializer`] turns a logical request (method, object path,
//! subresource, ACL, metadata, storage class, custom headers and query
//! parameters) into a signed [`http::Request`]. It performs no I/O.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use s3sign_auth::{
    CONTENT_SHA256_HEADER, CanonicalRequestInput, Credentials, RequestSigner, hash_payload,
    signer_for,
};
use s3sign_core::{ClientConfig, SignatureVersion};
use s3sign_model::{Acl, StorageClass};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::content_type::content_type_for;
use crate::error::{ClientError, ClientResult};

/// Header carrying temporary-credential session tokens.
pub const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";

/// Prefix of user metadata headers.
pub const META_HEADER_PREFIX: &str = "x-amz-meta-";

/// Characters escaped in object paths. `/` is kept as the segment separator.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Business parameters of one request.
///
/// ```
/// use s3sign_client::RequestParams;
/// use s3sign_model::{CannedAcl, StorageClass};
///
/// let params = RequestParams::builder()
///     .path("photos/puppy.jpg")
///     .acl(CannedAcl::PublicRead)
///     .storage_class(StorageClass::StandardIa)
///     .body("woof")
///     .build();
/// assert_eq!(params.path.as_deref(), Some("photos/puppy.jpg"));
/// ```
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct RequestParams {
    /// Object path inside the bucket. `None` addresses the bucket itself.
    #[builder(default, setter(strip_option, into))]
    pub path: Option<String>,
    /// Subresource marker such as `acl`.
    #[builder(default, setter(strip_option, into))]
    pub subresource: Option<String>,
    /// ACL headers to attach.
    #[builder(default, setter(strip_option, into))]
    pub acl: Option<Acl>,
    /// User metadata, sent as `x-amz-meta-<key>`.
    #[builder(default)]
    pub metadata: BTreeMap<String, String>,
    /// Storage class, sent as `x-amz-storage-class`.
    #[builder(default, setter(strip_option))]
    pub storage_class: Option<StorageClass>,
    /// Extra query parameters.
    #[builder(default)]
    pub custom_params: BTreeMap<String, String>,
    /// Extra headers. They override headers set from the other fields.
    #[builder(default)]
    pub custom_headers: BTreeMap<String, String>,
    /// Request body.
    #[builder(default, setter(strip_option, into))]
    pub body: Option<Bytes>,
}

/// Builds and signs S3 requests for one configuration and set of credentials.
#[derive(Debug)]
pub struct RequestSerializer {
    config: ClientConfig,
    credentials: Credentials,
    signer: Box<dyn RequestSigner>,
}

impl RequestSerializer {
    /// Create a serializer using the signer selected by `config`.
    #[must_use]
    pub fn new(config: ClientConfig, credentials: Credentials) -> Self {
        let signer = signer_for(&config);
        Self {
            config,
            credentials,
            signer,
        }
    }

    /// Replace the signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Box<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// The configuration requests are built from.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The base URL: `scheme://endpoint[/bucket]`.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let scheme = self.config.scheme();
        let endpoint = self.config.region.endpoint();
        match &self.config.bucket {
            Some(bucket) => format!("{scheme}://{endpoint}/{bucket}"),
            None => format!("{scheme}://{endpoint}"),
        }
    }

    /// The URL for `path`, without signing anything.
    ///
    /// The subresource comes first in the query. Custom parameters follow in
    /// key order; pairs with an empty key or value are skipped and values are
    /// escaped except for ASCII alphanumerics.
    #[must_use]
    pub fn url_for_path(
        &self,
        path: Option<&str>,
        subresource: Option<&str>,
        custom_params: &BTreeMap<String, String>,
    ) -> String {
        let mut url = self.endpoint_url();
        if let Some(path) = path {
            url.push('/');
            url.extend(utf8_percent_encode(path.trim_start_matches('/'), PATH_ENCODE_SET));
        }

        let mut query: Vec<String> = Vec::new();
        if let Some(subresource) = subresource.filter(|s| !s.is_empty()) {
            query.push(subresource.to_owned());
        }
        query.extend(
            custom_params
                .iter()
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, NON_ALPHANUMERIC))),
        );

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// Build and sign a request.
    ///
    /// `timestamp` is used for both the date header and the signature.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when credentials are incomplete,
    /// before any signing is attempted, and [`ClientError::InvalidUrl`] or
    /// [`ClientError::InvalidHeader`] when a parameter cannot be expressed
    /// in HTTP.
    pub fn serialize(
        &self,
        method: Method,
        params: RequestParams,
        timestamp: DateTime<Utc>,
    ) -> ClientResult<http::Request<Bytes>> {
        self.credentials.validate()?;

        let url = self.url_for_path(
            params.path.as_deref(),
            params.subresource.as_deref(),
            &params.custom_params,
        );
        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| ClientError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = self.build_headers(&uri, &params)?;
        let body = params.body.unwrap_or_default();

        if self.signer.version() == SignatureVersion::V4 && !headers.contains_key(CONTENT_SHA256_HEADER)
        {
            insert_header(&mut headers, CONTENT_SHA256_HEADER, &hash_payload(&body))?;
        }

        let input = CanonicalRequestInput::new(method.clone(), uri.clone())
            .with_headers(headers.clone())
            .with_body(body.clone());
        let signed = self.signer.sign(&input, &self.credentials, timestamp)?;
        for (name, value) in signed.headers() {
            insert_header(&mut headers, name, &value)?;
        }

        debug!(%method, %uri, version = %self.signer.version(), "serialized S3 request");

        let mut request = http::Request::new(body);
        *request.method_mut() = method;
        *request.uri_mut() = uri;
        *request.headers_mut() = headers;
        Ok(request)
    }

    /// Every header except the signing headers, in the order they layer:
    /// host and content type, ACL, storage class, metadata, custom headers,
    /// session token.
    fn build_headers(&self, uri: &Uri, params: &RequestParams) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(authority) = uri.authority() {
            insert_header(&mut headers, HOST.as_str(), authority.as_str())?;
        }
        let content_type = content_type_for(params.path.as_deref().unwrap_or(""));
        insert_header(&mut headers, CONTENT_TYPE.as_str(), content_type.as_ref())?;

        if let Some(acl) = &params.acl {
            for (name, value) in acl.headers() {
                insert_header(&mut headers, name, &value)?;
            }
        }
        if let Some(storage_class) = params.storage_class {
            insert_header(
                &mut headers,
                s3sign_model::types::STORAGE_CLASS_HEADER,
                storage_class.as_str(),
            )?;
        }
        for (key, value) in &params.metadata {
            insert_header(&mut headers, &format!("{META_HEADER_PREFIX}{key}"), value)?;
        }
        for (name, value) in &params.custom_headers {
            insert_header(&mut headers, name, value)?;
        }
        if let Some(token) = &self.credentials.session_token {
            insert_header(&mut headers, SECURITY_TOKEN_HEADER, token)?;
        }

        Ok(headers)
    }
}

/// Insert a header, replacing any existing value.
fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> ClientResult<()> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::InvalidHeader(format!("name {name:?}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidHeader(format!("value for {name}")))?;
    headers.insert(header_name, header_value);
    Ok(())
}

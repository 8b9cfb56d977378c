//! The per-operation S3 client.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::Utc;
use http::{HeaderMap, StatusCode};
use s3sign_auth::Credentials;
use s3sign_core::ClientConfig;
use s3sign_model::{Acl, S3Error, S3Operation, StorageClass};
use s3sign_xml::XmlError;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::error::{ClientError, ClientResult};
use crate::serializer::{META_HEADER_PREFIX, RequestParams, RequestSerializer};
use crate::transport::Transport;

/// Header naming the source of a copy.
pub const COPY_SOURCE_HEADER: &str = "x-amz-copy-source";

/// A raw S3 response. Success bodies are not parsed.
pub type S3Response = http::Response<Bytes>;

/// Options for [`S3Client::put_object`].
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct PutObjectOptions {
    /// ACL to apply to the new object.
    #[builder(default, setter(strip_option, into))]
    pub acl: Option<Acl>,
    /// User metadata.
    #[builder(default)]
    pub metadata: BTreeMap<String, String>,
    /// Storage class. Always sent; defaults to `STANDARD`.
    #[builder(default)]
    pub storage_class: StorageClass,
}

/// Options for [`S3Client::list_objects`] (ListObjectsV2).
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ListObjectsOptions {
    /// Character used to group keys.
    #[builder(default, setter(strip_option, into))]
    pub delimiter: Option<String>,
    /// Ask S3 to URL-encode keys in the response.
    #[builder(default, setter(strip_option))]
    pub url_encode_keys: Option<bool>,
    /// Maximum number of keys returned.
    #[builder(default, setter(strip_option))]
    pub max_keys: Option<u32>,
    /// Only list keys starting with this prefix.
    #[builder(default, setter(strip_option, into))]
    pub prefix: Option<String>,
    /// Token from a previous truncated listing.
    #[builder(default, setter(strip_option, into))]
    pub continuation_token: Option<String>,
    /// Include the owner of each key.
    #[builder(default, setter(strip_option))]
    pub fetch_owner: Option<bool>,
    /// Start listing after this key.
    #[builder(default, setter(strip_option, into))]
    pub start_after: Option<String>,
}

impl ListObjectsOptions {
    /// The query parameters for this listing.
    ///
    /// `list-type=2` is always present. Empty values are dropped later by the
    /// serializer, so `url_encode_keys = false` sends nothing.
    #[must_use]
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::from([("list-type".to_owned(), "2".to_owned())]);
        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                params.insert(key.to_owned(), value);
            }
        };
        set("delimiter", self.delimiter.clone());
        set(
            "encoding-type",
            self.url_encode_keys
                .map(|encode| String::from(if encode { "url" } else { "" })),
        );
        set("max-keys", self.max_keys.map(|n| n.to_string()));
        set("prefix", self.prefix.clone());
        set("continuation-token", self.continuation_token.clone());
        set("fetch-owner", self.fetch_owner.map(|f| f.to_string()));
        set("start-after", self.start_after.clone());
        params
    }
}

/// Object metadata read from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// `Content-Type`.
    pub content_type: Option<String>,
    /// `Content-Length`.
    pub content_length: Option<u64>,
    /// `ETag`, quotes included.
    pub etag: Option<String>,
    /// `Last-Modified`, as sent.
    pub last_modified: Option<String>,
    /// `x-amz-meta-*` headers with the prefix stripped.
    pub metadata: BTreeMap<String, String>,
}

impl ObjectMetadata {
    /// Collect metadata from response headers.
    ///
    /// ```
    /// use http::{HeaderMap, HeaderValue};
    /// use s3sign_client::ObjectMetadata;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("x-amz-meta-owner", HeaderValue::from_static("alice"));
    /// headers.insert("content-length", HeaderValue::from_static("42"));
    ///
    /// let meta = ObjectMetadata::from_headers(&headers);
    /// assert_eq!(meta.metadata["owner"], "alice");
    /// assert_eq!(meta.content_length, Some(42));
    /// ```
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: http::header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
        };

        let metadata = headers
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix(META_HEADER_PREFIX)?;
                Some((key.to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();

        Self {
            content_type: text(http::header::CONTENT_TYPE),
            content_length: text(http::header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            etag: text(http::header::ETAG),
            last_modified: text(http::header::LAST_MODIFIED),
            metadata,
        }
    }
}

/// An S3 client that signs every request and sends it through `T`.
///
/// Each operation captures the current time once and uses it for both the
/// date header and the signature.
#[derive(Debug)]
pub struct S3Client<T> {
    serializer: RequestSerializer,
    transport: T,
}

impl<T: Transport> S3Client<T> {
    /// Create a client.
    #[must_use]
    pub fn new(config: ClientConfig, credentials: Credentials, transport: T) -> Self {
        Self::with_serializer(RequestSerializer::new(config, credentials), transport)
    }

    /// Create a client around an existing serializer.
    #[must_use]
    pub fn with_serializer(serializer: RequestSerializer, transport: T) -> Self {
        Self {
            serializer,
            transport,
        }
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the credentials are missing.
    pub fn from_env(transport: T) -> ClientResult<Self> {
        let credentials = Credentials::from_env()?;
        Ok(Self::new(ClientConfig::from_env(), credentials, transport))
    }

    /// The serializer, for building requests without sending them.
    #[must_use]
    pub fn serializer(&self) -> &RequestSerializer {
        &self.serializer
    }

    /// The transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Download an object.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn get_object(&self, path: &str) -> ClientResult<Bytes> {
        let params = RequestParams::builder().path(path).build();
        let response = self.execute(S3Operation::GetObject, params)?;
        Ok(response.into_body())
    }

    /// Upload an object.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn put_object(
        &self,
        path: &str,
        body: impl Into<Bytes>,
        options: PutObjectOptions,
    ) -> ClientResult<S3Response> {
        let params = RequestParams {
            path: Some(path.to_owned()),
            acl: options.acl,
            metadata: options.metadata,
            storage_class: Some(options.storage_class),
            body: Some(body.into()),
            ..RequestParams::default()
        };
        self.execute(S3Operation::PutObject, params)
    }

    /// Fetch an object's metadata without its body.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn head_object(&self, path: &str) -> ClientResult<ObjectMetadata> {
        let params = RequestParams::builder().path(path).build();
        let response = self.execute(S3Operation::HeadObject, params)?;
        Ok(ObjectMetadata::from_headers(response.headers()))
    }

    /// Copy `source` to `destination` inside the configured bucket.
    ///
    /// Without a configured bucket, `source` must start with the bucket name.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn copy_object(&self, source: &str, destination: &str) -> ClientResult<S3Response> {
        let params = RequestParams::builder()
            .path(destination)
            .custom_headers(BTreeMap::from([(
                COPY_SOURCE_HEADER.to_owned(),
                self.copy_source(source),
            )]))
            .build();
        self.execute(S3Operation::CopyObject, params)
    }

    /// Delete an object.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn delete_object(&self, path: &str) -> ClientResult<()> {
        let params = RequestParams::builder().path(path).build();
        self.execute(S3Operation::DeleteObject, params)?;
        Ok(())
    }

    /// List the bucket's objects (ListObjectsV2). The XML body is returned as is.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn list_objects(&self, options: &ListObjectsOptions) -> ClientResult<S3Response> {
        let params = RequestParams::builder()
            .custom_params(options.to_params())
            .build();
        self.execute(S3Operation::ListObjectsV2, params)
    }

    /// Fetch the bucket ACL document.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn get_bucket_acl(&self) -> ClientResult<S3Response> {
        self.execute(S3Operation::GetBucketAcl, RequestParams::default())
    }

    /// Replace the bucket ACL.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn put_bucket_acl(&self, acl: impl Into<Acl>) -> ClientResult<()> {
        let params = RequestParams::builder().acl(acl).build();
        self.execute(S3Operation::PutBucketAcl, params)?;
        Ok(())
    }

    /// Fetch an object's ACL document.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn get_object_acl(&self, path: &str) -> ClientResult<S3Response> {
        let params = RequestParams::builder().path(path).build();
        self.execute(S3Operation::GetObjectAcl, params)
    }

    /// Replace an object's ACL.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if signing, delivery or the service fails.
    pub fn put_object_acl(&self, path: &str, acl: impl Into<Acl>) -> ClientResult<()> {
        let params = RequestParams::builder().path(path).acl(acl).build();
        self.execute(S3Operation::PutObjectAcl, params)?;
        Ok(())
    }

    fn copy_source(&self, source: &str) -> String {
        match &self.serializer.config().bucket {
            Some(bucket) if source.starts_with('/') => format!("/{bucket}{source}"),
            Some(bucket) => format!("/{bucket}/{source}"),
            None => format!("/{}", source.trim_start_matches('/')),
        }
    }

    fn execute(
        &self,
        operation: S3Operation,
        mut params: RequestParams,
    ) -> ClientResult<S3Response> {
        if let Some(subresource) = operation.subresource() {
            params.subresource = Some(subresource.to_owned());
        }
        let request = self
            .serializer
            .serialize(operation.method(), params, Utc::now())?;

        debug!(%operation, method = %request.method(), uri = %request.uri(), "sending S3 request");
        let response = self
            .transport
            .send(request)
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if status.is_success() {
            debug!(%operation, %status, "S3 request succeeded");
            return Ok(response);
        }
        Err(service_error(&response))
    }
}

/// Map a failed response to a client error.
///
/// An empty body (HEAD responses never have one) becomes a generic service
/// error carrying the status. A body that is present but is not an S3 error
/// document is a [`ClientError::Serialization`].
fn service_error(response: &S3Response) -> ClientError {
    let status: StatusCode = response.status();
    let request_id = response
        .headers()
        .get("x-amz-request-id")
        .and_then(|v| v.to_str().ok());

    let mut error = match s3sign_xml::parse_error_response(response.body()) {
        Ok(error) => error.with_status(status),
        Err(XmlError::EmptyBody) => {
            warn!(%status, "S3 error response without a body");
            S3Error::from_status(status)
        }
        Err(err) => {
            warn!(%status, error = %err, "unreadable S3 error body");
            return ClientError::Serialization(err);
        }
    };
    if error.request_id.is_none() {
        error.request_id = request_id.map(ToOwned::to_owned);
    }
    ClientError::Service(error)
}

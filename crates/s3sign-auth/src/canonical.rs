//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every request header takes part in the signature, plus a `host` entry
//! taken from the URL when the headers do not carry one.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::crypto::{hash_payload, hex_encode, sha256};

/// Characters percent-encoded in URI path segments and query components.
///
/// Everything except the RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`).
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Header carrying the payload hash.
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";

/// The parts of an HTTP request that are signed.
#[derive(Debug, Clone)]
pub struct CanonicalRequestInput {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl CanonicalRequestInput {
    /// Describe a request with no headers and no body.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Replace the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attach a body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URL.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The `host[:port]` the request is addressed to.
    ///
    /// # Panics
    ///
    /// Panics if the URL has no host. Signing a relative URL is a caller bug.
    #[must_use]
    pub fn host(&self) -> String {
        let host = self
            .uri
            .host()
            .unwrap_or_else(|| panic!("cannot sign a request without a host: {}", self.uri));
        match self.uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        }
    }

    /// The payload hash to sign with.
    ///
    /// An explicit `x-amz-content-sha256` header wins; otherwise the body is
    /// hashed, with an absent body hashed as empty.
    #[must_use]
    pub fn payload_hash(&self) -> String {
        if let Some(value) = self.headers.get(CONTENT_SHA256_HEADER) {
            return header_value_string(value);
        }
        hash_payload(self.body.as_deref().unwrap_or_default())
    }

    /// Canonical headers of this request, including the synthetic `host`.
    #[must_use]
    pub fn canonical_headers(&self) -> BTreeMap<String, String> {
        let mut headers = canonical_header_map(&self.headers);
        headers
            .entry("host".to_owned())
            .or_insert_with(|| self.host());
        headers
    }
}

/// A built canonical request and the values derived alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// The canonical request text.
    pub text: String,
    /// The `SignedHeaders` value.
    pub signed_headers: String,
    /// The `HashedPayload` line.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Hex SHA-256 of the canonical request, as used in the string to sign.
    #[must_use]
    pub fn hash(&self) -> String {
        hex_encode(sha256(self.text.as_bytes()))
    }
}

/// Build the full canonical request.
///
/// `headers` must already be canonical (see [`canonical_header_map`]); every
/// entry is signed.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use s3sign_auth::canonical::build_canonical_request;
///
/// let headers = BTreeMap::from([("host".to_owned(), "examplebucket.s3.amazonaws.com".to_owned())]);
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     "",
///     &headers,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.text.starts_with("GET\n/test.txt\n\nhost:"));
/// assert_eq!(canonical.signed_headers, "host");
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> CanonicalRequest {
    let canonical_uri = build_canonical_uri(path);
    let canonical_query = build_canonical_query_string(query);
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = build_signed_headers_string(headers);

    CanonicalRequest {
        text: format!(
            "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
        ),
        signed_headers,
        payload_hash: payload_hash.to_owned(),
    }
}

/// Build the canonical request for `input`, signing all of its headers.
///
/// `extra` headers (already lowercase) are added or replace existing ones;
/// the signer uses this for `x-amz-date`.
#[must_use]
pub fn canonical_request_for(
    input: &CanonicalRequestInput,
    extra: &[(&str, &str)],
) -> CanonicalRequest {
    let mut headers = input.canonical_headers();
    for (name, value) in extra {
        headers.insert((*name).to_owned(), collapse_whitespace(value.trim()));
    }
    build_canonical_request(
        input.method().as_str(),
        input.uri().path(),
        input.uri().query().unwrap_or(""),
        &headers,
        &input.payload_hash(),
    )
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes (`/`) are preserved. Empty paths are normalized to `/`.
/// Segments are decoded first so an already-encoded path is not encoded twice.
///
/// # Examples
///
/// ```
/// use s3sign_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/test.txt"), "/test.txt");
/// assert_eq!(build_canonical_uri("/my%20photo.jpg"), "/my%20photo.jpg");
/// assert_eq!(build_canonical_uri(""), "/");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| uri_encode(&percent_decode_str(segment).decode_utf8_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string.
///
/// Keys and values are decoded, re-encoded independently with the unreserved
/// set, then sorted by key and then by value. A parameter without `=` gets an
/// empty value.
///
/// # Examples
///
/// ```
/// use s3sign_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(""), "");
/// assert_eq!(build_canonical_query_string("b=2&a=1&acl"), "a=1&acl=&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            (reencode(key), reencode(value))
        })
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Canonicalize request headers.
///
/// Names are lowercase (as `http` stores them), values are trimmed with inner
/// whitespace runs collapsed, and repeated headers are joined with `,` in
/// the order they were added.
#[must_use]
pub fn canonical_header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = collapse_whitespace(header_value_string(value).trim());
        map.entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}

/// Build the `SignedHeaders` value: the sorted names joined with `;`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use s3sign_auth::canonical::build_signed_headers_string;
///
/// let headers = BTreeMap::from([
///     ("x-amz-date".to_owned(), String::new()),
///     ("host".to_owned(), String::new()),
/// ]);
/// assert_eq!(build_signed_headers_string(&headers), "host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// URI-encode a single component using the SigV4 rules.
fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

fn reencode(component: &str) -> String {
    uri_encode(&percent_decode_str(component).decode_utf8_lossy())
}

/// Read a header value as text, replacing invalid UTF-8.
pub(crate) fn header_value_string(value: &http::HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// Collapse consecutive whitespace characters in a string to a single space.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use http::{HeaderName, HeaderValue};

    use super::*;
    use crate::crypto::EMPTY_PAYLOAD_SHA256;

    fn input(method: Method, uri: &str) -> CanonicalRequestInput {
        CanonicalRequestInput::new(method, uri.parse().unwrap())
    }

    #[test]
    fn test_should_encode_special_characters_in_path() {
        assert_eq!(build_canonical_uri("/hello world"), "/hello%20world");
        assert_eq!(build_canonical_uri("/a+b/c~d"), "/a%2Bb/c~d");
        assert_eq!(build_canonical_uri("/caf%C3%A9"), "/caf%C3%A9");
    }

    #[test]
    fn test_should_sort_query_by_key_then_value() {
        assert_eq!(
            build_canonical_query_string("Param2=value2&Param1=value1"),
            "Param1=value1&Param2=value2"
        );
        assert_eq!(build_canonical_query_string("k=b&k=a"), "k=a&k=b");
    }

    #[test]
    fn test_should_encode_query_components_independently() {
        assert_eq!(
            build_canonical_query_string("prefix=a b&token=1/x+y"),
            "prefix=a%20b&token=1%2Fx%2By"
        );
        assert_eq!(
            build_canonical_query_string("v=custom%20value%21%2F"),
            "v=custom%20value%21%2F"
        );
    }

    #[test]
    fn test_should_give_bare_query_key_an_empty_value() {
        assert_eq!(build_canonical_query_string("acl"), "acl=");
        assert_eq!(build_canonical_query_string("list-type=2&acl"), "acl=&list-type=2");
    }

    #[test]
    fn test_should_merge_duplicate_headers_and_collapse_whitespace() {
        let mut headers = HeaderMap::new();
        headers.append(
            HeaderName::from_bytes(b"X-Amz-Meta-Tag").unwrap(),
            HeaderValue::from_static("  one   two "),
        );
        headers.append("x-amz-meta-tag", HeaderValue::from_static("three"));
        headers.insert("x-blank", HeaderValue::from_static("   "));

        let map = canonical_header_map(&headers);
        assert_eq!(map["x-amz-meta-tag"], "one two,three");
        assert_eq!(map["x-blank"], "");
    }

    #[test]
    fn test_should_add_host_from_url_with_port() {
        let req = input(Method::GET, "http://localhost:9000/bucket/key");
        assert_eq!(req.canonical_headers()["host"], "localhost:9000");
    }

    #[test]
    fn test_should_prefer_explicit_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("cdn.example.com"));
        let req = input(Method::GET, "http://origin.example.com/").with_headers(headers);
        assert_eq!(req.canonical_headers()["host"], "cdn.example.com");
    }

    #[test]
    #[should_panic(expected = "without a host")]
    fn test_should_panic_without_host() {
        let _ = input(Method::GET, "/relative/path").host();
    }

    #[test]
    fn test_should_hash_absent_body_as_empty() {
        let without = input(Method::PUT, "http://example.com/k");
        let with_empty = input(Method::PUT, "http://example.com/k").with_body(Bytes::new());
        assert_eq!(without.payload_hash(), EMPTY_PAYLOAD_SHA256);
        assert_eq!(without.payload_hash(), with_empty.payload_hash());
    }

    #[test]
    fn test_should_prefer_existing_content_hash_header() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_SHA256_HEADER, HeaderValue::from_static("UNSIGNED-PAYLOAD"));
        let req = input(Method::PUT, "http://example.com/k")
            .with_headers(headers)
            .with_body("data");
        assert_eq!(req.payload_hash(), "UNSIGNED-PAYLOAD");
    }

    #[test]
    fn test_should_build_canonical_request_matching_aws_example() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("examplebucket.s3.amazonaws.com"));
        headers.insert("range", HeaderValue::from_static("bytes=0-9"));
        headers.insert(CONTENT_SHA256_HEADER, HeaderValue::from_static(EMPTY_PAYLOAD_SHA256));
        headers.insert("x-amz-date", HeaderValue::from_static("20130524T000000Z"));
        let req = input(Method::GET, "http://examplebucket.s3.amazonaws.com/test.txt")
            .with_headers(headers);

        let canonical = canonical_request_for(&req, &[]);

        let expected = "GET\n\
                        /test.txt\n\
                        \n\
                        host:examplebucket.s3.amazonaws.com\n\
                        range:bytes=0-9\n\
                        x-amz-content-sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\n\
                        x-amz-date:20130524T000000Z\n\
                        \n\
                        host;range;x-amz-content-sha256;x-amz-date\n\
                        e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(canonical.text, expected);
        assert_eq!(
            canonical.hash(),
            "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972"
        );
    }

    #[test]
    fn test_should_canonicalize_header_names_case_insensitively() {
        let mut upper = HeaderMap::new();
        upper.insert(
            HeaderName::from_bytes(b"X-Custom").unwrap(),
            HeaderValue::from_static("v"),
        );
        let mut lower = HeaderMap::new();
        lower.insert("x-custom", HeaderValue::from_static("v"));
        assert_eq!(canonical_header_map(&upper), canonical_header_map(&lower));
    }
}

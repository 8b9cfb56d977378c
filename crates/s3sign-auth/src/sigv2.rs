//! Legacy S3 signing (AWS Signature Version 2).
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! AWS <AWSAccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, StringToSign))` and:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                CanonicalizedAmzHeaders +
//!                CanonicalizedResource
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use http::{HeaderMap, Uri};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use s3sign_core::SignatureVersion;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{CanonicalRequestInput, collapse_whitespace, header_value_string};
use crate::credentials::{CredentialProvider, Credentials};
use crate::crypto::{base64_encode, hmac_sha1};
use crate::error::AuthError;
use crate::signer::SigningResult;
use crate::sigv4::{AMZ_DATE_HEADER, AuthResult};
use crate::time::rfc1123;

/// Characters escaped in the canonicalized resource path.
const RESOURCE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// S3 sub-resources that must be included in the canonical resource.
const SUB_RESOURCES: &[&str] = &[
    "acl",
    "cors",
    "delete",
    "lifecycle",
    "location",
    "logging",
    "notification",
    "partNumber",
    "policy",
    "requestPayment",
    "response-cache-control",
    "response-content-disposition",
    "response-content-encoding",
    "response-content-language",
    "response-content-type",
    "response-expires",
    "restore",
    "tagging",
    "torrent",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
];

const AUTH_PREFIX: &str = "AWS ";

/// Check whether the `Authorization` header uses SigV2 format (`AWS AKID:sig`).
#[must_use]
pub fn is_sigv2(auth_header: &str) -> bool {
    auth_header.starts_with(AUTH_PREFIX) && !auth_header.starts_with("AWS4-")
}

/// Sign a request with the legacy scheme.
///
/// The `Date` line of the string to sign is the timestamp in RFC 1123 form;
/// the caller must send that same value as the `Date` header. When the input
/// already carries `x-amz-date`, the `Date` line is left empty and that
/// header is signed with the other amz headers.
///
/// # Errors
///
/// Returns a configuration error when either key is empty.
pub fn sign(
    input: &CanonicalRequestInput,
    credentials: &Credentials,
    timestamp: DateTime<Utc>,
) -> Result<SigningResult, AuthError> {
    credentials.validate()?;

    let date = rfc1123(&timestamp);
    let string_to_sign = build_string_to_sign(
        input.method().as_str(),
        input.headers(),
        input.uri(),
        date_line(input.headers(), &date),
    );
    debug!(string_to_sign, "Built SigV2 string to sign");

    let signature = compute_legacy_signature(&string_to_sign, &credentials.secret_access_key);

    Ok(SigningResult {
        version: SignatureVersion::V2,
        authorization: format!("{AUTH_PREFIX}{}:{signature}", credentials.access_key_id),
        date,
        content_hash: None,
    })
}

/// Compute the legacy signature: Base64(HMAC-SHA1(secret, string_to_sign)).
///
/// ```
/// use s3sign_auth::sigv2::compute_legacy_signature;
///
/// let sts = "GET\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n/johnsmith/photos/puppy.jpg";
/// assert_eq!(
///     compute_legacy_signature(sts, "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"),
///     "bWq2s1WEIj+Ydj0vQ697zp+IXMU="
/// );
/// ```
#[must_use]
pub fn compute_legacy_signature(string_to_sign: &str, secret_key: &str) -> String {
    base64_encode(hmac_sha1(secret_key.as_bytes(), string_to_sign.as_bytes()))
}

/// Build the legacy string to sign.
///
/// `date` is written verbatim on the `Date` line.
#[must_use]
pub fn build_string_to_sign(method: &str, headers: &HeaderMap, uri: &Uri, date: &str) -> String {
    let content_md5 = header_value(headers, "content-md5");
    let content_type = header_value(headers, "content-type");
    let amz_headers = build_canonicalized_amz_headers(headers);
    let resource = build_canonicalized_resource(uri);

    format!("{method}\n{content_md5}\n{content_type}\n{date}\n{amz_headers}{resource}")
}

/// Build the CanonicalizedAmzHeaders string.
///
/// All `x-amz*` headers are lowercased and sorted. Repeated headers are
/// merged with `,`. Each header is formatted as `name:value\n`.
#[must_use]
pub fn build_canonicalized_amz_headers(headers: &HeaderMap) -> String {
    let mut amz_headers: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let name_str = name.as_str();
        if name_str.starts_with("x-amz") {
            amz_headers
                .entry(name_str)
                .or_default()
                .push(collapse_whitespace(header_value_string(value).trim()));
        }
    }

    let mut result = String::new();
    for (name, values) in &amz_headers {
        result.push_str(name);
        result.push(':');
        result.push_str(&values.join(","));
        result.push('\n');
    }

    result
}

/// Build the CanonicalizedResource string.
///
/// This is the escaped URI path plus any sub-resource query parameters
/// (sorted). With path-style addressing the path already starts with the
/// bucket.
///
/// ```
/// use s3sign_auth::sigv2::build_canonicalized_resource;
///
/// let uri = "http://s3.amazonaws.com/testbucket/demo%20file.txt?acl&prefix=a"
///     .parse()
///     .unwrap();
/// assert_eq!(build_canonicalized_resource(&uri), "/testbucket/demo%20file.txt?acl");
/// ```
#[must_use]
pub fn build_canonicalized_resource(uri: &Uri) -> String {
    let decoded = percent_decode_str(uri.path()).decode_utf8_lossy();
    let path = utf8_percent_encode(&decoded, RESOURCE_ENCODE_SET).to_string();
    let query = uri.query().unwrap_or("");

    let mut sub_params: Vec<(&str, Option<String>)> = Vec::new();
    for param in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = param.split_once('=').map_or((param, None), |(k, v)| {
            let decoded = percent_decode_str(v).decode_utf8_lossy().into_owned();
            // Empty values are written like absent ones.
            (k, Some(decoded).filter(|v| !v.is_empty()))
        });
        if SUB_RESOURCES.contains(&key) {
            sub_params.push((key, value));
        }
    }

    if sub_params.is_empty() {
        return path;
    }

    sub_params.sort_by(|a, b| a.0.cmp(b.0));
    let params_str: Vec<String> = sub_params
        .iter()
        .map(|(k, v)| match v {
            Some(val) => format!("{k}={val}"),
            None => (*k).to_owned(),
        })
        .collect();
    format!("{path}?{}", params_str.join("&"))
}

/// Parse a SigV2 `Authorization` header: `AWS AKID:Signature`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the prefix, the separator,
/// the key or the signature is missing.
pub fn parse_sigv2_header(header: &str) -> Result<(String, String), AuthError> {
    let rest = header
        .strip_prefix(AUTH_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)?;

    let (access_key_id, signature) = rest.split_once(':').ok_or(AuthError::InvalidAuthHeader)?;

    if access_key_id.is_empty() || signature.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok((access_key_id.to_owned(), signature.to_owned()))
}

/// Verify a legacy-signed HTTP request.
///
/// When `x-amz-date` is present the `Date` line of the string to sign is
/// empty, otherwise it is the `Date` header.
///
/// # Errors
///
/// Returns an [`AuthError`] if the header is malformed, the access key is not
/// found, or the signature does not match.
pub fn verify_v2(
    parts: &http::request::Parts,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (access_key_id, provided_signature) = parse_sigv2_header(auth_header)?;

    debug!(access_key_id = %access_key_id, "Verifying SigV2 signature");

    let secret_key = credential_provider.get_secret_key(&access_key_id)?;

    let date = header_value(&parts.headers, "date");
    let string_to_sign = build_string_to_sign(
        parts.method.as_str(),
        &parts.headers,
        &parts.uri,
        date_line(&parts.headers, &date),
    );

    let expected_signature = compute_legacy_signature(&string_to_sign, &secret_key);

    if provided_signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        Ok(AuthResult {
            access_key_id,
            region: String::new(),
            service: "s3".to_owned(),
            signed_headers: Vec::new(),
        })
    } else {
        debug!(
            expected = %expected_signature,
            provided = %provided_signature,
            "SigV2 signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// The value of the `Date` line: empty when `x-amz-date` is present, since
/// that header is signed among the amz headers instead.
fn date_line<'a>(headers: &HeaderMap, date: &'a str) -> &'a str {
    if headers.contains_key(AMZ_DATE_HEADER) {
        ""
    } else {
        date
    }
}

/// Extract a header value as a string, returning empty string if missing.
fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers.get(name).map(header_value_string).unwrap_or_default()
}

//! AWS Signature Version 4.
//!
//! Signing takes a [`CanonicalRequestInput`], credentials, a region, a
//! service and one timestamp:
//!
//! 1. Build the canonical request over every header plus `x-amz-date`.
//! 2. Build the string to sign from the timestamp, credential scope and
//!    canonical request hash.
//! 3. Derive the signing key with the HMAC-SHA256 chain.
//! 4. Sign and assemble the `Authorization` header.
//!
//! [`verify_v4`] runs the same steps over a received request and compares
//! signatures in constant time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use s3sign_core::SignatureVersion;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{
    CanonicalRequestInput, build_canonical_request, canonical_request_for, header_value_string,
};
use crate::credentials::{CredentialProvider, Credentials};
use crate::crypto::{hex_encode, hmac_sha256, sha256};
use crate::error::AuthError;
use crate::signer::SigningResult;
use crate::time::{date_stamp, iso8601_basic};

/// The only algorithm supported by this implementation.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Header carrying the request timestamp.
pub const AMZ_DATE_HEADER: &str = "x-amz-date";

/// Terminator of every credential scope.
const SCOPE_TERMINATOR: &str = "aws4_request";

/// The result of a successful SigV4 verification.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// The access key ID that signed the request.
    pub access_key_id: String,
    /// The AWS region from the credential scope.
    pub region: String,
    /// The AWS service from the credential scope.
    pub service: String,
    /// The list of headers that were included in the signature.
    pub signed_headers: Vec<String>,
}

/// Parsed components of an AWS SigV4 `Authorization` header.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256 Credential=AKID/20130524/us-east-1/s3/aws4_request,
///   SignedHeaders=host;x-amz-content-sha256;x-amz-date,
///   Signature=<hex-signature>
/// ```
#[derive(Debug, Clone)]
pub struct ParsedAuth {
    /// The signing algorithm (must be `AWS4-HMAC-SHA256`).
    pub algorithm: String,
    /// The access key ID.
    pub access_key_id: String,
    /// The date component of the credential scope (YYYYMMDD).
    pub date: String,
    /// The AWS region from the credential scope.
    pub region: String,
    /// The AWS service from the credential scope.
    pub service: String,
    /// The list of signed header names (lowercase).
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

/// Sign a request.
///
/// The timestamp is used for both the `x-amz-date` value and the signature.
/// The returned [`SigningResult`] carries the headers to attach.
///
/// # Errors
///
/// Returns a configuration error when a key or the region is empty.
///
/// # Panics
///
/// Panics if the request URL has no host.
pub fn sign(
    input: &CanonicalRequestInput,
    credentials: &Credentials,
    region: &str,
    service: &str,
    timestamp: DateTime<Utc>,
) -> Result<SigningResult, AuthError> {
    credentials.validate()?;
    if region.is_empty() {
        return Err(AuthError::MissingRegion);
    }

    let amz_date = iso8601_basic(&timestamp);
    let canonical = canonical_request_for(input, &[(AMZ_DATE_HEADER, &amz_date)]);
    debug!(canonical_request = %canonical.text, "Built canonical request");

    let scope = credential_scope(&date_stamp(&timestamp), region, service);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical.hash());
    debug!(string_to_sign, "Built string to sign");

    let signing_key =
        derive_signing_key(&credentials.secret_access_key, &date_stamp(&timestamp), region, service);
    let signature = compute_signature(&signing_key, &string_to_sign);
    debug!(signature, signed_headers = %canonical.signed_headers, "Signed request");

    Ok(SigningResult {
        version: SignatureVersion::V4,
        authorization: build_authorization_header(
            &credentials.access_key_id,
            &scope,
            &canonical.signed_headers,
            &signature,
        ),
        date: amz_date,
        content_hash: Some(canonical.payload_hash),
    })
}

/// Sign an already-built canonical request.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use s3sign_auth::sigv4::compute_v4_signature;
///
/// let canonical = "GET\n/\n\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\n\
///                  host;x-amz-date\n\
///                  e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
/// let signature = compute_v4_signature(
///     canonical,
///     "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
///     &Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
///     "us-east-1",
///     "service",
/// );
/// assert_eq!(signature, "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31");
/// ```
#[must_use]
pub fn compute_v4_signature(
    canonical_request: &str,
    secret_key: &str,
    timestamp: &DateTime<Utc>,
    region: &str,
    service: &str,
) -> String {
    let date = date_stamp(timestamp);
    let scope = credential_scope(&date, region, service);
    let string_to_sign = build_string_to_sign(
        &iso8601_basic(timestamp),
        &scope,
        &hex_encode(sha256(canonical_request.as_bytes())),
    );
    let signing_key = derive_signing_key(secret_key, &date, region, service);
    compute_signature(&signing_key, &string_to_sign)
}

/// Build the credential scope `date/region/service/aws4_request`.
#[must_use]
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use s3sign_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, SCOPE_TERMINATOR.as_bytes())
}

/// Compute the hex HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex_encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Assemble the `Authorization` header value.
#[must_use]
pub fn build_authorization_header(
    access_key_id: &str,
    credential_scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{ALGORITHM} Credential={access_key_id}/{credential_scope}, \
         SignedHeaders={signed_headers}, Signature={signature}"
    )
}

/// Parse an AWS SigV4 `Authorization` header value into its components.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the header format is invalid,
/// or [`AuthError::UnsupportedAlgorithm`] if the algorithm is not `AWS4-HMAC-SHA256`.
pub fn parse_authorization_header(header: &str) -> Result<ParsedAuth, AuthError> {
    let (algorithm, rest) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;

    if algorithm != ALGORITHM {
        return Err(AuthError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    // Components are separated by ", " or ",".
    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(AuthError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(AuthError::InvalidAuthHeader)?;
    let signature = signature.ok_or(AuthError::InvalidAuthHeader)?;

    let cred_parts: Vec<&str> = credential.splitn(5, '/').collect();
    if cred_parts.len() != 5 || cred_parts[4] != SCOPE_TERMINATOR {
        return Err(AuthError::InvalidCredential);
    }

    Ok(ParsedAuth {
        algorithm: algorithm.to_owned(),
        access_key_id: cred_parts[0].to_owned(),
        date: cred_parts[1].to_owned(),
        region: cred_parts[2].to_owned(),
        service: cred_parts[3].to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}

/// Verify a SigV4-signed request.
///
/// `body_hash` is the payload hash the server computed or accepted, usually
/// the `x-amz-content-sha256` value.
///
/// # Errors
///
/// Returns an [`AuthError`] if the `Authorization` header is missing or
/// malformed, the access key is unknown, a signed header is missing, or the
/// signature does not match.
pub fn verify_v4(
    parts: &http::request::Parts,
    body_hash: &str,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let parsed = parse_authorization_header(auth_header)?;
    let secret_key = credential_provider.get_secret_key(&parsed.access_key_id)?;

    let timestamp = parts
        .headers
        .get(AMZ_DATE_HEADER)
        .map(header_value_string)
        .ok_or_else(|| AuthError::MissingHeader(AMZ_DATE_HEADER.to_owned()))?;

    debug!(
        access_key_id = %parsed.access_key_id,
        date = %parsed.date,
        region = %parsed.region,
        service = %parsed.service,
        "Verifying SigV4 signature"
    );

    let headers = collect_signed_headers(parts, &parsed.signed_headers)?;
    let canonical = build_canonical_request(
        parts.method.as_str(),
        parts.uri.path(),
        parts.uri.query().unwrap_or(""),
        &headers,
        body_hash,
    );

    let scope = credential_scope(&parsed.date, &parsed.region, &parsed.service);
    let string_to_sign = build_string_to_sign(&timestamp, &scope, &canonical.hash());
    let signing_key =
        derive_signing_key(&secret_key, &parsed.date, &parsed.region, &parsed.service);
    let expected_signature = compute_signature(&signing_key, &string_to_sign);

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        Ok(AuthResult {
            access_key_id: parsed.access_key_id,
            region: parsed.region,
            service: parsed.service,
            signed_headers: parsed.signed_headers,
        })
    } else {
        debug!(
            expected = %expected_signature,
            provided = %parsed.signature,
            "Signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Collect the canonical values of the signed headers.
fn collect_signed_headers(
    parts: &http::request::Parts,
    signed_headers: &[String],
) -> Result<BTreeMap<String, String>, AuthError> {
    let mut result = BTreeMap::new();
    for name in signed_headers {
        let values: Vec<String> = parts
            .headers
            .get_all(name.as_str())
            .iter()
            .map(|v| crate::canonical::collapse_whitespace(header_value_string(v).trim()))
            .collect();
        if values.is_empty() {
            // Clients sign the host even when the transport adds it later.
            if name == "host" {
                if let Some(authority) = parts.uri.authority() {
                    result.insert(name.clone(), authority.as_str().to_owned());
                    continue;
                }
            }
            return Err(AuthError::MissingHeader(name.clone()));
        }
        result.insert(name.clone(), values.join(","));
    }
    Ok(result)
}

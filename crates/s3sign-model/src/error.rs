//! Service errors returned by S3 in `<Error>` response bodies.

use std::fmt;

macro_rules! error_codes {
    ($($variant:ident => $code:literal, $status:ident, $message:literal;)*) => {
        /// Error codes the S3 service is known to return.
        ///
        /// Codes outside the known set are preserved verbatim in
        /// [`S3ErrorCode::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum S3ErrorCode {
            $(
                #[doc = $message]
                $variant,
            )*
            /// A code not in the known set.
            Other(String),
        }

        #[allow(clippy::match_same_arms, clippy::too_many_lines)]
        impl S3ErrorCode {
            /// Returns the error code as it appears on the wire.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $code,)*
                    Self::Other(code) => code,
                }
            }

            /// Returns the HTTP status S3 documents for this error.
            #[must_use]
            pub fn default_status_code(&self) -> http::StatusCode {
                match self {
                    $(Self::$variant => http::StatusCode::$status,)*
                    Self::Other(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
                }
            }

            /// Returns the message S3 documents for this error.
            #[must_use]
            pub fn default_message(&self) -> &'static str {
                match self {
                    $(Self::$variant => $message,)*
                    Self::Other(_) => "Unrecognized service error",
                }
            }

            /// Map a wire code onto the known set.
            #[must_use]
            pub fn from_code(code: &str) -> Self {
                match code {
                    $($code => Self::$variant,)*
                    other => Self::from_alias(other),
                }
            }
        }
    };
}

error_codes! {
    AccessDenied => "AccessDenied", FORBIDDEN, "Access Denied";
    AccountProblem => "AccountProblem", FORBIDDEN, "There is a problem with your account that prevents the operation from completing";
    AmbiguousGrantByEmailAddress => "AmbiguousGrantByEmailAddress", BAD_REQUEST, "The email address you provided is associated with more than one account";
    BadDigest => "BadDigest", BAD_REQUEST, "The Content-MD5 you specified did not match what we received";
    BucketAlreadyExists => "BucketAlreadyExists", CONFLICT, "The requested bucket name is not available";
    BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou", CONFLICT, "The bucket you tried to create already exists, and you own it";
    BucketNotEmpty => "BucketNotEmpty", CONFLICT, "The bucket you tried to delete is not empty";
    CredentialsNotSupported => "CredentialsNotSupported", BAD_REQUEST, "This request does not support credentials";
    CrossLocationLoggingProhibited => "CrossLocationLoggingProhibited", FORBIDDEN, "Cross-location logging not allowed";
    EntityTooSmall => "EntityTooSmall", BAD_REQUEST, "Your proposed upload is smaller than the minimum allowed object size";
    EntityTooLarge => "EntityTooLarge", BAD_REQUEST, "Your proposed upload exceeds the maximum allowed object size";
    ExpiredToken => "ExpiredToken", BAD_REQUEST, "The provided token has expired";
    IllegalVersioningConfigurationException => "IllegalVersioningConfigurationException", BAD_REQUEST, "The versioning configuration specified in the request is invalid";
    IncompleteBody => "IncompleteBody", BAD_REQUEST, "You did not provide the number of bytes specified by the Content-Length HTTP header";
    IncorrectNumberOfFilesInPostRequest => "IncorrectNumberOfFilesInPostRequest", BAD_REQUEST, "POST requires exactly one file upload per request";
    InlineDataTooLarge => "InlineDataTooLarge", BAD_REQUEST, "Inline data exceeds the maximum allowed size";
    InternalError => "InternalError", INTERNAL_SERVER_ERROR, "We encountered an internal error. Please try again.";
    InvalidAccessKeyId => "InvalidAccessKeyId", FORBIDDEN, "The AWS access key ID you provided does not exist in our records";
    InvalidAddressingHeader => "InvalidAddressingHeader", BAD_REQUEST, "You must specify the Anonymous role";
    InvalidArgument => "InvalidArgument", BAD_REQUEST, "Invalid Argument";
    InvalidBucketName => "InvalidBucketName", BAD_REQUEST, "The specified bucket is not valid";
    InvalidBucketState => "InvalidBucketState", CONFLICT, "The request is not valid with the current state of the bucket";
    InvalidDigest => "InvalidDigest", BAD_REQUEST, "The Content-MD5 you specified is not valid";
    InvalidEncryptionAlgorithmError => "InvalidEncryptionAlgorithmError", BAD_REQUEST, "The encryption request you specified is not valid";
    InvalidLocationConstraint => "InvalidLocationConstraint", BAD_REQUEST, "The specified location constraint is not valid";
    InvalidObjectState => "InvalidObjectState", FORBIDDEN, "The operation is not valid for the current state of the object";
    InvalidPart => "InvalidPart", BAD_REQUEST, "One or more of the specified parts could not be found";
    InvalidPartOrder => "InvalidPartOrder", BAD_REQUEST, "The list of parts was not in ascending order";
    InvalidPayer => "InvalidPayer", FORBIDDEN, "All access to this object has been disabled";
    InvalidPolicyDocument => "InvalidPolicyDocument", BAD_REQUEST, "The content of the form does not meet the conditions specified in the policy document";
    InvalidRange => "InvalidRange", RANGE_NOT_SATISFIABLE, "The requested range cannot be satisfied";
    InvalidRequest => "InvalidRequest", BAD_REQUEST, "Invalid Request";
    InvalidSecurity => "InvalidSecurity", FORBIDDEN, "The provided security credentials are not valid";
    InvalidSOAPRequest => "InvalidSOAPRequest", BAD_REQUEST, "The SOAP request body is invalid";
    InvalidStorageClass => "InvalidStorageClass", BAD_REQUEST, "The storage class you specified is not valid";
    InvalidTargetBucketForLogging => "InvalidTargetBucketForLogging", BAD_REQUEST, "The target bucket for logging is not valid for log delivery";
    InvalidToken => "InvalidToken", BAD_REQUEST, "The provided token is malformed or otherwise invalid";
    InvalidURI => "InvalidURI", BAD_REQUEST, "Couldn't parse the specified URI";
    KeyTooLong => "KeyTooLongError", BAD_REQUEST, "Your key is too long";
    MalformedACLError => "MalformedACLError", BAD_REQUEST, "The XML you provided was not well-formed or did not validate against our published schema";
    MalformedPOSTRequest => "MalformedPOSTRequest", BAD_REQUEST, "The body of your POST request is not well-formed multipart/form-data";
    MalformedXML => "MalformedXML", BAD_REQUEST, "The XML you provided was not well-formed";
    MaxMessageLengthExceeded => "MaxMessageLengthExceeded", BAD_REQUEST, "Your request was too big";
    MaxPostPreDataLengthExceededError => "MaxPostPreDataLengthExceededError", BAD_REQUEST, "Your POST request fields preceding the upload file were too large";
    MetadataTooLarge => "MetadataTooLarge", BAD_REQUEST, "Your metadata headers exceed the maximum allowed metadata size";
    MethodNotAllowed => "MethodNotAllowed", METHOD_NOT_ALLOWED, "The specified method is not allowed against this resource";
    MissingAttachment => "MissingAttachment", BAD_REQUEST, "A SOAP attachment was expected, but none were found";
    MissingContentLength => "MissingContentLength", LENGTH_REQUIRED, "You must provide the Content-Length HTTP header";
    MissingRequestBodyError => "MissingRequestBodyError", BAD_REQUEST, "Request body is empty";
    MissingSecurityElement => "MissingSecurityElement", BAD_REQUEST, "The SOAP 1.1 request is missing a security element";
    MissingSecurityHeader => "MissingSecurityHeader", BAD_REQUEST, "Your request is missing a required header";
    NoLoggingStatusForKey => "NoLoggingStatusForKey", BAD_REQUEST, "There is no such thing as a logging status subresource for a key";
    NoSuchBucket => "NoSuchBucket", NOT_FOUND, "The specified bucket does not exist";
    NoSuchBucketPolicy => "NoSuchBucketPolicy", NOT_FOUND, "The specified bucket does not have a bucket policy";
    NoSuchKey => "NoSuchKey", NOT_FOUND, "The specified key does not exist";
    NoSuchLifecycleConfiguration => "NoSuchLifecycleConfiguration", NOT_FOUND, "The lifecycle configuration does not exist";
    NoSuchTagSet => "NoSuchTagSet", NOT_FOUND, "The TagSet does not exist";
    NoSuchUpload => "NoSuchUpload", NOT_FOUND, "The specified multipart upload does not exist";
    NoSuchVersion => "NoSuchVersion", NOT_FOUND, "The version ID specified in the request does not match an existing version";
    NotImplemented => "NotImplemented", NOT_IMPLEMENTED, "A header you provided implies functionality that is not implemented";
    NotSignedUp => "NotSignedUp", FORBIDDEN, "Your account is not signed up for the Amazon S3 service";
    OperationAborted => "OperationAborted", CONFLICT, "A conflicting conditional operation is currently in progress against this resource";
    PermanentRedirect => "PermanentRedirect", MOVED_PERMANENTLY, "The bucket you are attempting to access must be addressed using the specified endpoint";
    PreconditionFailed => "PreconditionFailed", PRECONDITION_FAILED, "At least one of the preconditions you specified did not hold";
    Redirect => "Redirect", TEMPORARY_REDIRECT, "Temporary redirect";
    RequestIsNotMultiPartContent => "RequestIsNotMultiPartContent", BAD_REQUEST, "Bucket POST must be of the enclosure-type multipart/form-data";
    RequestTimeout => "RequestTimeout", BAD_REQUEST, "Your socket connection to the server was not read from or written to within the timeout period";
    RequestTimeTooSkewed => "RequestTimeTooSkewed", FORBIDDEN, "The difference between the request time and the server's time is too large";
    RequestTorrentOfBucket => "RequestTorrentOfBucket", BAD_REQUEST, "Requesting the torrent file of a bucket is not permitted";
    RestoreAlreadyInProgress => "RestoreAlreadyInProgress", CONFLICT, "Object restore is already in progress";
    ServiceUnavailable => "ServiceUnavailable", SERVICE_UNAVAILABLE, "Service is unable to handle request";
    SignatureDoesNotMatch => "SignatureDoesNotMatch", FORBIDDEN, "The request signature we calculated does not match the signature you provided";
    SlowDown => "SlowDown", SERVICE_UNAVAILABLE, "Please reduce your request rate";
    TemporaryRedirect => "TemporaryRedirect", TEMPORARY_REDIRECT, "You are being redirected to the bucket while DNS updates";
    TokenRefreshRequired => "TokenRefreshRequired", BAD_REQUEST, "The provided token must be refreshed";
    TooManyBuckets => "TooManyBuckets", BAD_REQUEST, "You have attempted to create more buckets than allowed";
    UnexpectedContent => "UnexpectedContent", BAD_REQUEST, "This request does not support content";
    UnresolvableGrantByEmailAddress => "UnresolvableGrantByEmailAddress", BAD_REQUEST, "The email address you provided does not match any account on record";
    UserKeyMustBeSpecified => "UserKeyMustBeSpecified", BAD_REQUEST, "The bucket POST must contain the specified field name";
    XAmzContentSHA256Mismatch => "XAmzContentSHA256Mismatch", BAD_REQUEST, "The provided x-amz-content-sha256 header does not match what was computed";
}

impl S3ErrorCode {
    // Older endpoints and S3-compatible servers spell a few codes differently.
    fn from_alias(code: &str) -> Self {
        match code {
            "KeyTooLong" => Self::KeyTooLong,
            "MalformedACL" => Self::MalformedACLError,
            "MissingRequestBody" => Self::MissingRequestBodyError,
            "MaxPostPreDataLengthExceeded" => Self::MaxPostPreDataLengthExceededError,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether this code is outside the known set.
    #[must_use]
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for S3ErrorCode {
    fn from(code: &str) -> Self {
        Self::from_code(code)
    }
}

/// An error reported by the S3 service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Error {
    /// The error code.
    pub code: S3ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The resource that caused the error.
    pub resource: Option<String>,
    /// The request ID.
    pub request_id: Option<String>,
    /// The host ID S3 attaches for support requests.
    pub host_id: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for S3Error {}

impl S3Error {
    /// Create a new S3Error from an error code.
    #[must_use]
    pub fn new(code: S3ErrorCode) -> Self {
        let status_code = code.default_status_code();
        let message = code.default_message().to_owned();
        Self {
            code,
            message,
            resource: None,
            request_id: None,
            host_id: None,
            status_code,
        }
    }

    /// Create a new S3Error with a custom message.
    #[must_use]
    pub fn with_message(code: S3ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::new(code)
        }
    }

    /// Create an error for a failed response whose body could not be read.
    ///
    /// The code is the numeric status, since nothing better is known.
    #[must_use]
    pub fn from_status(status: http::StatusCode) -> Self {
        let message = status
            .canonical_reason()
            .unwrap_or("Unexpected response status")
            .to_owned();
        Self::with_message(S3ErrorCode::Other(status.as_str().to_owned()), message)
            .with_status(status)
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the host ID.
    #[must_use]
    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    /// Override the HTTP status, usually with the one actually received.
    #[must_use]
    pub fn with_status(mut self, status_code: http::StatusCode) -> Self {
        self.status_code = status_code;
        self
    }
}

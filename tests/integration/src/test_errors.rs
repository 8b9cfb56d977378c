//! Service and configuration error mapping.

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use s3sign_auth::{AuthError, Credentials};
    use s3sign_client::{ClientError, S3Client};
    use s3sign_core::{ClientConfig, Region, SignatureVersion};
    use s3sign_model::S3ErrorCode;

    use crate::{CannedResponse, RecordingTransport, client};

    #[test]
    fn test_should_map_no_such_key() {
        let client = client("testbucket", SignatureVersion::V4);
        client.transport().respond(CannedResponse::new(
            StatusCode::NOT_FOUND,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Error><Code>NoSuchKey</Code>\
             <Message>The resource you requested does not exist</Message>\
             <Resource>/testbucket/missing.txt</Resource>\
             <RequestId>4442587FB7D0A2F9</RequestId></Error>",
        ));

        let err = client.get_object("missing.txt").unwrap_err();
        let service = err.as_service_error().unwrap();
        assert_eq!(service.code, S3ErrorCode::NoSuchKey);
        assert_eq!(service.message, "The resource you requested does not exist");
        assert_eq!(service.resource.as_deref(), Some("/testbucket/missing.txt"));
        assert_eq!(service.request_id.as_deref(), Some("4442587FB7D0A2F9"));
        assert_eq!(service.status_code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_should_pass_through_unknown_code() {
        let client = client("testbucket", SignatureVersion::V4);
        client.transport().respond(CannedResponse::new(
            StatusCode::BAD_REQUEST,
            "<Error><Code>SomethingNew</Code><Message>Brand new failure</Message></Error>",
        ));

        let err = client.delete_object("k").unwrap_err();
        let service = err.as_service_error().unwrap();
        assert_eq!(service.code, S3ErrorCode::Other("SomethingNew".to_owned()));
        assert_eq!(service.message, "Brand new failure");
        assert_eq!(service.status_code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_should_map_empty_body_to_status() {
        let client = client("testbucket", SignatureVersion::V4);
        client.transport().respond(
            CannedResponse::new(StatusCode::SERVICE_UNAVAILABLE, "")
                .with_header("x-amz-request-id", "REQ-503"),
        );

        let err = client.get_bucket_acl().unwrap_err();
        let service = err.as_service_error().unwrap();
        assert_eq!(service.status_code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(service.request_id.as_deref(), Some("REQ-503"));
    }

    #[test]
    fn test_should_report_non_xml_error_body() {
        let client = client("testbucket", SignatureVersion::V4);
        client.transport().respond(CannedResponse::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "<html>busy</html",
        ));

        let err = client.get_bucket_acl().unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn test_should_fail_before_sending_without_credentials() {
        let config = ClientConfig::new(Region::UsEast1, Some("testbucket".to_owned()));
        let client = S3Client::new(config, Credentials::new("", "secret"), RecordingTransport::new());

        let err = client.get_object("a.txt").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Configuration(AuthError::MissingAccessKey)
        ));
        assert!(client.transport().is_empty());
    }
}

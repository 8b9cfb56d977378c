//! SigV4 signing end to end.

#[cfg(test)]
mod tests {
    use s3sign_auth::sigv4::{AMZ_DATE_HEADER, parse_authorization_header};
    use s3sign_auth::{
        AuthError, CONTENT_SHA256_HEADER, StaticCredentialProvider, hash_payload, verify_v4,
    };
    use s3sign_client::{ListObjectsOptions, PutObjectOptions};
    use s3sign_core::SignatureVersion;

    use crate::{ACCESS_KEY, client, credentials};

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_should_attach_v4_headers() {
        let client = client("photos", SignatureVersion::V4);
        client.get_object("2024/cat.png").unwrap();

        let request = client.transport().last();
        let headers = request.headers();
        assert_eq!(headers[CONTENT_SHA256_HEADER], EMPTY_SHA256);
        assert_eq!(headers["host"], "s3.amazonaws.com");

        let amz_date = headers[AMZ_DATE_HEADER].to_str().unwrap();
        assert_eq!(amz_date.len(), 16);
        assert!(amz_date.ends_with('Z'));

        let parsed = parse_authorization_header(headers["authorization"].to_str().unwrap())
            .unwrap();
        assert_eq!(parsed.access_key_id, ACCESS_KEY);
        assert_eq!(parsed.date, &amz_date[..8]);
        assert_eq!(parsed.region, "us-east-1");
        assert_eq!(parsed.service, "s3");
        assert_eq!(
            parsed.signed_headers,
            ["content-type", "host", "x-amz-content-sha256", "x-amz-date"]
        );
    }

    #[test]
    fn test_should_verify_recorded_requests() {
        let client = client("photos", SignatureVersion::V4);
        let provider = StaticCredentialProvider::from(&credentials());

        client
            .put_object("2024/cat.png", &b"\x89PNG"[..], PutObjectOptions::default())
            .unwrap();
        client
            .list_objects(&ListObjectsOptions::builder().prefix("2024/").max_keys(5).build())
            .unwrap();
        client.head_object("2024/cat.png").unwrap();
        client.copy_object("2024/cat.png", "archive/cat.png").unwrap();

        let requests = client.transport().take();
        assert_eq!(requests.len(), 4);
        for request in requests {
            let (parts, body) = request.into_parts();
            let result = verify_v4(&parts, &hash_payload(&body), &provider).unwrap();
            assert_eq!(result.access_key_id, ACCESS_KEY);
        }
    }

    #[test]
    fn test_should_detect_tampered_body() {
        let client = client("photos", SignatureVersion::V4);
        let provider = StaticCredentialProvider::from(&credentials());
        client
            .put_object("note.txt", "original", PutObjectOptions::default())
            .unwrap();

        let (parts, _) = client.transport().last().into_parts();
        assert_eq!(
            verify_v4(&parts, &hash_payload(b"tampered"), &provider).unwrap_err(),
            AuthError::SignatureDoesNotMatch
        );
    }

    #[test]
    fn test_should_sign_session_token() {
        let client = s3sign_client::S3Client::new(
            s3sign_core::ClientConfig::new(s3sign_core::Region::EuWest1, Some("photos".to_owned())),
            credentials().with_session_token("FQoGZXIvYXdzEXAMPLE"),
            crate::RecordingTransport::new(),
        );
        client.get_object("a.txt").unwrap();

        let request = client.transport().last();
        assert_eq!(request.headers()["x-amz-security-token"], "FQoGZXIvYXdzEXAMPLE");
        assert_eq!(request.headers()["host"], "s3-eu-west-1.amazonaws.com");

        let parsed = parse_authorization_header(
            request.headers()["authorization"].to_str().unwrap(),
        )
        .unwrap();
        assert_eq!(parsed.region, "eu-west-1");
        assert!(parsed.signed_headers.iter().any(|h| h == "x-amz-security-token"));
    }
}

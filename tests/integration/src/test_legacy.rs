//! Legacy (HMAC-SHA1) signing end to end.

#[cfg(test)]
mod tests {
    use s3sign_auth::sigv2::{build_canonicalized_resource, build_string_to_sign};
    use s3sign_auth::{StaticCredentialProvider, is_sigv2, verify_v2};
    use s3sign_client::PutObjectOptions;
    use s3sign_core::SignatureVersion;
    use s3sign_model::CannedAcl;

    use crate::{ACCESS_KEY, client, credentials};

    #[test]
    fn test_should_escape_space_in_resource() {
        let client = client("testbucket", SignatureVersion::V2);
        client
            .put_object("demo file.txt", "hello", PutObjectOptions::default())
            .unwrap();

        let request = client.transport().last();
        assert_eq!(
            request.uri().to_string(),
            "https://s3.amazonaws.com/testbucket/demo%20file.txt"
        );
        assert_eq!(
            build_canonicalized_resource(request.uri()),
            "/testbucket/demo%20file.txt"
        );
    }

    #[test]
    fn test_should_sign_with_date_header_only() {
        let client = client("testbucket", SignatureVersion::V2);
        client.get_object("demo file.txt").unwrap();

        let request = client.transport().last();
        let headers = request.headers();
        assert!(headers.contains_key("date"));
        assert!(!headers.contains_key("x-amz-date"));
        assert!(!headers.contains_key("x-amz-content-sha256"));

        let auth = headers["authorization"].to_str().unwrap();
        assert!(is_sigv2(auth));
        assert!(auth.starts_with(&format!("AWS {ACCESS_KEY}:")));
    }

    #[test]
    fn test_should_build_expected_string_to_sign() {
        let client = client("testbucket", SignatureVersion::V2);
        client
            .put_object("demo file.txt", "hello", PutObjectOptions::default())
            .unwrap();

        let request = client.transport().last();
        let date = request.headers()["date"].to_str().unwrap().to_owned();
        let sts = build_string_to_sign("PUT", request.headers(), request.uri(), &date);
        assert_eq!(
            sts,
            format!(
                "PUT\n\ntext/plain\n{date}\nx-amz-storage-class:STANDARD\n/testbucket/demo%20file.txt"
            )
        );
    }

    #[test]
    fn test_should_verify_recorded_requests() {
        let client = client("testbucket", SignatureVersion::V2);
        let provider = StaticCredentialProvider::from(&credentials());

        client.get_object("photos/puppy.jpg").unwrap();
        client
            .put_object_acl("photos/puppy.jpg", CannedAcl::PublicRead)
            .unwrap();
        client.delete_object("demo file.txt").unwrap();

        let requests = client.transport().take();
        assert_eq!(requests.len(), 3);
        for request in requests {
            let (parts, _) = request.into_parts();
            let result = verify_v2(&parts, &provider).unwrap();
            assert_eq!(result.access_key_id, ACCESS_KEY);
        }
    }

    #[test]
    fn test_should_sign_acl_subresource() {
        let client = client("testbucket", SignatureVersion::V2);
        client.get_object_acl("demo file.txt").unwrap();

        let request = client.transport().last();
        assert_eq!(
            build_canonicalized_resource(request.uri()),
            "/testbucket/demo%20file.txt?acl"
        );
    }
}

//! Object operations: addressing, headers and response handling.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use http::{Method, StatusCode};
    use s3sign_client::{ListObjectsOptions, PutObjectOptions};
    use s3sign_core::SignatureVersion;
    use s3sign_model::{Acl, Grantee, Permission, PermissionGrant, StorageClass};

    use crate::{CannedResponse, client};

    #[test]
    fn test_should_upload_with_layered_headers() {
        let client = client("media", SignatureVersion::V4);
        let options = PutObjectOptions::builder()
            .acl(Acl::custom([PermissionGrant::new(
                Permission::Read,
                [Grantee::AllUsers, Grantee::EmailAddress("ops@example.com".to_owned())],
            )]))
            .metadata(BTreeMap::from([("owner".to_owned(), "alice".to_owned())]))
            .storage_class(StorageClass::ReducedRedundancy)
            .build();
        client.put_object("clips/intro.mp4", "frames", options).unwrap();

        let request = client.transport().last();
        assert_eq!(request.method(), Method::PUT);
        let headers = request.headers();
        assert_eq!(headers["content-type"], "video/mp4");
        assert_eq!(headers["x-amz-storage-class"], "REDUCED_REDUNDANCY");
        assert_eq!(headers["x-amz-meta-owner"], "alice");
        assert!(headers.contains_key("x-amz-grant-read"));
        assert_eq!(request.body().as_ref(), b"frames");
    }

    #[test]
    fn test_should_return_object_body() {
        let client = client("media", SignatureVersion::V4);
        client
            .transport()
            .respond(CannedResponse::new(StatusCode::OK, "file contents"));

        let body = client.get_object("readme.txt").unwrap();
        assert_eq!(body.as_ref(), b"file contents");
        assert_eq!(client.transport().last().method(), Method::GET);
    }

    #[test]
    fn test_should_read_head_metadata() {
        let client = client("media", SignatureVersion::V4);
        client.transport().respond(
            CannedResponse::new(StatusCode::OK, "")
                .with_header("content-length", "1024")
                .with_header("last-modified", "Wed, 12 Oct 2009 17:50:00 GMT")
                .with_header("x-amz-meta-camera", "x100"),
        );

        let meta = client.head_object("clips/intro.mp4").unwrap();
        assert_eq!(meta.content_length, Some(1024));
        assert_eq!(
            meta.last_modified.as_deref(),
            Some("Wed, 12 Oct 2009 17:50:00 GMT")
        );
        assert_eq!(meta.metadata["camera"], "x100");
    }

    #[test]
    fn test_should_encode_list_parameters() {
        let client = client("media", SignatureVersion::V4);
        let options = ListObjectsOptions::builder()
            .prefix("clips/2024 summer")
            .continuation_token("1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=")
            .fetch_owner(false)
            .start_after("clips/a")
            .build();
        client.list_objects(&options).unwrap();

        let request = client.transport().last();
        assert_eq!(request.uri().path(), "/media");
        assert_eq!(
            request.uri().query(),
            Some(
                "continuation-token=1ueGcxLPRx1Tr%2FXYExHnhbYLgveDs2J%2Fwm36Hy4vbOwM%3D\
                 &fetch-owner=false&list-type=2&prefix=clips%2F2024%20summer&start-after=clips%2Fa"
            )
        );
    }

    #[test]
    fn test_should_send_copy_source() {
        let client = client("media", SignatureVersion::V4);
        client.copy_object("/clips/intro.mp4", "backup/intro.mp4").unwrap();

        let request = client.transport().last();
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.uri().path(), "/media/backup/intro.mp4");
        assert_eq!(request.headers()["x-amz-copy-source"], "/media/clips/intro.mp4");
    }

    #[test]
    fn test_should_address_bucket_acl() {
        let client = client("media", SignatureVersion::V4);
        client.put_bucket_acl(Acl::from(s3sign_model::CannedAcl::Private)).unwrap();

        let request = client.transport().last();
        assert_eq!(request.uri().to_string(), "https://s3.amazonaws.com/media?acl");
        assert_eq!(request.headers()["x-amz-acl"], "private");
    }
}

//! Tests for the S3 listing client.
//!
//! A wiremock server stands in for the S3 endpoint (`ListerOptions::endpoint_url`)
//! and serves `ListObjectsV2` XML pages. Static credentials come from the
//! environment so the default AWS config chain never reaches out.

use cdnsync::{ListerOptions, ObjectLister, S3Lister, SyncError};
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

/// Matches list requests that carry no continuation token.
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        !request
            .url
            .query_pairs()
            .any(|(name, _)| name == "continuation-token")
    }
}

async fn lister_for(server: &MockServer, prefix: &str) -> S3Lister {
    std::env::set_var("AWS_ACCESS_KEY_ID", "test-access-key");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "test-secret-key");
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");

    let options = ListerOptions {
        region: Some("us-east-1".to_string()),
        endpoint_url: Some(server.uri()),
    };
    S3Lister::from_env("data", prefix, &options).await
}

fn list_page(keys: &[&str], next_token: Option<&str>, truncated: bool) -> String {
    let contents: String = keys
        .iter()
        .map(|key| format!("<Contents><Key>{}</Key><Size>1</Size></Contents>", key))
        .collect();
    let token = next_token
        .map(|t| format!("<NextContinuationToken>{}</NextContinuationToken>", t))
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
<Name>data</Name><Prefix>logs/</Prefix><KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys>
<IsTruncated>{}</IsTruncated>{}{}
</ListBucketResult>"#,
        keys.len(),
        truncated,
        token,
        contents
    )
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

// =============================================================================
// Pagination Tests
// =============================================================================

mod pagination {
    use super::*;

    #[tokio::test]
    async fn test_follows_continuation_token_until_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex("^/data/?$"))
            .and(query_param("list-type", "2"))
            .and(FirstPage)
            .respond_with(xml(list_page(
                &["logs/a.txt", "logs/b.txt"],
                Some("tok-1"),
                true,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/data/?$"))
            .and(query_param("continuation-token", "tok-1"))
            .respond_with(xml(list_page(&["logs/c.txt"], None, false)))
            .expect(1)
            .mount(&server)
            .await;

        let mut lister = lister_for(&server, "logs/").await;

        let first = lister.next_page().await.unwrap();
        let second = lister.next_page().await.unwrap();
        let done = lister.next_page().await.unwrap();

        assert_eq!(
            first,
            Some(vec!["logs/a.txt".to_string(), "logs/b.txt".to_string()])
        );
        assert_eq!(second, Some(vec!["logs/c.txt".to_string()]));
        assert_eq!(done, None);
    }

    #[tokio::test]
    async fn test_prefix_is_sent_with_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex("^/data/?$"))
            .and(query_param("prefix", "logs/2024"))
            .respond_with(xml(list_page(&["logs/2024/x.log"], None, false)))
            .expect(1)
            .mount(&server)
            .await;

        let mut lister = lister_for(&server, "logs/2024").await;

        assert_eq!(
            lister.next_page().await.unwrap(),
            Some(vec!["logs/2024/x.log".to_string()])
        );
        assert_eq!(lister.next_page().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_truncated_page_without_token_stops() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex("^/data/?$"))
            .respond_with(xml(list_page(&["logs/a.txt"], None, true)))
            .expect(1)
            .mount(&server)
            .await;

        let mut lister = lister_for(&server, "logs/").await;

        assert_eq!(
            lister.next_page().await.unwrap(),
            Some(vec!["logs/a.txt".to_string()])
        );
        assert_eq!(lister.next_page().await.unwrap(), None);
    }
}

// =============================================================================
// Failure Tests
// =============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_server_error_maps_to_list_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex("^/data/?$"))
            .respond_with(ResponseTemplate::new(500).set_body_raw(
                "<Error><Code>InternalError</Code><Message>boom</Message></Error>",
                "application/xml",
            ))
            .mount(&server)
            .await;

        let mut lister = lister_for(&server, "logs/").await;

        match lister.next_page().await {
            Err(SyncError::List { bucket, prefix, .. }) => {
                assert_eq!(bucket, "data");
                assert_eq!(prefix, "logs/");
            }
            other => panic!("Expected List error, got: {:?}", other),
        }
    }
}

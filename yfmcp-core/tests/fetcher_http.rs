use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use httpmock::prelude::*;
use yfmcp_core::{AuthenticatedFetcher, CredentialCache, CredentialSource, Credentials, YfmcpError};
use yfmcp_types::{AuthPolicy, CredentialConfig, FetchConfig};

struct FixedSource {
    calls: AtomicUsize,
    result: Result<Credentials, YfmcpError>,
}

impl FixedSource {
    fn ok(cookie: &str, crumb: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: Ok(Credentials::new(cookie, crumb)),
        })
    }
    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: Err(YfmcpError::auth_unavailable("no session cookie was issued")),
        })
    }
}

#[async_trait]
impl CredentialSource for FixedSource {
    async fn handshake(&self) -> Result<Credentials, YfmcpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn fetcher(source: Arc<FixedSource>, policy: AuthPolicy) -> AuthenticatedFetcher {
    let cache = Arc::new(CredentialCache::new(source, &CredentialConfig::default()));
    let config = FetchConfig {
        auth_policy: policy,
        ..FetchConfig::default()
    };
    AuthenticatedFetcher::try_new(cache, config).unwrap()
}

#[tokio::test]
async fn authenticated_request_carries_cookie_and_encoded_crumb() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/y")
                .query_param("crumb", "c&d")
                .header("cookie", "a=1; b=2")
                .header_exists("user-agent")
                .header("accept-language", "en-US,en;q=0.9");
            then.status(200).body(r#"{"ok":true}"#);
        })
        .await;

    let f = fetcher(FixedSource::ok("a=1; b=2", "c&d"), AuthPolicy::Required);
    let body = f.fetch_json(&server.url("/y"), true).await.unwrap();
    assert_eq!(body["ok"], true);
    m.assert_async().await;
}

#[tokio::test]
async fn crumb_is_appended_after_existing_query() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/y")
                .query_param("z", "1")
                .query_param("crumb", "c&d");
            then.status(200).body("{}");
        })
        .await;

    let f = fetcher(FixedSource::ok("a=1; b=2", "c&d"), AuthPolicy::Required);
    f.fetch(&format!("{}?z=1", server.url("/y")), true)
        .await
        .unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn credentials_are_reused_across_requests() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/y");
            then.status(200).body("{}");
        })
        .await;

    let source = FixedSource::ok("a=1", "tok");
    let f = fetcher(source.clone(), AuthPolicy::Required);
    for _ in 0..3 {
        f.fetch(&server.url("/y"), true).await.unwrap();
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unauthenticated_request_skips_the_handshake() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/chart");
            then.status(200).body("{}");
        })
        .await;

    let source = FixedSource::ok("a=1", "tok");
    let f = fetcher(source.clone(), AuthPolicy::Required);
    f.fetch(&server.url("/chart"), false).await.unwrap();
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_success_status_becomes_upstream_http_with_bounded_preview() {
    let server = MockServer::start_async().await;
    let body = "x".repeat(500);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken");
            then.status(500).body(body.clone());
        })
        .await;

    let f = fetcher(FixedSource::ok("a=1", "tok"), AuthPolicy::Required);
    let err = f.fetch(&server.url("/broken"), false).await.unwrap_err();
    match err {
        YfmcpError::UpstreamHttp {
            status,
            body_preview,
        } => {
            assert_eq!(status, 500);
            assert_eq!(body_preview.len(), 200);
        }
        other => panic!("expected UpstreamHttp, got {other:?}"),
    }
}

#[tokio::test]
async fn required_policy_propagates_auth_failure() {
    let server = MockServer::start_async().await;
    let f = fetcher(FixedSource::failing(), AuthPolicy::Required);
    let err = f.fetch(&server.url("/y"), true).await.unwrap_err();
    assert!(matches!(err, YfmcpError::AuthUnavailable { .. }));
}

#[tokio::test]
async fn best_effort_policy_sends_without_credentials() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/y");
            then.status(200).body("{}");
        })
        .await;

    let f = fetcher(FixedSource::failing(), AuthPolicy::BestEffort);
    f.fetch(&server.url("/y"), true).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn non_json_body_is_a_data_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/html");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let f = fetcher(FixedSource::ok("a=1", "tok"), AuthPolicy::Required);
    let err = f.fetch_json(&server.url("/html"), false).await.unwrap_err();
    assert!(matches!(err, YfmcpError::Data(_)));
}

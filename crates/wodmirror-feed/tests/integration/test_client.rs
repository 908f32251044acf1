//! Integration tests for the FeedClient transport
//!
//! - Successful fetch returns the body
//! - The configured user agent is sent on every request
//! - Redirects are followed
//! - Non-success statuses and timeouts are errors

use std::time::Duration;

use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use wodmirror_core::config::ConfigBuilder;
use wodmirror_core::ports::IDocumentFetcher;
use wodmirror_feed::client::FeedClient;
use wodmirror_feed::FeedError;

use crate::common;

#[tokio::test]
async fn test_fetch_returns_body() {
    let (server, config, client) = common::setup_feed_mock().await;
    common::mount_html(&server, "/page/1/", "<html><body>hello</body></html>").await;

    let body = client
        .get_text(&config.listing_url(1).unwrap())
        .await
        .expect("fetch listing");

    assert!(body.contains("hello"));
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let (server, config, client) = common::setup_feed_mock().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .and(header("user-agent", common::TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let body = client.get_text(&config.listing_url(1).unwrap()).await.unwrap();
    assert_eq!(body, "ok");
    assert_eq!(client.user_agent(), common::TEST_USER_AGENT);
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let (server, config, client) = common::setup_feed_mock().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/", server.uri())),
        )
        .mount(&server)
        .await;
    common::mount_html(&server, "/", "<html><body>front page</body></html>").await;

    let body = client.get_text(&config.listing_url(1).unwrap()).await.unwrap();
    assert!(body.contains("front page"));
}

#[tokio::test]
async fn test_fetch_non_success_status_is_error() {
    let (server, config, client) = common::setup_feed_mock().await;

    Mock::given(method("GET"))
        .and(path("/page/7/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .get_text(&config.listing_url(7).unwrap())
        .await
        .unwrap_err();

    match err {
        FeedError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/page/7/"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_server_error_is_not_retried() {
    let (server, config, client) = common::setup_feed_mock().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.get_text(&config.listing_url(1).unwrap()).await;
    assert!(matches!(result, Err(FeedError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = wiremock::MockServer::start().await;
    let config = ConfigBuilder::new()
        .feed_base_url(server.uri())
        .feed_request_timeout_secs(1)
        .build()
        .feed;
    let client = FeedClient::new("UA", &config).unwrap();

    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/slow/", server.uri())).unwrap();
    let err = client.get_text(&url).await.unwrap_err();
    match err {
        FeedError::Network(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(client.timeout(), Duration::from_secs(1));
}

#[tokio::test]
async fn test_document_fetcher_port_adds_context() {
    let (server, config, client) = common::setup_feed_mock().await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher: &dyn IDocumentFetcher = &client;
    let err = fetcher
        .fetch(&config.listing_url(2).unwrap())
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("Failed to fetch"));
    assert!(message.contains("HTTP 500"));
}

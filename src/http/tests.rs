//! Tests for the HTTP transport module

use super::*;
use crate::config::PagingConfig;
use crate::error::Error;
use crate::paging::{Fetch, PagedContent};
use crate::response::IfStatus;
use crate::types::{Entry, EntryId};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build();
    Arc::new(HttpClient::with_config(config).unwrap())
}

fn entries(ids: &[u64]) -> serde_json::Value {
    json!(ids
        .iter()
        .map(|id| json!({"id": id.to_string(), "content": format!("post {id}")}))
        .collect::<Vec<_>>())
}

fn ids(elements: &[Entry]) -> Vec<String> {
    elements.iter().map(|e| e.id.to_string()).collect()
}

// ============================================================================
// Client Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.default_headers.is_empty());
    assert!(config.user_agent.starts_with("feedkit/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://social.example/api/v1")
        .timeout(Duration::from_secs(60))
        .header("Authorization", "Bearer abc")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url.as_deref(),
        Some("https://social.example/api/v1")
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(
        config.default_headers.get("Authorization"),
        Some(&"Bearer abc".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

// ============================================================================
// Client Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/timelines/home"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(entries(&[3, 2, 1]))
                .insert_header("X-Total", "3"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/api/v1/timelines/home", &[]).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.header("x-total"), Some("3"));
    assert!(response.text().contains("post 3"));
}

#[tokio::test]
async fn test_http_client_non_success_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("missing", &[]).await.unwrap();

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.text(), "not here");
}

#[tokio::test]
async fn test_http_client_headers_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(header("Authorization", "Bearer secret"))
        .and(query_param("q", "rust"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("Authorization", "Bearer secret")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let query = vec![
        ("q".to_string(), "rust".to_string()),
        ("limit".to_string(), "2".to_string()),
    ];
    let response = client.get("/api/search", &query).await.unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_absolute_url_ignores_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url("http://unused.invalid")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let url = format!("{}/elsewhere", mock_server.uri());
    let response = client.get(&url, &[]).await.unwrap();
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_http_client_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get("/slow", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_perform_dispatches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let handler = IfStatus::<Entry>::json(200);
    let entry = client.perform("/accounts/1", &[], &handler).await.unwrap();

    assert_eq!(entry.id, EntryId::from("1"));
}

#[tokio::test]
async fn test_perform_unhandled_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let handler = IfStatus::<Entry>::json(200);
    let err = client
        .perform("/accounts/2", &[], &handler)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DispatchExhausted { status: 404 }));
}

// ============================================================================
// Fetcher Tests
// ============================================================================

fn paging(limit: Option<u32>) -> PagingConfig {
    PagingConfig {
        limit,
        ..PagingConfig::default()
    }
}

#[test]
fn test_fetcher_bind_replaces_cursor() {
    let fetcher = HttpFetcher::<Entry>::new("/timeline", paging(None))
        .with_query("local", "true")
        .with_query("max_id", "40");

    let newer = fetcher.bind("min_id", "50");
    assert_eq!(newer.param("min_id"), Some("50"));
    assert_eq!(newer.param("max_id"), None);
    assert_eq!(newer.param("local"), Some("true"));
    assert_eq!(newer.url(), "/timeline");
}

#[test]
fn test_fetcher_request_query_adds_limit() {
    let fetcher = HttpFetcher::<Entry>::new("/timeline", paging(Some(20)));
    assert_eq!(
        fetcher.request_query(),
        vec![("limit".to_string(), "20".to_string())]
    );

    let explicit = fetcher.with_query("limit", "5");
    assert_eq!(
        explicit.request_query(),
        vec![("limit".to_string(), "5".to_string())]
    );
}

#[test]
fn test_fetcher_follow_link() {
    let fetcher = HttpFetcher::<Entry>::new("/timeline", paging(None));
    let next = fetcher
        .follow("https://social.example/api/v1/timelines/home?max_id=46&limit=3")
        .unwrap();

    assert_eq!(next.url(), "https://social.example/api/v1/timelines/home");
    assert_eq!(next.param("max_id"), Some("46"));
    assert_eq!(next.param("limit"), Some("3"));

    assert!(matches!(
        fetcher.follow("not a url").unwrap_err(),
        Error::InvalidUrl(_)
    ));
}

#[test]
fn test_fetcher_serde_skips_client() {
    let client = Arc::new(HttpClient::new().unwrap());
    let fetcher = HttpFetcher::<Entry>::new("/timeline", paging(Some(3)))
        .with_query("max_id", "48")
        .with_client(client);

    let encoded = serde_json::to_string(&fetcher).unwrap();
    let decoded: HttpFetcher<Entry> = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, fetcher);
    assert!(fetcher.has_client());
    assert!(!decoded.has_client());
}

#[tokio::test]
async fn test_fetch_without_client() {
    let fetcher = HttpFetcher::<Entry>::new("/timeline", paging(None));
    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[tokio::test]
async fn test_fetch_binds_cursors_from_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries(&[50, 49, 48])))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(Some(3))).with_client(client_for(&mock_server));
    let page = fetcher.fetch().await.unwrap();

    assert_eq!(ids(page.elements()), vec!["50", "49", "48"]);
    assert_eq!(page.previous().unwrap().param("min_id"), Some("50"));
    assert_eq!(page.next().unwrap().param("max_id"), Some("48"));
    assert!(page.next().unwrap().has_client());
}

#[tokio::test]
async fn test_fetch_prefers_link_header() {
    let mock_server = MockServer::start().await;
    let link = format!(
        "<{uri}/timeline?max_id=47>; rel=\"next\", <{uri}/timeline?min_id=50>; rel=\"prev\"",
        uri = mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(entries(&[50, 49, 48]))
                .insert_header("Link", link.as_str()),
        )
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));
    let page = fetcher.fetch().await.unwrap();

    let next = page.next().unwrap();
    assert_eq!(next.url(), format!("{}/timeline", mock_server.uri()));
    assert_eq!(next.param("max_id"), Some("47"));
    assert_eq!(page.previous().unwrap().param("min_id"), Some("50"));
}

#[tokio::test]
async fn test_fetch_empty_window_has_no_cursors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));
    let page = fetcher.fetch().await.unwrap();

    assert!(page.is_empty());
    assert!(page.previous().is_none());
    assert!(page.next().is_none());
}

#[tokio::test]
async fn test_fetch_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));
    let err = fetcher.fetch().await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "try later");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_unsorted_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries(&[48, 50, 49])))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));
    let err = fetcher.fetch().await.unwrap_err();

    assert!(matches!(err, Error::MalformedPage { .. }));
}

#[tokio::test]
async fn test_fetch_undecodable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));
    let err = fetcher.fetch().await.unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_fetch_then_load_older() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .and(query_param_is_missing("max_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries(&[50, 49, 48])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .and(query_param("max_id", "48"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries(&[47, 46])))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));

    let mut content = PagedContent::new();
    content.merge(fetcher.fetch().await.unwrap()).unwrap();
    let older = content.next_fetcher().unwrap().fetch().await.unwrap();
    assert_eq!(content.merge(older).unwrap(), 2);

    assert_eq!(ids(&content.all_elements()), vec!["50", "49", "48", "47", "46"]);
    assert_eq!(content.next_fetcher().unwrap().param("max_id"), Some("46"));
    assert_eq!(content.previous_fetcher().unwrap().param("min_id"), Some("50"));
}

#[tokio::test]
async fn test_attach_all_after_restore() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries(&[10, 9])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let fetcher = HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(Arc::clone(&client));

    let mut content = PagedContent::new();
    content.merge(fetcher.fetch().await.unwrap()).unwrap();

    let encoded = serde_json::to_vec(&content).unwrap();
    let mut restored: PagedContent<HttpFetcher<Entry>> = serde_json::from_slice(&encoded).unwrap();
    restored.validate().unwrap();
    assert!(!restored.next_fetcher().unwrap().has_client());

    HttpFetcher::attach_all(&mut restored, &client);
    assert!(restored.next_fetcher().unwrap().has_client());
    assert!(restored.previous_fetcher().unwrap().has_client());
    assert_eq!(restored, content);
}

#[test]
fn test_fetcher_follow_relative_link() {
    let config = HttpClientConfig::builder()
        .base_url("https://social.example/api/v1")
        .build();
    let client = Arc::new(HttpClient::with_config(config).unwrap());
    let fetcher = HttpFetcher::<Entry>::new("timelines/home", paging(None)).with_client(client);

    assert_eq!(
        fetcher.request_url(),
        "https://social.example/api/v1/timelines/home"
    );

    let rooted = fetcher.follow("/api/v1/timelines/home?max_id=7").unwrap();
    assert_eq!(rooted.url(), "https://social.example/api/v1/timelines/home");
    assert_eq!(rooted.param("max_id"), Some("7"));

    let query_only = fetcher.follow("?min_id=9").unwrap();
    assert_eq!(
        query_only.url(),
        "https://social.example/api/v1/timelines/home"
    );
    assert_eq!(query_only.param("min_id"), Some("9"));
}

#[tokio::test]
async fn test_fetch_relative_link_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .and(query_param_is_missing("max_id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(entries(&[3, 2]))
                .insert_header("Link", "</timeline?max_id=1>; rel=\"next\""),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/timeline"))
        .and(query_param("max_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries(&[1])))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpFetcher::<Entry>::new("/timeline", paging(None)).with_client(client_for(&mock_server));
    let page = fetcher.fetch().await.unwrap();

    assert_eq!(ids(page.elements()), vec!["3", "2"]);
    let next = page.next().unwrap();
    assert_eq!(next.url(), format!("{}/timeline", mock_server.uri()));
    assert_eq!(next.param("max_id"), Some("1"));

    let older = next.fetch().await.unwrap();
    assert_eq!(ids(older.elements()), vec!["1"]);
}

//! Tests for the HTTP client module

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_client(max_retries: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .max_retries(max_retries)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(5),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 0);
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("sheet-stager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .max_retries(2)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .rate_limit(RateLimiterConfig::new(2, 4))
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("pageSize", "100")
        .query("alt", "media");

    assert_eq!(
        config.query,
        vec![
            ("pageSize".to_string(), "100".to_string()),
            ("alt".to_string(), "media".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_get_json_with_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [{"id": "1", "name": "a.xlsx"}]
        })))
        .mount(&mock_server)
        .await;

    let client = fast_client(0);
    let body: serde_json::Value = client
        .get_json_with_config(
            &format!("{}/drive/v3/files", mock_server.uri()),
            RequestConfig::new().query("pageSize", "10"),
        )
        .await
        .unwrap();

    assert_eq!(body["files"][0]["name"], "a.xlsx");
}

#[tokio::test]
async fn test_get_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x50, 0x4b, 0x03, 0x04]))
        .mount(&mock_server)
        .await;

    let client = fast_client(0);
    let bytes = client
        .get_bytes(
            &format!("{}/drive/v3/files/abc", mock_server.uri()),
            RequestConfig::new().query("alt", "media"),
        )
        .await
        .unwrap();

    assert_eq!(bytes.as_ref(), &[0x50, 0x4b, 0x03, 0x04]);
}

#[tokio::test]
async fn test_bearer_auth_applied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("Authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_auth(
        HttpClientConfig::builder().no_rate_limit().build(),
        AuthConfig::Bearer {
            token: "ya29.token".to_string(),
        },
    )
    .unwrap();

    client
        .get_with_config(&format!("{}/secure", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let err = client
        .get_with_config(&format!("{}/missing", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "File not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(0);
    let err = client
        .get_with_config(&format!("{}/flaky", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_retry_on_500_when_enabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = fast_client(2);
    let bytes = client
        .get_bytes(&format!("{}/flaky", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(bytes.as_ref(), b"ok");
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = fast_client(2);
    let err = client
        .get_with_config(&format!("{}/down", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    match &err {
        Error::MaxRetriesExceeded {
            max_retries,
            last_error,
        } => {
            assert_eq!(*max_retries, 2);
            assert_eq!(last_error, "HTTP 503: backend down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Max retries (2) exceeded: HTTP 503: backend down"
    );
}

#[test]
fn test_backoff_constant() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Constant,
                Duration::from_millis(100),
                Duration::from_secs(10),
            )
            .build(),
    )
    .unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(4), Duration::from_millis(100));
}

#[test]
fn test_backoff_linear() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Linear,
                Duration::from_millis(100),
                Duration::from_secs(10),
            )
            .build(),
    )
    .unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_backoff_exponential_respects_max() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(100),
                Duration::from_millis(500),
            )
            .build(),
    )
    .unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
}

#[test]
fn test_client_debug() {
    let client = fast_client(0);
    let debug = format!("{client:?}");
    assert!(debug.contains("HttpClient"));
    assert!(debug.contains("has_rate_limiter: false"));
}

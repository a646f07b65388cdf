//! Tests for the auth module

use super::authenticator::sign_assertion;
use super::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY_JSON: &str = include_str!("../../tests/fixtures/service_account.json");

fn test_key() -> ServiceAccountKey {
    ServiceAccountKey::from_json(KEY_JSON).unwrap()
}

fn service_account_config(token_url: String) -> AuthConfig {
    AuthConfig::ServiceAccount {
        key: test_key(),
        scopes: vec!["https://www.googleapis.com/auth/drive.readonly".to_string()],
        token_url: Some(token_url),
        token_lifetime_seconds: 3600,
    }
}

#[tokio::test]
async fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");

    let built = auth.apply(req).await.unwrap().build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[tokio::test]
async fn test_bearer_auth() {
    let auth = Authenticator::new(AuthConfig::Bearer {
        token: "ya29.static".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");
    let built = auth.apply(req).await.unwrap().build().unwrap();

    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer ya29.static"
    );
}

#[test]
fn test_sign_assertion_header() {
    let key = test_key();
    let jwt = sign_assertion(
        &key,
        &["scope-a".to_string(), "scope-b".to_string()],
        "https://oauth2.googleapis.com/token",
        3600,
    )
    .unwrap();

    let header = jsonwebtoken::decode_header(&jwt).unwrap();
    assert_eq!(header.alg, jsonwebtoken::Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some("0123456789abcdef"));
    assert_eq!(jwt.split('.').count(), 3);
}

#[test]
fn test_sign_assertion_invalid_key() {
    let mut key = test_key();
    key.private_key = "not a pem".to_string();

    let err = sign_assertion(&key, &[], "https://example.com/token", 60).unwrap_err();
    assert!(matches!(err, crate::error::Error::JwtGeneration { .. }));
}

#[tokio::test]
async fn test_service_account_token_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.exchanged",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(service_account_config(format!(
        "{}/token",
        mock_server.uri()
    )));
    let client = reqwest::Client::new();

    // Second request must reuse the cached token
    for _ in 0..2 {
        let req = client.get("https://example.com/api");
        let built = auth.apply(req).await.unwrap().build().unwrap();
        assert_eq!(
            built.headers().get("Authorization").unwrap(),
            "Bearer ya29.exchanged"
        );
    }
}

#[tokio::test]
async fn test_service_account_exchange_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(service_account_config(format!(
        "{}/token",
        mock_server.uri()
    )));
    let client = reqwest::Client::new();

    let err = auth
        .apply(client.get("https://example.com"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Token exchange failed with status 400"));
    assert!(err.to_string().contains("invalid_grant"));
}

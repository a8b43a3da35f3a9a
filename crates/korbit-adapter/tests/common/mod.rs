/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for korbit-adapter tests

#![allow(dead_code)]

use korbit_adapter::{ClientConfig, Credentials, KorbitClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "mock-access-token";
pub const REFRESH_TOKEN: &str = "mock-refresh-token";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new("client-id", "client-secret", "trader@example.com", "password")
}

/// Client pointed at the mock server with test credentials
pub fn test_client(server: &MockServer) -> KorbitClient {
    test_client_with(server, test_credentials())
}

pub fn test_client_with(server: &MockServer, credentials: Credentials) -> KorbitClient {
    KorbitClient::with_config(ClientConfig::default().with_base_url(server.uri()), credentials)
        .expect("client init")
}

pub fn token_response() -> serde_json::Value {
    serde_json::json!({
        "token_type": "Bearer",
        "access_token": ACCESS_TOKEN,
        "refresh_token": REFRESH_TOKEN,
        "expires_in": 3600,
        "scope": "VIEW,TRADE",
    })
}

/// Mount a token endpoint that must be hit exactly `times` times
pub async fn mount_token_endpoint(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(times)
        .mount(server)
        .await;
}

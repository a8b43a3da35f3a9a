/*
[INPUT]:  HTTP configuration (base URL, version, timeouts) and credentials
[OUTPUT]: Classified responses for public and private requests
[POS]:    HTTP layer - request dispatch and response classification
[UPDATE]: When changing request decoration or outcome classification
*/

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{ACCESS_TOKEN_PATH, AuthManager, Credentials, NonceGenerator, TokenState, TokenStore};
use crate::http::{KorbitError, Result};

/// Base URLs for the Korbit API
pub const PRODUCTION_BASE_URL: &str = "https://api.korbit.co.kr/";
pub const SANDBOX_BASE_URL: &str = "https://api.korbit-test.com/";

const DEFAULT_API_VERSION: &str = "v1";
const SUCCESS_STATUS: &str = "success";
const NONCE_FIELD: &str = "nonce";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: String,
    /// Passed to the transport as the per-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: SANDBOX_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_millis(18_000),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn production() -> Self {
        Self::default().with_base_url(PRODUCTION_BASE_URL)
    }

    pub fn sandbox() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base_url}/{api_version}{path}`
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            path
        )
    }
}

/// Main HTTP client for the Korbit API
///
/// Clones share the token store and the nonce sequence.
#[derive(Debug, Clone)]
pub struct KorbitClient {
    http_client: Client,
    config: ClientConfig,
    auth: AuthManager,
    nonces: NonceGenerator,
}

impl KorbitClient {
    /// Create a client for the default deployment
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(ClientConfig::default(), credentials)
    }

    /// Client without credentials, for public endpoints
    pub fn public(config: ClientConfig) -> Result<Self> {
        Self::with_config(config, Credentials::empty())
    }

    pub fn with_config(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|err| {
            KorbitError::Config(format!("invalid base URL {}: {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(KorbitError::Config(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| KorbitError::Config(format!("failed to build HTTP client: {err}")))?;

        let auth = AuthManager::new(
            http_client.clone(),
            config.endpoint_url(ACCESS_TOKEN_PATH),
            credentials,
        );

        Ok(Self {
            http_client,
            config,
            auth,
            nonces: NonceGenerator::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn tokens(&self) -> &TokenStore {
        self.auth.tokens()
    }

    pub fn nonces(&self) -> &NonceGenerator {
        &self.nonces
    }

    /// POST /oauth2/access_token with the password or refresh grant
    pub async fn authorize(&self) -> Result<TokenState> {
        self.auth.authorize().await
    }

    /// Same exchange as [`authorize`](Self::authorize); the refresh grant is
    /// chosen automatically once a refresh token is held.
    pub async fn refresh_access_token(&self) -> Result<TokenState> {
        self.auth.authorize().await
    }

    /// GET a public endpoint. Success is HTTP 200 alone.
    pub async fn public_request<P>(&self, path: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let fields = into_fields(params)?;
        let url = self.config.endpoint_url(path);
        debug!(%path, "public request");

        let response = self
            .http_client
            .get(&url)
            .query(&fields)
            .send()
            .await
            .map_err(|err| {
                warn!(%path, error = %err, "public request failed");
                KorbitError::PublicRequestFailed {
                    status: None,
                    warning: err.to_string(),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let warning = warning_text(response.headers(), status);
            warn!(%path, status = status.as_u16(), %warning, "public request rejected");
            return Err(KorbitError::PublicRequestFailed {
                status: Some(status.as_u16()),
                warning,
            });
        }

        response
            .json()
            .await
            .map_err(|err| KorbitError::PublicRequestFailed {
                status: Some(status.as_u16()),
                warning: format!("invalid JSON body: {err}"),
            })
    }

    /// Send an authenticated request.
    ///
    /// Authorizes first when no access token is held. GET carries the nonce
    /// in the query string, other methods in the form body.
    pub async fn private_request<P>(&self, method: Method, path: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        self.auth.ensure_credentials()?;
        let mut fields = into_fields(params)?;
        let token = self.auth.ensure_authorized().await?;

        // The generated nonce replaces any caller-supplied one.
        fields.retain(|(key, _)| key != NONCE_FIELD);
        fields.push((NONCE_FIELD.to_string(), self.nonces.next()));
        let url = self.config.endpoint_url(path);
        debug!(%method, %path, "private request");

        let builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(&token)
            .header(ACCEPT, "application/json");
        let builder = if method == Method::GET {
            builder.query(&fields)
        } else {
            builder.form(&fields)
        };

        let response = builder.send().await.map_err(|err| {
            warn!(%method, %path, error = %err, "private request failed");
            KorbitError::Transport {
                status: None,
                warning: err.to_string(),
            }
        })?;

        let outcome = classify_private(response).await;
        if let Err(err) = &outcome {
            warn!(%method, %path, kind = ?err.kind(), message = %err.message(), "private request unsuccessful");
        }
        outcome
    }

    pub(crate) async fn private_get<P>(&self, path: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        self.private_request(Method::GET, path, params).await
    }

    pub(crate) async fn private_post<P>(&self, path: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        self.private_request(Method::POST, path, params).await
    }
}

/// Warning header if the server sent one, else the status reason.
pub(crate) fn warning_text(headers: &HeaderMap, status: StatusCode) -> String {
    headers
        .get("warning")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string())
        })
}

/// Flatten request parameters into form/query pairs.
///
/// Parameters must serialize to an object of scalars; `None` fields and
/// `()` are dropped.
fn into_fields<P>(params: &P) -> Result<Vec<(String, String)>>
where
    P: Serialize + ?Sized,
{
    let map = match serde_json::to_value(params)? {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(KorbitError::InvalidParameter(format!(
                "parameters must be an object, got {other}"
            )));
        }
    };

    let mut fields = Vec::with_capacity(map.len() + 1);
    for (key, value) in map {
        let value = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(KorbitError::InvalidParameter(format!(
                    "parameter `{key}` is not a scalar"
                )));
            }
        };
        fields.push((key, value));
    }
    Ok(fields)
}

async fn classify_private(response: Response) -> Result<Value> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(KorbitError::Transport {
            status: Some(status.as_u16()),
            warning: warning_text(response.headers(), status),
        });
    }

    let body: Value = response.json().await.map_err(|err| KorbitError::Transport {
        status: Some(status.as_u16()),
        warning: format!("invalid JSON body: {err}"),
    })?;
    classify_body(body)
}

/// Split a 200 body on its business `status` field.
///
/// Bodies without a `status` field (plain data, arrays) are successes.
fn classify_body(body: Value) -> Result<Value> {
    let business_status = body.get("status").map(|status| match status.as_str() {
        Some(text) => text.to_string(),
        None => status.to_string(),
    });

    match business_status {
        Some(status) if status != SUCCESS_STATUS => Err(KorbitError::Application { status, body }),
        _ => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("https://api.korbit.co.kr/", "v1", "/ticker", "https://api.korbit.co.kr/v1/ticker")]
    #[case("http://127.0.0.1:8080", "v1", "/ticker", "http://127.0.0.1:8080/v1/ticker")]
    #[case("http://localhost/", "/v2/", "/user/info", "http://localhost/v2/user/info")]
    fn test_endpoint_url(
        #[case] base: &str,
        #[case] version: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let config = ClientConfig::default()
            .with_base_url(base)
            .with_api_version(version);
        assert_eq!(config.endpoint_url(path), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("api.korbit.co.kr")]
    #[case("mailto:ops@korbit.co.kr")]
    fn test_malformed_base_url_is_config_error(#[case] base: &str) {
        let config = ClientConfig::default().with_base_url(base);
        let err = KorbitClient::public(config).unwrap_err();
        assert!(matches!(err, KorbitError::Config(_)));
    }

    #[test]
    fn test_default_config_targets_sandbox() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, SANDBOX_BASE_URL);
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.timeout, Duration::from_millis(18_000));
        assert_eq!(ClientConfig::production().base_url, PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_classify_success_body() {
        let body = json!({"status": "success", "data": {"id": 1}});
        assert_eq!(classify_body(body.clone()).unwrap(), body);
    }

    #[test]
    fn test_classify_business_failure() {
        let body = json!({"status": "error", "message": "insufficient balance"});
        match classify_body(body.clone()) {
            Err(KorbitError::Application { status, body: payload }) => {
                assert_eq!(status, "error");
                assert_eq!(payload, body);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_classify_body_without_status() {
        let object = json!({"email": "user@example.com"});
        let array = json!([{"id": "1"}]);
        assert_eq!(classify_body(object.clone()).unwrap(), object);
        assert_eq!(classify_body(array.clone()).unwrap(), array);
    }

    #[test]
    fn test_classify_non_string_status() {
        let err = classify_body(json!({"status": 500})).unwrap_err();
        assert_eq!(err.message(), "500");
    }

    #[test]
    fn test_into_fields_flattens_scalars() {
        let mut fields = into_fields(&json!({
            "currency_pair": "btc_krw",
            "limit": 10,
            "group": true,
            "offset": null,
        }))
        .unwrap();
        fields.sort();

        assert_eq!(
            fields,
            vec![
                ("currency_pair".to_string(), "btc_krw".to_string()),
                ("group".to_string(), "true".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
        assert!(into_fields(&()).unwrap().is_empty());
    }

    #[test]
    fn test_into_fields_rejects_nested_values() {
        assert!(matches!(
            into_fields(&json!({"ids": [1, 2]})),
            Err(KorbitError::InvalidParameter(_))
        ));
        assert!(matches!(
            into_fields(&json!("plain")),
            Err(KorbitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_warning_text_prefers_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            warning_text(&headers, StatusCode::SERVICE_UNAVAILABLE),
            "Service Unavailable"
        );

        headers.insert("warning", "maintenance".parse().unwrap());
        assert_eq!(
            warning_text(&headers, StatusCode::SERVICE_UNAVAILABLE),
            "maintenance"
        );
    }
}

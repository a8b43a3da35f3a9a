/*
[INPUT]:  Credentials, HTTP client and the OAuth2 token endpoint
[OUTPUT]: Fresh access/refresh tokens written to the token store
[POS]:    Auth layer - password and refresh-token grant exchange
[UPDATE]: When grant parameters or token response format change
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::http::{KorbitError, Result, warning_text};

use super::{Credentials, TokenState, TokenStore};

/// Path of the token endpoint, relative to the versioned base URL.
pub const ACCESS_TOKEN_PATH: &str = "/oauth2/access_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Password,
    RefreshToken,
}

#[derive(Serialize)]
struct GrantRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    username: &'a str,
    password: &'a str,
    grant_type: GrantType,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Body returned by the token endpoint on success
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Outcome bookkeeping for exchanges, held under the in-flight guard.
#[derive(Debug, Default)]
struct ExchangeLog {
    generation: u64,
    last_failure: Option<FailedExchange>,
}

#[derive(Debug, Clone)]
struct FailedExchange {
    status: Option<u16>,
    warning: String,
}

impl FailedExchange {
    fn to_error(&self) -> KorbitError {
        KorbitError::AuthorizationFailed {
            status: self.status,
            warning: self.warning.clone(),
        }
    }
}

/// Performs the grant exchange and owns the write side of the token store.
///
/// Exchanges are serialized: concurrent callers that find no access token
/// queue behind a single in-flight exchange and share its result, success
/// or failure.
#[derive(Debug, Clone)]
pub struct AuthManager {
    http: Client,
    token_url: String,
    credentials: Arc<Credentials>,
    tokens: TokenStore,
    in_flight: Arc<Mutex<ExchangeLog>>,
    /// Mirrors `ExchangeLog::generation` for lock-free reads.
    generation: Arc<AtomicU64>,
}

impl AuthManager {
    pub fn new(http: Client, token_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials: Arc::new(credentials),
            tokens: TokenStore::new(),
            in_flight: Arc::new(Mutex::new(ExchangeLog::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub(crate) fn ensure_credentials(&self) -> Result<()> {
        if self.credentials.is_complete() {
            Ok(())
        } else {
            Err(KorbitError::CredentialsMissing)
        }
    }

    /// Run a grant exchange now.
    ///
    /// Uses the refresh-token grant when a refresh token is held, the
    /// password grant otherwise.
    #[instrument(skip(self), fields(client_id = %self.credentials.client_id()))]
    pub async fn authorize(&self) -> Result<TokenState> {
        self.ensure_credentials()?;
        let mut log = self.in_flight.lock().await;
        self.logged_exchange(&mut log).await
    }

    /// Return the held access token, authorizing first if there is none.
    pub(crate) async fn ensure_authorized(&self) -> Result<String> {
        self.ensure_credentials()?;
        if let Some(token) = self.tokens.access_token() {
            return Ok(token);
        }

        let observed = self.generation.load(Ordering::Acquire);
        let mut log = self.in_flight.lock().await;
        if let Some(token) = self.tokens.access_token() {
            debug!("reusing token from concurrent authorization");
            return Ok(token);
        }
        if log.generation != observed {
            if let Some(failure) = &log.last_failure {
                debug!("reusing failure from concurrent authorization");
                return Err(failure.to_error());
            }
        }

        let state = self.logged_exchange(&mut log).await?;
        state.access_token.ok_or_else(|| KorbitError::AuthorizationFailed {
            status: None,
            warning: "no access token issued".to_string(),
        })
    }

    /// Run one exchange and record its outcome for queued callers.
    async fn logged_exchange(&self, log: &mut ExchangeLog) -> Result<TokenState> {
        let outcome = self.exchange().await;

        log.generation += 1;
        log.last_failure = match &outcome {
            Err(KorbitError::AuthorizationFailed { status, warning }) => Some(FailedExchange {
                status: *status,
                warning: warning.clone(),
            }),
            _ => None,
        };
        self.generation.store(log.generation, Ordering::Release);

        outcome
    }

    async fn exchange(&self) -> Result<TokenState> {
        let refresh_token = self.tokens.refresh_token();
        let grant_type = match refresh_token {
            Some(_) => GrantType::RefreshToken,
            None => GrantType::Password,
        };

        let body = GrantRequest {
            client_id: self.credentials.client_id(),
            client_secret: self.credentials.client_secret(),
            username: self.credentials.username(),
            password: self.credentials.password(),
            grant_type,
            refresh_token: refresh_token.as_deref(),
        };

        debug!(?grant_type, "requesting access token");
        let response = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&body)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "token endpoint unreachable");
                KorbitError::AuthorizationFailed {
                    status: None,
                    warning: err.to_string(),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let warning = warning_text(response.headers(), status);
            warn!(status = status.as_u16(), %warning, "authorization rejected");
            return Err(KorbitError::AuthorizationFailed {
                status: Some(status.as_u16()),
                warning,
            });
        }

        let grant: TokenResponse =
            response
                .json()
                .await
                .map_err(|err| KorbitError::AuthorizationFailed {
                    status: Some(status.as_u16()),
                    warning: format!("invalid token response: {err}"),
                })?;

        if grant.access_token.is_empty() {
            warn!("token endpoint returned an empty access token");
            return Err(KorbitError::AuthorizationFailed {
                status: Some(status.as_u16()),
                warning: "empty access token in token response".to_string(),
            });
        }

        let state = self
            .tokens
            .update(grant.access_token, grant.refresh_token, grant.expires_in);
        info!(?grant_type, expires_in = grant.expires_in, "authorized");
        Ok(state)
    }
}

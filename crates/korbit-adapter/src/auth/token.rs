/*
[INPUT]:  Access/refresh tokens and lifetimes from the token endpoint
[OUTPUT]: Snapshot of the current token state
[POS]:    Auth layer - token lifecycle storage
[UPDATE]: When adding token persistence or changing expiry tracking
*/

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Tokens currently held by a client.
///
/// `access_token` is only ever set together with `expires_at`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// True when there is no token or its lifetime has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.has_access_token(), self.expires_at) {
            (true, Some(expires_at)) => now >= expires_at,
            _ => true,
        }
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("TokenState")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Thread-safe token store shared between the auth manager and the client.
///
/// Only [`AuthManager`](super::AuthManager) writes to it.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    data: Arc<RwLock<TokenState>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> TokenState {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.access_token.clone().filter(|token| !token.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.refresh_token.clone().filter(|token| !token.is_empty())
    }

    pub fn is_expired(&self) -> bool {
        self.current().is_expired_at(Utc::now())
    }

    /// Replace all three fields under one write lock.
    pub(crate) fn update(
        &self,
        access_token: String,
        refresh_token: Option<String>,
        expires_in_seconds: u64,
    ) -> TokenState {
        let expires_at = i64::try_from(expires_in_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let state = TokenState {
            access_token: Some(access_token),
            refresh_token,
            expires_at: Some(expires_at),
        };

        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = state.clone();
        state
    }
}

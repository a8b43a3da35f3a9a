/*
[INPUT]:  OAuth2 client id/secret and account login
[OUTPUT]: Immutable credential set for the password grant
[POS]:    Auth layer - credential storage
[UPDATE]: When credential sources change
*/

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::http::{KorbitError, Result};

pub const CLIENT_ID_ENV: &str = "KORBIT_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "KORBIT_CLIENT_SECRET";
pub const USERNAME_ENV: &str = "KORBIT_USERNAME";
pub const PASSWORD_ENV: &str = "KORBIT_PASSWORD";

/// Credentials for the password / refresh-token grants.
///
/// The secret and the password are zeroized on drop and never printed.
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Empty credentials. Only public endpoints will succeed.
    pub fn empty() -> Self {
        Self::new("", "", "", "")
    }

    /// Read `KORBIT_CLIENT_ID`, `KORBIT_CLIENT_SECRET`, `KORBIT_USERNAME`
    /// and `KORBIT_PASSWORD` from the environment.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|_| KorbitError::Config(format!("environment variable not set: {name}")))
        };

        Ok(Self::new(
            read(CLIENT_ID_ENV)?,
            read(CLIENT_SECRET_ENV)?,
            read(USERNAME_ENV)?,
            read(PASSWORD_ENV)?,
        ))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Client id and secret are both non-empty.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.expose_secret().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/*
[INPUT]:  YAML configuration file and KORBIT_* environment variables
[OUTPUT]: Client configuration and credentials
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use anyhow::Context;
use korbit_adapter::{ClientConfig, Credentials};
use serde::{Deserialize, Serialize};

/// Deployment to target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Sandbox,
}

/// Top-level CLI configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Falls back to KORBIT_* environment variables when absent
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = match self.environment {
            Environment::Production => ClientConfig::production(),
            Environment::Sandbox => ClientConfig::sandbox(),
        };
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(api_version) = &self.api_version {
            config = config.with_api_version(api_version.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }
        config
    }

    /// Credentials from the file, else from the environment.
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        match &self.credentials {
            Some(creds) => Ok(Credentials::new(
                creds.client_id.clone(),
                creds.client_secret.clone(),
                creds.username.clone(),
                creds.password.clone(),
            )),
            None => Credentials::from_env().context("read credentials from environment"),
        }
    }
}

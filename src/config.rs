use std::fmt;
use std::str::FromStr;

use vault_client::VaultClient;

use crate::error::{ConfigError, ServiceError};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8200;
pub const TOKEN_ENV: &str = "VAULT_TOKEN";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(ConfigError::UnsupportedScheme(s.to_string())),
        }
    }
}

/// Where the secret store lives and which token to present
#[derive(Clone, PartialEq, Eq)]
pub struct VaultConfig {
    host: String,
    port: u16,
    scheme: Scheme,
    token: Option<String>,
}

impl Default for VaultConfig {
    /// `http://localhost:8200`, token from `VAULT_TOKEN`
    fn default() -> Self {
        Self::from_env()
    }
}

impl VaultConfig {
    pub fn new(host: impl Into<String>, port: u16, scheme: Scheme, token: Option<String>) -> Self {
        Self {
            host: host.into(),
            port,
            scheme,
            token,
        }
    }

    /// Default endpoint with the token taken from `VAULT_TOKEN`.
    ///
    /// An unset variable is not an error: the client is simply unauthenticated.
    pub fn from_env() -> Self {
        Self::new(
            DEFAULT_HOST,
            DEFAULT_PORT,
            Scheme::Http,
            std::env::var(TOKEN_ENV).ok(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `scheme://host:port`, with IPv6 literals bracketed
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    /// A non-empty token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub async fn client(&self) -> Result<VaultClient, ServiceError> {
        let mut builder = VaultClient::builder()
            .base_url(self.endpoint())
            .application_name(USER_AGENT);

        if let Some(token) = self.token() {
            builder = builder.token(token);
        }

        builder.build().await.map_err(|source| ServiceError::Connect {
            endpoint: self.endpoint(),
            source,
        })
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

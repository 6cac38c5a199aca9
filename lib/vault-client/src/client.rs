use crate::auth::{AuthMethod, NoAuth, StaticTokenAuth};
use crate::error::VaultError;
use crate::models::VaultResponse;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Vault-Token";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct VaultClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    application_name: Option<String>,
    request_timeout: Duration,
}

impl Default for VaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
            application_name: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn resolve_config(&self) -> Result<ResolvedConfig, VaultError> {
        let raw = self
            .base_url
            .clone()
            .or_else(|| std::env::var("VAULT_ADDR").ok())
            .ok_or_else(|| VaultError::InvalidAddress {
                address: String::new(),
                reason: "no address given and VAULT_ADDR not set".to_string(),
            })?;

        let parsed = Url::parse(&raw).map_err(|e| VaultError::InvalidAddress {
            address: raw.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(VaultError::InvalidAddress {
                address: raw,
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(ResolvedConfig {
            base_url: raw.trim_end_matches('/').to_string(),
            token: self.token.clone(),
            application_name: self.application_name.clone(),
            request_timeout: self.request_timeout,
        })
    }

    pub async fn build(self) -> Result<VaultClient, VaultError> {
        let config = self.resolve_config()?;

        let auth_method: Box<dyn AuthMethod> = match config.token {
            Some(token) if !token.is_empty() => Box::new(StaticTokenAuth::new(token)),
            _ => Box::new(NoAuth),
        };

        let token = auth_method.authenticate(&config.base_url).await?;
        if token.is_none() {
            tracing::warn!(
                base_url = %config.base_url,
                "No Vault token configured, requests will be unauthenticated"
            );
        }

        let mut http = reqwest::Client::builder().timeout(config.request_timeout);
        if let Some(ref app_name) = config.application_name {
            http = http.user_agent(app_name.clone());
        }
        let http = http.build().map_err(VaultError::RequestError)?;

        tracing::debug!(
            base_url = %config.base_url,
            auth = auth_method.name(),
            "Vault client ready"
        );

        Ok(VaultClient {
            base_url: config.base_url,
            http,
            token,
        })
    }
}

struct ResolvedConfig {
    base_url: String,
    token: Option<String>,
    application_name: Option<String>,
    request_timeout: Duration,
}

pub struct VaultClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl VaultClient {
    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when requests carry a non-empty token
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Read the envelope at `path`. A missing path is `Ok(None)`.
    pub async fn read(&self, path: &str) -> Result<Option<VaultResponse>, VaultError> {
        tracing::debug!(path, "Vault read");
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(VaultError::RequestError)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::parse_response(response).await
    }

    /// Write `body` as JSON to `path`. Endpoints answering 204 give `Ok(None)`.
    pub async fn write<T>(&self, path: &str, body: &T) -> Result<Option<VaultResponse>, VaultError>
    where
        T: Serialize + ?Sized,
    {
        tracing::debug!(path, "Vault write");
        let response = self
            .request(Method::PUT, path)
            .json(body)
            .send()
            .await
            .map_err(VaultError::RequestError)?;

        Self::parse_response(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), VaultError> {
        tracing::debug!(path, "Vault delete");
        let response = self
            .request(Method::DELETE, path)
            .send()
            .await
            .map_err(VaultError::RequestError)?;

        if !response.status().is_success() {
            return Err(Self::client_error(response).await);
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.http.request(method, self.url(path));
        if let Some(ref token) = self.token {
            request = request.header(TOKEN_HEADER, token);
        }
        request
    }

    async fn parse_response(response: Response) -> Result<Option<VaultResponse>, VaultError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::client_error(response).await);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await.map_err(VaultError::RequestError)?;
        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn client_error(response: Response) -> VaultError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let response_data: Option<serde_json::Value> = serde_json::from_str(&body).ok();

        // Vault reports failures as {"errors": ["..."]}
        let errors = response_data
            .as_ref()
            .and_then(|v| v.get("errors"))
            .and_then(|v| v.as_array())
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .filter(|m| !m.is_empty());

        VaultError::ClientError {
            status,
            message: errors.unwrap_or(body),
            response_data,
        }
    }
}

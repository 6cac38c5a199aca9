use serde_json::{json, Map, Value};
use vault_client::{VaultClient, VaultResponse};

use crate::config::VaultConfig;
use crate::error::ServiceError;
use crate::util::is_valid_path;

/// Flat secret map stored under one path
pub type SecretData = Map<String, Value>;

pub const DEFAULT_MOUNT: &str = "secret";

/// KV v2 operations against one mount.
///
/// Built once per process and passed to whatever needs it.
pub struct VaultService {
    client: VaultClient,
    config: VaultConfig,
    mount: String,
}

impl VaultService {
    /// Service for the default configuration (`VAULT_TOKEN`, localhost:8200)
    pub async fn connect() -> Result<Self, ServiceError> {
        Self::new(VaultConfig::from_env()).await
    }

    pub async fn new(config: VaultConfig) -> Result<Self, ServiceError> {
        let client = config.client().await?;
        Ok(Self {
            client,
            config,
            mount: DEFAULT_MOUNT.to_string(),
        })
    }

    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into().trim_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn is_authenticated(&self) -> bool {
        self.config.is_authenticated()
    }

    /// Store a single `key = value` pair, replacing whatever the path held
    pub async fn write_secret(
        &self,
        secret_path: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<VaultResponse>, ServiceError> {
        let mut secrets = SecretData::new();
        secrets.insert(key.to_string(), Value::String(value.to_string()));
        self.write_secrets(secret_path, &secrets).await
    }

    pub async fn write_secrets(
        &self,
        secret_path: &str,
        secrets: &SecretData,
    ) -> Result<Option<VaultResponse>, ServiceError> {
        let data_path = self.data_path(secret_path)?;
        tracing::debug!(path = %data_path, keys = secrets.len(), "Writing secret");

        self.client
            .write(&data_path, &json!({ "data": secrets }))
            .await
            .map_err(|source| ServiceError::request("write", &data_path, source))
    }

    /// `None` when nothing is stored at the path
    pub async fn read_secret(
        &self,
        secret_path: &str,
    ) -> Result<Option<VaultResponse>, ServiceError> {
        let data_path = self.data_path(secret_path)?;
        tracing::debug!(path = %data_path, "Reading secret");

        self.client
            .read(&data_path)
            .await
            .map_err(|source| ServiceError::request("read", &data_path, source))
    }

    pub async fn delete_secret(&self, secret_path: &str) -> Result<(), ServiceError> {
        let data_path = self.data_path(secret_path)?;
        tracing::debug!(path = %data_path, "Deleting secret");

        self.client
            .delete(&data_path)
            .await
            .map_err(|source| ServiceError::request("delete", &data_path, source))
    }

    /// The nested `data.data` map of a KV v2 read, if there is one
    pub fn extract_secret_data(response: &VaultResponse) -> Option<SecretData> {
        response.data.as_ref()?.get("data")?.as_object().cloned()
    }

    fn data_path(&self, secret_path: &str) -> Result<String, ServiceError> {
        if !is_valid_path(secret_path) {
            return Err(ServiceError::InvalidPath {
                path: secret_path.to_string(),
            });
        }
        Ok(format!("{}/data/{}", self.mount, secret_path))
    }
}

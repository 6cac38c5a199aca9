use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response envelope returned by every logical endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultResponse {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub wrap_info: Option<Value>,
    #[serde(default)]
    pub auth: Option<Value>,
}

impl VaultResponse {
    /// Decode `data` as a KV v2 read payload (`{data, metadata}`)
    pub fn kv_data(&self) -> Option<KvData> {
        let data = self.data.clone()?;
        serde_json::from_value(Value::Object(data)).ok()
    }

    /// Decode `data` as KV v2 version metadata, which is what a write returns
    pub fn kv_version(&self) -> Option<KvVersion> {
        let data = self.data.clone()?;
        serde_json::from_value(Value::Object(data)).ok()
    }
}

/// KV v2 secret data with version metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Map<String, Value>,
    pub metadata: KvVersion,
}

/// Version information for a secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvVersion {
    pub version: u64,
    pub created_time: DateTime<Utc>,
    // Vault sends "" rather than null while the version is live
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub deletion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub destroyed: bool,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

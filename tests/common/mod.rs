// Shared by several test binaries, each uses a subset.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use vault_kv::{Scheme, VaultConfig};
use wiremock::matchers::{header, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "test-token";
const CREATED_TIME: &str = "2024-01-01T00:00:00.000000000Z";

/// In-memory KV v2 mount answering `secret/data/*` like Vault does
#[derive(Clone, Default)]
pub struct FakeKvStore {
    secrets: Arc<Mutex<HashMap<String, (Value, u64)>>>,
}

impl FakeKvStore {
    pub fn contains(&self, logical_path: &str) -> bool {
        self.secrets.lock().unwrap().contains_key(logical_path)
    }

    pub fn get(&self, logical_path: &str) -> Option<Value> {
        self.secrets
            .lock()
            .unwrap()
            .get(logical_path)
            .map(|(data, _)| data.clone())
    }
}

impl Respond for FakeKvStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let logical_path = request.url.path().trim_start_matches("/v1/").to_string();
        let mut secrets = self.secrets.lock().unwrap();

        match request.method.as_str() {
            "PUT" | "POST" => {
                let body: Value = match serde_json::from_slice(&request.body) {
                    Ok(body) => body,
                    Err(_) => {
                        return ResponseTemplate::new(400)
                            .set_body_json(json!({"errors": ["failed to parse JSON input"]}))
                    }
                };
                let version = secrets.get(&logical_path).map_or(1, |(_, v)| v + 1);
                secrets.insert(logical_path, (body["data"].clone(), version));

                ResponseTemplate::new(200).set_body_json(json!({
                    "request_id": format!("write-{}", version),
                    "lease_id": "",
                    "renewable": false,
                    "lease_duration": 0,
                    "data": {
                        "created_time": CREATED_TIME,
                        "custom_metadata": null,
                        "deletion_time": "",
                        "destroyed": false,
                        "version": version
                    }
                }))
            }
            "GET" => match secrets.get(&logical_path) {
                Some((data, version)) => ResponseTemplate::new(200).set_body_json(json!({
                    "request_id": "read",
                    "lease_id": "",
                    "renewable": false,
                    "lease_duration": 0,
                    "data": {
                        "data": data,
                        "metadata": {
                            "created_time": CREATED_TIME,
                            "custom_metadata": null,
                            "deletion_time": "",
                            "destroyed": false,
                            "version": version
                        }
                    },
                    "wrap_info": null,
                    "warnings": null,
                    "auth": null
                })),
                None => ResponseTemplate::new(404).set_body_json(json!({"errors": []})),
            },
            "DELETE" => {
                secrets.remove(&logical_path);
                ResponseTemplate::new(204)
            }
            _ => ResponseTemplate::new(405).set_body_json(json!({"errors": ["unsupported operation"]})),
        }
    }
}

/// Mock Vault with a KV v2 mount at `secret/`; requests without [`TOKEN`] get 403
pub async fn start_fake_vault() -> (MockServer, FakeKvStore) {
    let server = MockServer::start().await;
    let store = FakeKvStore::default();

    Mock::given(path_regex(r"^/v1/secret/data/.+"))
        .and(header("X-Vault-Token", TOKEN))
        .respond_with(store.clone())
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(path_regex(r"^/v1/"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"errors": ["permission denied"]})),
        )
        .with_priority(10)
        .mount(&server)
        .await;

    (server, store)
}

pub fn config_for(server: &MockServer, token: Option<&str>) -> VaultConfig {
    let address = server.address();
    VaultConfig::new(
        address.ip().to_string(),
        address.port(),
        Scheme::Http,
        token.map(str::to_string),
    )
}

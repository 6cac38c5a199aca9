// lib/vault-client/tests/integration_client.rs

use vault_client::{VaultClient, VaultError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn mock_vault_client(mock_uri: &str, token: &str) -> VaultClient {
    VaultClient::builder()
        .base_url(mock_uri)
        .token(token)
        .application_name("vault-client-tests")
        .build()
        .await
        .unwrap()
}

/// Helper to create a Vault KV2 read response in the expected format.
fn vault_kv2_response(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "request_id": "test-request-id",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": data,
            "metadata": {
                "created_time": "2024-01-01T00:00:00.000000000Z",
                "deletion_time": "",
                "destroyed": false,
                "version": 1,
                "custom_metadata": null
            }
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

#[tokio::test]
async fn test_read_returns_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/database/credentials"))
        .and(header("X-Vault-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_kv2_response(
            serde_json::json!({
                "username": "admin",
                "password": "secret123"
            }),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_vault_client(&mock_server.uri(), "test-token").await;

    let response = client
        .read("secret/data/database/credentials")
        .await
        .expect("read should succeed")
        .expect("secret should exist");

    assert_eq!(response.request_id, "test-request-id");
    let kv = response.kv_data().expect("should decode KV v2 payload");
    assert_eq!(kv.data["password"], serde_json::json!("secret123"));
    assert_eq!(kv.metadata.version, 1);
}

#[tokio::test]
async fn test_read_not_found_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/nonexistent/path"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "errors": []
        })))
        .mount(&mock_server)
        .await;

    let client = mock_vault_client(&mock_server.uri(), "test-token").await;
    let response = client.read("secret/data/nonexistent/path").await.unwrap();

    assert!(response.is_none());
}

#[tokio::test]
async fn test_write_sends_json_body_with_put() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/secret/data/app/config"))
        .and(header("X-Vault-Token", "test-token"))
        .and(body_json(serde_json::json!({"data": {"api_key": "abc"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "request_id": "write-id",
            "data": {
                "created_time": "2024-01-01T00:00:00.000000000Z",
                "deletion_time": "",
                "destroyed": false,
                "version": 7
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_vault_client(&mock_server.uri(), "test-token").await;
    let response = client
        .write(
            "secret/data/app/config",
            &serde_json::json!({"data": {"api_key": "abc"}}),
        )
        .await
        .unwrap()
        .expect("write should return metadata");

    assert_eq!(response.kv_version().unwrap().version, 7);
}

#[tokio::test]
async fn test_write_no_content_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/secret/legacy"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = mock_vault_client(&mock_server.uri(), "test-token").await;
    let response = client
        .write("secret/legacy", &serde_json::json!({"k": "v"}))
        .await
        .unwrap();

    assert!(response.is_none());
}

#[tokio::test]
async fn test_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/secret/data/app/config"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_vault_client(&mock_server.uri(), "test-token").await;
    client.delete("secret/data/app/config").await.unwrap();
}

#[tokio::test]
async fn test_permission_denied_maps_to_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/locked"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errors": ["permission denied"]
        })))
        .mount(&mock_server)
        .await;

    let client = mock_vault_client(&mock_server.uri(), "bad-token").await;
    let err = client.read("secret/data/locked").await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    match err {
        VaultError::ClientError {
            message,
            response_data,
            ..
        } => {
            assert_eq!(message, "permission denied");
            assert!(response_data.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_anonymous_client_sends_no_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/public"))
        .and(|req: &Request| !req.headers.contains_key("x-vault-token"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errors": ["missing client token"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VaultClient::builder()
        .base_url(mock_server.uri())
        .build()
        .await
        .unwrap();

    assert!(!client.is_authenticated());
    let err = client.read("secret/data/public").await.unwrap_err();
    assert!(err.to_string().contains("missing client token"));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    // Nothing listens on port 9 locally
    let client = mock_vault_client("http://127.0.0.1:9", "test-token").await;
    let err = client.read("secret/data/anything").await.unwrap_err();
    assert!(matches!(err, VaultError::RequestError(_)));

    // the transport error is the source, not repeated in the message
    assert_eq!(err.to_string(), "Vault request error");
    let source = std::error::Error::source(&err).expect("transport error as source");
    assert!(!source.to_string().is_empty());
}

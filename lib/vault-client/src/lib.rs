//! vault-client - thin async client for HashiCorp Vault's logical API
//!
//! Every call addresses a logical path (`secret/data/app/db`) and returns the
//! raw response envelope, leaving KV v2 interpretation to the caller:
//! 1. `read`   → `GET /v1/{path}`, 404 is `Ok(None)`
//! 2. `write`  → `PUT /v1/{path}`, 204 is `Ok(None)`
//! 3. `delete` → `DELETE /v1/{path}`
//!
//! Authentication is a static `X-Vault-Token`. A missing token yields an
//! unauthenticated client rather than a construction error.

mod auth;
mod client;
mod error;
mod models;

pub use auth::{AuthMethod, NoAuth, StaticTokenAuth};
pub use client::{VaultClient, VaultClientBuilder};
pub use error::VaultError;
pub use models::{KvData, KvVersion, VaultResponse};

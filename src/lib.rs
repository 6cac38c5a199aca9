//! vault-kv - write, read and delete HashiCorp Vault KV v2 secrets
//!
//! A thin layer over `vault-client`: a connection descriptor
//! ([`VaultConfig`]), a service bound to one mount ([`VaultService`]) and the
//! command dispatch used by the `vault-kv` binary ([`Command`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod example;
pub mod service;
pub mod util;

pub use cli::{Command, Mode, USAGE};
pub use config::{Scheme, VaultConfig};
pub use error::{ConfigError, ServiceError, UsageError};
pub use service::{SecretData, VaultService};

mod token;

pub use token::{NoAuth, StaticTokenAuth};

use crate::VaultError;
use async_trait::async_trait;

/// Trait for authentication methods
#[async_trait]
pub trait AuthMethod: Send + Sync {
    /// Resolve the token sent as `X-Vault-Token`.
    ///
    /// `None` means requests go out without a token and Vault decides what
    /// an anonymous caller may do (usually nothing).
    async fn authenticate(&self, base_url: &str) -> Result<Option<String>, VaultError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

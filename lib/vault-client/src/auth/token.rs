use super::AuthMethod;
use crate::VaultError;
use async_trait::async_trait;

/// Static token authentication
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthMethod for StaticTokenAuth {
    async fn authenticate(&self, _base_url: &str) -> Result<Option<String>, VaultError> {
        if self.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.token.clone()))
    }

    fn name(&self) -> &'static str {
        "token"
    }
}

/// No credentials at all
pub struct NoAuth;

#[async_trait]
impl AuthMethod for NoAuth {
    async fn authenticate(&self, _base_url: &str) -> Result<Option<String>, VaultError> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

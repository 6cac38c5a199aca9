use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Invalid Vault address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Vault client error ({status}): {message}")]
    ClientError {
        status: u16,
        message: String,
        response_data: Option<serde_json::Value>,
    },

    #[error("Vault request error")]
    RequestError(#[source] reqwest::Error),

    #[error("Invalid Vault response")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// HTTP status reported by Vault, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ClientError { status, .. } => Some(*status),
            Self::RequestError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

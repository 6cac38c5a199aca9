use thiserror::Error;
use vault_client::VaultError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid secret path {path:?}")]
    InvalidPath { path: String },

    #[error("Failed to build Vault client for {endpoint}")]
    Connect {
        endpoint: String,
        #[source]
        source: VaultError,
    },

    #[error("Vault {operation} failed at {path}")]
    Request {
        operation: &'static str,
        path: String,
        #[source]
        source: VaultError,
    },
}

impl ServiceError {
    pub(crate) fn request(operation: &'static str, path: &str, source: VaultError) -> Self {
        Self::Request {
            operation,
            path: path.to_string(),
            source,
        }
    }

    /// HTTP status returned by Vault, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { source, .. } | Self::Connect { source, .. } => source.status(),
            Self::InvalidPath { .. } => None,
        }
    }
}

/// Malformed command line. Always exits with status 1.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Insufficient arguments inputted. Please include the method name AND secret path.")]
    MissingModeOrPath,

    #[error("Insufficient arguments inputted. Please include the secret key AND value.")]
    MissingKeyValue,

    #[error("Too many arguments. Please only include the secret path.")]
    TooManyArguments,

    #[error("Please input one of the valid methods: write_secret OR read_secret OR delete_secret")]
    UnknownMode(String),
}

impl UsageError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

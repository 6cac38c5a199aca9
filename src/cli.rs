use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde_json::{Map, Value};
use struct_log::LevelFilter;

use crate::error::{ServiceError, UsageError};
use crate::service::VaultService;

pub const USAGE: &str = "\nUsage:
  write_secret <path> <key> <value>  - Write a secret to Vault
  read_secret <path>                 - Read a secret from Vault
  delete_secret <path>               - Delete a secret from Vault

Example:
  vault-kv write_secret my/secret/path myKey myValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    WriteSecret,
    ReadSecret,
    DeleteSecret,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WriteSecret => "write_secret",
            Self::ReadSecret => "read_secret",
            Self::DeleteSecret => "delete_secret",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "write_secret" => Ok(Self::WriteSecret),
            "read_secret" => Ok(Self::ReadSecret),
            "delete_secret" => Ok(Self::DeleteSecret),
            other => Err(UsageError::UnknownMode(other.to_string())),
        }
    }
}

/// One invocation: `mode path [key value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    WriteSecret {
        path: String,
        key: String,
        value: String,
    },
    ReadSecret {
        path: String,
    },
    DeleteSecret {
        path: String,
    },
}

impl Command {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        if args.len() < 2 {
            return Err(UsageError::MissingModeOrPath);
        }

        let path = args[1].to_string();
        match args[0].parse::<Mode>()? {
            Mode::WriteSecret => {
                if args.len() < 4 {
                    return Err(UsageError::MissingKeyValue);
                }
                if args.len() > 4 {
                    tracing::warn!(ignored = ?&args[4..], "Ignoring extra arguments after value");
                }
                Ok(Self::WriteSecret {
                    path,
                    key: args[2].to_string(),
                    value: args[3].to_string(),
                })
            }
            Mode::ReadSecret if args.len() > 2 => Err(UsageError::TooManyArguments),
            Mode::ReadSecret => Ok(Self::ReadSecret { path }),
            Mode::DeleteSecret if args.len() > 2 => Err(UsageError::TooManyArguments),
            Mode::DeleteSecret => Ok(Self::DeleteSecret { path }),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::WriteSecret { .. } => Mode::WriteSecret,
            Self::ReadSecret { .. } => Mode::ReadSecret,
            Self::DeleteSecret { .. } => Mode::DeleteSecret,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::WriteSecret { path, .. }
            | Self::ReadSecret { path }
            | Self::DeleteSecret { path } => path,
        }
    }

    /// Run against the store and print the outcome to `out`.
    ///
    /// Store failures are logged and swallowed; only a failing `out` is an error.
    pub async fn execute<W: Write>(&self, service: &VaultService, out: &mut W) -> io::Result<()> {
        match self {
            Self::WriteSecret { path, key, value } => {
                match service.write_secret(path, key, value).await {
                    Ok(Some(response)) if response.data.is_some() => {
                        writeln!(out, "Write response: {}", render(response.data.as_ref()))
                    }
                    Ok(_) => writeln!(out, "No response data"),
                    Err(e) => {
                        report_failure("Error writing secret", path, e);
                        Ok(())
                    }
                }
            }
            Self::ReadSecret { path } => match service.read_secret(path).await {
                Ok(Some(response)) => {
                    match VaultService::extract_secret_data(&response) {
                        Some(data) => writeln!(out, "Secret data: {}", render(Some(&data)))?,
                        None => writeln!(out, "No secret data found at path: {}", path)?,
                    }
                    writeln!(out, "Full response: {}", render(response.data.as_ref()))
                }
                Ok(None) => writeln!(out, "No secret found at path: {}", path),
                Err(e) => {
                    report_failure("Error reading secret", path, e);
                    Ok(())
                }
            },
            Self::DeleteSecret { path } => match service.delete_secret(path).await {
                Ok(()) => writeln!(out, "Secret at path {} deleted successfully.", path),
                Err(e) => {
                    report_failure("Error deleting secret", path, e);
                    Ok(())
                }
            },
        }
    }
}

fn render(data: Option<&Map<String, Value>>) -> String {
    match data {
        Some(map) => serde_json::to_string(map).unwrap_or_default(),
        None => "null".to_string(),
    }
}

/// Log a failed store call with its whole cause chain
pub fn report_failure(context: &str, path: &str, error: ServiceError) {
    let status = error.status();
    let error = anyhow::Error::new(error);
    tracing::error!(
        path,
        status,
        cause = %format!("{:#}", error),
        "{}: {}",
        context,
        error
    );
    tracing::debug!("{:?}", error);
}

/// `-v` count to the default log level
pub fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

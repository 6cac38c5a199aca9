//! Guided walkthrough of the service API, run by the `vault-api-example` binary.
//!
//! Each step reports its own store failures and the walkthrough carries on;
//! only an unauthenticated client or a broken output stops it.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::cli::report_failure;
use crate::config::VaultConfig;
use crate::error::ServiceError;
use crate::service::{SecretData, VaultService};
use crate::util::{parse_key_value_string, prompt_for_secrets, write_formatted_secret_data};

const MULTIPLE_SECRETS: &str =
    "username=admin,password=secret123,api_key=abcd1234,environment=development";

#[derive(Debug, Error)]
pub enum ExampleError {
    #[error("Authentication failed. Please check your VAULT_TOKEN.")]
    Unauthenticated,

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub struct ExampleOptions {
    /// Second configuration exercised by the custom-configuration step
    pub custom: VaultConfig,
    /// Prompt for extra secrets on stdin
    pub interactive: bool,
}

pub async fn run_examples<R, W>(
    service: &VaultService,
    options: &ExampleOptions,
    input: R,
    out: &mut W,
) -> Result<(), ExampleError>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "Vault KV API Example")?;
    writeln!(out, "====================")?;

    basic_initialization(service, out)?;
    swallow("single secret example", single_secret(service, out).await)?;
    swallow("multiple secrets example", multiple_secrets(service, out).await)?;
    swallow("delete secret example", delete_secret(service, out).await)?;
    swallow("custom config example", custom_config(&options.custom, out).await)?;
    if options.interactive {
        swallow("interactive example", interactive(service, input, out).await)?;
    }

    writeln!(out, "\nAll examples completed successfully!")?;
    Ok(())
}

fn swallow(step: &str, result: Result<(), ExampleError>) -> Result<(), ExampleError> {
    match result {
        Err(ExampleError::Service(e)) => {
            let path = match &e {
                ServiceError::Request { path, .. } => path.clone(),
                ServiceError::InvalidPath { path } => path.clone(),
                ServiceError::Connect { endpoint, .. } => endpoint.clone(),
            };
            report_failure(&format!("Error in {}", step), &path, e);
            Ok(())
        }
        other => other,
    }
}

fn header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", title)?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

fn basic_initialization<W: Write>(service: &VaultService, out: &mut W) -> Result<(), ExampleError> {
    header(out, "Example 1: Basic Initialization")?;

    let authenticated = service.is_authenticated();
    writeln!(out, "Is authenticated: {}", authenticated)?;
    if !authenticated {
        return Err(ExampleError::Unauthenticated);
    }
    Ok(())
}

async fn single_secret<W: Write>(service: &VaultService, out: &mut W) -> Result<(), ExampleError> {
    header(out, "Example 2: Single Secret")?;

    let (path, key, value) = ("example/single", "username", "admin");
    writeln!(out, "Writing secret: {}={} to path: {}", key, value, path)?;
    let written = service.write_secret(path, key, value).await?;
    print_write_response(out, written.as_ref())?;

    writeln!(out, "\nReading secret from path: {}", path)?;
    let response = service.read_secret(path).await?;
    write_formatted_secret_data(out, response.as_ref())?;
    Ok(())
}

async fn multiple_secrets<W: Write>(
    service: &VaultService,
    out: &mut W,
) -> Result<(), ExampleError> {
    header(out, "Example 3: Multiple Secrets")?;

    let path = "example/multiple";
    let secrets = parse_key_value_string(MULTIPLE_SECRETS);
    writeln!(out, "Writing {} secrets to path: {}", secrets.len(), path)?;
    let written = service.write_secrets(path, &secrets).await?;
    print_write_response(out, written.as_ref())?;

    writeln!(out, "\nReading secrets from path: {}", path)?;
    let response = service.read_secret(path).await?;
    write_formatted_secret_data(out, response.as_ref())?;
    Ok(())
}

async fn delete_secret<W: Write>(service: &VaultService, out: &mut W) -> Result<(), ExampleError> {
    header(out, "Example 4: Deleting Secrets")?;

    let path = "example/to-delete";
    writeln!(out, "Writing a test secret to path: {}", path)?;
    let mut secrets = SecretData::new();
    secrets.insert("test_key".into(), "test_value".into());
    service.write_secrets(path, &secrets).await?;

    writeln!(out, "Verifying secret exists at path: {}", path)?;
    if let Some(response) = service.read_secret(path).await? {
        let data = VaultService::extract_secret_data(&response).unwrap_or_default();
        writeln!(out, "Secret exists. Data: {}", serde_json::Value::Object(data))?;
    }

    writeln!(out, "Deleting secret at path: {}", path)?;
    service.delete_secret(path).await?;
    writeln!(out, "Secret deleted successfully")?;

    writeln!(out, "Verifying secret is deleted from path: {}", path)?;
    match service.read_secret(path).await {
        Ok(None) => writeln!(out, "Secret successfully deleted")?,
        Ok(Some(response)) if VaultService::extract_secret_data(&response).is_none() => {
            writeln!(out, "Secret successfully deleted")?
        }
        Ok(Some(_)) => writeln!(
            out,
            "Secret still exists (this might happen if using Vault with versioning)"
        )?,
        Err(e) => writeln!(out, "Secret successfully deleted (verified by error: {})", e)?,
    }
    Ok(())
}

async fn custom_config<W: Write>(config: &VaultConfig, out: &mut W) -> Result<(), ExampleError> {
    header(out, "Example 5: Custom Vault Configuration")?;

    writeln!(out, "Creating custom Vault configuration:")?;
    writeln!(out, "Host: {}", config.host())?;
    writeln!(out, "Port: {}", config.port())?;
    writeln!(out, "Scheme: {}", config.scheme())?;

    let service = VaultService::new(config.clone()).await?;
    let authenticated = service.is_authenticated();
    writeln!(out, "Is authenticated with custom config: {}", authenticated)?;
    if !authenticated {
        return Ok(());
    }

    let path = "example/custom-config";
    let mut secrets = SecretData::new();
    secrets.insert("custom_key".into(), "custom_value".into());

    writeln!(out, "Writing secret with custom config to path: {}", path)?;
    service.write_secrets(path, &secrets).await?;

    writeln!(out, "Reading secret with custom config from path: {}", path)?;
    let response = service.read_secret(path).await?;
    write_formatted_secret_data(out, response.as_ref())?;
    Ok(())
}

async fn interactive<R, W>(service: &VaultService, input: R, out: &mut W) -> Result<(), ExampleError>
where
    R: BufRead,
    W: Write,
{
    header(out, "Example 6: Interactive Secrets")?;

    let secrets = prompt_for_secrets(input, out)?;
    if secrets.is_empty() {
        writeln!(out, "No secrets entered, nothing to write")?;
        return Ok(());
    }

    let path = "example/interactive";
    writeln!(out, "Writing {} secrets to path: {}", secrets.len(), path)?;
    service.write_secrets(path, &secrets).await?;

    let response = service.read_secret(path).await?;
    write_formatted_secret_data(out, response.as_ref())?;
    Ok(())
}

fn print_write_response<W: Write>(
    out: &mut W,
    response: Option<&vault_client::VaultResponse>,
) -> io::Result<()> {
    match response.and_then(|r| r.data.as_ref()) {
        Some(data) => writeln!(
            out,
            "Write response: {}",
            serde_json::to_string(data).unwrap_or_default()
        ),
        None => writeln!(out, "Write response: none"),
    }
}

#![warn(rust_2018_idioms)]

use std::io;
use std::process::ExitCode;

use clap::Parser;

use vault_kv::cli::log_level;
use vault_kv::config::{DEFAULT_HOST, DEFAULT_PORT, TOKEN_ENV};
use vault_kv::example::{run_examples, ExampleError, ExampleOptions};
use vault_kv::service::DEFAULT_MOUNT;
use vault_kv::{Scheme, VaultConfig, VaultService};

/// Walk through the vault-kv API against a live Vault server.
#[derive(Debug, Parser)]
#[command(name = "vault-api-example", version)]
struct Cli {
    /// Vault server host.
    #[arg(long, env = "VAULT_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Vault server port.
    #[arg(long, env = "VAULT_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Connection scheme.
    #[arg(long, env = "VAULT_SCHEME", value_enum, default_value_t = Scheme::Http)]
    scheme: Scheme,

    /// Host used by the custom configuration step.
    #[arg(long, default_value = DEFAULT_HOST)]
    custom_host: String,

    /// Port used by the custom configuration step.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    custom_port: u16,

    /// Scheme used by the custom configuration step.
    #[arg(long, value_enum, default_value_t = Scheme::Http)]
    custom_scheme: Scheme,

    /// KV v2 mount point.
    #[arg(long, env = "VAULT_MOUNT", default_value = DEFAULT_MOUNT)]
    mount: String,

    /// Prompt for extra secrets on stdin at the end.
    #[arg(long)]
    interactive: bool,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match struct_log::setup_logger(
        env!("CARGO_BIN_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
        log_level(cli.verbose),
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
    let Some(token) = token else {
        eprintln!("Error: {} environment variable is not set", TOKEN_ENV);
        eprintln!("Please set it using: export {}=your-vault-token", TOKEN_ENV);
        return ExitCode::from(1);
    };

    let config = VaultConfig::new(cli.host, cli.port, cli.scheme, Some(token.clone()));
    let service = match VaultService::new(config).await {
        Ok(service) => service.with_mount(cli.mount),
        Err(e) => {
            let e = anyhow::Error::new(e);
            tracing::error!(cause = %format!("{:#}", e), "{}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = ExampleOptions {
        custom: VaultConfig::new(cli.custom_host, cli.custom_port, cli.custom_scheme, Some(token)),
        interactive: cli.interactive,
    };

    match run_examples(&service, &options, io::stdin().lock(), &mut io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ ExampleError::Unauthenticated) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

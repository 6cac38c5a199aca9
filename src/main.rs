#![warn(rust_2018_idioms)]

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use vault_kv::cli::log_level;
use vault_kv::config::{DEFAULT_HOST, DEFAULT_PORT};
use vault_kv::service::DEFAULT_MOUNT;
use vault_kv::{Command, Scheme, VaultConfig, VaultService, USAGE};

/// Write, read and delete secrets in Vault's KV v2 engine with a static token.
#[derive(Debug, Parser)]
#[command(name = "vault-kv", version, after_help = USAGE)]
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

    /// Authentication token. Without one the client is unauthenticated.
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// KV v2 mount point.
    #[arg(long, env = "VAULT_MOUNT", default_value = DEFAULT_MOUNT)]
    mount: String,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// `mode path [key value]`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match struct_log::setup_logger(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
        log_level(cli.verbose),
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(cause = %format!("{:#}", e), "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = VaultConfig::new(cli.host, cli.port, cli.scheme, cli.token);
    let service = VaultService::new(config)
        .await
        .context("Failed to initialize Vault service")?
        .with_mount(cli.mount);

    println!("Is client authenticated: {}", service.is_authenticated());

    let command = match Command::parse(&cli.args) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            println!("{}", USAGE);
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    tracing::info!(mode = %command.mode(), path = command.path(), "Dispatching command");
    command
        .execute(&service, &mut io::stdout())
        .await
        .context("Failed to write command output")?;

    Ok(ExitCode::SUCCESS)
}

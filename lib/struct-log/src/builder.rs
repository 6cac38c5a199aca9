use std::env;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::error::SetupError;
use crate::formatting_layer::JsonLogLayer;
use crate::storage::StorageLayer;

/// Builder for the process logger.
///
/// Everything is written to stderr: stdout belongs to the command output.
pub struct StructLogBuilder {
    application: String,
    version: String,
    hostname: Option<String>,
    json_enabled: bool,
    default_level: LevelFilter,
}

impl StructLogBuilder {
    /// Create a new builder with required application name and version
    pub fn new(application: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            version: version.into(),
            hostname: None,
            json_enabled: false,
            default_level: LevelFilter::WARN,
        }
    }

    /// Set a custom hostname (defaults to system hostname)
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Enable or disable JSON output (defaults to false)
    pub fn json_enabled(mut self, enabled: bool) -> Self {
        self.json_enabled = enabled;
        self
    }

    /// Read JSON_LOG env var to determine if JSON should be enabled
    pub fn json_from_env(mut self) -> Self {
        self.json_enabled = env::var("JSON_LOG").is_ok_and(|s| s.parse().unwrap_or_default());
        self
    }

    /// Level used when `RUST_LOG` is not set
    pub fn default_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    fn env_filter(&self) -> (EnvFilter, Option<(String, String)>) {
        self.filter_from(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
    }

    /// Bad directives are dropped rather than failing setup; the rejected
    /// input and the parse error are handed back so they can be logged.
    fn filter_from(&self, directives: Option<&str>) -> (EnvFilter, Option<(String, String)>) {
        let builder = EnvFilter::builder().with_default_directive(self.default_level.into());
        let Some(directives) = directives else {
            return (builder.parse_lossy(""), None);
        };
        match builder.parse(directives) {
            Ok(filter) => (filter, None),
            Err(e) => (
                builder.parse_lossy(directives),
                Some((directives.to_string(), e.to_string())),
            ),
        }
    }

    /// Initialize the logger with the configured settings
    pub fn init(self) -> Result<Option<WorkerGuard>, SetupError> {
        let (filter, rejected) = self.env_filter();

        // reqwest logs through the `log` crate
        LogTracer::init().map_err(|_| SetupError::LogTracerAlreadyInitialized)?;

        let guard = if self.json_enabled {
            let (non_blocking, guard) = tracing_appender::non_blocking(io::stderr());

            let layer = match self.hostname {
                Some(hostname) => JsonLogLayer::with_hostname(
                    self.application,
                    self.version,
                    hostname,
                    non_blocking,
                ),
                None => JsonLogLayer::new(self.application, self.version, non_blocking),
            };

            let subscriber = Registry::default()
                .with(filter)
                .with(StorageLayer)
                .with(layer);

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|_| SetupError::SubscriberAlreadySet)?;
            Some(guard)
        } else {
            tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_env_filter(filter)
                .try_init()
                .map_err(|_| SetupError::SubscriberAlreadySet)?;
            None
        };

        if let Some((directives, reason)) = rejected {
            tracing::warn!(%directives, %reason, "Ignoring invalid RUST_LOG directives");
        }

        Ok(guard)
    }
}

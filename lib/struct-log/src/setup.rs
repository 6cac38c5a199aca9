use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;

use crate::builder::StructLogBuilder;
use crate::error::SetupError;

/// One-call setup: `JSON_LOG` decides the format, `RUST_LOG` overrides `level`.
///
/// Keep the returned guard alive until exit, dropping it flushes buffered
/// JSON lines.
pub fn setup_logger(
    application_name: String,
    version: String,
    level: LevelFilter,
) -> Result<Option<WorkerGuard>, SetupError> {
    StructLogBuilder::new(application_name, version)
        .json_from_env()
        .default_level(level)
        .init()
}

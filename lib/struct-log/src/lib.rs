mod builder;
mod error;
mod formatting_layer;
mod setup;
mod storage;

pub use builder::StructLogBuilder;
pub use error::SetupError;
pub use formatting_layer::JsonLogLayer;
pub use setup::setup_logger;
pub use storage::{SpanFieldsStorage, StorageLayer};
pub use tracing_appender::non_blocking::WorkerGuard;
pub use tracing_subscriber::filter::LevelFilter;

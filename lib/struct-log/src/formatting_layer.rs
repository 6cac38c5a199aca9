use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;
use std::io::Write;
use time::format_description::well_known::Rfc3339;
use tracing::{Event, Subscriber};
use tracing_bunyan_formatter::JsonStorage;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::storage::SpanFieldsStorage;

/// Emits one JSON object per event, newline terminated.
pub struct JsonLogLayer<W: for<'a> MakeWriter<'a> + 'static> {
    make_writer: W,
    hostname: String,
    version: String,
    application: String,
}

const DATE: &str = "date";
const RUNTIME: &str = "runtime";
const APPLICATION: &str = "application";
const LEVEL: &str = "level";
const HOSTNAME: &str = "hostname";
const MESSAGE: &str = "message";
const LOGGER: &str = "logger";
const LINENO: &str = "lineno";
const FILE: &str = "file";
const VERSION: &str = "version";
const SPAN: &str = "span";

const RESERVED_FIELDS: [&str; 11] = [
    DATE,
    RUNTIME,
    APPLICATION,
    LEVEL,
    HOSTNAME,
    MESSAGE,
    LOGGER,
    LINENO,
    FILE,
    VERSION,
    SPAN,
];

impl<W: for<'a> MakeWriter<'a> + 'static> JsonLogLayer<W> {
    pub fn new(application: String, version: String, make_writer: W) -> Self {
        let hostname = gethostname::gethostname().to_string_lossy().into_owned();
        Self::with_hostname(application, version, hostname, make_writer)
    }

    pub fn with_hostname(
        application: String,
        version: String,
        hostname: String,
        make_writer: W,
    ) -> Self {
        Self {
            make_writer,
            application,
            version,
            hostname,
        }
    }

    fn serialize_core_fields(
        &self,
        map_serializer: &mut impl SerializeMap<Error = serde_json::Error>,
        message: &str,
        event: &Event<'_>,
    ) -> Result<(), std::io::Error> {
        map_serializer.serialize_entry(RUNTIME, "rust")?;
        map_serializer.serialize_entry(APPLICATION, &self.application)?;
        map_serializer.serialize_entry(VERSION, &self.version)?;
        map_serializer.serialize_entry(HOSTNAME, &self.hostname)?;
        if let Ok(date) = &time::OffsetDateTime::now_utc().format(&Rfc3339) {
            map_serializer.serialize_entry(DATE, date)?;
        }
        map_serializer.serialize_entry(
            LEVEL,
            &event.metadata().level().to_string().to_lowercase(),
        )?;
        map_serializer.serialize_entry(LOGGER, event.metadata().target())?;
        map_serializer.serialize_entry(LINENO, &event.metadata().line())?;
        map_serializer.serialize_entry(FILE, &event.metadata().file())?;
        map_serializer.serialize_entry(MESSAGE, &message)?;
        Ok(())
    }

    fn emit(&self, mut buffer: Vec<u8>) -> Result<(), std::io::Error> {
        buffer.write_all(b"\n")?;
        self.make_writer.make_writer().write_all(&buffer)
    }
}

impl<S, W> Layer<S> for JsonLogLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut event_visitor = JsonStorage::default();
        let current_span = ctx.lookup_current();
        event.record(&mut event_visitor);

        let format = || {
            let mut buffer = Vec::new();

            let mut serializer = serde_json::Serializer::new(&mut buffer);
            let mut map_serializer = serializer.serialize_map(None)?;

            let message = format_event_message(event, &event_visitor);
            self.serialize_core_fields(&mut map_serializer, &message, event)?;

            // Event fields first, the message was already written above.
            for (key, value) in event_visitor.values() {
                if !RESERVED_FIELDS.contains(key) {
                    map_serializer.serialize_entry(key, value)?;
                }
            }

            // Span fields never shadow event fields.
            if let Some(span) = &current_span {
                map_serializer.serialize_entry(SPAN, span.name())?;
                let extensions = span.extensions();
                if let Some(storage) = extensions.get::<SpanFieldsStorage>() {
                    for (key, value) in storage.values() {
                        if !RESERVED_FIELDS.contains(key)
                            && !event_visitor.values().contains_key(*key)
                        {
                            map_serializer.serialize_entry(key, value)?;
                        }
                    }
                }
            }

            map_serializer.end()?;
            Ok(buffer)
        };

        let result: std::io::Result<Vec<u8>> = format();
        if let Ok(formatted) = result {
            let _ = self.emit(formatted);
        }
    }
}

fn format_event_message(event: &Event<'_>, event_visitor: &JsonStorage<'_>) -> String {
    // Fall back to the target when the event carries no message.
    event_visitor
        .values()
        .get(MESSAGE)
        .and_then(|v| match v {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        })
        .unwrap_or_else(|| event.metadata().target())
        .to_owned()
}

//! Structured JSON logging.
//!
//! # Responsibilities
//! - Install the process-wide subscriber exactly once
//! - Render every log event as a single JSON line on stdout
//! - Stamp each line with the enclosing span's trace/span ids
//!
//! # Design Decisions
//! - Fixed record schema (source location, level, process/thread identity,
//!   trace correlation fields); absent fields are omitted, never null
//! - Structured event fields pass through as additional JSON keys
//! - A serialization failure is a programming error, not a runtime
//!   condition; it surfaces as `fmt::Error`

use std::fmt::{self, Write as _};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::schema::LoggingConfig;
use crate::observability::tracing::{TraceContext, TraceContextLayer};

/// Install the process-wide subscriber: env filter, trace-context layer,
/// and the JSON formatter writing to stdout.
///
/// Logging is process-global state. Subsequent calls are no-ops, so the
/// binary and tests can both call this safely.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(TraceContextLayer)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(JsonFormatter::new(&config.service_name)),
        )
        .try_init();
}

/// Renders one log event as a single JSON line.
pub struct JsonFormatter {
    service: String,
    pid: u32,
    process_name: Option<String>,
}

impl JsonFormatter {
    pub fn new(service: &str) -> Self {
        let process_name = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()));
        Self {
            service: service.to_string(),
            pid: std::process::id(),
            process_name,
        }
    }
}

/// Numeric severity for the `levelno` field.
fn numeric_level(level: &Level) -> u64 {
    if *level == Level::ERROR {
        40
    } else if *level == Level::WARN {
        30
    } else if *level == Level::INFO {
        20
    } else if *level == Level::DEBUG {
        10
    } else {
        5
    }
}

/// Collects the message and any structured fields off an event.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), Value::Bool(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(format!("{value:?}")));
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = Map::new();
        record.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        record.insert(
            "levelname".to_string(),
            Value::String(meta.level().to_string()),
        );
        record.insert(
            "levelno".to_string(),
            Value::Number(numeric_level(meta.level()).into()),
        );
        record.insert("name".to_string(), Value::String(meta.target().to_string()));
        if let Some(module) = meta.module_path() {
            record.insert("module".to_string(), Value::String(module.to_string()));
        }
        if let Some(path) = meta.file() {
            record.insert("pathname".to_string(), Value::String(path.to_string()));
            let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
            record.insert("filename".to_string(), Value::String(file.to_string()));
        }
        record.insert(
            "message".to_string(),
            Value::String(visitor.message.unwrap_or_default()),
        );
        record.insert(
            "process".to_string(),
            Value::Number(Number::from(self.pid)),
        );
        if let Some(name) = &self.process_name {
            record.insert("processName".to_string(), Value::String(name.clone()));
        }
        if let Some(name) = std::thread::current().name() {
            record.insert("threadName".to_string(), Value::String(name.to_string()));
        }

        // Trace correlation fields, present only when the event fired
        // inside a span.
        if let Some(span) = ctx.event_scope().and_then(|mut scope| scope.next()) {
            if let Some(context) = span.extensions().get::<TraceContext>().copied() {
                record.insert(
                    "otelSpanID".to_string(),
                    Value::String(context.span_id_hex()),
                );
                record.insert(
                    "otelTraceID".to_string(),
                    Value::String(context.trace_id_hex()),
                );
                record.insert(
                    "otelTraceSampled".to_string(),
                    Value::Bool(context.sampled),
                );
            }
        }
        record.insert(
            "otelServiceName".to_string(),
            Value::String(self.service.clone()),
        );

        // Structured event fields ride along; record fields win on collision.
        for (key, value) in visitor.fields {
            record.entry(key).or_insert(value);
        }

        let line = serde_json::to_string(&Value::Object(record)).map_err(|_| fmt::Error)?;
        writer.write_str(&line)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// In-memory writer so tests can parse what the formatter emitted.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn lines(&self) -> Vec<Value> {
            let buffer = self.0.lock().unwrap();
            String::from_utf8(buffer.clone())
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn run_with_formatter(f: impl FnOnce()) -> Capture {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry()
            .with(TraceContextLayer)
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(JsonFormatter::new("test-service"))
                    .with_writer(capture.clone()),
            );
        tracing::subscriber::with_default(subscriber, f);
        capture
    }

    #[test]
    fn test_event_renders_fixed_fields() {
        let capture = run_with_formatter(|| {
            tracing::info!("Hello, world!");
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        let record = &lines[0];
        assert_eq!(record["levelname"], "INFO");
        assert_eq!(record["levelno"], 20);
        assert_eq!(record["message"], "Hello, world!");
        assert_eq!(record["otelServiceName"], "test-service");
        assert_eq!(record["process"], std::process::id());
        assert_eq!(record["filename"], "logging.rs");
        assert!(record["timestamp"].is_string());
        // No span active, so the correlation fields are omitted.
        assert!(record.get("otelSpanID").is_none());
        assert!(record.get("otelTraceID").is_none());
        assert!(record.get("otelTraceSampled").is_none());
    }

    #[test]
    fn test_event_inside_span_carries_trace_ids() {
        let capture = run_with_formatter(|| {
            let span = tracing::info_span!("root", foo = "bar");
            let _guard = span.enter();
            tracing::info!("inside");
        });

        let record = &capture.lines()[0];
        assert_eq!(record["otelTraceID"].as_str().unwrap().len(), 32);
        assert_eq!(record["otelSpanID"].as_str().unwrap().len(), 16);
        assert_eq!(record["otelTraceSampled"], true);
    }

    #[test]
    fn test_nested_span_keeps_trace_id_and_changes_span_id() {
        let capture = run_with_formatter(|| {
            let outer = tracing::info_span!("outer");
            let _outer = outer.enter();
            tracing::info!("from outer");
            let inner = tracing::info_span!("inner");
            let _inner = inner.enter();
            tracing::info!("from inner");
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["otelTraceID"], lines[1]["otelTraceID"]);
        assert_ne!(lines[0]["otelSpanID"], lines[1]["otelSpanID"]);
    }

    #[test]
    fn test_structured_fields_pass_through() {
        let capture = run_with_formatter(|| {
            tracing::info!(attempt = 3u64, backend = "b1", "Retrying");
        });

        let record = &capture.lines()[0];
        assert_eq!(record["attempt"], 3);
        assert_eq!(record["backend"], "b1");
        assert_eq!(record["message"], "Retrying");
    }

    #[test]
    fn test_numeric_levels_are_ordered() {
        assert!(numeric_level(&Level::ERROR) > numeric_level(&Level::WARN));
        assert!(numeric_level(&Level::WARN) > numeric_level(&Level::INFO));
        assert!(numeric_level(&Level::INFO) > numeric_level(&Level::DEBUG));
        assert!(numeric_level(&Level::DEBUG) > numeric_level(&Level::TRACE));
    }
}

//! Logging system demonstration
//!
//! This example shows how to use the logging infrastructure in different modes.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format
//! cargo run --example logging_demo -- compact
//!
//! # With custom filter
//! cargo run --example logging_demo -- pretty "logging_demo=trace"
//! ```

use bridge_traits::{ConsoleLogger, LogLevel};
use core_runtime::logging::{display_path, init_logging, LogFormat, LogOutput, LoggingConfig};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some(_) => LogFormat::Pretty,
        None => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_output(LogOutput::Stdout)
        .with_level(LogLevel::Trace)
        .with_spans(true)
        .with_target(true)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    if let Some(filter) = args.get(2).cloned() {
        config = config.with_filter(filter);
    }

    if let Err(err) = init_logging(config) {
        eprintln!("logging setup failed: {err}");
        return;
    }

    info!("=== Logging System Demo ===");
    info!(format = ?format, "Logging initialized");

    demo_log_levels();
    demo_path_redaction();
    demo_instrumentation();

    info!("=== Demo Complete ===");
}

fn demo_log_levels() {
    let span = span!(Level::INFO, "log_levels");
    let _enter = span.enter();

    trace!("This is a TRACE level log");
    debug!("This is a DEBUG level log");
    info!("This is an INFO level log");
    warn!("This is a WARN level log (also mirrored to the sink)");
    error!("This is an ERROR level log (also mirrored to the sink)");
}

fn demo_path_redaction() {
    let span = span!(Level::INFO, "path_redaction");
    let _enter = span.enter();

    let path = Path::new("/home/user/private/notes/todo.txt");

    info!(path = %display_path(path, true), "Redacted path");
    info!(path = %display_path(path, false), "Full path");
}

#[instrument]
fn demo_instrumentation() {
    info!("Instrumented function automatically creates spans");

    let entries = vec!["a.txt", ".hidden", "sub"];
    list_entries(&entries);
}

#[instrument(fields(count = entries.len()))]
fn list_entries(entries: &[&str]) {
    for (idx, name) in entries.iter().enumerate() {
        trace!(idx, name = %name, "Visited entry");
    }

    debug!("All entries visited");
}

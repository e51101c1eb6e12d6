use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Stdout filter used when `RUST_LOG` is not set.
pub const DEFAULT_STDOUT_FILTER: &str = "info,web_request=warn,db_query=warn,sqlx=off";
/// File filter; the log file always gets crate-level debug output.
pub const FILE_FILTER: &str = "info,scraper=debug,web_request=debug,db_query=debug,sqlx=warn";

pub const LOG_DIRECTORY: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "webrss.log";

fn stdout_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDOUT_FILTER))
}

pub fn configure_logging() {
    // Stdout log configuration
    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(stdout_filter());

    // File log configuration
    let file_appender = rolling::daily(LOG_DIRECTORY, LOG_FILE_PREFIX);
    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(EnvFilter::new(FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}

use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a verbosity level: 0 silent, 1 progress, 2+ debug.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "flashscore_scraper=warn,warn",
        1 => "flashscore_scraper=info,warn",
        _ => "flashscore_scraper=debug,info",
    }
}

/// Console output is off at verbosity 0 unless `RUST_LOG` asks for it.
pub fn console_enabled(verbosity: u8, rust_log_set: bool) -> bool {
    verbosity > 0 || rust_log_set
}

/// Initializes the logging system with file output and, above verbosity 0, console output.
///
/// `RUST_LOG` wins over the verbosity level when set.
pub fn init_logging(verbosity: u8) {
    let rust_log_set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();

    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    // Create a non-blocking file appender for daily log rotation
    let file_appender = tracing_appender::rolling::daily("logs", "scraper.log");
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    // Create a JSON layer for file logging
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Create a formatted layer for console logging
    let console_layer = console_enabled(verbosity, rust_log_set)
        .then(|| fmt::layer().with_target(true).with_writer(std::io::stdout));

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    // Set the global default subscriber
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // We need to keep the guard in scope to ensure logs are flushed on exit
    std::mem::forget(_guard);
}

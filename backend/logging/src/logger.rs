//! Structured Logger
//!
//! Wraps `tracing` to provide console output plus a daily-rolling NDJSON
//! file, with environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// Console output keeps targets so the originating crate is visible;
/// the file layer writes NDJSON to `<log_dir>/pantrysnap.log.YYYY-MM-DD`.
/// Calling this more than once leaves the first subscriber in place.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // The appender wants the directory to exist already.
    let _ = std::fs::create_dir_all(log_dir.as_ref());
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "pantrysnap.log");

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_safe_to_call_repeatedly() {
        let dir = std::env::temp_dir().join("pantrysnap-logger-test");
        init_logger(&dir, "info");
        init_logger(&dir, "debug");
        assert!(dir.is_dir());
    }
}

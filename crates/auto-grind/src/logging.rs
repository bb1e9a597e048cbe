use crate::config::Config;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "auto_grind=debug,auto_grind_core=debug";
const LOG_FILE_PREFIX: &str = "auto-grind.log";

/// Install the global subscriber: console output plus a daily rolling file
/// in the data directory.
///
/// `RUST_LOG` overrides the default filter. The returned guard flushes the
/// file writer and must live until exit. Without a data directory only the
/// console layer is installed.
pub(crate) fn init() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match Config::logs_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();

            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();

            warn!(error = ?e, "No log directory, logging to console only");
            None
        }
    }
}

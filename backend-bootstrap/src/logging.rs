use std::path::Path;

use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "arena-backend.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Stdout-only subscriber for the current thread, active until the guard is
/// dropped. Covers config loading, which runs before `log_dir` is known.
pub fn init_startup_logging() -> DefaultGuard {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer());
    tracing::subscriber::set_default(subscriber)
}

/// Installs the global subscriber: stdout always, plus a daily-rolling file
/// under `log_dir` when one is configured. The returned guard must live as
/// long as the process or buffered file output is lost.
pub fn init_logging(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(Path::new(dir), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_logging_enables_warnings_before_global_init() {
        assert!(!tracing::enabled!(tracing::Level::WARN));
        let _guard = init_startup_logging();
        assert!(tracing::enabled!(tracing::Level::WARN));
    }
}

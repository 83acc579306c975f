use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();
static LOGGER_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const DEFAULT_LOG_DIRECTIVES: &str = "info,app::coordination=debug";
const LOG_FILE_PREFIX: &str = "wellsync-coordinator.log";

fn env_filter() -> AppResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
        .map_err(|err| AppError::internal(format!("invalid log directives: {err}")))
}

/// Daily-rolling file log under `log_dir` plus stderr output. Idempotent.
pub fn init_logging(log_dir: &Path) -> AppResult<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            std::fs::create_dir_all(log_dir)?;

            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let env_filter = env_filter()?;

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .try_init()
                .map_err(|err| AppError::internal(format!("failed to install subscriber: {err}")))?;

            // The guard flushes the file writer on drop; keep it only once the subscriber owns it.
            LOGGER_GUARD
                .set(guard)
                .map_err(|_| AppError::internal("logger already initialized"))?;

            Ok(())
        })
        .map(|_| ())
}

/// Console-only logging for hosts that own their log files.
pub fn init_stderr_logging() -> AppResult<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            tracing_subscriber::registry()
                .with(env_filter()?)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .try_init()
                .map_err(|err| AppError::internal(format!("failed to install subscriber: {err}")))?;
            Ok(())
        })
        .map(|_| ())
}

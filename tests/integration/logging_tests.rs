// Logger installation when the host already owns the global subscriber

use tempfile::TempDir;
use tracing_subscriber::util::SubscriberInitExt;
use wellsync_coordinator::utils::logger::init_logging;
use wellsync_coordinator::{AppError, AppResult};

#[test]
fn failed_install_can_be_retried() -> AppResult<()> {
    tracing_subscriber::registry()
        .try_init()
        .map_err(|err| AppError::internal(err.to_string()))?;

    let dir = TempDir::new()?;
    let log_dir = dir.path().join("logs");

    for _ in 0..2 {
        match init_logging(&log_dir) {
            Err(AppError::Internal(message)) => {
                assert!(message.starts_with("failed to install subscriber"), "{message}")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert!(log_dir.is_dir());
    Ok(())
}

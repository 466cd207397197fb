//! Tracing setup.
//!
//! The TUI owns the terminal, so log lines go to a daily rolling file
//! instead of stderr.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name prefix for the rolling log.
const LOG_FILE_PREFIX: &str = "momentum.log";

/// Keeps the non-blocking log writer alive; drop it to flush.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Errors that can occur when initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Default filter directive for the given verbosity.
fn default_directive(debug: bool) -> &'static str {
    if debug {
        "momentum=debug,momentum_engine=debug,momentum_tui=debug"
    } else {
        "momentum=info,momentum_engine=info,momentum_tui=info"
    }
}

/// Install the global subscriber writing into `log_dir`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init(log_dir: &Path, debug: bool) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    let verbose = debug;
    tracing::info!(log_dir = %log_dir.display(), verbose, "tracing initialized");

    Ok(LoggingGuard {
        _guard: guard,
        log_dir: log_dir.to_path_buf(),
    })
}

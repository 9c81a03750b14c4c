//! Logging and tracing setup.
//!
//! Human-readable events go to stderr so stdout stays clean for command
//! output. When a log location can be resolved, events are also written as
//! JSON lines to a daily-rotated file through a non-blocking appender.
//!
//! Log file resolution, first match wins:
//!
//! 1. `VERBATIM_LOG_PATH` (explicit file)
//! 2. `VERBATIM_LOG_DIR` (directory, file name `verbatim.jsonl`)
//! 3. `log_dir` from configuration
//! 4. the platform data directory (`.../verbatim/logs`)

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_PATH_ENV: &str = "VERBATIM_LOG_PATH";
const LOG_DIR_ENV: &str = "VERBATIM_LOG_DIR";
const LOG_FILE_NAME: &str = "verbatim.jsonl";

/// Where, if anywhere, the JSONL log file goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Directory holding the log file.
    pub log_dir: Option<PathBuf>,
    /// File name prefix inside `log_dir`.
    pub file_name: String,
}

impl ObservabilityConfig {
    /// Resolve the log location from the environment, then `config_log_dir`,
    /// then the platform default.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
            verbatim_core::config::user_data_local_dir().map(|d| d.join("logs").into_std_path_buf()),
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
        default_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = log_path.filter(|p| !p.as_os_str().is_empty()) {
            let file_name = path
                .file_name()
                .map_or_else(|| LOG_FILE_NAME.to_string(), |n| n.to_string_lossy().into_owned());
            let log_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            return Self {
                log_dir: Some(log_dir),
                file_name,
            };
        }

        let log_dir = env_dir
            .filter(|p| !p.as_os_str().is_empty())
            .or(config_dir)
            .or(default_dir);
        Self {
            log_dir,
            file_name: LOG_FILE_NAME.to_string(),
        }
    }
}

/// Build the stderr filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` means errors only, each
/// `-v` raises the level one step above the configured one.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(directive(quiet, verbose, config_level))
}

fn directive(quiet: bool, verbose: u8, config_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process. A log directory that cannot be created disables the
/// file layer instead of failing the command.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let mut guard = None;
    let file_layer = match config.log_dir.as_deref() {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_name);
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

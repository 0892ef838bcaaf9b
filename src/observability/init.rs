//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFile;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable, if set and valid
/// 2. `config.trace_level`, if set
/// 3. Default: `"info"`
///
/// # Output
///
/// Records go to `config.log_file` through a [`RotatingFile`] when it is set,
/// otherwise to stderr. If the log file's directory cannot be created, stderr
/// is used instead.
///
/// # Initialization Behavior
///
/// Idempotent: only the first call installs a subscriber; later calls, or a
/// subscriber installed by someone else, are left alone.
///
/// # Example
///
/// ```rust
/// use shelltex::observability::init_tracing;
/// use shelltex::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_file = config.log_file.as_ref().filter(|path| {
        path.parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or(true, |dir| std::fs::create_dir_all(dir).is_ok())
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match log_file {
        Some(path) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(RotatingFile::new(path.clone())),
            )
            .try_init(),
        None => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
    };

    if result.is_ok() {
        tracing::debug!(log_file = ?log_file, "tracing initialized");
    }
}

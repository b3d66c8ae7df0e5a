//! Subscriber setup for binaries. The library itself only emits `tracing`
//! events and never installs a subscriber.

use std::{fs::OpenOptions, sync::Mutex};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ConfigError, ConfigResult, LogConfig, LogFile};

/// Builds the level filter. `RUST_LOG` takes precedence over the configured level.
pub fn env_filter(config: &LogConfig) -> ConfigResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|_| ConfigError::InvalidLogLevel(config.level.clone()))
}

/// Installs the global subscriber: stderr always, plus an append-only file
/// sink when `file` is set. Fails without installing anything when the filter
/// is invalid or the file cannot be opened.
pub fn init(config: &LogConfig) -> ConfigResult<()> {
    let filter = env_filter(config)?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi);

    let file_layer = match config.file.as_ref().and_then(LogFile::resolve) {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| ConfigError::Open { path, source })?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::Subscriber(e.to_string()))
}

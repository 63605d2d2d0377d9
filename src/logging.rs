use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_FILE: &str = "countdown-tui.log";

/// Sends tracing output to a file in the data dir. The terminal belongs to
/// the UI, so nothing is ever written to stdout or stderr. `RUST_LOG` wins
/// over the configured level.
pub fn init(config: &Config) -> Result<PathBuf> {
    fs::create_dir_all(&config.data_dir)
        .wrap_err_with(|| format!("creating {}", config.data_dir.display()))?;
    let path = config.data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| eyre!("invalid log level {:?}: {e}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {e}"))?;

    Ok(path)
}

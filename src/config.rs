use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;
use crate::i18n::Language;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const APP_DIR: &str = "countdown-tui";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{var}={value:?} is not a supported language")]
    Language { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub language: Language,
    /// Author attached to new comments. Blank posts as "Anonymous".
    pub author: String,
    pub effect_duration: Duration,
    pub log_level: String,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            page_size: 100,
            request_timeout: Duration::from_secs(10),
            language: Language::Zh,
            author: String::new(),
            effect_duration: Duration::from_millis(4000),
            log_level: "info".into(),
            data_dir: dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR)),
        }
    }
}

/// `config.toml` as written by the user. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
    language: Option<Language>,
    author: Option<String>,
    effect_duration_ms: Option<u64>,
    log_level: Option<String>,
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Defaults, then the config file, then `COUNTDOWN_*` variables, then
    /// command-line flags.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Some(read_file(path)?),
            None => match default_path() {
                Some(path) if path.exists() => Some(read_file(&path)?),
                _ => None,
            },
        };
        Self::from_sources(file, |name| std::env::var(name).ok(), cli)
    }

    fn from_sources(
        file: Option<ConfigFile>,
        env: impl Fn(&str) -> Option<String>,
        cli: &Cli,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(file) = file {
            if let Some(v) = file.api_base_url {
                config.api_base_url = v;
            }
            if let Some(v) = file.page_size {
                config.page_size = v;
            }
            if let Some(v) = file.request_timeout_secs {
                config.request_timeout = Duration::from_secs(v);
            }
            if let Some(v) = file.language {
                config.language = v;
            }
            if let Some(v) = file.author {
                config.author = v;
            }
            if let Some(v) = file.effect_duration_ms {
                config.effect_duration = Duration::from_millis(v);
            }
            if let Some(v) = file.log_level {
                config.log_level = v;
            }
            if let Some(v) = file.data_dir {
                config.data_dir = v;
            }
        }

        if let Some(v) = env("COUNTDOWN_API_URL") {
            config.api_base_url = v;
        }
        if let Some(v) = env("COUNTDOWN_DATA_DIR") {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = env("COUNTDOWN_LANG") {
            config.language = v.parse().map_err(|_| ConfigError::Language {
                var: "COUNTDOWN_LANG",
                value: v.clone(),
            })?;
        }

        if let Some(v) = &cli.api_url {
            config.api_base_url = v.clone();
        }
        if let Some(v) = cli.lang {
            config.language = v;
        }
        if let Some(v) = &cli.data_dir {
            config.data_dir = v.clone();
        }

        Ok(config)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

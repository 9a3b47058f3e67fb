use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file at {config_path}: cannot expand value_path {value_path:?}: {source}")]
    UnknownVariable {
        config_path: PathBuf,
        value_path: PathBuf,
        source: shellexpand::LookupError<std::env::VarError>,
    },

    #[error("Config file at {config_path}: history.capacity must be at least 1")]
    ZeroHistoryCapacity { config_path: PathBuf },
}

/// Every field is optional in the file; missing ones take their defaults.
///
/// ```toml
/// log_filter = "redline_engine=debug"
/// value_path = "~/drafts/letter.toml"
///
/// [history]
/// capacity = 64
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `env_logger` filter used when `RUST_LOG` is not set
    pub log_filter: Option<String>,
    /// Initial value file opened when none is given on the command line
    pub value_path: Option<PathBuf>,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots kept
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Config {
    /// Read the config at `config_path`. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content, config_path).map(Some)
    }

    /// Read `~/.config/redline/config.toml`
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/redline");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The value file to open: `cli_value` when given, else `value_path`
    pub fn value_file(&self, cli_value: Option<PathBuf>) -> Option<PathBuf> {
        cli_value.or_else(|| self.value_path.clone())
    }

    fn parse(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        if config.history.capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity {
                config_path: config_path.to_path_buf(),
            });
        }

        if let Some(value_path) = config.value_path.take() {
            let expanded = shellexpand::full(&value_path.to_string_lossy())
                .map(|expanded| PathBuf::from(expanded.as_ref()))
                .map_err(|source| ConfigError::UnknownVariable {
                    config_path: config_path.to_path_buf(),
                    value_path: value_path.clone(),
                    source,
                })?;
            config.value_path = Some(expanded);
        }

        Ok(config)
    }
}

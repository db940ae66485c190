// ⚙️ Configuration - defaults < JSON file < command-line overrides

use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Config file looked up when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = "pmb-registration.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the registration slot
    pub database_path: PathBuf,
    pub locale: Locale,
    /// Bind address of the web host
    pub server_addr: String,
    /// Default tracing filter; `RUST_LOG` wins when set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("pmb-registration.db"),
            locale: Locale::Indonesian,
            server_addr: "127.0.0.1:3000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub locale: Option<Locale>,
    pub server_addr: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.database_path {
            self.database_path = path;
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        if let Some(addr) = overrides.server_addr {
            self.server_addr = addr;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a subscriber may already be installed (tests, embedding hosts)
    let _ = fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

// ============================================================================
// TESTS
// ============================================================================

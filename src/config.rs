use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub show_quotes: bool,
    pub show_system_info: bool,
    pub ask_update: bool,
    pub ascii_style: String,
    // keys we don't know about are kept so a rewrite doesn't drop them
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_quotes: true,
            show_system_info: true,
            ask_update: true,
            ascii_style: "cyberpunk".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Config {
    /// `~/.config/terminal_splash/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".config").join("terminal_splash").join("config.json"))
    }

    /// Loads the per-user config, writing defaults on first run.
    /// Never fails: every problem degrades to the default set.
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_init(&path),
            Err(e) => {
                warn!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("ignoring config at {}: {e}", path.display());
                    Self::default()
                }
            }
        } else {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => debug!("wrote default config to {}", path.display()),
                Err(e) => debug!("could not write default config: {e}"),
            }
            config
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the config through a sibling temp file so a reader never sees
    /// a half-written file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)
    }
}

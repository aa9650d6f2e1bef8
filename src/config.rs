//! Client configuration.
//!
//! Loaded in order, later sources overriding earlier ones:
//!
//! 1. Built-in defaults (`tmux` from `$PATH`, default socket, quiet)
//! 2. User config: `~/.config/tmux-opts/config.json`
//! 3. Environment: `TMUX_OPTS_BINARY`, `TMUX_OPTS_SOCKET`, `TMUX_OPTS_VERBOSE`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// User configuration directory name.
pub const CONFIG_DIR: &str = "tmux-opts";

/// User configuration filename.
pub const CONFIG_FILE: &str = "config.json";

pub const ENV_BINARY: &str = "TMUX_OPTS_BINARY";
pub const ENV_SOCKET: &str = "TMUX_OPTS_SOCKET";
pub const ENV_VERBOSE: &str = "TMUX_OPTS_VERBOSE";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// How to reach the tmux server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path to the tmux binary
    pub binary: String,
    /// Socket name passed with `-L`; `None` uses tmux's default socket
    pub socket: Option<String>,
    /// Log every command at info level instead of debug
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            binary: "tmux".to_string(),
            socket: None,
            verbose: false,
        }
    }
}

impl ClientConfig {
    /// Default location of the user config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the user config file (if any) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded client config");
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(binary) = lookup(ENV_BINARY).filter(|b| !b.is_empty()) {
            self.binary = binary;
        }
        if let Some(socket) = lookup(ENV_SOCKET) {
            self.socket = (!socket.is_empty()).then_some(socket);
        }
        if let Some(verbose) = lookup(ENV_VERBOSE) {
            self.verbose = matches!(verbose.as_str(), "1" | "true" | "yes" | "on");
        }
    }

    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }
}
